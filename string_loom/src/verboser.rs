use crate::builder::{Chord, Phase};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Message {
    CreatingPin(usize),
    /// An iteration is about to start; carries the number of finished ones.
    Computing(usize),
    /// A chord was accepted and its ink deposited.
    Chord { chord: Chord, phase: Phase },
    /// The dark pass ran out of improving chords at this pin.
    PhaseSwitched { at_pin: usize },
}

/// Observer of a run. Called synchronously from the builder; no guarantee
/// is made on timing.
pub trait Verboser {
    fn verbose(&mut self, message: Message);
}

pub struct Silent;

impl Verboser for Silent {
    fn verbose(&mut self, _: Message) {}
}

/// Adapts a closure into a [`Verboser`].
pub struct Observer<F>(pub F);

impl<F: FnMut(&Message)> Verboser for Observer<F> {
    fn verbose(&mut self, message: Message) {
        (self.0)(&message)
    }
}
