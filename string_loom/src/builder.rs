use std::{collections::VecDeque, ops::Range};

use num_traits::AsPrimitive;
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, InvalidConfiguration},
    export::{self, EdgeTable, VectorPath},
    image::PixelData,
    raster::rasterize,
    residual::Residual,
    verboser::{Message, Verboser},
    Float, PinTable,
};

/// Direction of the search and sign of the ink.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Maximize fitness, remove darkness.
    #[default]
    Dark,
    /// Minimize fitness, give darkness back.
    Light,
}

impl Phase {
    /// Whether `candidate` strictly beats `best` in this phase.
    pub fn improves<S: Float>(self, candidate: S, best: S) -> bool {
        match self {
            Self::Dark => candidate > best,
            Self::Light => candidate < best,
        }
    }

    /// Signed amount a deposit adds to each covered pixel.
    pub fn ink<S: Float>(self, weight: S) -> S {
        match self {
            Self::Dark => -weight,
            Self::Light => weight,
        }
    }
}

/// A thread segment between two pins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub from: usize,
    pub to: usize,
}

/// FIFO of the last `capacity` pins the thread reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentPins {
    pins: VecDeque<usize>,
    capacity: usize,
}

impl RecentPins {
    pub fn new(capacity: usize) -> Self {
        Self {
            pins: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Remembers `pin`, forgetting the oldest one when full.
    pub fn push(&mut self, pin: usize) {
        if self.capacity == 0 {
            return;
        }
        if self.pins.len() == self.capacity {
            self.pins.pop_front();
        }
        self.pins.push_back(pin);
    }

    pub fn contains(&self, pin: usize) -> bool {
        self.pins.contains(&pin)
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.pins.iter().copied()
    }
}

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The configured iteration budget was spent.
    MaxLines,
    /// Neither phase found an improving chord.
    Exhausted,
}

/// Outcome of a single iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Chord(Chord),
    PhaseSwitched,
    Finished(Termination),
}

struct State {
    current_pin: usize,
    phase: Phase,
    recent: RecentPins,
    path: Vec<Chord>,
    iterations: usize,
    dark_chords: usize,
    finished: Option<Termination>,
}

#[derive(Clone, Copy)]
struct Candidate<S> {
    pin: usize,
    fitness: S,
}

/// Slice of the candidate offsets evaluated by one worker.
struct Batch<S> {
    offsets: Range<usize>,
    best: Option<Candidate<S>>,
}

impl<S> Batch<S> {
    fn new(count: usize) -> Vec<Self> {
        (0..count.max(1))
            .map(|_| Self {
                offsets: 0..0,
                best: None,
            })
            .collect()
    }
}

/// Greedy single-thread path construction over a residual darkness grid.
///
/// Each iteration evaluates every chord leaving the current pin, keeps the
/// best one for the current phase and deposits it. The dark phase ends the
/// first time no chord beats a zero fitness; the light phase then runs until
/// it is exhausted too or the iteration budget is spent.
pub struct PathBuilder<S> {
    pins: PinTable,
    residual: Residual<S>,
    weight: S,
    line_width: usize,
    max_lines: usize,
    state: State,
    batches: Vec<Batch<S>>,
}

impl<S: Float> PathBuilder<S> {
    /// Validates `config` against `darkness` and lays out the pins. Nothing is
    /// computed until [`Self::step`] or [`Self::compute`].
    pub fn new(
        config: &Config,
        darkness: PixelData<S>,
        verboser: &mut impl Verboser,
    ) -> Result<Self, InvalidConfiguration>
    where
        f64: AsPrimitive<S>,
    {
        config.validate()?;
        config.check_grid(*darkness.grid())?;
        let pins = PinTable::from_config(config, verboser)?;
        Ok(Self {
            pins,
            residual: Residual::new(darkness, config.floor),
            weight: config.line_weight.as_(),
            line_width: config.line_width,
            max_lines: config.max_lines,
            state: State {
                current_pin: config.initial_pin,
                phase: Phase::Dark,
                recent: RecentPins::new(config.min_loop),
                path: Vec::new(),
                iterations: 0,
                dark_chords: 0,
                finished: None,
            },
            batches: Batch::new(num_cpus::get()),
        })
    }

    /// Number of chunks candidates are split into for parallel evaluation.
    /// The selected chord does not depend on it.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.batches = Batch::new(workers);
        self
    }

    /// Runs one iteration.
    pub fn step(&mut self, verboser: &mut impl Verboser) -> Step {
        if let Some(termination) = self.state.finished {
            return Step::Finished(termination);
        }
        if self.state.iterations >= self.max_lines {
            return self.finish(Termination::MaxLines);
        }
        verboser.verbose(Message::Computing(self.state.iterations));
        self.state.iterations += 1;

        let Some(best) = self.select() else {
            return match self.state.phase {
                Phase::Dark => {
                    tracing::info!(
                        pin = self.state.current_pin,
                        chords = self.state.path.len(),
                        "dark pass exhausted, switching to light"
                    );
                    self.state.phase = Phase::Light;
                    verboser.verbose(Message::PhaseSwitched {
                        at_pin: self.state.current_pin,
                    });
                    Step::PhaseSwitched
                }
                Phase::Light => self.finish(Termination::Exhausted),
            };
        };

        let chord = Chord {
            from: self.state.current_pin,
            to: best.pin,
        };
        let pixels = rasterize(self.pins[chord.from].position, self.pins[chord.to].position);
        self.residual
            .deposit(&pixels, self.state.phase, self.weight, self.line_width);
        self.state.recent.push(best.pin);
        self.state.current_pin = best.pin;
        self.state.path.push(chord);
        if self.state.phase == Phase::Dark {
            self.state.dark_chords += 1;
        }
        tracing::debug!(from = chord.from, to = chord.to, fitness = %best.fitness, phase = ?self.state.phase, "chord");
        verboser.verbose(Message::Chord {
            chord,
            phase: self.state.phase,
        });
        Step::Chord(chord)
    }

    /// Runs until the path is finished.
    #[tracing::instrument(skip_all, fields(pins = self.pins.len(), max_lines = self.max_lines))]
    pub fn compute(mut self, verboser: &mut impl Verboser) -> Computation<S> {
        while !matches!(self.step(verboser), Step::Finished(_)) {}
        self.into_computation()
    }

    /// Stops wherever the builder is and hands over the result.
    pub fn into_computation(self) -> Computation<S> {
        let chords = self.state.path.len();
        Computation {
            termination: self.state.finished,
            iterations: self.state.iterations,
            dark_chords: self.state.dark_chords,
            light_chords: chords - self.state.dark_chords,
            path: self.state.path,
            pins: self.pins,
            residual: self.residual,
        }
    }

    pub fn path(&self) -> &[Chord] {
        &self.state.path
    }

    pub fn pins(&self) -> &PinTable {
        &self.pins
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_pin(&self) -> usize {
        self.state.current_pin
    }

    pub fn recent_pins(&self) -> &RecentPins {
        &self.state.recent
    }

    pub fn iterations(&self) -> usize {
        self.state.iterations
    }

    pub fn residual(&self) -> &Residual<S> {
        &self.residual
    }

    pub fn termination(&self) -> Option<Termination> {
        self.state.finished
    }

    fn finish(&mut self, termination: Termination) -> Step {
        tracing::info!(
            ?termination,
            chords = self.state.path.len(),
            iterations = self.state.iterations,
            "path finished"
        );
        self.state.finished = Some(termination);
        Step::Finished(termination)
    }

    /// Best chord leaving the current pin, or `None` when nothing beats a
    /// zero fitness in the current phase.
    ///
    /// Candidates are the pins `current + 1, current + 2, ...` modulo the pin
    /// count. Batches cover contiguous runs of that order and are reduced in
    /// order with the same strict comparison, so ties always go to the first
    /// candidate no matter how the work was split.
    fn select(&mut self) -> Option<Candidate<S>> {
        let pin_count = self.pins.len();
        let chunk = (pin_count - 1).div_ceil(self.batches.len());
        for (index, batch) in self.batches.iter_mut().enumerate() {
            let start = (1 + index * chunk).min(pin_count);
            batch.offsets = start..(start + chunk).min(pin_count);
        }

        let pins = &self.pins;
        let residual = &self.residual;
        let state = &self.state;
        let from = pins[state.current_pin].position;
        self.batches.par_iter_mut().for_each(|batch| {
            batch.best = None;
            for offset in batch.offsets.clone() {
                let pin = (state.current_pin + offset) % pin_count;
                if state.recent.contains(pin) {
                    continue;
                }
                let fitness = residual.fitness(&rasterize(from, pins[pin].position));
                let best = batch.best.map_or(S::ZERO, |best| best.fitness);
                if state.phase.improves(fitness, best) {
                    batch.best = Some(Candidate { pin, fitness });
                }
            }
        });

        let mut best: Option<Candidate<S>> = None;
        for candidate in self.batches.iter().filter_map(|batch| batch.best) {
            let current = best.map_or(S::ZERO, |best| best.fitness);
            if self.state.phase.improves(candidate.fitness, current) {
                best = Some(candidate);
            }
        }
        best
    }
}

/// Result of a run.
#[derive(Clone, Debug)]
pub struct Computation<S> {
    pub path: Vec<Chord>,
    pub pins: PinTable,
    /// `None` when the builder was stopped before it finished.
    pub termination: Option<Termination>,
    pub iterations: usize,
    pub dark_chords: usize,
    pub light_chords: usize,
    pub residual: Residual<S>,
}

impl<S: Float> Computation<S> {
    pub fn export(&self) -> (VectorPath, EdgeTable) {
        export::export(&self.path, &self.pins)
    }
}

/// Runs a whole path from a validated config and a prepared darkness grid.
pub fn compute<S: Float>(
    config: &Config,
    darkness: PixelData<S>,
    verboser: &mut impl Verboser,
) -> Result<Computation<S>, InvalidConfiguration>
where
    f64: AsPrimitive<S>,
{
    Ok(PathBuilder::new(config, darkness, verboser)?.compute(verboser))
}
