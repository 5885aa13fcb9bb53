use serde::{Deserialize, Serialize};

use crate::{builder::Phase, geometry::Point, image::PixelData, raster, Float, Grid};

/// What a deposit does to values it pushes below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidualFloor {
    /// Values drift negative, so over-drawn regions repel dark chords.
    #[default]
    Unclamped,
    /// Values are clamped at zero after every deposit.
    Zero,
}

impl ResidualFloor {
    fn apply<S: Float>(self, value: S) -> S {
        match self {
            Self::Unclamped => value,
            Self::Zero => value.max(S::ZERO),
        }
    }
}

/// Darkness of the target that the drawn chords do not explain yet.
#[derive(Clone, Debug)]
pub struct Residual<S> {
    data: PixelData<S>,
    floor: ResidualFloor,
}

impl<S: Float> Residual<S> {
    pub fn new(darkness: PixelData<S>, floor: ResidualFloor) -> Self {
        Self {
            data: darkness,
            floor,
        }
    }

    /// Sum of the residual under `pixels`. Pixels outside the grid count as
    /// zero.
    pub fn fitness(&self, pixels: &[Point<i64>]) -> S {
        pixels
            .iter()
            .filter_map(|&pixel| self.data.get(pixel))
            .copied()
            .sum()
    }

    /// Draws a `width` pixels thick thread over `pixels`: takes `weight` away
    /// in the dark phase, adds it back in the light phase.
    pub fn deposit(&mut self, pixels: &[Point<i64>], phase: Phase, weight: S, width: usize) {
        let ink = phase.ink(weight);
        for pixel in raster::thicken(pixels, width) {
            if let Some(value) = self.data.get_mut(pixel) {
                *value = self.floor.apply(*value + ink);
            }
        }
    }

    pub fn get(&self, point: Point<i64>) -> Option<S> {
        self.data.get(point).copied()
    }

    pub fn floor(&self) -> ResidualFloor {
        self.floor
    }

    pub fn grid(&self) -> &Grid {
        self.data.grid()
    }

    pub fn data(&self) -> &PixelData<S> {
        &self.data
    }

    pub fn into_data(self) -> PixelData<S> {
        self.data
    }
}
