use std::ops::Index;

use crate::{
    config::{default_center, Config, InvalidConfiguration},
    geometry::Point,
    verboser::{Message, Verboser},
};

/// A fixed point on the loom where a chord may start or end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pin {
    pub index: usize,
    pub position: Point<i64>,
}

/// The immutable set of pins of a run, indexed by pin number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinTable {
    pins: Vec<Pin>,
}

impl PinTable {
    /// Lays `pin_count` pins evenly on a circle.
    ///
    /// Pin `k` sits at angle `angular_offset + k * 2π / pin_count` and its
    /// coordinates are truncated toward zero. `center` defaults to
    /// `(radius + 1, radius + 1)`.
    pub fn circle(
        radius: u32,
        pin_count: usize,
        angular_offset: f64,
        center: Option<Point<i64>>,
        verboser: &mut impl Verboser,
    ) -> Result<Self, InvalidConfiguration> {
        if pin_count < 2 {
            return Err(InvalidConfiguration::PinCount(pin_count));
        }
        if radius == 0 {
            return Err(InvalidConfiguration::Radius);
        }
        let center = center.unwrap_or_else(|| default_center(radius)).as_::<f64>();
        let radius = f64::from(radius);
        let pins = (0..pin_count)
            .map(|index| {
                verboser.verbose(Message::CreatingPin(index));
                let theta = angular_offset + std::f64::consts::TAU * index as f64 / pin_count as f64;
                let position = Point {
                    x: center.x + radius * theta.cos(),
                    y: center.y + radius * theta.sin(),
                }
                .trunc()
                .as_::<i64>();
                Pin { index, position }
            })
            .collect();
        Ok(Self { pins })
    }

    pub fn from_config(config: &Config, verboser: &mut impl Verboser) -> Result<Self, InvalidConfiguration> {
        Self::circle(
            config.radius,
            config.pin_count,
            config.angular_offset,
            config.center,
            verboser,
        )
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Pin> {
        self.pins.get(index)
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn positions(&self) -> impl Iterator<Item = Point<i64>> + '_ {
        self.pins.iter().map(|pin| pin.position)
    }
}

impl Index<usize> for PinTable {
    type Output = Pin;

    fn index(&self, index: usize) -> &Pin {
        &self.pins[index]
    }
}
