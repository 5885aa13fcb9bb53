use serde::{Deserialize, Serialize};

use crate::{geometry::Point, residual::ResidualFloor, Grid};

/// Parameters of a single threading run.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of pins on the loom.
    pub pin_count: usize,
    /// Working radius in pixels. The darkness grid is `2 * radius + 1` wide.
    pub radius: u32,
    /// Pin the thread starts from.
    pub initial_pin: usize,
    /// Upper bound on iterations, and therefore on recorded chords.
    pub max_lines: usize,
    /// Number of recently reached pins that may not be picked again.
    pub min_loop: usize,
    /// Thickness of a thread in pixels.
    pub line_width: usize,
    /// Darkness a single pass of thread removes from the residual.
    pub line_weight: f64,
    /// Angle of pin 0, in radians.
    pub angular_offset: f64,
    /// Center of the pin circle. Defaults to `(radius + 1, radius + 1)`.
    pub center: Option<Point<i64>>,
    /// What happens to residual values pushed below zero.
    pub floor: ResidualFloor,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pin_count: 200,
            radius: 500,
            initial_pin: 0,
            max_lines: 5000,
            min_loop: 3,
            line_width: 3,
            line_weight: 15.0,
            angular_offset: 0.0,
            center: None,
            floor: ResidualFloor::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        if self.pin_count < 2 {
            return Err(InvalidConfiguration::PinCount(self.pin_count));
        }
        if self.radius == 0 {
            return Err(InvalidConfiguration::Radius);
        }
        if self.initial_pin >= self.pin_count {
            return Err(InvalidConfiguration::InitialPin {
                pin: self.initial_pin,
                pin_count: self.pin_count,
            });
        }
        if self.max_lines == 0 {
            return Err(InvalidConfiguration::MaxLines);
        }
        if self.min_loop >= self.pin_count {
            return Err(InvalidConfiguration::MinLoop {
                min_loop: self.min_loop,
                pin_count: self.pin_count,
            });
        }
        if self.line_width == 0 {
            return Err(InvalidConfiguration::LineWidth);
        }
        if !self.line_weight.is_finite() {
            return Err(InvalidConfiguration::LineWeight(self.line_weight));
        }
        if !self.angular_offset.is_finite() {
            return Err(InvalidConfiguration::AngularOffset(self.angular_offset));
        }
        Ok(())
    }

    /// Grid the darkness image must be sampled on.
    pub fn grid(&self) -> Grid {
        Grid::disk(self.radius)
    }

    pub fn center(&self) -> Point<i64> {
        self.center.unwrap_or_else(|| default_center(self.radius))
    }

    /// Checks that a darkness grid has the dimensions this config expects.
    pub fn check_grid(&self, grid: Grid) -> Result<(), InvalidConfiguration> {
        let expected = self.grid();
        if grid != expected {
            return Err(InvalidConfiguration::GridSize {
                height: grid.height,
                width: grid.width,
                expected: expected.width,
            });
        }
        Ok(())
    }
}

/// One pixel past the radius on both axes, which is where the rasterizer's
/// origin offset expects the circle to sit.
pub fn default_center(radius: u32) -> Point<i64> {
    let c = i64::from(radius) + 1;
    Point::new(c, c)
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidConfiguration {
    #[error("at least 2 pins are required, got {0}")]
    PinCount(usize),
    #[error("the radius must be greater than zero")]
    Radius,
    #[error("initial pin {pin} is out of range for {pin_count} pins")]
    InitialPin { pin: usize, pin_count: usize },
    #[error("the maximum line count must be greater than zero")]
    MaxLines,
    #[error("min loop ({min_loop}) must be lower than the pin count ({pin_count})")]
    MinLoop { min_loop: usize, pin_count: usize },
    #[error("the line width must be greater than zero")]
    LineWidth,
    #[error("the line weight must be finite, got {0}")]
    LineWeight(f64),
    #[error("the angular offset must be finite, got {0}")]
    AngularOffset(f64),
    #[error("darkness grid is {width}x{height}, expected {expected}x{expected}")]
    GridSize {
        height: usize,
        width: usize,
        expected: usize,
    },
}
