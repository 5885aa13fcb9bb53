pub mod geometry {
    pub mod point;

    pub use point::Point;
}

mod builder;
pub mod config;
pub mod export;
mod float;
pub mod grid;
pub mod image;
pub mod pins;
pub mod raster;
pub mod residual;
pub mod verboser;

pub use builder::*;
pub use config::{Config, InvalidConfiguration};
pub use float::Float;
pub use grid::Grid;
pub use pins::{Pin, PinTable};
pub use residual::{Residual, ResidualFloor};
pub use self::image::PixelData;
