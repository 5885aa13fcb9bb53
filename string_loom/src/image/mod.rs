use crate::{geometry::Point, Grid};
use std::ops::Deref;

mod prepare;
mod render;

pub use prepare::{open, prepare, Error};
pub use render::{render_path, render_residual};

/// Row-major pixel buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelData<T> {
    pixels: Vec<T>,
    grid: Grid,
}

impl<T> PixelData<T> {
    /// Wraps `pixels`, or gives them back when their count does not match
    /// `grid`.
    pub fn from_raw(pixels: Vec<T>, grid: Grid) -> Result<Self, Vec<T>> {
        if pixels.len() == grid.len() {
            Ok(Self { pixels, grid })
        } else {
            Err(pixels)
        }
    }

    pub fn new(mut builder: impl FnMut(Point<usize>) -> T, grid: Grid) -> Self {
        let mut pixels = Vec::with_capacity(grid.len());
        for y in 0..grid.height {
            for x in 0..grid.width {
                pixels.push(builder(Point { x, y }));
            }
        }
        Self { pixels, grid }
    }

    pub fn filled(value: T, grid: Grid) -> Self
    where
        T: Clone,
    {
        Self {
            pixels: vec![value; grid.len()],
            grid,
        }
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    pub fn get(&self, point: Point<i64>) -> Option<&T> {
        self.grid.index_of(point).map(|index| &self.pixels[index])
    }

    pub fn get_mut(&mut self, point: Point<i64>) -> Option<&mut T> {
        self.grid.index_of(point).map(|index| &mut self.pixels[index])
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl<T> Deref for PixelData<T> {
    type Target = Grid;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}
