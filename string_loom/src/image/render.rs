use image::{GrayImage, Luma};

use crate::{builder::Chord, raster::rasterize, Float, Grid, PinTable};

use super::PixelData;

/// Draws every chord as a one pixel black line on a white canvas.
///
/// # Panics
///
/// If a chord refers to a pin missing from `pins`.
pub fn render_path(pins: &PinTable, path: &[Chord], grid: Grid) -> GrayImage {
    let mut image = GrayImage::from_pixel(grid.width as u32, grid.height as u32, Luma([255]));
    for chord in path {
        for pixel in rasterize(pins[chord.from].position, pins[chord.to].position) {
            if grid.contains(pixel) {
                image.put_pixel(pixel.x as u32, pixel.y as u32, Luma([0]));
            }
        }
    }
    image
}

/// Residual intensities clamped to `0..=255`.
pub fn render_residual<S: Float>(residual: &PixelData<S>) -> GrayImage {
    let grid = residual.grid();
    let pixels = residual
        .pixels()
        .iter()
        .map(|&v| v.max(S::ZERO).min(S::TWO_FIVE_FIVE).round().to_u8().unwrap_or(0))
        .collect();
    GrayImage::from_raw(grid.width as u32, grid.height as u32, pixels)
        .unwrap_or_else(|| GrayImage::new(grid.width as u32, grid.height as u32))
}
