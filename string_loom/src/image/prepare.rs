use std::path::Path;

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use num_traits::AsPrimitive;

use crate::{Float, Grid};

use super::PixelData;

/// Opens an image file and turns it into a darkness grid of radius `radius`.
pub fn open<S: Float>(path: impl AsRef<Path>, radius: u32) -> Result<PixelData<S>, Error>
where
    u8: AsPrimitive<S>,
{
    prepare(&image::open(path)?, radius)
}

/// Turns an arbitrary picture into the darkness grid a run is seeded with.
///
/// Center-crops to a square, converts to grayscale, resizes to
/// `2 * radius + 1` pixels per side, inverts (so darker means larger) and
/// zeroes every pixel outside the disk of radius `radius`.
pub fn prepare<S: Float>(image: &DynamicImage, radius: u32) -> Result<PixelData<S>, Error>
where
    u8: AsPrimitive<S>,
{
    let (width, height) = image.dimensions();
    let side = width.min(height);
    if side == 0 {
        return Err(Error::Empty);
    }
    let square = image.crop_imm((width - side) / 2, (height - side) / 2, side, side);
    let grid = Grid::disk(radius);
    let mut gray = image::imageops::resize(
        &square.to_luma8(),
        grid.width as u32,
        grid.height as u32,
        FilterType::Triangle,
    );
    image::imageops::invert(&mut gray);

    let r = i64::from(radius);
    let sq_radius = r * r;
    Ok(PixelData::new(
        |p| {
            let dx = p.x as i64 - r;
            let dy = p.y as i64 - r;
            if dx * dx + dy * dy > sq_radius {
                S::ZERO
            } else {
                gray.get_pixel(p.x as u32, p.y as u32).0[0].as_()
            }
        },
        grid,
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("the image has no pixels")]
    Empty,
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma, RgbImage};

    use super::*;
    use crate::geometry::Point;

    #[test]
    fn white_becomes_zero_and_black_becomes_full() {
        let white = DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 40, Luma([255])));
        let data = prepare::<f32>(&white, 5).unwrap();
        assert_eq!(*data.grid(), Grid::new(11, 11));
        assert!(data.pixels().iter().all(|&v| v == 0.0));

        let black = DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 40, Luma([0])));
        let data = prepare::<f32>(&black, 5).unwrap();
        assert_eq!(data.get(Point::new(5, 5)), Some(&255.0));
    }

    #[test]
    fn corners_are_masked() {
        let black = DynamicImage::ImageRgb8(RgbImage::from_pixel(30, 30, image::Rgb([0, 0, 0])));
        let data = prepare::<f64>(&black, 5).unwrap();
        assert_eq!(data.get(Point::new(0, 0)), Some(&0.0));
        assert_eq!(data.get(Point::new(10, 10)), Some(&0.0));
        // on the rim of the disk
        assert_eq!(data.get(Point::new(0, 5)), Some(&255.0));
        assert_eq!(data.get(Point::new(5, 10)), Some(&255.0));
    }

    #[test]
    fn crops_to_the_centered_square() {
        // A wide picture: black center column band, white side bands that
        // the crop must discard.
        let image = GrayImage::from_fn(90, 30, |x, _| if (30..60).contains(&x) { Luma([0]) } else { Luma([255]) });
        let data = prepare::<f32>(&DynamicImage::ImageLuma8(image), 4).unwrap();
        assert_eq!(data.get(Point::new(4, 4)), Some(&255.0));
        assert_eq!(data.get(Point::new(0, 4)), Some(&255.0));
        assert_eq!(data.get(Point::new(8, 4)), Some(&255.0));
    }

    #[test]
    fn empty_image_is_rejected() {
        let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 10));
        assert!(matches!(prepare::<f32>(&empty, 3), Err(Error::Empty)));
    }
}
