//! Turns chords into the pixels they cover.

use crate::geometry::Point;

/// Pins live on a grid whose first pixel is `(1, 1)`, the darkness grid
/// starts at `(0, 0)`. Every sampled coordinate is shifted by this amount.
pub const PIXEL_ORIGIN_OFFSET: i64 = 1;

/// Pixels on the segment between two pin positions.
///
/// Samples `round(|p1 - p0|)` evenly spaced points from `p0` to `p1`, both
/// included, truncates them and shifts them by [`PIXEL_ORIGIN_OFFSET`].
/// Coincident (or adjacent) endpoints yield the single pixel under `p0`.
///
/// Interpolation always runs from the lesser endpoint to the greater one, so
/// swapping the endpoints only reverses the result.
pub fn rasterize(p0: Point<i64>, p1: Point<i64>) -> Vec<Point<i64>> {
    if p1 < p0 {
        let mut pixels = rasterize(p1, p0);
        pixels.reverse();
        return pixels;
    }
    let start = p0.as_::<f64>();
    let end = p1.as_::<f64>();
    let length = start.distance(&end).round() as usize;
    if length < 2 {
        return vec![p0 - PIXEL_ORIGIN_OFFSET];
    }
    let step = (end - start) * (1.0 / (length - 1) as f64);
    (0..length)
        .map(|i| {
            let sample = if i == length - 1 {
                end
            } else {
                Point {
                    x: start.x + step.x * i as f64,
                    y: start.y + step.y * i as f64,
                }
            };
            sample.trunc().as_::<i64>() - PIXEL_ORIGIN_OFFSET
        })
        .collect()
}

/// Footprint of a `width` pixels thick thread drawn over `pixels`, without
/// duplicates, in row-major order. A width of one returns the centerline
/// unchanged.
///
/// Each centerline pixel stamps the pixels of a `width` wide square whose
/// corners are cut by the disk of diameter `width`. Even widths cannot be
/// centered, so their square reaches one pixel further up and left.
pub fn thicken(pixels: &[Point<i64>], width: usize) -> Vec<Point<i64>> {
    if width <= 1 {
        return pixels.to_vec();
    }
    let width = width as i64;
    let low = -(width / 2);
    let high = (width - 1) / 2;
    // doubled coordinates keep the half pixel center of even widths integral
    let center = low + high;
    let mut footprint = Vec::with_capacity(pixels.len() * (width * width) as usize);
    for &pixel in pixels {
        for dy in low..=high {
            for dx in low..=high {
                let (ex, ey) = (2 * dx - center, 2 * dy - center);
                if ex * ex + ey * ey <= width * width {
                    footprint.push(Point {
                        x: pixel.x + dx,
                        y: pixel.y + dy,
                    });
                }
            }
        }
    }
    footprint.sort_unstable_by_key(|p| (p.y, p.x));
    footprint.dedup();
    footprint
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn set(pixels: &[Point<i64>]) -> BTreeSet<Point<i64>> {
        pixels.iter().copied().collect()
    }

    #[test]
    fn horizontal_line() {
        let pixels = rasterize(Point::new(1, 11), Point::new(21, 11));
        assert_eq!(pixels.len(), 20);
        assert_eq!(pixels.first(), Some(&Point::new(0, 10)));
        assert_eq!(pixels.last(), Some(&Point::new(20, 10)));
        assert!(pixels.iter().all(|p| p.y == 10));
    }

    #[test]
    fn sample_count_rounds_the_length() {
        // length = round(sqrt(9 + 9)) = round(4.24) = 4
        assert_eq!(rasterize(Point::new(0, 0), Point::new(3, 3)).len(), 4);
        // length = round(sqrt(4 + 9)) = round(3.61) = 4
        assert_eq!(rasterize(Point::new(0, 0), Point::new(2, 3)).len(), 4);
    }

    #[test]
    fn endpoints_are_included_with_the_offset() {
        let pixels = rasterize(Point::new(5, 17), Point::new(30, 2));
        assert_eq!(pixels.first(), Some(&Point::new(4, 16)));
        assert_eq!(pixels.last(), Some(&Point::new(29, 1)));
    }

    #[test]
    fn coincident_endpoints_give_one_pixel() {
        let p = Point::new(7, 3);
        assert_eq!(rasterize(p, p), vec![Point::new(6, 2)]);
    }

    #[test]
    fn adjacent_endpoints_give_one_pixel_either_way() {
        let a = Point::new(4, 4);
        let b = Point::new(5, 4);
        assert_eq!(rasterize(a, b), rasterize(b, a));
        assert_eq!(rasterize(a, b).len(), 1);
    }

    #[test]
    fn reversed_endpoints_cover_the_same_pixels() {
        let endpoints = [
            (Point::new(1, 11), Point::new(21, 11)),
            (Point::new(0, 0), Point::new(13, 7)),
            (Point::new(3, 40), Point::new(38, 1)),
            (Point::new(501, 1), Point::new(2, 774)),
            (Point::new(10, 0), Point::new(10, 99)),
        ];
        for (a, b) in endpoints {
            let forward = rasterize(a, b);
            let mut backward = rasterize(b, a);
            assert_eq!(set(&forward), set(&backward));
            backward.reverse();
            assert_eq!(forward, backward);
        }
    }

    #[test]
    fn width_one_is_the_centerline() {
        let pixels = rasterize(Point::new(0, 0), Point::new(9, 4));
        assert_eq!(thicken(&pixels, 1), pixels);
    }

    #[test]
    fn width_three_covers_the_neighbourhood() {
        let footprint = thicken(&[Point::new(5, 5)], 3);
        assert_eq!(footprint.len(), 9);
        assert_eq!(footprint.first(), Some(&Point::new(4, 4)));
        assert_eq!(footprint.last(), Some(&Point::new(6, 6)));
    }

    #[test]
    fn width_two_is_a_square() {
        let footprint = thicken(&[Point::new(5, 5)], 2);
        assert_eq!(
            footprint,
            vec![
                Point::new(4, 4),
                Point::new(5, 4),
                Point::new(4, 5),
                Point::new(5, 5),
            ]
        );
    }

    #[test]
    fn wide_stamps_lose_their_corners() {
        // 4x4 without corners, 5x5 without corners
        assert_eq!(thicken(&[Point::new(0, 0)], 4).len(), 12);
        assert_eq!(thicken(&[Point::new(0, 0)], 5).len(), 21);
    }

    #[test]
    fn horizontal_thread_is_exactly_width_rows_thick() {
        let pixels = rasterize(Point::new(1, 11), Point::new(21, 11));
        for width in 1..=5 {
            let rows: BTreeSet<i64> = thicken(&pixels, width).iter().map(|p| p.y).collect();
            assert_eq!(rows.len(), width, "width {width}");
        }
    }

    #[test]
    fn vertical_thread_is_exactly_width_columns_thick() {
        let pixels = rasterize(Point::new(11, 1), Point::new(11, 21));
        for width in 1..=5 {
            let columns: BTreeSet<i64> = thicken(&pixels, width).iter().map(|p| p.x).collect();
            assert_eq!(columns.len(), width, "width {width}");
        }
    }

    #[test]
    fn thick_footprint_has_no_duplicates() {
        let pixels = rasterize(Point::new(0, 0), Point::new(20, 0));
        let footprint = thicken(&pixels, 3);
        assert_eq!(footprint.len(), set(&footprint).len());
        // centerline spans x in -1..=19, plus one column past each end, three rows
        assert_eq!(footprint.len(), 23 * 3);
    }
}
