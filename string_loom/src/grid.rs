use crate::geometry::Point;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid<T = usize> {
    pub height: T,
    pub width: T,
}

impl<T> Grid<T> {
    pub fn new(height: T, width: T) -> Self {
        Self { height, width }
    }
}

impl Grid {
    /// The `(2r+1) x (2r+1)` grid a disk of radius `r` is sampled on.
    pub fn disk(radius: u32) -> Self {
        let side = 2 * radius as usize + 1;
        Self::new(side, side)
    }

    pub fn len(&self) -> usize {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major index of `point`, or `None` when it lies outside the grid.
    pub fn index_of(&self, point: Point<i64>) -> Option<usize> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    pub fn contains(&self, point: Point<i64>) -> bool {
        self.index_of(point).is_some()
    }
}
