//! Dense 2D cell storage.

use crate::error::{WorldError, WorldResult};

/// Value of a single cell.
///
/// Seeded noise is `0` (rock) or `1` (open). Evolution divides a
/// neighbourhood sum by the threshold without clamping, so evolved cells
/// may exceed `1` when the threshold is small.
pub type Cell = u32;

/// Rock / solid.
pub const ROCK: Cell = 0;

/// Open / passable. Also the value of every cell outside the materialized world.
pub const OPEN: Cell = 1;

/// A `width x height` grid of cells addressed by `(i, j)`.
///
/// `i` runs along X and `j` along Y. Storage is column-major (`i` outer),
/// matching the order in which noise is drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid filled with `value`.
    #[must_use]
    pub fn filled(width: usize, height: usize, value: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Builds a grid by evaluating `f(i, j)` in `i`-outer, `j`-inner order.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `f`.
    pub fn try_from_fn<F>(width: usize, height: usize, mut f: F) -> WorldResult<Self>
    where
        F: FnMut(usize, usize) -> WorldResult<Cell>,
    {
        let mut cells = Vec::with_capacity(width * height);
        for i in 0..width {
            for j in 0..height {
                cells.push(f(i, j)?);
            }
        }
        Ok(Self { width, height, cells })
    }

    /// Builds a grid by evaluating `f(i, j)` in `i`-outer, `j`-inner order.
    #[must_use]
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Cell,
    {
        let mut cells = Vec::with_capacity(width * height);
        for i in 0..width {
            for j in 0..height {
                cells.push(f(i, j));
            }
        }
        Self { width, height, cells }
    }

    /// Grid extent along X.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid extent along Y.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Reads the cell at `(i, j)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::IndexOutOfBounds`] outside the grid.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> WorldResult<Cell> {
        self.index(i, j).map(|idx| self.cells[idx])
    }

    /// Raw cells, column-major.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }

    /// Counts cells equal to `value`.
    #[must_use]
    pub fn count(&self, value: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == value).count()
    }

    fn index(&self, i: usize, j: usize) -> WorldResult<usize> {
        if i < self.width && j < self.height {
            Ok(i * self.height + j)
        } else {
            Err(self.out_of_bounds(i, j))
        }
    }

    fn out_of_bounds(&self, i: usize, j: usize) -> WorldError {
        WorldError::IndexOutOfBounds {
            x: i64::try_from(i).unwrap_or(i64::MAX),
            y: i64::try_from(j).unwrap_or(i64::MAX),
            width: self.width,
            height: self.height,
        }
    }
}
