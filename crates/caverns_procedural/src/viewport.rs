//! # Viewport Geometry
//!
//! A rectangular window in world-cell coordinates. Bounds are inclusive on
//! both ends: `(0, 0) -> (3, 3)` covers sixteen cells.

use std::fmt;

use crate::error::{WorldError, WorldResult};

/// Inclusive rectangular window of world cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Viewport {
    x_min: i32,
    y_min: i32,
    x_max: i32,
    y_max: i32,
}

impl Viewport {
    /// Creates a viewport from inclusive bounds.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidViewport`] if a min bound exceeds its max.
    pub fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> WorldResult<Self> {
        if x_min > x_max || y_min > y_max {
            return Err(WorldError::InvalidViewport {
                x_min,
                y_min,
                x_max,
                y_max,
            });
        }
        Ok(Self {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Creates the `size x size` viewport whose lower corner is `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidViewport`] if `size` is not positive or
    /// the window would leave the addressable plane.
    pub fn anchored(x: i32, y: i32, size: i32) -> WorldResult<Self> {
        let invalid = WorldError::InvalidViewport {
            x_min: x,
            y_min: y,
            x_max: x.saturating_add(size).saturating_sub(1),
            y_max: y.saturating_add(size).saturating_sub(1),
        };
        if size <= 0 {
            return Err(invalid);
        }
        match (x.checked_add(size - 1), y.checked_add(size - 1)) {
            (Some(x_max), Some(y_max)) => Self::new(x, y, x_max, y_max),
            _ => Err(invalid),
        }
    }

    /// Lower X bound.
    #[inline]
    #[must_use]
    pub const fn x_min(&self) -> i32 {
        self.x_min
    }

    /// Lower Y bound.
    #[inline]
    #[must_use]
    pub const fn y_min(&self) -> i32 {
        self.y_min
    }

    /// Upper X bound (inclusive).
    #[inline]
    #[must_use]
    pub const fn x_max(&self) -> i32 {
        self.x_max
    }

    /// Upper Y bound (inclusive).
    #[inline]
    #[must_use]
    pub const fn y_max(&self) -> i32 {
        self.y_max
    }

    /// `x_max - x_min`.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i64 {
        self.x_max as i64 - self.x_min as i64
    }

    /// `y_max - y_min`.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i64 {
        self.y_max as i64 - self.y_min as i64
    }

    /// Number of cell columns covered.
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> usize {
        (self.width() + 1) as usize
    }

    /// Number of cell rows covered.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        (self.height() + 1) as usize
    }

    /// True if `(x, y)` lies inside the viewport.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Drawing rectangle `(x, y, width, height)` with exclusive spans.
    #[must_use]
    pub const fn rectangle(&self) -> (i64, i64, i64, i64) {
        (self.x_min as i64, self.y_min as i64, self.width(), self.height())
    }

    /// Shifts all four bounds.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidViewport`] if any bound would leave the
    /// addressable plane; `self` is then unchanged.
    pub fn translate(&mut self, dx: i32, dy: i32) -> WorldResult<()> {
        match (
            self.x_min.checked_add(dx),
            self.y_min.checked_add(dy),
            self.x_max.checked_add(dx),
            self.y_max.checked_add(dy),
        ) {
            (Some(x_min), Some(y_min), Some(x_max), Some(y_max)) => {
                *self = Self { x_min, y_min, x_max, y_max };
                Ok(())
            }
            _ => Err(self.invalid()),
        }
    }

    /// Maps the bounds from one unit to a unit `sx x sy` times smaller.
    ///
    /// Lower bounds are multiplied by the factor and the upper bounds are
    /// recomputed so the window covers `columns * sx` by `rows * sy` units.
    /// Used to project a cell window onto a pixel canvas.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidViewport`] for non-positive factors or
    /// results outside the addressable plane; `self` is then unchanged.
    pub fn scale(&mut self, sx: i32, sy: i32) -> WorldResult<()> {
        let scale_axis = |min: i32, span: i64, factor: i32| -> Option<(i32, i32)> {
            if factor <= 0 {
                return None;
            }
            let dim = (span + 1) * i64::from(factor) - 1;
            let new_min = i64::from(min) * i64::from(factor);
            let new_max = new_min + dim;
            Some((i32::try_from(new_min).ok()?, i32::try_from(new_max).ok()?))
        };

        let x = scale_axis(self.x_min, self.width(), sx);
        let y = scale_axis(self.y_min, self.height(), sy);
        match (x, y) {
            (Some((x_min, x_max)), Some((y_min, y_max))) => {
                *self = Self::new(x_min, y_min, x_max, y_max)?;
                Ok(())
            }
            _ => Err(self.invalid()),
        }
    }

    fn invalid(&self) -> WorldError {
        WorldError::InvalidViewport {
            x_min: self.x_min,
            y_min: self.y_min,
            x_max: self.x_max,
            y_max: self.y_max,
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) -> ({}, {})",
            self.x_min, self.y_min, self.x_max, self.y_max
        )
    }
}
