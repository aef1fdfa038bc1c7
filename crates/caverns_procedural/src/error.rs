//! # World Error Types
//!
//! All errors that can occur while building or querying a world.
//!
//! Only configuration errors are expected through the public entry points.
//! The index and state variants flag internal-contract violations so they
//! fail loudly instead of corrupting cell data.

use thiserror::Error;

/// Errors that can occur in the world system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// World parameters rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// A coordinate fell outside the grid or chunk it was resolved against.
    #[error("index ({x}, {y}) outside {width}x{height} grid")]
    IndexOutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// The final grid of a chunk was read before the chunk was finalized.
    #[error("chunk ({x}, {y}) has not been finalized")]
    NotFinalized {
        /// Chunk X coordinate.
        x: i32,
        /// Chunk Y coordinate.
        y: i32,
    },

    /// A chunk was finalized twice.
    #[error("chunk ({x}, {y}) is already final")]
    AlreadyFinalized {
        /// Chunk X coordinate.
        x: i32,
        /// Chunk Y coordinate.
        y: i32,
    },

    /// Viewport bounds are inverted.
    #[error("invalid viewport ({x_min}, {y_min}) -> ({x_max}, {y_max})")]
    InvalidViewport {
        /// Lower X bound.
        x_min: i32,
        /// Lower Y bound.
        y_min: i32,
        /// Upper X bound.
        x_max: i32,
        /// Upper Y bound.
        y_max: i32,
    },
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
