//! Errors reported by the checked plane view.

use thiserror::Error;

use crate::deblock::Direction;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeblockError {
    /// The plane has no samples.
    #[error("Empty plane: {width}x{height}")]
    EmptyPlane { width: usize, height: usize },

    /// A row is longer than the distance between rows.
    #[error("Stride {stride} is smaller than the plane width {width}")]
    StrideTooSmall { stride: usize, width: usize },

    /// The buffer ends before the last row does.
    #[error("Buffer of {len} samples is too small for {height} rows of stride {stride}")]
    BufferTooSmall {
        len: usize,
        height: usize,
        stride: usize,
    },

    /// Some sample the filter may touch lies outside the plane.
    #[error("{dir:?} edge at ({x}, {y}) does not fit in a {width}x{height} plane")]
    EdgeOutOfBounds {
        x: usize,
        y: usize,
        dir: Direction,
        width: usize,
        height: usize,
    },

    /// A `tc0` entry that is neither a clipping strength nor the skip sentinel.
    #[error("tc0[{index}] = {value} is out of range")]
    InvalidTc0 { index: usize, value: i16 },
}

pub type Result<T> = std::result::Result<T, DeblockError>;
