//! Error type shared by the detector, the grid constructors and the tools.

/// Errors returned by region detection and the surrounding I/O glue.
///
/// Only caller-visible precondition failures live here. Broken internal
/// invariants of the flood (heap underflow, popping the sentinel, a stack
/// that is out of level order) are bugs and panic instead.
#[derive(thiserror::Error, Debug)]
pub enum MserError {
    /// The grid has zero rows or zero columns
    #[error("image has no pixels ({rows}x{columns})")]
    EmptyImage {
        /// Rows of the rejected grid
        rows: usize,
        /// Columns of the rejected grid
        columns: usize,
    },
    /// A raw buffer does not hold `rows * columns` samples
    #[error("buffer length mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch {
        /// Samples implied by the dimensions
        expected: usize,
        /// Samples supplied
        actual: usize,
    },
    /// Nested rows of unequal length
    #[error("row {row} has {actual} samples, expected {expected}")]
    RaggedRows {
        /// Index of the offending row
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        actual: usize,
    },
    /// Decoding or encoding an image file failed
    #[error(transparent)]
    Image(#[from] image::ImageError),
    /// A parameter file is not valid JSON for `DetectorParams`
    #[error("invalid detector parameters: {0}")]
    Params(#[from] serde_json::Error),
    /// Reading a file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MserError>;
