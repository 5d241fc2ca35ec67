//! Error types for flagrast

use thiserror::Error;

/// Main error type for flagrast operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid band dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in band of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error(
        "Window [{row_offset}+{rows}, {col_offset}+{cols}] exceeds band of size ({band_rows}, {band_cols})"
    )]
    WindowOutOfBounds {
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
        band_rows: usize,
        band_cols: usize,
    },

    #[error("Bit count must be between 1 and 128, got {bit_count}")]
    InvalidBitCount { bit_count: u32 },

    #[error("Bit count {bit_count} would require 2^{bit_count} flag states (dense tables are capped at 2^{max_bits})")]
    StateTableTooLarge { bit_count: u32, max_bits: u32 },

    #[error("Render cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

/// Result type alias for flagrast operations
pub type Result<T> = std::result::Result<T, Error>;
