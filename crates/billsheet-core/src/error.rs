//! Error types for billsheet-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in billsheet-core
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Line item position out of bounds
    #[error("Item index {0} out of bounds (count: {1})")]
    ItemOutOfBounds(usize, usize),

    /// Unknown line item field name
    #[error("Unknown field: {0} (expected name, price or quantity)")]
    UnknownField(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(usize, u16),

    /// A data row does not match the header width
    #[error("Row {row} has {actual} cells, header has {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}
