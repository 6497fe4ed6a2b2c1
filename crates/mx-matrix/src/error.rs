//! # Engine Error Taxonomy
//!
//! All engine failures are shape problems of one kind or another. Every
//! variant carries the offending extents so the driver can render a precise
//! message without re-deriving them from the operands.
//!
//! All errors are locally recoverable: the failing operation produces no
//! partial result and leaves its operands untouched.

use thiserror::Error;

/// Error type for the matrix operation engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("dimension mismatch: {left_rows}x{left_cols} is incompatible with {right_rows}x{right_cols}")]
    DimensionMismatch {
        /// Row count of the left operand.
        left_rows: usize,
        /// Column count of the left operand.
        left_cols: usize,
        /// Row count of the right operand.
        right_rows: usize,
        /// Column count of the right operand.
        right_cols: usize,
    },

    /// A row or column index fell outside the matrix extents.
    #[error("index out of range: ({row}, {col}) is outside a {rows}x{cols} matrix")]
    IndexOutOfRange {
        /// The requested row.
        row: usize,
        /// The requested column.
        col: usize,
        /// Row extent of the matrix.
        rows: usize,
        /// Column extent of the matrix.
        cols: usize,
    },

    /// A square-only operation was given a non-square matrix.
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare {
        /// Row extent of the matrix.
        rows: usize,
        /// Column extent of the matrix.
        cols: usize,
    },

    /// An extent pair whose cell count is not representable as `usize`.
    #[error("extent overflow: a {rows}x{cols} matrix has an unrepresentable cell count")]
    ExtentOverflow {
        /// Requested row extent.
        rows: usize,
        /// Requested column extent.
        cols: usize,
    },

    /// A construction was given the wrong number of elements for its extents.
    #[error("element count mismatch: a {rows}x{cols} matrix requires {expected} values, got {actual}")]
    ElementCount {
        /// Requested row extent.
        rows: usize,
        /// Requested column extent.
        cols: usize,
        /// `rows * cols`.
        expected: usize,
        /// Number of values actually supplied.
        actual: usize,
    },
}
