//! # Matrix Value Type
//!
//! A dense, rectangular grid of signed 64-bit integers with fixed row and
//! column extents, stored row-major in a single contiguous buffer.
//!
//! ## Invariant
//!
//! `data.len() == rows * cols` always holds, and the product is a
//! representable `usize`. Every constructor either establishes this or
//! fails; no method can break it afterwards. Extent pairs whose cell count
//! overflows `usize` are rejected with [`MatrixError::ExtentOverflow`]
//! rather than wrapping into a grid that lies about its size. The grid is
//! always fully populated — a freshly created matrix is all zeros, never
//! uninitialized.
//!
//! ## Ownership
//!
//! Each matrix is an independently owned value. Operations that produce a
//! matrix allocate a fresh buffer; nothing ever aliases an operand's
//! storage. Storage is released by `Drop`.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

/// A dense `rows × cols` matrix of `i64` cells.
///
/// Degenerate shapes (`rows == 0` or `cols == 0`) are valid values with no
/// cells; every operation in this crate accepts them without panicking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl Matrix {
    /// Create a `rows × cols` matrix with every cell zero.
    ///
    /// Fails with [`MatrixError::ExtentOverflow`] when `rows * cols` is not
    /// a representable cell count.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        let len = cell_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![0; len],
        })
    }

    /// Create a matrix from pre-parsed extents and row-major values.
    ///
    /// This is the construction path the driver uses after deserializing
    /// the textual format. Fails with [`MatrixError::ElementCount`] when
    /// the value count does not match the extents.
    pub fn from_values(rows: usize, cols: usize, values: Vec<i64>) -> Result<Self, MatrixError> {
        let expected = cell_count(rows, cols)?;
        if values.len() != expected {
            return Err(MatrixError::ElementCount {
                rows,
                cols,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            data: values,
        })
    }

    /// Create a matrix from a slice of equal-length rows.
    ///
    /// Fails with [`MatrixError::ElementCount`] if any row's length differs
    /// from the first row's.
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self, MatrixError> {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);
        let expected = cell_count(num_rows, num_cols)?;
        let mut data = Vec::with_capacity(expected);
        for row in rows {
            if row.len() != num_cols {
                return Err(MatrixError::ElementCount {
                    rows: num_rows,
                    cols: num_cols,
                    expected,
                    actual: rows.iter().map(Vec::len).sum(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: num_rows,
            cols: num_cols,
            data,
        })
    }

    /// Internal constructor for operation results whose extents are already
    /// known to be representable (they never exceed an operand's own cell
    /// count). Callers guarantee `data.len() == rows * cols`.
    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<i64>) -> Self {
        debug_assert_eq!(Some(data.len()), rows.checked_mul(cols));
        Self { rows, cols, data }
    }

    /// Row extent.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column extent.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the matrix has the same row and column extent.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Whether the matrix has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checked cell read.
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Checked cell write.
    pub fn set(&mut self, row: usize, col: usize, value: i64) -> Result<(), MatrixError> {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = value;
            Ok(())
        } else {
            Err(MatrixError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Row-major view of all cells.
    pub fn values(&self) -> &[i64] {
        &self.data
    }
}

/// The cell count for an extent pair, rejecting unrepresentable products.
fn cell_count(rows: usize, cols: usize) -> Result<usize, MatrixError> {
    rows.checked_mul(cols)
        .ok_or(MatrixError::ExtentOverflow { rows, cols })
}

impl Index<usize> for Matrix {
    type Output = [i64];

    /// A row as a slice. Panics on an out-of-range row, like slice indexing.
    fn index(&self, row: usize) -> &Self::Output {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, row: usize) -> &mut Self::Output {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }
}
