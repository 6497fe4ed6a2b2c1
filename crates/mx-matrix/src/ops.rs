//! # Matrix Operations
//!
//! The five engine operations plus minor extraction. Every operation is a
//! pure function over its operands: inputs are read, never written, and the
//! result is a freshly allocated [`Matrix`] (or a scalar, for the
//! determinant).
//!
//! ## Arithmetic
//!
//! All cell arithmetic is wrapping 64-bit. Overflow is defined behavior,
//! not an error.
//!
//! ## Complexity
//!
//! Multiplication is the straightforward triple loop, O(rows · cols ·
//! inner). The determinant is cofactor (Laplace) expansion along the first
//! row, O(order!) — acceptable for the small orders this system targets.
//! Faster algorithms (tiling, LU decomposition) are deliberately out of
//! scope.

use crate::error::MatrixError;
use crate::matrix::Matrix;

impl Matrix {
    /// Elementwise sum of two matrices of identical shape.
    ///
    /// Fails with [`MatrixError::DimensionMismatch`] when the shapes differ.
    pub fn add(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if self.shape() != other.shape() {
            return Err(self.mismatch_with(other));
        }

        let data = self
            .values()
            .iter()
            .zip(other.values())
            .map(|(&a, &b)| a.wrapping_add(b))
            .collect();
        Ok(Matrix::from_parts(self.rows(), self.cols(), data))
    }

    /// Matrix product, defined when `self.cols() == other.rows()`.
    ///
    /// Each result cell is the inner product of a row of `self` and a
    /// column of `other`. Fails with [`MatrixError::DimensionMismatch`]
    /// when the inner extents differ, and with
    /// [`MatrixError::ExtentOverflow`] when the result's cell count is not
    /// representable (possible with degenerate operands whose outer extents
    /// are both enormous).
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if self.cols() != other.rows() {
            return Err(self.mismatch_with(other));
        }

        let inner = self.cols();
        let mut result = Matrix::zeros(self.rows(), other.cols())?;
        for r in 0..result.rows() {
            for c in 0..result.cols() {
                let mut dot = 0i64;
                for n in 0..inner {
                    dot = dot.wrapping_add(self[r][n].wrapping_mul(other[n][c]));
                }
                result[r][c] = dot;
            }
        }
        Ok(result)
    }

    /// Multiply every cell by a scalar. Always succeeds.
    pub fn scalar_mul(&self, scalar: i64) -> Matrix {
        let data = self
            .values()
            .iter()
            .map(|&v| scalar.wrapping_mul(v))
            .collect();
        Matrix::from_parts(self.rows(), self.cols(), data)
    }

    /// The transpose: `Y[r][c] = self[c][r]`. Always succeeds.
    pub fn transpose(&self) -> Matrix {
        let mut data = Vec::with_capacity(self.values().len());
        for r in 0..self.cols() {
            for c in 0..self.rows() {
                data.push(self[c][r]);
            }
        }
        Matrix::from_parts(self.cols(), self.rows(), data)
    }

    /// The minor: `self` with one row and one column deleted, relative
    /// order preserved.
    ///
    /// Determinant machinery, but a specified operation in its own right.
    /// Fails with [`MatrixError::IndexOutOfRange`] when either index is
    /// outside the matrix.
    pub fn minor(&self, exclude_row: usize, exclude_col: usize) -> Result<Matrix, MatrixError> {
        if exclude_row >= self.rows() || exclude_col >= self.cols() {
            return Err(MatrixError::IndexOutOfRange {
                row: exclude_row,
                col: exclude_col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }

        let rows = self.rows() - 1;
        let cols = self.cols() - 1;
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..self.rows() {
            if r == exclude_row {
                continue;
            }
            for c in 0..self.cols() {
                if c == exclude_col {
                    continue;
                }
                data.push(self[r][c]);
            }
        }
        Ok(Matrix::from_parts(rows, cols, data))
    }

    /// The determinant, by cofactor expansion along the first row with
    /// alternating signs `(-1)^c`.
    ///
    /// Fails with [`MatrixError::NotSquare`] for non-square input; the
    /// engine enforces squareness itself rather than trusting the caller.
    /// The 0×0 determinant is `1`, the empty-product identity.
    pub fn determinant(&self) -> Result<i64, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows(),
                cols: self.cols(),
            });
        }

        let order = self.rows();
        tracing::debug!(order, "computing determinant");

        self.det_square(order)
    }

    /// Recursive cofactor expansion. `self` is square of extent `order`.
    fn det_square(&self, order: usize) -> Result<i64, MatrixError> {
        if order == 0 {
            return Ok(1);
        }
        if order == 1 {
            return Ok(self[0][0]);
        }

        let mut det = 0i64;
        let mut sign = 1i64;
        for c in 0..order {
            let minor = self.minor(0, c)?;
            let cofactor = sign
                .wrapping_mul(self[0][c])
                .wrapping_mul(minor.det_square(order - 1)?);
            det = det.wrapping_add(cofactor);
            sign = -sign;
        }
        Ok(det)
    }

    fn mismatch_with(&self, other: &Matrix) -> MatrixError {
        MatrixError::DimensionMismatch {
            left_rows: self.rows(),
            left_cols: self.cols(),
            right_rows: other.rows(),
            right_cols: other.cols(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn m(rows: &[&[i64]]) -> Matrix {
        Matrix::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    // ── Addition ─────────────────────────────────────────────────────

    #[test]
    fn add_two_by_two() {
        let a = m(&[&[1, 2], &[3, 4]]);
        let b = m(&[&[5, 6], &[7, 8]]);
        assert_eq!(a.add(&b).unwrap(), m(&[&[6, 8], &[10, 12]]));
    }

    #[test]
    fn add_preserves_shape() {
        let a = Matrix::zeros(4, 7).unwrap();
        let b = Matrix::zeros(4, 7).unwrap();
        assert_eq!(a.add(&b).unwrap().shape(), (4, 7));
    }

    #[test]
    fn add_mismatched_shapes_rejected() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(3, 2).unwrap();
        assert_eq!(
            a.add(&b).unwrap_err(),
            MatrixError::DimensionMismatch {
                left_rows: 2,
                left_cols: 3,
                right_rows: 3,
                right_cols: 2,
            }
        );
    }

    #[test]
    fn add_leaves_operands_intact_on_error() {
        let a = m(&[&[1, 2, 3]]);
        let b = m(&[&[1], &[2]]);
        assert!(a.add(&b).is_err());
        assert_eq!(a, m(&[&[1, 2, 3]]));
        assert_eq!(b, m(&[&[1], &[2]]));
    }

    #[test]
    fn add_wraps_on_overflow() {
        let a = m(&[&[i64::MAX]]);
        let b = m(&[&[1]]);
        assert_eq!(a.add(&b).unwrap(), m(&[&[i64::MIN]]));
    }

    #[test]
    fn add_empty_matrices() {
        let a = Matrix::zeros(0, 3).unwrap();
        let b = Matrix::zeros(0, 3).unwrap();
        assert_eq!(a.add(&b).unwrap().shape(), (0, 3));
    }

    // ── Multiplication ───────────────────────────────────────────────

    #[test]
    fn multiply_two_by_two() {
        let a = m(&[&[1, 2], &[3, 4]]);
        let b = m(&[&[5, 6], &[7, 8]]);
        assert_eq!(a.multiply(&b).unwrap(), m(&[&[19, 22], &[43, 50]]));
    }

    #[test]
    fn multiply_result_shape() {
        let a = Matrix::zeros(2, 5).unwrap();
        let b = Matrix::zeros(5, 3).unwrap();
        assert_eq!(a.multiply(&b).unwrap().shape(), (2, 3));
    }

    #[test]
    fn multiply_inner_mismatch_rejected() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(2, 2).unwrap();
        assert!(matches!(
            a.multiply(&b),
            Err(MatrixError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn multiply_with_empty_inner_extent_is_zeros() {
        // (2×0) · (0×3): every inner product is the empty sum.
        let a = Matrix::zeros(2, 0).unwrap();
        let b = Matrix::zeros(0, 3).unwrap();
        assert_eq!(a.multiply(&b).unwrap(), Matrix::zeros(2, 3).unwrap());
    }

    #[test]
    fn multiply_rejects_unrepresentable_result_extents() {
        // Valid cell-less operands whose product shape would need more
        // cells than `usize` can count.
        let a = Matrix::zeros(1 << 40, 0).unwrap();
        let b = Matrix::zeros(0, 1 << 40).unwrap();
        assert_eq!(
            a.multiply(&b).unwrap_err(),
            MatrixError::ExtentOverflow {
                rows: 1 << 40,
                cols: 1 << 40,
            }
        );
    }

    #[test]
    fn multiply_associative_on_two_by_two() {
        let a = m(&[&[1, 2], &[3, 4]]);
        let b = m(&[&[5, 6], &[7, 8]]);
        let c = m(&[&[9, 1], &[2, 3]]);
        let left = a.multiply(&b).unwrap().multiply(&c).unwrap();
        let right = a.multiply(&b.multiply(&c).unwrap()).unwrap();
        assert_eq!(left, right);
    }

    // ── Scalar multiplication & transpose ────────────────────────────

    #[test]
    fn scalar_mul_doubles() {
        let a = m(&[&[1, 2], &[3, 4]]);
        assert_eq!(a.scalar_mul(2), m(&[&[2, 4], &[6, 8]]));
    }

    #[test]
    fn transpose_two_by_two() {
        let a = m(&[&[1, 2], &[3, 4]]);
        assert_eq!(a.transpose(), m(&[&[1, 3], &[2, 4]]));
    }

    #[test]
    fn transpose_swaps_extents() {
        let a = Matrix::zeros(2, 5).unwrap();
        assert_eq!(a.transpose().shape(), (5, 2));
    }

    // ── Minor extraction ─────────────────────────────────────────────

    #[test]
    fn minor_deletes_row_and_column() {
        let a = m(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
        assert_eq!(a.minor(1, 1).unwrap(), m(&[&[1, 3], &[7, 9]]));
    }

    #[test]
    fn minor_corner_cases() {
        let a = m(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
        assert_eq!(a.minor(0, 0).unwrap(), m(&[&[5, 6], &[8, 9]]));
        assert_eq!(a.minor(2, 2).unwrap(), m(&[&[1, 2], &[4, 5]]));
    }

    #[test]
    fn minor_out_of_range_rejected() {
        let a = m(&[&[1, 2], &[3, 4]]);
        assert_eq!(
            a.minor(2, 0).unwrap_err(),
            MatrixError::IndexOutOfRange {
                row: 2,
                col: 0,
                rows: 2,
                cols: 2,
            }
        );
        assert!(a.minor(0, 2).is_err());
    }

    // ── Determinant ──────────────────────────────────────────────────

    #[test]
    fn determinant_order_one() {
        assert_eq!(m(&[&[5]]).determinant().unwrap(), 5);
    }

    #[test]
    fn determinant_order_two_alternating_signs() {
        // Pins the sign convention: 1*4 - 2*3, not 1*4 + 2*3.
        assert_eq!(m(&[&[1, 2], &[3, 4]]).determinant().unwrap(), -2);
    }

    #[test]
    fn determinant_order_three() {
        // Singular: rows are linearly dependent.
        let a = m(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
        assert_eq!(a.determinant().unwrap(), 0);

        // 1*(1-8) - 2*(3-0) + 0 = -13.
        let b = m(&[&[1, 2, 0], &[3, 1, 4], &[0, 2, 1]]);
        assert_eq!(b.determinant().unwrap(), -13);
    }

    #[test]
    fn determinant_order_four() {
        // Two levels of cofactor recursion; hand-checked by expanding
        // along the sparse second column: 30.
        let a = m(&[
            &[1, 0, 2, -1],
            &[3, 0, 0, 5],
            &[2, 1, 4, -3],
            &[1, 0, 5, 0],
        ]);
        assert_eq!(a.determinant().unwrap(), 30);
    }

    #[test]
    fn determinant_identity_is_one() {
        let mut id = Matrix::zeros(4, 4).unwrap();
        for i in 0..4 {
            id.set(i, i, 1).unwrap();
        }
        assert_eq!(id.determinant().unwrap(), 1);
    }

    #[test]
    fn determinant_empty_matrix_is_one() {
        assert_eq!(Matrix::zeros(0, 0).unwrap().determinant().unwrap(), 1);
    }

    #[test]
    fn determinant_non_square_rejected() {
        let a = Matrix::zeros(2, 3).unwrap();
        assert_eq!(
            a.determinant().unwrap_err(),
            MatrixError::NotSquare { rows: 2, cols: 3 }
        );
    }

    // ── Algebraic laws ───────────────────────────────────────────────

    prop_compose! {
        fn arb_matrix(max_extent: usize)
            (rows in 0..=max_extent, cols in 0..=max_extent)
            (values in proptest::collection::vec(-1000i64..1000, rows * cols),
             rows in Just(rows), cols in Just(cols))
            -> Matrix
        {
            Matrix::from_values(rows, cols, values).unwrap()
        }
    }

    prop_compose! {
        fn arb_matrix_pair(max_extent: usize)
            (rows in 0..=max_extent, cols in 0..=max_extent)
            (a in proptest::collection::vec(-1000i64..1000, rows * cols),
             b in proptest::collection::vec(-1000i64..1000, rows * cols),
             rows in Just(rows), cols in Just(cols))
            -> (Matrix, Matrix)
        {
            (
                Matrix::from_values(rows, cols, a).unwrap(),
                Matrix::from_values(rows, cols, b).unwrap(),
            )
        }
    }

    proptest! {
        #[test]
        fn transpose_is_an_involution(a in arb_matrix(6)) {
            prop_assert_eq!(a.transpose().transpose(), a);
        }

        #[test]
        fn scalar_one_is_identity(a in arb_matrix(6)) {
            prop_assert_eq!(a.scalar_mul(1), a);
        }

        #[test]
        fn scalar_zero_is_all_zeros(a in arb_matrix(6)) {
            let (rows, cols) = a.shape();
            prop_assert_eq!(a.scalar_mul(0), Matrix::zeros(rows, cols).unwrap());
        }

        #[test]
        fn addition_commutes((a, b) in arb_matrix_pair(6)) {
            prop_assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
        }

        #[test]
        fn addition_preserves_shape((a, b) in arb_matrix_pair(6)) {
            prop_assert_eq!(a.add(&b).unwrap().shape(), a.shape());
        }

        #[test]
        fn transpose_distributes_over_addition((a, b) in arb_matrix_pair(6)) {
            prop_assert_eq!(
                a.add(&b).unwrap().transpose(),
                a.transpose().add(&b.transpose()).unwrap()
            );
        }
    }
}
