//! # mx-matrix — Dense Integer Matrix Engine
//!
//! The operation engine of the `mx` calculator. This crate is the leaf of
//! the workspace DAG: it defines the [`Matrix`] value type and the five
//! operations the driver exposes (addition, multiplication, scalar
//! multiplication, transpose, determinant), plus the minor-extraction
//! machinery the determinant needs.
//!
//! ## Key Design Principles
//!
//! 1. **Owned dense buffer.** A matrix is a contiguous row-major `Vec<i64>`
//!    plus its extents. Dropping the value releases the storage; there is no
//!    explicit dispose step and no way to double-free or alias operand
//!    storage.
//!
//! 2. **Pure operations.** Every operation reads its operands and allocates
//!    a fresh result. Operands are never mutated, never consumed on the
//!    error path, and never shared with the result.
//!
//! 3. **Wrapping 64-bit arithmetic.** Overflow wraps; the narrow integer
//!    width is a deliberate property of the whole system, not a checked
//!    condition.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mx-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests; shape problems are
//!   [`MatrixError`] values, not panics — including for 0×0 and other
//!   degenerate shapes.

pub mod error;
pub mod matrix;
pub mod ops;

// Re-export primary types for ergonomic imports.
pub use error::MatrixError;
pub use matrix::Matrix;
