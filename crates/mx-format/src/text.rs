//! # Textual Matrix Format
//!
//! Deserialization and serialization of the `rows cols` + row-major cells
//! format.
//!
//! ## Persisted byte format
//!
//! [`write_matrix`] emits `"{rows} {cols}\n"`, then one line per row in
//! which **every** cell is followed by a single space, then a newline:
//!
//! ```text
//! 2 2
//! 1 2
//! 3 4
//! ```
//!
//! The trailing space per cell is part of the persisted format and must be
//! preserved bit-for-bit for interoperability with existing matrix files.
//! Readers are more liberal: any whitespace separates tokens.

use std::io::{BufRead, Write};

use thiserror::Error;

use mx_matrix::{Matrix, MatrixError};

/// Error deserializing a matrix from a token stream.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The stream ended before the matrix was complete.
    #[error("unexpected end of input while reading {expected}")]
    UnexpectedEof {
        /// What the reader was looking for ("matrix extents", "cell 3 of 9", ...).
        expected: String,
    },

    /// A token was not a valid integer of the required width.
    #[error("invalid integer token '{token}'")]
    InvalidInteger {
        /// The offending token.
        token: String,
    },

    /// The parsed extents and cell values disagree.
    #[error(transparent)]
    Shape(#[from] MatrixError),

    /// Underlying read failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Incremental whitespace-separated token reader over any [`BufRead`].
///
/// Consumes exactly the tokens asked for and no more, so consecutive values
/// (or a command grammar interleaved with matrix cells) can share a stream.
pub struct TokenScanner<R: BufRead> {
    reader: R,
    line: String,
    pos: usize,
}

impl<R: BufRead> TokenScanner<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            pos: 0,
        }
    }

    /// The next whitespace-separated token, or `None` at end of stream.
    pub fn next_token(&mut self) -> Result<Option<&str>, std::io::Error> {
        loop {
            // Skip whitespace in the buffered line.
            let rest = &self.line[self.pos..];
            self.pos += rest.len() - rest.trim_start().len();

            if self.pos < self.line.len() {
                break;
            }

            self.line.clear();
            self.pos = 0;
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
        }

        let start = self.pos;
        let rest = &self.line[start..];
        let len = rest
            .find(|ch: char| ch.is_whitespace())
            .unwrap_or(rest.len());
        self.pos = start + len;
        Ok(Some(&self.line[start..start + len]))
    }

    /// The next token parsed as an integer type.
    ///
    /// `expected` names what the token is for, for the EOF diagnostic.
    pub fn next_int<T: std::str::FromStr>(&mut self, expected: &str) -> Result<T, FormatError> {
        match self.next_token()? {
            Some(token) => token.parse().map_err(|_| FormatError::InvalidInteger {
                token: token.to_string(),
            }),
            None => Err(FormatError::UnexpectedEof {
                expected: expected.to_string(),
            }),
        }
    }
}

/// Read one matrix from the scanner: `rows cols`, then `rows * cols` cells
/// in row-major order. Leaves any following tokens unconsumed.
pub fn read_matrix<R: BufRead>(scanner: &mut TokenScanner<R>) -> Result<Matrix, FormatError> {
    let rows: usize = scanner.next_int("matrix row extent")?;
    let cols: usize = scanner.next_int("matrix column extent")?;

    let total = rows
        .checked_mul(cols)
        .ok_or(MatrixError::ExtentOverflow { rows, cols })?;
    let mut values = Vec::with_capacity(total);
    for i in 0..total {
        let cell: i64 = scanner.next_int(&format!("cell {} of {total}", i + 1))?;
        values.push(cell);
    }

    Ok(Matrix::from_values(rows, cols, values)?)
}

/// Write a matrix in the persisted byte format (see module docs).
pub fn write_matrix<W: Write>(writer: &mut W, matrix: &Matrix) -> Result<(), std::io::Error> {
    writeln!(writer, "{} {}", matrix.rows(), matrix.cols())?;
    for r in 0..matrix.rows() {
        for c in 0..matrix.cols() {
            write!(writer, "{} ", matrix[r][c])?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Render a matrix to a `String` in the persisted byte format.
pub fn render_matrix(matrix: &Matrix) -> String {
    let mut out = Vec::new();
    // Writing to a Vec cannot fail.
    let _ = write_matrix(&mut out, matrix);
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner(input: &str) -> TokenScanner<&[u8]> {
        TokenScanner::new(input.as_bytes())
    }

    #[test]
    fn scanner_splits_on_any_whitespace() {
        let mut s = scanner("1 2\n\t3   4\n");
        let mut tokens = Vec::new();
        while let Some(t) = s.next_token().unwrap() {
            tokens.push(t.to_string());
        }
        assert_eq!(tokens, ["1", "2", "3", "4"]);
    }

    #[test]
    fn scanner_empty_stream() {
        assert!(scanner("").next_token().unwrap().is_none());
        assert!(scanner("  \n \t ").next_token().unwrap().is_none());
    }

    #[test]
    fn read_simple_matrix() {
        let mut s = scanner("2 2\n1 2\n3 4\n");
        let m = read_matrix(&mut s).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m[0], [1, 2]);
        assert_eq!(m[1], [3, 4]);
    }

    #[test]
    fn read_matrix_ignores_line_structure() {
        // The format is token-oriented; line breaks are just whitespace.
        let mut s = scanner("2\n3 1 2 3 4 5 6");
        let m = read_matrix(&mut s).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[1], [4, 5, 6]);
    }

    #[test]
    fn read_two_matrices_from_one_stream() {
        let mut s = scanner("1 2 10 20 2 1 -3 -4");
        let a = read_matrix(&mut s).unwrap();
        let b = read_matrix(&mut s).unwrap();
        assert_eq!(a[0], [10, 20]);
        assert_eq!(b.shape(), (2, 1));
        assert_eq!(b[1], [-4]);
        assert!(s.next_token().unwrap().is_none());
    }

    #[test]
    fn read_degenerate_matrix() {
        let mut s = scanner("0 0");
        let m = read_matrix(&mut s).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn read_truncated_cells_is_eof_error() {
        let mut s = scanner("2 2 1 2 3");
        let err = read_matrix(&mut s).unwrap_err();
        assert!(matches!(err, FormatError::UnexpectedEof { .. }));
        assert!(err.to_string().contains("cell 4 of 4"));
    }

    #[test]
    fn read_missing_extents_is_eof_error() {
        let err = read_matrix(&mut scanner("")).unwrap_err();
        assert!(err.to_string().contains("row extent"));
    }

    #[test]
    fn read_non_integer_token_rejected() {
        let err = read_matrix(&mut scanner("2 2 1 x 3 4")).unwrap_err();
        assert!(matches!(err, FormatError::InvalidInteger { token } if token == "x"));
    }

    #[test]
    fn read_negative_extent_rejected() {
        // Extents are usize; "-1" is not a valid extent token.
        let err = read_matrix(&mut scanner("-1 2")).unwrap_err();
        assert!(matches!(err, FormatError::InvalidInteger { .. }));
    }

    #[test]
    fn read_overflowing_extents_rejected() {
        // 2^63 rows of 2 columns: the cell count does not fit in usize.
        // Must fail cleanly, not wrap or attempt the allocation.
        let err = read_matrix(&mut scanner("9223372036854775808 2")).unwrap_err();
        assert!(matches!(
            err,
            FormatError::Shape(MatrixError::ExtentOverflow { .. })
        ));
    }

    #[test]
    fn write_matrix_exact_bytes() {
        let m = Matrix::from_values(2, 2, vec![1, 2, 3, 4]).unwrap();
        // Trailing space after every cell, newline per row: the persisted
        // format, bit-for-bit.
        assert_eq!(render_matrix(&m), "2 2\n1 2 \n3 4 \n");
    }

    #[test]
    fn write_empty_matrix_exact_bytes() {
        let m = Matrix::zeros(0, 0).unwrap();
        assert_eq!(render_matrix(&m), "0 0\n");
    }

    #[test]
    fn written_matrix_reads_back() {
        let m = Matrix::from_values(3, 2, vec![1, -2, 30, -40, 500, -600]).unwrap();
        let text = render_matrix(&m);
        let back = read_matrix(&mut scanner(&text)).unwrap();
        assert_eq!(back, m);
    }
}
