//! Text matrix input: one image row per line, whitespace-separated levels.

use std::io::BufRead;

use morphotree_core::Image;
use thiserror::Error;

/// Errors raised while parsing a text matrix.
#[derive(Debug, Error)]
pub enum InputError {
    /// Reading the underlying stream failed.
    #[error("failed to read line {line}: {source}")]
    Read {
        /// 1-based line number.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A token was not an unsigned 16-bit integer.
    #[error("line {line}: `{token}` is not a level in 0..=65535")]
    InvalidLevel {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// A row had a different length from the first row.
    #[error("line {line}: expected {expected} values, found {found}")]
    RaggedRow {
        /// 1-based line number.
        line: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// The input held no rows.
    #[error("input contains no image rows")]
    Empty,
}

/// Parses a 2-D image of `u16` levels. Blank lines are skipped.
///
/// # Errors
/// Returns [`InputError`] on I/O failure, unparsable tokens, ragged rows or
/// empty input.
///
/// # Examples
/// ```
/// use morphotree_cli::cli::parse_matrix;
///
/// let image = parse_matrix("1 2 3\n4 5 6\n".as_bytes()).expect("well-formed matrix");
/// assert_eq!(image.shape().extents(), &[2, 3]);
/// ```
pub fn parse_matrix(reader: impl BufRead) -> Result<Image<u16>, InputError> {
    let mut rows: Vec<Vec<u16>> = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| InputError::Read {
            line: line_no,
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<u16>().map_err(|_| InputError::InvalidLevel {
                    line: line_no,
                    token: token.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(InputError::RaggedRow {
                    line: line_no,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(InputError::Empty);
    }
    Image::from_rows(rows).map_err(|_| InputError::Empty)
}
