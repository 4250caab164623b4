//! Benchmark parameter types.

use std::fmt;

/// Parameters of one image benchmark run.
#[derive(Clone, Debug)]
pub struct ImageBenchParams {
    /// Image height.
    pub rows: usize,
    /// Image width.
    pub cols: usize,
    /// Number of distinct gray levels drawn.
    pub levels: u16,
}

impl fmt::Display for ImageBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{},L={}", self.rows, self.cols, self.levels)
    }
}
