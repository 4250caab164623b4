//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use morphotree_core::{ImageError, MorphotreeError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The synthetic image could not be shaped.
    #[error("synthetic image generation failed: {0}")]
    Image(#[from] ImageError),
    /// Tree construction or post-processing failed.
    #[error("tree construction failed: {0}")]
    Morphotree(#[from] MorphotreeError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
}
