//! Builder utilities for configuring tree construction.
//!
//! Exposes the options shared by the tree of shapes and the alpha-tree and
//! validates them before constructing [`Morphotree`] runners.

use crate::{
    Result,
    error::MorphotreeError,
    image::{Connectivity, MAX_DIM},
    morphotree::Morphotree,
    pset::QueueStrategy,
};

/// Configures and constructs [`Morphotree`] runners.
///
/// # Examples
/// ```
/// use morphotree_core::{Connectivity, MorphotreeBuilder, QueueStrategy};
///
/// let runner = MorphotreeBuilder::new()
///     .with_connectivity(Connectivity::Eight)
///     .with_queue_strategy(QueueStrategy::Ordered)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(runner.connectivity(), Some(Connectivity::Eight));
/// assert_eq!(runner.queue_strategy(), QueueStrategy::Ordered);
/// ```
#[derive(Debug, Clone)]
pub struct MorphotreeBuilder {
    connectivity: Option<Connectivity>,
    canonicalize: bool,
    flat_zones: bool,
    queue_strategy: QueueStrategy,
    seed: Option<Vec<usize>>,
}

impl Default for MorphotreeBuilder {
    fn default() -> Self {
        Self {
            connectivity: None,
            canonicalize: true,
            flat_zones: true,
            queue_strategy: QueueStrategy::Auto,
            seed: None,
        }
    }
}

impl MorphotreeBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use morphotree_core::{MorphotreeBuilder, QueueStrategy};
    ///
    /// let builder = MorphotreeBuilder::new();
    /// assert!(builder.canonicalize());
    /// assert!(builder.flat_zones());
    /// assert_eq!(builder.queue_strategy(), QueueStrategy::Auto);
    /// assert_eq!(builder.seed(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the pixel adjacency used by the alpha-tree.
    ///
    /// Without an explicit connectivity, face adjacency of the image's
    /// dimension is used.
    #[must_use]
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    /// Returns the configured connectivity, if any.
    #[must_use]
    pub fn connectivity(&self) -> Option<Connectivity> {
        self.connectivity
    }

    /// Enables or disables merging of equal-level nodes during construction.
    ///
    /// # Examples
    /// ```
    /// use morphotree_core::MorphotreeBuilder;
    ///
    /// let builder = MorphotreeBuilder::new().with_canonicalize(false);
    /// assert!(!builder.canonicalize());
    /// ```
    #[must_use]
    pub fn with_canonicalize(mut self, canonicalize: bool) -> Self {
        self.canonicalize = canonicalize;
        self
    }

    /// Returns whether construction canonicalizes the tree.
    #[must_use]
    pub fn canonicalize(&self) -> bool {
        self.canonicalize
    }

    /// Enables or disables the flat-zone pre-pass of the alpha-tree.
    #[must_use]
    pub fn with_flat_zones(mut self, flat_zones: bool) -> Self {
        self.flat_zones = flat_zones;
        self
    }

    /// Returns whether zero-weight edges are collapsed before building.
    #[must_use]
    pub fn flat_zones(&self) -> bool {
        self.flat_zones
    }

    /// Selects the ordered priority container backing flooding and edge
    /// ordering.
    #[must_use]
    pub fn with_queue_strategy(mut self, strategy: QueueStrategy) -> Self {
        self.queue_strategy = strategy;
        self
    }

    /// Returns the configured queue strategy.
    #[must_use]
    pub fn queue_strategy(&self) -> QueueStrategy {
        self.queue_strategy
    }

    /// Sets the point, in original image coordinates, the tree of shapes is
    /// rooted at.
    ///
    /// # Examples
    /// ```
    /// use morphotree_core::MorphotreeBuilder;
    ///
    /// let builder = MorphotreeBuilder::new().with_seed([1, 2]);
    /// assert_eq!(builder.seed(), Some(&[1, 2][..]));
    /// ```
    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<Vec<usize>>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Returns the configured seed coordinates.
    #[must_use]
    pub fn seed(&self) -> Option<&[usize]> {
        self.seed.as_deref()
    }

    /// Validates the configuration and constructs a [`Morphotree`] runner.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::SeedOutOfDomain`] when the seed has no
    /// coordinates or more than [`MAX_DIM`] of them. Whether the seed lies
    /// inside a given image is checked when a tree is built.
    ///
    /// # Examples
    /// ```
    /// use morphotree_core::{MorphotreeBuilder, MorphotreeErrorCode};
    ///
    /// let err = MorphotreeBuilder::new()
    ///     .with_seed(Vec::new())
    ///     .build()
    ///     .expect_err("empty seed is rejected");
    /// assert_eq!(err.code(), MorphotreeErrorCode::SeedOutOfDomain);
    /// ```
    pub fn build(self) -> Result<Morphotree> {
        let seed = match self.seed {
            Some(seed) if seed.is_empty() || seed.len() > MAX_DIM => {
                return Err(MorphotreeError::SeedOutOfDomain { seed });
            }
            seed => seed,
        };
        Ok(Morphotree::new(
            self.connectivity,
            self.canonicalize,
            self.flat_zones,
            self.queue_strategy,
            seed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![])]
    #[case(vec![0, 0, 0, 0, 0])]
    fn rejects_malformed_seeds(#[case] seed: Vec<usize>) {
        let err = MorphotreeBuilder::new()
            .with_seed(seed.clone())
            .build()
            .expect_err("seed arity is checked");
        assert_eq!(err, MorphotreeError::SeedOutOfDomain { seed });
    }

    #[test]
    fn carries_every_option_to_the_runner() {
        let runner = MorphotreeBuilder::new()
            .with_connectivity(Connectivity::Six)
            .with_canonicalize(false)
            .with_flat_zones(false)
            .with_queue_strategy(QueueStrategy::Buckets)
            .with_seed([1, 2, 3])
            .build()
            .expect("valid configuration");
        assert_eq!(runner.connectivity(), Some(Connectivity::Six));
        assert!(!runner.canonicalize());
        assert!(!runner.flat_zones());
        assert_eq!(runner.queue_strategy(), QueueStrategy::Buckets);
        assert_eq!(runner.seed(), Some(&[1, 2, 3][..]));
    }
}
