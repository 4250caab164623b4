//! Tree construction entry points.
//!
//! Provides the [`Morphotree`] runner, which turns images into component trees
//! with the options captured by [`crate::MorphotreeBuilder`].

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    Result,
    alphatree::{AlphaOptions, alphatree},
    component_tree::ComponentTree,
    error::MorphotreeError,
    hierarchy::Edge,
    image::{Connectivity, Image, Neighborhood, Point, Shape},
    level::{Key, Weight},
    pset::QueueStrategy,
    tos::tree_of_shapes,
};

/// Tree together with its node map.
pub type TreeAndMap<V> = (ComponentTree<V>, Image<usize>);

/// Entry point for building trees of shapes and alpha-trees.
///
/// # Examples
/// ```
/// use morphotree_core::{Image, MorphotreeBuilder};
///
/// let image = Image::from_rows(vec![vec![0_u8, 0, 0], vec![0, 9, 0], vec![0, 0, 0]])
///     .expect("rectangular rows");
/// let runner = MorphotreeBuilder::new().build().expect("default configuration is valid");
///
/// let (tos, _) = runner.tree_of_shapes(&image).expect("origin seed lies in the image");
/// assert_eq!(tos.parent(), &[0, 0]);
/// assert_eq!(tos.values(), Some(&[0, 9][..]));
///
/// let (alpha, node_map) = runner
///     .alphatree(&image, |a: &u8, b: &u8| a.abs_diff(*b))
///     .expect("u8 weights");
/// assert_eq!(alpha.len(), 3);
/// assert_eq!(node_map.len(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct Morphotree {
    connectivity: Option<Connectivity>,
    canonicalize: bool,
    flat_zones: bool,
    queue_strategy: QueueStrategy,
    seed: Option<Vec<usize>>,
}

impl Morphotree {
    pub(crate) fn new(
        connectivity: Option<Connectivity>,
        canonicalize: bool,
        flat_zones: bool,
        queue_strategy: QueueStrategy,
        seed: Option<Vec<usize>>,
    ) -> Self {
        Self {
            connectivity,
            canonicalize,
            flat_zones,
            queue_strategy,
            seed,
        }
    }

    /// Returns the configured alpha-tree connectivity, if any.
    #[must_use]
    pub fn connectivity(&self) -> Option<Connectivity> {
        self.connectivity
    }

    /// Returns whether trees are canonicalized during construction.
    #[must_use]
    pub fn canonicalize(&self) -> bool {
        self.canonicalize
    }

    /// Returns whether zero-weight edges collapse into flat zones.
    #[must_use]
    pub fn flat_zones(&self) -> bool {
        self.flat_zones
    }

    /// Returns the configured queue strategy.
    #[must_use]
    pub fn queue_strategy(&self) -> QueueStrategy {
        self.queue_strategy
    }

    /// Returns the configured seed coordinates.
    #[must_use]
    pub fn seed(&self) -> Option<&[usize]> {
        self.seed.as_deref()
    }

    fn seed_point(&self, shape: &Shape) -> Result<Point> {
        let origin = vec![0; shape.ndim()];
        let coords = self.seed.as_deref().unwrap_or(&origin);
        Point::new(coords).ok_or_else(|| MorphotreeError::SeedOutOfDomain {
            seed: coords.to_vec(),
        })
    }

    fn neighborhood(&self, shape: Shape) -> Result<Neighborhood> {
        match self.connectivity {
            Some(connectivity) => Neighborhood::new(connectivity, shape),
            None => Ok(Neighborhood::face_adjacent(shape)),
        }
    }

    /// Builds the tree of shapes of `image`.
    ///
    /// Node values are gray levels. The node map covers the refined grid of
    /// `2 * n - 1` cells per axis; [`crate::tos::pixel_node_map`] restricts it
    /// to the original pixels.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::SeedOutOfDomain`] when the seed does not lie
    /// in the image and [`MorphotreeError::QueueUnavailable`] when buckets are
    /// forced for keys wider than 16 bits.
    #[instrument(
        name = "core.tree_of_shapes",
        err,
        skip(self, image),
        fields(pixels = image.len(), ndim = image.shape().ndim(), strategy = ?self.queue_strategy),
    )]
    pub fn tree_of_shapes<V: Key>(&self, image: &Image<V>) -> Result<TreeAndMap<V>> {
        let seed = self.seed_point(image.shape())?;
        let (tree, node_map) = tree_of_shapes(image, &seed, self.queue_strategy, self.canonicalize)?;
        debug!(nodes = tree.len(), "tree of shapes built");
        record_tree_built("tos", tree.len());
        Ok((tree, node_map))
    }

    /// Builds one tree of shapes per channel.
    ///
    /// Channels are independent and are built in parallel when the
    /// `parallel` feature is enabled.
    ///
    /// # Errors
    /// Returns the first error produced by [`Self::tree_of_shapes`].
    pub fn tree_of_shapes_per_channel<V: Key>(&self, channels: &[Image<V>]) -> Result<Vec<TreeAndMap<V>>> {
        #[cfg(feature = "parallel")]
        let trees = channels
            .par_iter()
            .map(|channel| self.tree_of_shapes(channel))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let trees = channels
            .iter()
            .map(|channel| self.tree_of_shapes(channel))
            .collect();
        trees
    }

    /// Builds the alpha-tree of `image` with `distance` as edge weight.
    ///
    /// Node values are alpha levels; the node map covers the image domain.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::UnsupportedConnectivity`] when the configured
    /// connectivity does not match the image dimension and
    /// [`MorphotreeError::QueueUnavailable`] when buckets are forced for
    /// weights that cannot index them.
    pub fn alphatree<V, W, F>(&self, image: &Image<V>, distance: F) -> Result<TreeAndMap<W>>
    where
        W: Weight,
        F: Fn(&V, &V) -> W,
    {
        let (tree, node_map, _) = self.run_alphatree(image, distance, false)?;
        Ok((tree, node_map))
    }

    /// As [`Self::alphatree`], also returning the edges of the minimum
    /// spanning forest in the order they were accepted.
    ///
    /// With flat zones enabled, zero-weight edges inside a flat zone are not
    /// reported.
    ///
    /// # Errors
    /// As [`Self::alphatree`].
    pub fn alphatree_with_mst<V, W, F>(
        &self,
        image: &Image<V>,
        distance: F,
    ) -> Result<(ComponentTree<W>, Image<usize>, Vec<Edge<W>>)>
    where
        W: Weight,
        F: Fn(&V, &V) -> W,
    {
        self.run_alphatree(image, distance, true)
    }

    #[instrument(
        name = "core.alphatree",
        err,
        skip(self, image, distance),
        fields(
            pixels = image.len(),
            connectivity = ?self.connectivity,
            strategy = ?self.queue_strategy,
            flat_zones = self.flat_zones,
        ),
    )]
    fn run_alphatree<V, W, F>(
        &self,
        image: &Image<V>,
        distance: F,
        record_mst: bool,
    ) -> Result<(ComponentTree<W>, Image<usize>, Vec<Edge<W>>)>
    where
        W: Weight,
        F: Fn(&V, &V) -> W,
    {
        let neighborhood = self.neighborhood(*image.shape())?;
        let options = AlphaOptions {
            strategy: self.queue_strategy,
            canonicalize: self.canonicalize,
            flat_zones: self.flat_zones,
            record_mst,
        };
        let (tree, node_map, mst) = alphatree(image, &neighborhood, distance, options)?;
        debug!(nodes = tree.len(), mst_edges = mst.len(), "alpha-tree built");
        record_tree_built("alphatree", tree.len());
        Ok((tree, node_map, mst))
    }
}

#[cfg(feature = "metrics")]
fn record_tree_built(kind: &'static str, nodes: usize) {
    metrics::counter!("morphotree_trees_built_total", "kind" => kind).increment(1);
    metrics::histogram!("morphotree_tree_nodes", "kind" => kind).record(nodes as f64);
}

#[cfg(not(feature = "metrics"))]
fn record_tree_built(_kind: &'static str, _nodes: usize) {}
