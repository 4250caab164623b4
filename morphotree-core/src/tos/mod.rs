//! Tree of shapes: immersion, propagation and hierarchy assembly.
//!
//! The image is immersed in its refined grid, flooded from a seed cell, and
//! the resulting depth image is turned into a max-tree through the shared
//! hierarchy builder. Every node is then labelled with the gray level its
//! depth was flooded at.

mod immersion;
mod propagation;

pub use self::{
    immersion::{Immersion, immerse},
    propagation::{Propagation, propagate},
};

use tracing::warn;

use crate::{
    component_tree::ComponentTree,
    error::{MorphotreeError, Result},
    hierarchy::{BuildOptions, EdgeQueue, ZoneBuilder, build_hierarchy},
    image::{Image, Neighborhood, Point, Shape},
    level::{Key, Weight},
    pset::QueueStrategy,
};

/// Restricts a refined-grid node map to the original pixel positions.
///
/// # Errors
/// Propagates [`crate::ImageError`] when the refined extents cannot be halved
/// back into a valid shape.
pub fn pixel_node_map(node_map: &Image<usize>) -> Result<Image<usize>> {
    let refined = node_map.shape();
    let extents: Vec<usize> = refined.extents().iter().map(|e| e.div_ceil(2)).collect();
    let shape = Shape::new(&extents)?;
    let data = shape
        .points()
        .map(|p| refined.index_of(&p.refined()).map_or(0, |i| node_map.as_slice()[i]))
        .collect();
    Ok(Image::new(shape, data)?)
}

/// Builds the tree of shapes of `image` rooted at `seed`.
///
/// Returns the tree, whose values are gray levels, and the node map over the
/// refined grid.
pub(crate) fn tree_of_shapes<V: Key>(
    image: &Image<V>,
    seed: &Point,
    strategy: QueueStrategy,
    canonicalize: bool,
) -> Result<(ComponentTree<V>, Image<usize>)> {
    let refined = image.shape().refined();
    let seed_cell = image
        .shape()
        .contains(seed)
        .then(|| refined.index_of(&seed.refined()))
        .flatten()
        .ok_or_else(|| MorphotreeError::SeedOutOfDomain {
            seed: seed.coords().to_vec(),
        })?;

    let immersion = immerse(image);
    let propagation = propagate(&immersion, seed_cell, strategy)?;
    let max_depth = propagation.max_depth();
    let (parent, values, node_map) = if max_depth <= u32::from(u16::MAX) {
        assemble::<V, u16>(&propagation, strategy, canonicalize)?
    } else {
        warn!(
            max_depth,
            "flood depth exceeds 16 bits, falling back to sorted edges"
        );
        assemble_wide(&propagation, canonicalize)?
    };
    Ok((
        ComponentTree::from_parts(parent, values),
        Image::new(refined, node_map)?,
    ))
}

/// [`assemble`] for floods deeper than `u16::MAX`.
///
/// Bucket queues are capped at 16-bit keys, so the caller's strategy is
/// replaced by sorted edges.
fn assemble_wide<V: Key>(
    propagation: &Propagation<V>,
    canonicalize: bool,
) -> Result<(Vec<usize>, Vec<V>, Vec<usize>)> {
    assemble::<V, u32>(propagation, QueueStrategy::Ordered, canonicalize)
}

/// Max-tree of the depth image, as `(parent, gray levels, node map)`.
fn assemble<V: Key, W: Weight>(
    propagation: &Propagation<V>,
    strategy: QueueStrategy,
    canonicalize: bool,
) -> Result<(Vec<usize>, Vec<V>, Vec<usize>)> {
    let shape = *propagation.depth().shape();
    let depth = propagation.depth().as_slice();
    let max_depth = propagation.max_depth();
    // Deeper cells get lower levels so that merging by increasing level
    // nests the deepest shapes first.
    let level = |d: u32| W::from_bucket((max_depth - d) as usize);

    let forward = Neighborhood::face_adjacent(shape).forward();
    let mut edges = EdgeQueue::<W>::new(strategy, forward.clone())?;
    let mut zones = ZoneBuilder::new(shape.len());
    for p in 0..shape.len() {
        for (dir, q) in forward.neighbors(p) {
            if depth[p] == depth[q] {
                zones.merge(p, q);
            } else {
                edges.push(dir, p, q, level(depth[p].min(depth[q])));
            }
        }
    }
    edges.finish();
    let zones = zones.finish();
    let leaf_levels: Vec<W> = zones
        .representatives()
        .iter()
        .map(|&cell| level(depth[cell]))
        .collect();

    let hierarchy = build_hierarchy(
        &zones,
        &leaf_levels,
        &mut edges,
        BuildOptions {
            canonicalize,
            record_mst: false,
        },
    );
    let depth_levels = propagation.depth_levels();
    let values = hierarchy
        .levels
        .iter()
        .map(|w| depth_levels[max_depth as usize - w.bucket()])
        .collect();
    Ok((hierarchy.parent, values, hierarchy.node_map))
}
