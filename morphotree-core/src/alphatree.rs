//! Alpha-tree (quasi-flat zone hierarchy) construction.
//!
//! Edges join each pixel to its forward neighbours, weighted by a caller
//! supplied dissimilarity. Zero-weight edges optionally collapse into flat
//! zones up front; the remaining edges feed the shared hierarchy builder in
//! increasing weight.

use tracing::instrument;

use crate::{
    component_tree::ComponentTree,
    error::Result,
    hierarchy::{BuildOptions, Edge, EdgeQueue, ZoneBuilder, Zones, build_hierarchy},
    image::{Image, Neighborhood},
    level::Weight,
    pset::QueueStrategy,
};

#[derive(Clone, Copy, Debug)]
pub(crate) struct AlphaOptions {
    pub(crate) strategy: QueueStrategy,
    pub(crate) canonicalize: bool,
    pub(crate) flat_zones: bool,
    pub(crate) record_mst: bool,
}

/// Tree, node map over the image domain and accepted edges.
pub(crate) type AlphaTree<W> = (ComponentTree<W>, Image<usize>, Vec<Edge<W>>);

#[instrument(
    name = "core.alphatree_edges",
    skip_all,
    fields(pixels = image.len(), directions = neighborhood.len()),
    err
)]
pub(crate) fn alphatree<V, W, F>(
    image: &Image<V>,
    neighborhood: &Neighborhood,
    distance: F,
    options: AlphaOptions,
) -> Result<AlphaTree<W>>
where
    W: Weight,
    F: Fn(&V, &V) -> W,
{
    let forward = neighborhood.forward();
    let values = image.as_slice();
    let mut edges = EdgeQueue::<W>::new(options.strategy, forward.clone())?;
    let mut zones = options.flat_zones.then(|| ZoneBuilder::new(image.len()));

    for p in 0..image.len() {
        for (dir, q) in forward.neighbors(p) {
            let w = distance(&values[p], &values[q]);
            match zones.as_mut() {
                Some(zones) if w.total_cmp(&W::zero()).is_eq() => zones.merge(p, q),
                _ => edges.push(dir, p, q, w),
            }
        }
    }
    edges.finish();
    let zones = zones.map_or_else(|| Zones::singletons(image.len()), ZoneBuilder::finish);
    let leaf_levels = vec![W::zero(); zones.len()];

    let hierarchy = build_hierarchy(
        &zones,
        &leaf_levels,
        &mut edges,
        BuildOptions {
            canonicalize: options.canonicalize,
            record_mst: options.record_mst,
        },
    );
    Ok((
        ComponentTree::from_parts(hierarchy.parent, hierarchy.levels),
        Image::new(*image.shape(), hierarchy.node_map)?,
        hierarchy.mst,
    ))
}
