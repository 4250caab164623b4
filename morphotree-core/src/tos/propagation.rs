//! Flood propagation over the refined grid.

use tracing::instrument;

use super::immersion::Immersion;
use crate::{
    error::{MorphotreeError, Result},
    image::{Image, Neighborhood},
    level::Key,
    pset::{PointSet, QueueStrategy},
};

/// Result of flooding the refined grid from a seed cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Propagation<V> {
    depth: Image<u32>,
    order: Vec<usize>,
    depth_levels: Vec<V>,
}

impl<V: Copy> Propagation<V> {
    /// Flooding depth of every refined cell. The seed has depth 0 and depth
    /// grows by one each time the flooding level changes.
    #[must_use]
    pub fn depth(&self) -> &Image<u32> {
        &self.depth
    }

    /// Visiting sequence: a permutation of the refined cells starting at the
    /// seed.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Rank of every cell in [`Self::order`].
    #[must_use]
    pub fn rank(&self) -> Vec<usize> {
        let mut rank = vec![0; self.order.len()];
        for (r, &cell) in self.order.iter().enumerate() {
            rank[cell] = r;
        }
        rank
    }

    /// Largest depth reached.
    #[must_use]
    pub fn max_depth(&self) -> u32 {
        u32::try_from(self.depth_levels.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// Gray level at which each depth was flooded.
    #[must_use]
    pub fn depth_levels(&self) -> &[V] {
        &self.depth_levels
    }
}

/// Floods the refined grid described by `immersion` from the cell `seed`.
///
/// Neighbours are enqueued at their bound closest to the current level:
/// `sup(q)` when it lies below, `inf(q)` when it lies above, the current level
/// otherwise. Among equal levels the most recently enqueued cell is visited
/// first, except that one neighbour already at the current level is visited
/// immediately without a round-trip through the queue.
///
/// # Errors
/// Returns [`MorphotreeError::QueueUnavailable`] when `strategy` cannot hold
/// keys of type `V` and [`MorphotreeError::SeedOutOfDomain`] when `seed` is
/// not a cell index.
#[instrument(
    name = "core.propagation",
    skip(immersion),
    fields(cells = immersion.inf.len(), max_depth = tracing::field::Empty),
    err
)]
pub fn propagate<V: Key>(
    immersion: &Immersion<V>,
    seed: usize,
    strategy: QueueStrategy,
) -> Result<Propagation<V>> {
    const UNSEEN: u32 = u32::MAX;

    let shape = *immersion.inf.shape();
    if seed >= shape.len() {
        return Err(MorphotreeError::SeedOutOfDomain {
            seed: vec![seed],
        });
    }
    let inf = immersion.inf.as_slice();
    let sup = immersion.sup.as_slice();
    let nbh = Neighborhood::face_adjacent(shape);
    let mut queue = PointSet::<V>::new(strategy, shape.len())?;
    let mut depth = vec![UNSEEN; shape.len()];
    // Cells already enqueued but not yet visited.
    let mut queued = vec![false; shape.len()];
    let mut order = Vec::with_capacity(shape.len());

    let mut previous = inf[seed];
    queue.insert(previous, seed);
    queued[seed] = true;
    let mut current_depth = 0_u32;
    let mut depth_levels = vec![previous];

    while let Some((level, popped)) = queue.pop(previous) {
        if level != previous {
            current_depth += 1;
            depth_levels.push(level);
        }
        let mut p = popped;
        loop {
            depth[p] = current_depth;
            order.push(p);
            let mut next_at_level = None;
            for (_, q) in nbh.neighbors(p) {
                if depth[q] != UNSEEN || queued[q] || next_at_level == Some(q) {
                    continue;
                }
                let key = if sup[q] < level {
                    sup[q]
                } else if level < inf[q] {
                    inf[q]
                } else if next_at_level.is_none() {
                    next_at_level = Some(q);
                    continue;
                } else {
                    level
                };
                queue.insert(key, q);
                queued[q] = true;
            }
            match next_at_level {
                Some(q) => p = q,
                None => break,
            }
        }
        previous = level;
    }

    let propagation = Propagation {
        depth: Image::new(shape, depth)?,
        order,
        depth_levels,
    };
    tracing::Span::current().record("max_depth", propagation.max_depth());
    Ok(propagation)
}
