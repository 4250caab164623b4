//! Edge containers feeding the hierarchy builder in increasing weight order.

use std::marker::PhantomData;
use std::mem::size_of;

use crate::{
    error::Result,
    image::Neighborhood,
    level::Weight,
    pset::{HierarchicalQueue, QueueStrategy},
};

/// An undirected edge between two adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge<W> {
    /// Endpoint that comes first in domain order.
    pub p: usize,
    /// Endpoint reached from `p` through a forward offset.
    pub q: usize,
    /// Dissimilarity between the endpoints.
    pub w: W,
}

/// Bucket edges for narrow integer weights: one hierarchical queue per
/// forward direction, each holding the origin point of the edge.
#[derive(Clone, Debug)]
pub(crate) struct QueuedEdges<W> {
    forward: Neighborhood,
    queues: Vec<HierarchicalQueue>,
    _weight: PhantomData<W>,
}

impl<W: Weight> QueuedEdges<W> {
    fn new(forward: Neighborhood, bits: u32) -> Self {
        let capacity = forward.shape().len();
        let queues = (0..forward.len())
            .map(|_| HierarchicalQueue::new(1 << bits, capacity))
            .collect();
        Self {
            forward,
            queues,
            _weight: PhantomData,
        }
    }

    fn push(&mut self, dir: usize, p: usize, w: W) {
        if let Some(queue) = self.queues.get_mut(dir) {
            queue.insert(w.bucket(), p);
        }
    }

    /// Lowest level across directions; the lowest direction wins ties.
    fn pop(&mut self) -> Option<Edge<W>> {
        let mut best: Option<(usize, usize)> = None;
        for (dir, queue) in self.queues.iter_mut().enumerate() {
            if let Some(level) = queue.lowest_level() {
                if best.is_none_or(|(_, l)| level < l) {
                    best = Some((dir, level));
                }
            }
        }
        let (dir, level) = best?;
        let p = self.queues[dir].try_pop(level)?;
        let q = self
            .forward
            .neighbor(&self.forward.shape().point_of(p), dir)?;
        Some(Edge {
            p,
            q,
            w: W::from_bucket(level),
        })
    }
}

/// Growable edge list sorted once after all insertions.
#[derive(Clone, Debug)]
pub(crate) struct SortedEdges<W> {
    edges: Vec<Edge<W>>,
    cursor: usize,
}

impl<W> Default for SortedEdges<W> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            cursor: 0,
        }
    }
}

impl<W: Weight> SortedEdges<W> {
    fn push(&mut self, p: usize, q: usize, w: W) {
        self.edges.push(Edge { p, q, w });
    }

    fn finish(&mut self) {
        self.edges.sort_by(|a, b| a.w.total_cmp(&b.w));
        self.cursor = 0;
    }

    fn pop(&mut self) -> Option<Edge<W>> {
        let edge = self.edges.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(edge)
    }
}

/// Edge container selected at runtime from the weight type and strategy.
#[derive(Clone, Debug)]
pub(crate) enum EdgeQueue<W> {
    Buckets(QueuedEdges<W>),
    Sorted(SortedEdges<W>),
}

impl<W: Weight> EdgeQueue<W> {
    /// Picks buckets when `W` is narrow enough and `strategy` allows it.
    pub(crate) fn new(strategy: QueueStrategy, forward: Neighborhood) -> Result<Self> {
        let bits = W::QUEUE_BITS.unwrap_or(u32::try_from(size_of::<W>() * 8).unwrap_or(u32::MAX));
        match (strategy.resolve_or_err(bits)?, W::QUEUE_BITS) {
            (QueueStrategy::Buckets, Some(bits)) => Ok(Self::Buckets(QueuedEdges::new(forward, bits))),
            _ => Ok(Self::Sorted(SortedEdges::default())),
        }
    }

    pub(crate) fn strategy(&self) -> QueueStrategy {
        match self {
            Self::Buckets(_) => QueueStrategy::Buckets,
            Self::Sorted(_) => QueueStrategy::Ordered,
        }
    }

    /// Stores the edge from `p` to its neighbour `q` in forward direction `dir`.
    pub(crate) fn push(&mut self, dir: usize, p: usize, q: usize, w: W) {
        match self {
            Self::Buckets(edges) => edges.push(dir, p, w),
            Self::Sorted(edges) => edges.push(p, q, w),
        }
    }

    /// Must be called once after the last [`Self::push`].
    pub(crate) fn finish(&mut self) {
        if let Self::Sorted(edges) = self {
            edges.finish();
        }
    }

    pub(crate) fn pop(&mut self) -> Option<Edge<W>> {
        match self {
            Self::Buckets(edges) => edges.pop(),
            Self::Sorted(edges) => edges.pop(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Connectivity, Shape};
    use crate::MorphotreeError;

    fn forward_2x2() -> Neighborhood {
        let shape = Shape::new(&[2, 2]).expect("shape");
        Neighborhood::new(Connectivity::Four, shape)
            .expect("2-D")
            .forward()
    }

    fn fill<W: Weight>(queue: &mut EdgeQueue<W>, weights: [W; 4]) {
        // Forward 4-edges of a 2x2 grid: 0-1 (dir 0), 0-2 (dir 1), 1-3 (dir 1), 2-3 (dir 0).
        queue.push(0, 0, 1, weights[0]);
        queue.push(1, 0, 2, weights[1]);
        queue.push(1, 1, 3, weights[2]);
        queue.push(0, 2, 3, weights[3]);
        queue.finish();
    }

    fn drain<W: Weight>(queue: &mut EdgeQueue<W>) -> Vec<Edge<W>> {
        std::iter::from_fn(|| queue.pop()).collect()
    }

    #[test]
    fn bucket_edges_pop_by_level_then_direction() {
        let mut queue = EdgeQueue::<u8>::new(QueueStrategy::Auto, forward_2x2()).expect("u8");
        assert_eq!(queue.strategy(), QueueStrategy::Buckets);
        fill(&mut queue, [3, 1, 1, 0]);
        let edges = drain(&mut queue);
        assert_eq!(
            edges,
            vec![
                Edge { p: 2, q: 3, w: 0 },
                Edge { p: 1, q: 3, w: 1 },
                Edge { p: 0, q: 2, w: 1 },
                Edge { p: 0, q: 1, w: 3 },
            ]
        );
    }

    #[test]
    fn sorted_edges_are_stable() {
        let mut queue = EdgeQueue::<f32>::new(QueueStrategy::Auto, forward_2x2()).expect("f32");
        assert_eq!(queue.strategy(), QueueStrategy::Ordered);
        fill(&mut queue, [0.5, 0.25, 0.25, 0.0]);
        let order: Vec<(usize, usize)> = drain(&mut queue).iter().map(|e| (e.p, e.q)).collect();
        assert_eq!(order, vec![(2, 3), (0, 2), (1, 3), (0, 1)]);
    }

    #[test]
    fn sorted_edges_default_without_a_default_weight() {
        struct Opaque;
        let edges = SortedEdges::<Opaque>::default();
        assert!(edges.edges.is_empty());
        assert_eq!(edges.cursor, 0);
    }

    #[test]
    fn forced_buckets_reject_wide_weights() {
        let err = EdgeQueue::<u32>::new(QueueStrategy::Buckets, forward_2x2())
            .expect_err("32-bit buckets");
        assert!(matches!(
            err,
            MorphotreeError::QueueUnavailable { key_bits: 32, .. }
        ));
    }
}
