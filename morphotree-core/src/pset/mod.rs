//! Ordered priority container ("pset") over unsigned integer levels.
//!
//! Two interchangeable backends implement the same contract and are picked
//! once at construction from the key width: a hierarchical bucket queue for
//! keys of at most 16 bits and a balanced ordered map for wider keys. Both
//! break ties among equal levels last-in-first-out, so they yield identical
//! pop sequences.

mod hqueue;
mod ordered;

use std::marker::PhantomData;

pub(crate) use self::hqueue::HierarchicalQueue;
use self::ordered::OrderedQueue;
use crate::{
    error::{MorphotreeError, Result},
    level::Key,
};

/// Widest key, in bits, served by the bucket backend.
pub const MAX_BUCKET_BITS: u32 = 16;

/// Selects the backend of a [`PointSet`].
///
/// # Examples
/// ```
/// use morphotree_core::QueueStrategy;
///
/// assert_eq!(QueueStrategy::Auto.resolve(8), Some(QueueStrategy::Buckets));
/// assert_eq!(QueueStrategy::Auto.resolve(32), Some(QueueStrategy::Ordered));
/// assert_eq!(QueueStrategy::Buckets.resolve(32), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QueueStrategy {
    /// Buckets for keys of at most [`MAX_BUCKET_BITS`] bits, ordered otherwise.
    #[default]
    Auto,
    /// Hierarchical bucket queue; O(1) amortised insert and pop.
    Buckets,
    /// Ordered map; O(log n) insert and nearest-level lookup.
    Ordered,
}

impl QueueStrategy {
    /// Resolves `Auto` against a key width. Returns `None` when buckets are
    /// requested for keys that are too wide.
    #[must_use]
    pub const fn resolve(self, key_bits: u32) -> Option<Self> {
        match self {
            Self::Auto if key_bits <= MAX_BUCKET_BITS => Some(Self::Buckets),
            Self::Auto | Self::Ordered => Some(Self::Ordered),
            Self::Buckets if key_bits <= MAX_BUCKET_BITS => Some(Self::Buckets),
            Self::Buckets => None,
        }
    }

    pub(crate) fn resolve_or_err(self, key_bits: u32) -> Result<Self> {
        self.resolve(key_bits)
            .ok_or(MorphotreeError::QueueUnavailable {
                requested: self,
                key_bits,
            })
    }
}

#[derive(Clone, Debug)]
enum Backend {
    Buckets(HierarchicalQueue),
    Ordered(OrderedQueue),
}

/// Priority container storing point indices at levels of type `K`.
///
/// # Examples
/// ```
/// use morphotree_core::{PointSet, QueueStrategy};
///
/// let mut set = PointSet::<u8>::new(QueueStrategy::Auto, 4).expect("u8 keys fit buckets");
/// set.insert(3, 0);
/// set.insert(7, 1);
/// assert_eq!(set.pop(5), Some((7, 1)));
/// assert_eq!(set.pop(5), Some((3, 0)));
/// assert!(set.is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct PointSet<K> {
    backend: Backend,
    _key: PhantomData<K>,
}

impl<K: Key> PointSet<K> {
    /// Creates an empty set for point indices below `capacity`.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::QueueUnavailable`] when
    /// [`QueueStrategy::Buckets`] is forced for keys wider than
    /// [`MAX_BUCKET_BITS`].
    pub fn new(strategy: QueueStrategy, capacity: usize) -> Result<Self> {
        let backend = match strategy.resolve_or_err(K::BITS)? {
            QueueStrategy::Buckets => Backend::Buckets(HierarchicalQueue::new(1 << K::BITS, capacity)),
            _ => Backend::Ordered(OrderedQueue::default()),
        };
        Ok(Self {
            backend,
            _key: PhantomData,
        })
    }

    /// Backend actually in use.
    #[must_use]
    pub fn strategy(&self) -> QueueStrategy {
        match self.backend {
            Backend::Buckets(_) => QueueStrategy::Buckets,
            Backend::Ordered(_) => QueueStrategy::Ordered,
        }
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.backend {
            Backend::Buckets(q) => q.len(),
            Backend::Ordered(q) => q.len(),
        }
    }

    /// Returns `true` when no point is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores `point` at `level`.
    pub fn insert(&mut self, level: K, point: usize) {
        match &mut self.backend {
            Backend::Buckets(q) => q.insert(bucket_index(level), point),
            Backend::Ordered(q) => q.insert(level.to_u64(), point),
        }
    }

    /// Removes the point nearest to `level`, preferring the closest level at
    /// or above it and only then the closest level below.
    ///
    /// Returns `None` when the set is empty.
    pub fn pop(&mut self, level: K) -> Option<(K, usize)> {
        match &mut self.backend {
            Backend::Buckets(q) => q
                .pop(bucket_index(level))
                .map(|(l, p)| (K::from_u64(l as u64), p)),
            Backend::Ordered(q) => q.pop(level.to_u64()).map(|(l, p)| (K::from_u64(l), p)),
        }
    }

    /// Removes a point stored exactly at `level`, without any fallback.
    pub fn try_pop(&mut self, level: K) -> Option<usize> {
        match &mut self.backend {
            Backend::Buckets(q) => q.try_pop(bucket_index(level)),
            Backend::Ordered(q) => q.try_pop(level.to_u64()),
        }
    }
}

fn bucket_index<K: Key>(level: K) -> usize {
    usize::try_from(level.to_u64()).unwrap_or(usize::MAX)
}
