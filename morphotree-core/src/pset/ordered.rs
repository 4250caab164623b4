//! Ordered set for levels too wide to index buckets.

use std::collections::BTreeMap;

/// Multiset of points keyed by level, LIFO among equal levels.
#[derive(Clone, Debug, Default)]
pub(crate) struct OrderedQueue {
    levels: BTreeMap<u64, Vec<usize>>,
    len: usize,
}

impl OrderedQueue {
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn insert(&mut self, level: u64, point: usize) {
        self.levels.entry(level).or_default().push(point);
        self.len += 1;
    }

    pub(crate) fn try_pop(&mut self, level: u64) -> Option<usize> {
        let stack = self.levels.get_mut(&level)?;
        let point = stack.pop()?;
        if stack.is_empty() {
            self.levels.remove(&level);
        }
        self.len -= 1;
        Some(point)
    }

    /// Lower bound on `level`, falling back to the greatest level below.
    pub(crate) fn pop(&mut self, level: u64) -> Option<(u64, usize)> {
        let found = self
            .levels
            .range(level..)
            .next()
            .or_else(|| self.levels.range(..level).next_back())
            .map(|(l, _)| *l)?;
        self.try_pop(found).map(|point| (found, point))
    }
}
