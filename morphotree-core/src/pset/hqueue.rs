//! Hierarchical (bucket) queue over narrow integer levels.

const NIL: usize = usize::MAX;

/// Array of per-level singly linked LIFO buckets.
///
/// Links live in a side array indexed by point, so a point may be held at
/// most once at a time. Levels must be below the bucket count fixed at
/// construction.
#[derive(Clone, Debug)]
pub(crate) struct HierarchicalQueue {
    heads: Vec<usize>,
    next: Vec<usize>,
    len: usize,
    // Lowest level that may be non-empty.
    lo: usize,
    // One past the highest level that may be non-empty.
    hi: usize,
}

impl HierarchicalQueue {
    pub(crate) fn new(levels: usize, capacity: usize) -> Self {
        Self {
            heads: vec![NIL; levels],
            next: vec![NIL; capacity],
            len: 0,
            lo: levels,
            hi: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pushes `point` on top of the bucket for `level`.
    pub(crate) fn insert(&mut self, level: usize, point: usize) {
        debug_assert!(
            level < self.heads.len(),
            "level {level} outside the {} buckets",
            self.heads.len()
        );
        let Some(head) = self.heads.get_mut(level) else {
            return;
        };
        if point >= self.next.len() {
            self.next.resize(point + 1, NIL);
        }
        self.next[point] = *head;
        *head = point;
        self.len += 1;
        self.lo = self.lo.min(level);
        self.hi = self.hi.max(level + 1);
    }

    /// Pops the most recently inserted point of `level` if that bucket is
    /// non-empty.
    pub(crate) fn try_pop(&mut self, level: usize) -> Option<usize> {
        let head = self.heads.get_mut(level)?;
        if *head == NIL {
            return None;
        }
        let point = *head;
        *head = self.next[point];
        self.next[point] = NIL;
        self.len -= 1;
        Some(point)
    }

    /// Pops from the nearest non-empty level at or above `level`, falling back
    /// to the nearest level below.
    pub(crate) fn pop(&mut self, level: usize) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }
        let start = level.max(self.lo);
        let found = (start..self.hi)
            .find(|&l| self.heads[l] != NIL)
            .or_else(|| (self.lo..level.min(self.hi)).rev().find(|&l| self.heads[l] != NIL))?;
        self.try_pop(found).map(|point| (found, point))
    }

    /// Lowest non-empty level.
    pub(crate) fn lowest_level(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        while self.lo < self.hi && self.heads[self.lo] == NIL {
            self.lo += 1;
        }
        (self.lo < self.hi).then_some(self.lo)
    }
}
