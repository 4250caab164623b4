//! Flat-zone collapsing: partitions cells into the leaves of the hierarchy.

use crate::union_find::UnionFind;

const UNSET: usize = usize::MAX;

/// Accumulates merges between cells that belong to the same leaf.
#[derive(Clone, Debug)]
pub(crate) struct ZoneBuilder {
    uf: UnionFind,
}

impl ZoneBuilder {
    pub(crate) fn new(cell_count: usize) -> Self {
        Self {
            uf: UnionFind::new(cell_count),
        }
    }

    pub(crate) fn merge(&mut self, p: usize, q: usize) {
        self.uf.union(p, q);
    }

    /// Numbers zones in domain order of their first cell.
    pub(crate) fn finish(mut self) -> Zones {
        let n = self.uf.len();
        let mut index = vec![UNSET; n];
        let mut zone_of = Vec::with_capacity(n);
        let mut representatives = Vec::new();
        for cell in 0..n {
            let root = self.uf.find(cell);
            if index[root] == UNSET {
                index[root] = representatives.len();
                representatives.push(cell);
            }
            zone_of.push(index[root]);
        }
        Zones {
            zone_of,
            representatives,
        }
    }
}

/// Cell-to-zone assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Zones {
    zone_of: Vec<usize>,
    representatives: Vec<usize>,
}

impl Zones {
    /// Every cell in its own zone.
    pub(crate) fn singletons(cell_count: usize) -> Self {
        Self {
            zone_of: (0..cell_count).collect(),
            representatives: (0..cell_count).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.representatives.len()
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.zone_of.len()
    }

    pub(crate) fn zone_of(&self, cell: usize) -> usize {
        self.zone_of[cell]
    }

    /// First cell, in domain order, of each zone.
    pub(crate) fn representatives(&self) -> &[usize] {
        &self.representatives
    }
}
