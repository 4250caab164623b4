//! Union-find merge engine used by the hierarchy builder.
//!
//! The parent array is indexed by dense ids (cells or leaves) and starts with
//! every id as its own root. Merges are asymmetric: the caller picks which
//! root survives, so no rank is kept. There is no rollback.

#[derive(Clone, Debug)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.parent.len()
    }

    /// Representative of `node`, compressing the path walked.
    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Repoints the root of `right` onto the root of `left` and returns the
    /// surviving root.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> usize {
        let left = self.find(left);
        let right = self.find(right);
        self.parent[right] = left;
        left
    }

    /// Links two roots directly. Both must be current roots.
    pub(crate) fn link_roots(&mut self, keep: usize, absorbed: usize) {
        self.parent[absorbed] = keep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_keeps_the_left_root() {
        let mut uf = UnionFind::new(4);
        assert_eq!(uf.union(2, 3), 2);
        assert_eq!(uf.union(0, 3), 0);
        assert_eq!(uf.find(3), 0);
        assert_eq!(uf.find(2), 0);
        assert_eq!(uf.find(1), 1);
    }

    #[test]
    fn find_compresses_paths() {
        let mut uf = UnionFind::new(4);
        uf.link_roots(2, 3);
        uf.link_roots(1, 2);
        uf.link_roots(0, 1);
        assert_eq!(uf.find(3), 0);
        assert_eq!(uf.parent, vec![0, 0, 0, 0]);
        assert_eq!(uf.len(), 4);
    }
}
