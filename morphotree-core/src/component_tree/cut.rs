//! Horizontal cuts and reconstruction.

use super::ComponentTree;
use crate::{
    error::{MorphotreeError, Result},
    image::Image,
};

impl<V> ComponentTree<V> {
    /// Representative node of every node for a cut at `threshold`: the
    /// highest ancestor (or the node itself) whose parent's level is still
    /// above `threshold`.
    fn cut_representatives<L: PartialOrd>(&self, threshold: &L, levels: &[L]) -> Vec<usize> {
        let mut root_cut = vec![0; self.len()];
        for node in 1..self.len() {
            let p = self.parent[node];
            root_cut[node] = if levels[p] > *threshold { node } else { root_cut[p] };
        }
        root_cut
    }

    /// Maps every point of `node_map` to its component at `threshold`, using
    /// `levels` as node levels.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::LevelCountMismatch`] when `levels` does not
    /// have one entry per node and [`MorphotreeError::NodeMapOutOfRange`] for
    /// foreign node ids.
    pub fn horizontal_cut_from_levels<L: PartialOrd>(
        &self,
        threshold: L,
        node_map: &Image<usize>,
        levels: &[L],
    ) -> Result<Image<usize>> {
        self.check_per_node(levels)?;
        self.check_node_map(node_map)?;
        let root_cut = self.cut_representatives(&threshold, levels);
        Ok(node_map.map(|&id| root_cut[id]))
    }

    /// Replaces every node id of `node_map` with `values[id]`.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::LevelCountMismatch`] when `values` does not
    /// have one entry per node and [`MorphotreeError::NodeMapOutOfRange`] for
    /// foreign node ids.
    pub fn reconstruct_from<T: Clone>(&self, node_map: &Image<usize>, values: &[T]) -> Result<Image<T>> {
        self.check_per_node(values)?;
        self.check_node_map(node_map)?;
        Ok(node_map.map(|&id| values[id].clone()))
    }
}

impl<V: PartialOrd + Clone> ComponentTree<V> {
    /// [`Self::horizontal_cut_from_levels`] with the tree's own values.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::MissingValues`] for trees without values.
    pub fn horizontal_cut(&self, threshold: V, node_map: &Image<usize>) -> Result<Image<usize>> {
        let values = self.values.as_deref().ok_or(MorphotreeError::MissingValues)?;
        self.horizontal_cut_from_levels(threshold, node_map, values)
    }

    /// [`Self::reconstruct_from`] with the tree's own values.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::MissingValues`] for trees without values.
    pub fn reconstruct(&self, node_map: &Image<usize>) -> Result<Image<V>> {
        let values = self.values.as_deref().ok_or(MorphotreeError::MissingValues)?;
        self.reconstruct_from(node_map, values)
    }

    /// Labels the components of a cut at `threshold` with contiguous ids,
    /// numbered in domain order of their first point.
    ///
    /// For an alpha-tree these are the quasi-flat zones at `threshold`.
    ///
    /// # Errors
    /// As [`Self::horizontal_cut`].
    pub fn cut_labels(&self, threshold: V, node_map: &Image<usize>) -> Result<Image<usize>> {
        let cut = self.horizontal_cut(threshold, node_map)?;
        let mut labels = vec![usize::MAX; self.len()];
        let mut next = 0;
        Ok(cut.map(|&node| {
            if labels[node] == usize::MAX {
                labels[node] = next;
                next += 1;
            }
            labels[node]
        }))
    }
}
