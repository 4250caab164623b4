//! Saliency: the level at which adjacent pixels first share a component.

use super::ComponentTree;
use crate::{
    error::{MorphotreeError, Result},
    hierarchy::Edge,
    image::{Connectivity, Image, Neighborhood, Shape},
};

impl<V> ComponentTree<V> {
    fn lowest_common_ancestor(&self, depth: &[usize], mut a: usize, mut b: usize) -> usize {
        while depth[a] > depth[b] {
            a = self.parent[a];
        }
        while depth[b] > depth[a] {
            b = self.parent[b];
        }
        while a != b {
            a = self.parent[a];
            b = self.parent[b];
        }
        a
    }
}

impl<V: Copy> ComponentTree<V> {
    /// Weighs every face-adjacent pair of points with the value of the lowest
    /// common ancestor of their nodes.
    ///
    /// Edges are listed once, from the endpoint first in domain order. On an
    /// alpha-tree the weight is the smallest alpha joining both points.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::MissingValues`] for trees without values and
    /// [`MorphotreeError::NodeMapOutOfRange`] for foreign node ids.
    ///
    /// # Examples
    /// ```
    /// use morphotree_core::{ComponentTree, Edge, Image, Shape};
    ///
    /// let tree = ComponentTree::new(vec![0, 0, 0], Some(vec![4_u8, 0, 0])).expect("valid");
    /// let map = Image::new(Shape::new(&[2]).expect("shape"), vec![1, 2]).expect("sized");
    /// let edges = tree.saliency_map(&map).expect("valid map");
    /// assert_eq!(edges, vec![Edge { p: 0, q: 1, w: 4 }]);
    /// ```
    pub fn saliency_map(&self, node_map: &Image<usize>) -> Result<Vec<Edge<V>>> {
        let values = self.values.as_deref().ok_or(MorphotreeError::MissingValues)?;
        self.check_node_map(node_map)?;
        let depth = self.compute_depth();
        let forward = Neighborhood::face_adjacent(*node_map.shape()).forward();
        let ids = node_map.as_slice();
        let mut edges = Vec::with_capacity(ids.len() * forward.len());
        for (p, &node) in ids.iter().enumerate() {
            for (_, q) in forward.neighbors(p) {
                let lca = self.lowest_common_ancestor(&depth, node, ids[q]);
                edges.push(Edge {
                    p,
                    q,
                    w: values[lca],
                });
            }
        }
        Ok(edges)
    }
}

impl<V: Copy + PartialOrd + Default> ComponentTree<V> {
    /// Renders [`Self::saliency_map`] of a 2-D node map on a
    /// `(2h + 1) x (2w + 1)` Khalimsky grid.
    ///
    /// Pixel `(r, c)` sits at `(2r + 1, 2c + 1)` and keeps `V::default()`.
    /// Edge cells between two pixels carry the edge saliency, and every
    /// vertex cell takes the maximum of its adjacent edge cells. Cells on the
    /// outer frame that border no edge stay at `V::default()`.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::UnsupportedConnectivity`] unless `node_map`
    /// is 2-D, plus the errors of [`Self::saliency_map`].
    pub fn saliency_khalimsky_grid(&self, node_map: &Image<usize>) -> Result<Image<V>> {
        let &[height, width] = node_map.shape().extents() else {
            return Err(MorphotreeError::UnsupportedConnectivity {
                connectivity: Connectivity::Four,
                ndim: node_map.shape().ndim(),
            });
        };
        let edges = self.saliency_map(node_map)?;

        let (rows, cols) = (2 * height + 1, 2 * width + 1);
        let mut grid = Image::filled(Shape::new(&[rows, cols])?, V::default());
        let cells = grid.as_mut_slice();
        for edge in edges {
            let (pr, pc) = (edge.p / width, edge.p % width);
            let (qr, qc) = (edge.q / width, edge.q % width);
            cells[(pr + qr + 1) * cols + pc + qc + 1] = edge.w;
        }

        for r in (0..rows).step_by(2) {
            for c in (0..cols).step_by(2) {
                let around = [
                    r.checked_sub(1).map(|up| (up, c)),
                    Some((r + 1, c)).filter(|&(down, _)| down < rows),
                    c.checked_sub(1).map(|left| (r, left)),
                    Some((r, c + 1)).filter(|&(_, right)| right < cols),
                ];
                let mut top = V::default();
                for (nr, nc) in around.into_iter().flatten() {
                    let level = cells[nr * cols + nc];
                    if level > top {
                        top = level;
                    }
                }
                cells[r * cols + c] = top;
            }
        }
        Ok(grid)
    }
}
