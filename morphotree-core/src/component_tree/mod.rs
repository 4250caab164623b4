//! Component trees: parent/value arrays with filtering, attributes and cuts.
//!
//! Node ids are dense and ordered root-first: node 0 is the root and is its
//! own parent, every other node has a smaller parent id. All passes below
//! rely on that order to visit parents before children (increasing ids) or
//! children before parents (decreasing ids) without recursion.

mod attribute;
mod cut;
mod filter;
mod saliency;

pub use self::{
    attribute::{Accumulator, BoundingBox, Count, Mean, MinMax, Sum},
    filter::{FilterStrategy, NodeValue},
};

use crate::{
    error::{MorphotreeError, Result},
    hierarchy,
    image::Image,
};

/// A rooted tree stored as a parent array with optional per-node values.
///
/// # Examples
/// ```
/// use morphotree_core::ComponentTree;
///
/// let tree = ComponentTree::new(vec![0, 0, 1], Some(vec![10_u8, 5, 0])).expect("root-first");
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.compute_depth(), vec![0, 1, 2]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TreeParts<V>"))]
pub struct ComponentTree<V> {
    parent: Vec<usize>,
    values: Option<Vec<V>>,
}

impl<V> ComponentTree<V> {
    /// Wraps a parent array and optional values.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::InvalidParent`] unless `parent[0] == 0` and
    /// `parent[i] < i` for every other node, and
    /// [`MorphotreeError::LevelCountMismatch`] when `values` does not hold one
    /// entry per node.
    pub fn new(parent: Vec<usize>, values: Option<Vec<V>>) -> Result<Self> {
        for (node, &p) in parent.iter().enumerate() {
            let ordered = if node == 0 { p == 0 } else { p < node };
            if !ordered {
                return Err(MorphotreeError::InvalidParent { node, parent: p });
            }
        }
        if let Some(values) = &values {
            if values.len() != parent.len() {
                return Err(MorphotreeError::LevelCountMismatch {
                    expected: parent.len(),
                    got: values.len(),
                });
            }
        }
        Ok(Self { parent, values })
    }

    pub(crate) fn from_parts(parent: Vec<usize>, values: Vec<V>) -> Self {
        Self {
            parent,
            values: Some(values),
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` for a tree without nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Parent of every node; the root maps to itself.
    #[must_use]
    pub fn parent(&self) -> &[usize] {
        &self.parent
    }

    /// Per-node values, when the tree carries them.
    #[must_use]
    pub fn values(&self) -> Option<&[V]> {
        self.values.as_deref()
    }

    /// Consumes the tree and returns its arrays.
    #[must_use]
    pub fn into_parts(self) -> (Vec<usize>, Option<Vec<V>>) {
        (self.parent, self.values)
    }

    /// Distance of every node to the root.
    #[must_use]
    pub fn compute_depth(&self) -> Vec<usize> {
        let mut depth = vec![0; self.len()];
        for i in 1..self.len() {
            depth[i] = depth[self.parent[i]] + 1;
        }
        depth
    }

    /// Checks that every entry of `node_map` is a node of this tree.
    pub(crate) fn check_node_map(&self, node_map: &Image<usize>) -> Result<()> {
        match node_map.as_slice().iter().find(|&&id| id >= self.len()) {
            Some(&node) => Err(MorphotreeError::NodeMapOutOfRange {
                node,
                node_count: self.len(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn check_per_node<T>(&self, per_node: &[T]) -> Result<()> {
        if per_node.len() == self.len() {
            Ok(())
        } else {
            Err(MorphotreeError::LevelCountMismatch {
                expected: self.len(),
                got: per_node.len(),
            })
        }
    }
}

impl<V: PartialEq + Clone> ComponentTree<V> {
    /// Removes every non-root node whose value equals its parent's and
    /// redirects `node_map` to the surviving representatives.
    ///
    /// Canonicalizing an already canonical tree changes nothing.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::MissingValues`] for trees without values and
    /// [`MorphotreeError::NodeMapOutOfRange`] for foreign node ids.
    #[tracing::instrument(name = "core.canonicalize", skip_all, fields(nodes = self.len()), err)]
    pub fn canonicalize(&mut self, node_map: &mut Image<usize>) -> Result<()> {
        let values = self.values.as_ref().ok_or(MorphotreeError::MissingValues)?;
        self.check_node_map(node_map)?;
        let (parent, values) =
            hierarchy::canonicalize(&self.parent, values, node_map.as_mut_slice());
        self.parent = parent;
        self.values = Some(values);
        Ok(())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TreeParts<V> {
    parent: Vec<usize>,
    values: Option<Vec<V>>,
}

#[cfg(feature = "serde")]
impl<V> TryFrom<TreeParts<V>> for ComponentTree<V> {
    type Error = MorphotreeError;

    fn try_from(parts: TreeParts<V>) -> Result<Self> {
        Self::new(parts.parent, parts.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Shape;
    use rstest::rstest;

    #[rstest]
    #[case(vec![1, 0], 0, 1)]
    #[case(vec![0, 0, 2], 2, 2)]
    #[case(vec![0, 3, 0, 0], 1, 3)]
    fn rejects_parents_after_children(
        #[case] parent: Vec<usize>,
        #[case] node: usize,
        #[case] bad: usize,
    ) {
        let err = ComponentTree::<u8>::new(parent, None).expect_err("misordered parent");
        assert_eq!(err, MorphotreeError::InvalidParent { node, parent: bad });
        assert_eq!(err.code().as_str(), "MORPHOTREE_INVALID_PARENT");
    }

    #[test]
    fn rejects_value_count_mismatch() {
        let err = ComponentTree::new(vec![0, 0], Some(vec![1_u8])).expect_err("short values");
        assert_eq!(
            err,
            MorphotreeError::LevelCountMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn canonicalize_requires_values() {
        let mut tree = ComponentTree::<u8>::new(vec![0, 0], None).expect("valid");
        let mut map = Image::filled(Shape::new(&[2]).expect("shape"), 1_usize);
        assert_eq!(
            tree.canonicalize(&mut map),
            Err(MorphotreeError::MissingValues)
        );
    }

    #[test]
    fn canonicalize_collapses_equal_levels() {
        let mut tree =
            ComponentTree::new(vec![0, 0, 1, 2], Some(vec![1_u8, 3, 3, 7])).expect("valid");
        let mut map =
            Image::new(Shape::new(&[4]).expect("shape"), vec![0, 1, 2, 3]).expect("sized");
        tree.canonicalize(&mut map).expect("values present");
        assert_eq!(tree.parent(), &[0, 0, 1]);
        assert_eq!(tree.values(), Some(&[1_u8, 3, 7][..]));
        assert_eq!(map.as_slice(), &[0, 1, 1, 2]);
    }

    #[test]
    fn node_map_entries_must_exist() {
        let mut tree = ComponentTree::new(vec![0], Some(vec![0_u8])).expect("valid");
        let mut map = Image::filled(Shape::new(&[1]).expect("shape"), 4_usize);
        assert_eq!(
            tree.canonicalize(&mut map),
            Err(MorphotreeError::NodeMapOutOfRange {
                node: 4,
                node_count: 1
            })
        );
    }
}
