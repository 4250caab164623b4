//! Node removal strategies.

use tracing::instrument;

use super::ComponentTree;
use crate::{
    error::{MorphotreeError, Result},
    image::Image,
};

/// How a node predicate decides which nodes survive a filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterStrategy {
    /// Keep exactly the nodes passing the predicate (plus the root).
    #[default]
    Direct,
    /// Keep a node when it and all its ancestors pass.
    Min,
    /// Keep a node when it or any of its descendants passes.
    Max,
    /// Like [`FilterStrategy::Direct`], and re-base the values of kept nodes
    /// on their new ancestors.
    Subtractive,
}

/// Node value types usable with [`FilterStrategy::Subtractive`].
pub trait NodeValue: Copy {
    /// Returns `new_parent + (original - original_parent)`, or `None` for
    /// types without arithmetic.
    fn rebase(original: Self, original_parent: Self, new_parent: Self) -> Option<Self>;
}

macro_rules! impl_int_node_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl NodeValue for $ty {
                fn rebase(original: Self, original_parent: Self, new_parent: Self) -> Option<Self> {
                    let v = i128::from(new_parent) + i128::from(original) - i128::from(original_parent);
                    let clamped = v.clamp(i128::from(<$ty>::MIN), i128::from(<$ty>::MAX));
                    <$ty>::try_from(clamped).ok()
                }
            }
        )+
    };
}

impl_int_node_value!(u8, u16, u32, u64, i8, i16, i32, i64);

impl NodeValue for f32 {
    fn rebase(original: Self, original_parent: Self, new_parent: Self) -> Option<Self> {
        Some(new_parent + (original - original_parent))
    }
}

impl NodeValue for f64 {
    fn rebase(original: Self, original_parent: Self, new_parent: Self) -> Option<Self> {
        Some(new_parent + (original - original_parent))
    }
}

impl NodeValue for bool {
    fn rebase(_: Self, _: Self, _: Self) -> Option<Self> {
        None
    }
}

impl<V: NodeValue> ComponentTree<V> {
    /// Removes the nodes rejected by `predicate` under `strategy`.
    ///
    /// Removed nodes keep their slot in the arrays but no kept node refers to
    /// them anymore; the root always survives. `predicate` is evaluated once
    /// per non-root node.
    ///
    /// # Errors
    /// [`FilterStrategy::Subtractive`] returns
    /// [`MorphotreeError::MissingValues`] without values and
    /// [`MorphotreeError::NonArithmeticValues`] when `V` has no arithmetic.
    /// The tree is left untouched on error.
    ///
    /// # Examples
    /// ```
    /// use morphotree_core::{ComponentTree, FilterStrategy};
    ///
    /// let mut tree = ComponentTree::new(vec![0, 0, 1, 1], Some(vec![0_u8, 1, 2, 3])).expect("valid");
    /// tree.filter(FilterStrategy::Direct, |node| node != 1).expect("direct never fails");
    /// assert_eq!(tree.parent(), &[0, 0, 0, 0]);
    /// ```
    pub fn filter(&mut self, strategy: FilterStrategy, predicate: impl FnMut(usize) -> bool) -> Result<()> {
        self.filter_impl(strategy, None, predicate)
    }

    /// Same as [`Self::filter`], also redirecting every point of `node_map`
    /// whose node was removed to the node's surviving ancestor.
    ///
    /// # Errors
    /// As [`Self::filter`], plus [`MorphotreeError::NodeMapOutOfRange`] when
    /// `node_map` refers to nodes outside the tree.
    pub fn filter_with_node_map(
        &mut self,
        strategy: FilterStrategy,
        node_map: &mut Image<usize>,
        predicate: impl FnMut(usize) -> bool,
    ) -> Result<()> {
        self.check_node_map(node_map)?;
        self.filter_impl(strategy, Some(node_map), predicate)
    }

    #[instrument(name = "core.filter", skip(self, node_map, predicate), fields(nodes = self.len()), err)]
    fn filter_impl(
        &mut self,
        strategy: FilterStrategy,
        node_map: Option<&mut Image<usize>>,
        mut predicate: impl FnMut(usize) -> bool,
    ) -> Result<()> {
        let n = self.len();
        if n == 0 {
            return Ok(());
        }
        let mut keep: Vec<bool> = std::iter::once(true)
            .chain((1..n).map(&mut predicate))
            .collect();

        match strategy {
            FilterStrategy::Direct => {}
            FilterStrategy::Min => {
                for i in 1..n {
                    keep[i] = keep[i] && keep[self.parent[i]];
                }
            }
            FilterStrategy::Max => {
                for i in (1..n).rev() {
                    if keep[i] {
                        keep[self.parent[i]] = true;
                    }
                }
            }
            FilterStrategy::Subtractive => {
                let rebased = self.rebased_values(&keep)?;
                self.values = Some(rebased);
            }
        }

        for i in 1..n {
            let p = self.parent[i];
            if !keep[p] {
                self.parent[i] = self.parent[p];
            }
        }
        if let Some(node_map) = node_map {
            for id in node_map.as_mut_slice() {
                if !keep[*id] {
                    *id = self.parent[*id];
                }
            }
        }
        Ok(())
    }

    fn rebased_values(&self, keep: &[bool]) -> Result<Vec<V>> {
        let values = self.values.as_deref().ok_or(MorphotreeError::MissingValues)?;
        let mut out = Vec::with_capacity(values.len());
        out.push(values[0]);
        for i in 1..values.len() {
            let p = self.parent[i];
            let v = if keep[i] {
                V::rebase(values[i], values[p], out[p]).ok_or(MorphotreeError::NonArithmeticValues)?
            } else {
                out[p]
            };
            out.push(v);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Shape;
    use proptest::prelude::*;
    use rstest::rstest;

    //        0
    //       / \
    //      1   2
    //     / \   \
    //    3   4   5
    fn sample() -> ComponentTree<i32> {
        ComponentTree::new(vec![0, 0, 0, 1, 1, 2], Some(vec![0, 10, 20, 15, 12, 30]))
            .expect("valid tree")
    }

    fn identity_map() -> Image<usize> {
        Image::new(Shape::new(&[6]).expect("shape"), (0..6).collect()).expect("sized")
    }

    #[rstest]
    #[case(FilterStrategy::Direct, &[3], vec![0, 0, 0, 1, 1, 2], vec![0, 1, 2, 1, 4, 5])]
    #[case(FilterStrategy::Min, &[1, 3], vec![0, 0, 0, 0, 0, 2], vec![0, 0, 2, 0, 0, 5])]
    #[case(FilterStrategy::Max, &[1, 3, 4], vec![0, 0, 0, 0, 0, 2], vec![0, 0, 2, 0, 0, 5])]
    #[case(FilterStrategy::Max, &[1, 4], vec![0, 0, 0, 1, 1, 2], vec![0, 1, 2, 3, 1, 5])]
    fn strategies_rewire_parents_and_node_map(
        #[case] strategy: FilterStrategy,
        #[case] rejected: &[usize],
        #[case] parent: Vec<usize>,
        #[case] map: Vec<usize>,
    ) {
        let mut tree = sample();
        let mut node_map = identity_map();
        tree.filter_with_node_map(strategy, &mut node_map, |i| !rejected.contains(&i))
            .expect("filter succeeds");
        assert_eq!(tree.parent(), parent.as_slice());
        assert_eq!(node_map.as_slice(), map.as_slice());
    }

    #[test]
    fn subtractive_rebases_kept_descendants() {
        let mut tree = sample();
        let mut node_map = identity_map();
        tree.filter_with_node_map(FilterStrategy::Subtractive, &mut node_map, |i| i != 1)
            .expect("i32 values");
        // Node 3: 0 + (15 - 10); node 1 inherits its parent's value.
        assert_eq!(tree.values(), Some(&[0, 0, 20, 5, 2, 30][..]));
        assert_eq!(tree.parent(), &[0, 0, 0, 0, 0, 2]);
        assert_eq!(node_map.as_slice(), &[0, 0, 2, 3, 4, 5]);
    }

    #[test]
    fn subtractive_saturates_unsigned_values() {
        let mut tree = ComponentTree::new(vec![0, 0, 1], Some(vec![5_u8, 200, 0])).expect("valid");
        tree.filter(FilterStrategy::Subtractive, |i| i != 1).expect("u8 values");
        assert_eq!(tree.values(), Some(&[5_u8, 5, 0][..]));
    }

    #[test]
    fn subtractive_requires_values() {
        let mut tree = ComponentTree::<i32>::new(vec![0, 0], None).expect("valid");
        assert_eq!(
            tree.filter(FilterStrategy::Subtractive, |_| true),
            Err(MorphotreeError::MissingValues)
        );
    }

    #[test]
    fn subtractive_requires_arithmetic() {
        let mut tree = ComponentTree::new(vec![0, 0], Some(vec![true, false])).expect("valid");
        let err = tree
            .filter(FilterStrategy::Subtractive, |_| true)
            .expect_err("bool has no arithmetic");
        assert_eq!(err, MorphotreeError::NonArithmeticValues);
        assert_eq!(tree.values(), Some(&[true, false][..]));
    }

    fn random_tree() -> impl Strategy<Value = (Vec<usize>, Vec<bool>)> {
        (1_usize..40).prop_flat_map(|n| {
            let parents: Vec<BoxedStrategy<usize>> = (0..n)
                .map(|i| if i == 0 { Just(0).boxed() } else { (0..i).boxed() })
                .collect();
            (parents, prop::collection::vec(any::<bool>(), n))
        })
    }

    fn live_nodes(tree: &ComponentTree<i32>, map: &Image<usize>) -> Vec<bool> {
        let mut live = vec![false; tree.len()];
        live[0] = true;
        for &id in map.as_slice() {
            let mut node = id;
            while !live[node] {
                live[node] = true;
                node = tree.parent()[node];
            }
        }
        live
    }

    fn filtered(parent: &[usize], pass: &[bool], strategy: FilterStrategy) -> (ComponentTree<i32>, Vec<bool>) {
        let n = parent.len();
        let mut tree = ComponentTree::new(parent.to_vec(), Some(vec![0; n])).expect("valid");
        let mut map = Image::new(Shape::new(&[n]).expect("shape"), (0..n).collect()).expect("sized");
        tree.filter_with_node_map(strategy, &mut map, |i| pass[i]).expect("filter");
        let live = live_nodes(&tree, &map);
        (tree, live)
    }

    proptest! {
        #![proptest_config(crate::test_utils::suite_proptest_config(128))]

        #[test]
        fn direct_keeps_exactly_passing_nodes((parent, pass) in random_tree()) {
            let (_, live) = filtered(&parent, &pass, FilterStrategy::Direct);
            for i in 1..parent.len() {
                prop_assert_eq!(live[i], pass[i]);
            }
        }

        #[test]
        fn min_survivors_are_downward_closed((parent, pass) in random_tree()) {
            let (_, live) = filtered(&parent, &pass, FilterStrategy::Min);
            for i in 1..parent.len() {
                let mut chain = true;
                let mut node = i;
                while node != 0 {
                    chain &= pass[node];
                    node = parent[node];
                }
                prop_assert_eq!(live[i], chain);
            }
        }

        #[test]
        fn max_survivors_are_upward_closed((parent, pass) in random_tree()) {
            let (tree, live) = filtered(&parent, &pass, FilterStrategy::Max);
            for i in 1..parent.len() {
                let subtree_passes = (i..parent.len()).any(|j| {
                    let mut node = j;
                    while node > i {
                        node = parent[node];
                    }
                    node == i && pass[j]
                });
                prop_assert_eq!(live[i], subtree_passes);
                if live[i] {
                    prop_assert!(live[tree.parent()[i]]);
                }
            }
        }
    }
}
