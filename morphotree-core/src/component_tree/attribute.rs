//! Attribute accumulation over the nodes of a component tree.

use super::ComponentTree;
use crate::{
    error::Result,
    image::{Image, MAX_DIM, Pixel, Point},
};

/// Incremental computation of a node attribute.
///
/// One clone of a base accumulator is created per node, fed the items mapped
/// to that node, and optionally merged into its parent's.
pub trait Accumulator<T>: Clone {
    /// Extracted attribute value.
    type Output;

    /// Feeds one item.
    fn take(&mut self, item: &T);

    /// Folds another accumulator of the same kind into this one.
    fn merge(&mut self, other: &Self);

    /// Extracts the attribute.
    fn result(&self) -> Self::Output;
}

/// Number of items (the area, for points).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Count(usize);

impl<T> Accumulator<T> for Count {
    type Output = usize;

    fn take(&mut self, _item: &T) {
        self.0 += 1;
    }

    fn merge(&mut self, other: &Self) {
        self.0 += other.0;
    }

    fn result(&self) -> usize {
        self.0
    }
}

/// Sum of scalar values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sum(f64);

impl<T: Copy + Into<f64>> Accumulator<T> for Sum {
    type Output = f64;

    fn take(&mut self, item: &T) {
        self.0 += (*item).into();
    }

    fn merge(&mut self, other: &Self) {
        self.0 += other.0;
    }

    fn result(&self) -> f64 {
        self.0
    }
}

/// Mean of scalar values; `None` for nodes without items.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: usize,
}

impl<T: Copy + Into<f64>> Accumulator<T> for Mean {
    type Output = Option<f64>;

    fn take(&mut self, item: &T) {
        self.sum += (*item).into();
        self.count += 1;
    }

    fn merge(&mut self, other: &Self) {
        self.sum += other.sum;
        self.count += other.count;
    }

    fn result(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Smallest and largest value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMax<T>(Option<(T, T)>);

impl<T> Default for MinMax<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T: Copy + PartialOrd> MinMax<T> {
    fn extend(&mut self, lo: T, hi: T) {
        self.0 = Some(match self.0 {
            None => (lo, hi),
            Some((a, b)) => (
                if lo < a { lo } else { a },
                if hi > b { hi } else { b },
            ),
        });
    }
}

impl<T: Copy + PartialOrd> Accumulator<T> for MinMax<T> {
    type Output = Option<(T, T)>;

    fn take(&mut self, item: &T) {
        self.extend(*item, *item);
    }

    fn merge(&mut self, other: &Self) {
        if let Some((lo, hi)) = other.0 {
            self.extend(lo, hi);
        }
    }

    fn result(&self) -> Option<(T, T)> {
        self.0
    }
}

/// Per-axis bounding box of points, as `(min corner, max corner)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundingBox(Option<([usize; MAX_DIM], [usize; MAX_DIM], usize)>);

impl BoundingBox {
    fn extend(&mut self, lo: &[usize], hi: &[usize]) {
        let ndim = lo.len();
        let (min, max, _) = self.0.get_or_insert_with(|| {
            let mut min = [0; MAX_DIM];
            let mut max = [0; MAX_DIM];
            min[..ndim].copy_from_slice(lo);
            max[..ndim].copy_from_slice(hi);
            (min, max, ndim)
        });
        for axis in 0..ndim {
            min[axis] = min[axis].min(lo[axis]);
            max[axis] = max[axis].max(hi[axis]);
        }
    }
}

impl Accumulator<Point> for BoundingBox {
    type Output = Option<(Point, Point)>;

    fn take(&mut self, item: &Point) {
        self.extend(item.coords(), item.coords());
    }

    fn merge(&mut self, other: &Self) {
        if let Some((lo, hi, ndim)) = other.0 {
            self.extend(&lo[..ndim], &hi[..ndim]);
        }
    }

    fn result(&self) -> Option<(Point, Point)> {
        let (lo, hi, ndim) = self.0?;
        Some((Point::new(&lo[..ndim])?, Point::new(&hi[..ndim])?))
    }
}

impl<T> Accumulator<Pixel<T>> for BoundingBox {
    type Output = Option<(Point, Point)>;

    fn take(&mut self, item: &Pixel<T>) {
        <Self as Accumulator<Point>>::take(self, &item.point);
    }

    fn merge(&mut self, other: &Self) {
        <Self as Accumulator<Point>>::merge(self, other);
    }

    fn result(&self) -> Option<(Point, Point)> {
        <Self as Accumulator<Point>>::result(self)
    }
}

impl<V> ComponentTree<V> {
    fn accumulate<T, A: Accumulator<T>>(
        &self,
        items: impl Iterator<Item = (usize, T)>,
        base: A,
        propagate: bool,
    ) -> Vec<A::Output> {
        let mut accs = vec![base; self.len()];
        for (node, item) in items {
            accs[node].take(&item);
        }
        if propagate {
            for i in (1..self.len()).rev() {
                let (head, tail) = accs.split_at_mut(i);
                head[self.parent[i]].merge(&tail[0]);
            }
        }
        accs.iter().map(|acc| acc.result()).collect()
    }

    /// Accumulates the points mapped to every node.
    ///
    /// With `propagate`, each node also folds in its descendants' items.
    ///
    /// # Errors
    /// Returns [`crate::MorphotreeError::NodeMapOutOfRange`] when `node_map`
    /// refers to nodes outside the tree.
    ///
    /// # Examples
    /// ```
    /// use morphotree_core::{ComponentTree, Count, Image, Shape};
    ///
    /// let tree = ComponentTree::<u8>::new(vec![0, 0], None).expect("valid");
    /// let map = Image::new(Shape::new(&[3]).expect("shape"), vec![0, 1, 1]).expect("sized");
    /// let area = tree.compute_attribute_on_points(&map, Count::default(), true).expect("in range");
    /// assert_eq!(area, vec![3, 2]);
    /// ```
    pub fn compute_attribute_on_points<A: Accumulator<Point>>(
        &self,
        node_map: &Image<usize>,
        accumulator: A,
        propagate: bool,
    ) -> Result<Vec<A::Output>> {
        self.check_node_map(node_map)?;
        let items = node_map.pixels().map(|px| (*px.value, px.point));
        Ok(self.accumulate(items, accumulator, propagate))
    }

    /// Accumulates the values of `source` mapped to every node.
    ///
    /// # Errors
    /// Returns [`crate::MorphotreeError::Image`] when `source` and `node_map`
    /// have different shapes, and
    /// [`crate::MorphotreeError::NodeMapOutOfRange`] for foreign node ids.
    pub fn compute_attribute_on_values<T: Clone, A: Accumulator<T>>(
        &self,
        node_map: &Image<usize>,
        source: &Image<T>,
        accumulator: A,
        propagate: bool,
    ) -> Result<Vec<A::Output>> {
        node_map.ensure_same_shape(source)?;
        self.check_node_map(node_map)?;
        let items = node_map
            .as_slice()
            .iter()
            .copied()
            .zip(source.as_slice().iter().cloned());
        Ok(self.accumulate(items, accumulator, propagate))
    }

    /// Accumulates `(point, value)` pixels of `source` mapped to every node.
    ///
    /// # Errors
    /// As [`Self::compute_attribute_on_values`].
    pub fn compute_attribute_on_pixels<T: Clone, A: Accumulator<Pixel<T>>>(
        &self,
        node_map: &Image<usize>,
        source: &Image<T>,
        accumulator: A,
        propagate: bool,
    ) -> Result<Vec<A::Output>> {
        node_map.ensure_same_shape(source)?;
        self.check_node_map(node_map)?;
        let items = node_map.as_slice().iter().copied().zip(source.pixels().map(|px| Pixel {
            point: px.point,
            value: px.value.clone(),
        }));
        Ok(self.accumulate(items, accumulator, propagate))
    }
}
