//! N-dimensional domains and points.
//!
//! Shapes are row-major (the last axis varies fastest) and hold at most
//! [`MAX_DIM`] axes. The dimension count is a runtime property so one code
//! path serves 1-D, 2-D, 3-D and 4-D images.

use std::fmt;
use std::ops::Index;

use crate::error::ImageError;

/// Largest number of axes supported by [`Shape`] and [`Point`].
pub const MAX_DIM: usize = 4;

/// An integer coordinate with up to [`MAX_DIM`] axes.
///
/// # Examples
/// ```
/// use morphotree_core::Point;
///
/// let p = Point::from([2, 3]);
/// assert_eq!(p.coords(), &[2, 3]);
/// assert_eq!(p.ndim(), 2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    coords: [usize; MAX_DIM],
    ndim: u8,
}

impl Point {
    /// Builds a point from a coordinate slice, returning `None` when the
    /// slice is empty or longer than [`MAX_DIM`].
    #[must_use]
    pub fn new(coords: &[usize]) -> Option<Self> {
        if coords.is_empty() || coords.len() > MAX_DIM {
            return None;
        }
        let mut out = [0; MAX_DIM];
        out[..coords.len()].copy_from_slice(coords);
        Some(Self {
            coords: out,
            ndim: coords.len() as u8,
        })
    }

    /// Returns the coordinates as a slice of length [`Self::ndim`].
    #[must_use]
    pub fn coords(&self) -> &[usize] {
        &self.coords[..self.ndim()]
    }

    /// Returns the number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        usize::from(self.ndim)
    }

    /// Number of axes holding an odd coordinate.
    ///
    /// On a refined grid this is the face dimension of the cell: `0` for an
    /// original pixel, `1` for an edge and `ndim` for a vertex.
    #[must_use]
    pub fn odd_axes(&self) -> usize {
        self.coords().iter().filter(|c| *c % 2 == 1).count()
    }

    /// Returns the point with every coordinate multiplied by two, i.e. its
    /// position on the refined grid.
    #[must_use]
    pub fn refined(&self) -> Self {
        let mut out = *self;
        for c in &mut out.coords[..self.ndim()] {
            *c *= 2;
        }
        out
    }
}

impl Index<usize> for Point {
    type Output = usize;

    fn index(&self, axis: usize) -> &usize {
        &self.coords()[axis]
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.coords()).finish()
    }
}

impl<const N: usize> From<[usize; N]> for Point {
    fn from(coords: [usize; N]) -> Self {
        const { assert!(N > 0 && N <= MAX_DIM, "point arity must be in 1..=MAX_DIM") };
        let mut out = [0; MAX_DIM];
        out[..N].copy_from_slice(&coords);
        Self {
            coords: out,
            ndim: N as u8,
        }
    }
}

/// Extents of a row-major n-dimensional domain.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    extents: [usize; MAX_DIM],
    ndim: u8,
    len: usize,
}

impl Shape {
    /// Builds a shape from per-axis extents.
    ///
    /// # Errors
    /// Returns [`ImageError::EmptyDomain`] for zero axes,
    /// [`ImageError::TooManyDimensions`] beyond [`MAX_DIM`] and
    /// [`ImageError::ZeroExtent`] when an axis is empty.
    ///
    /// # Examples
    /// ```
    /// use morphotree_core::Shape;
    ///
    /// let shape = Shape::new(&[2, 3]).expect("valid extents");
    /// assert_eq!(shape.len(), 6);
    /// assert_eq!(shape.refined().extents(), &[3, 5]);
    /// ```
    pub fn new(extents: &[usize]) -> Result<Self, ImageError> {
        if extents.is_empty() {
            return Err(ImageError::EmptyDomain);
        }
        if extents.len() > MAX_DIM {
            return Err(ImageError::TooManyDimensions {
                ndim: extents.len(),
                max: MAX_DIM,
            });
        }
        if let Some(axis) = extents.iter().position(|&e| e == 0) {
            return Err(ImageError::ZeroExtent { axis });
        }
        let mut out = [0; MAX_DIM];
        out[..extents.len()].copy_from_slice(extents);
        Ok(Self {
            extents: out,
            ndim: extents.len() as u8,
            len: extents.iter().product(),
        })
    }

    /// Returns the per-axis extents.
    #[must_use]
    pub fn extents(&self) -> &[usize] {
        &self.extents[..self.ndim()]
    }

    /// Returns the number of axes.
    #[must_use]
    pub fn ndim(&self) -> usize {
        usize::from(self.ndim)
    }

    /// Returns the number of points in the domain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Shapes are never empty; provided for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the shape of the refined grid: `2 * n - 1` per axis.
    #[must_use]
    pub fn refined(&self) -> Self {
        let mut extents = self.extents;
        for e in &mut extents[..self.ndim()] {
            *e = 2 * *e - 1;
        }
        Self {
            extents,
            ndim: self.ndim,
            len: extents[..self.ndim()].iter().product(),
        }
    }

    /// Returns `true` when `p` has the right arity and lies inside the domain.
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        p.ndim() == self.ndim() && p.coords().iter().zip(self.extents()).all(|(c, e)| c < e)
    }

    /// Converts a point to its linear index.
    #[must_use]
    pub fn index_of(&self, p: &Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some(
            p.coords()
                .iter()
                .zip(self.extents())
                .fold(0, |acc, (c, e)| acc * e + c),
        )
    }

    /// Converts a linear index back to a point. `index` must be `< len()`.
    #[must_use]
    pub fn point_of(&self, mut index: usize) -> Point {
        let mut coords = [0; MAX_DIM];
        for axis in (0..self.ndim()).rev() {
            let extent = self.extents[axis];
            coords[axis] = index % extent;
            index /= extent;
        }
        Point {
            coords,
            ndim: self.ndim,
        }
    }

    /// Distance in linear index between neighbours along `axis`.
    #[must_use]
    pub fn stride(&self, axis: usize) -> usize {
        self.extents()[axis + 1..].iter().product()
    }

    /// Iterates the domain in row-major order.
    ///
    /// The iterator is finite and restartable: calling `points` again yields
    /// the same sequence.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.len).map(|i| self.point_of(i))
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.extents()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], ImageError::EmptyDomain)]
    #[case(&[2, 0], ImageError::ZeroExtent { axis: 1 })]
    #[case(&[1, 1, 1, 1, 1], ImageError::TooManyDimensions { ndim: 5, max: MAX_DIM })]
    fn rejects_invalid_extents(#[case] extents: &[usize], #[case] expected: ImageError) {
        assert_eq!(Shape::new(extents), Err(expected));
    }

    #[test]
    fn index_and_point_round_trip_in_row_major_order() {
        let shape = Shape::new(&[2, 3, 4]).expect("valid shape");
        for (i, p) in shape.points().enumerate() {
            assert_eq!(shape.index_of(&p), Some(i));
        }
        assert_eq!(shape.point_of(5), Point::from([0, 1, 1]));
        assert_eq!(shape.stride(0), 12);
        assert_eq!(shape.stride(2), 1);
    }

    #[test]
    fn contains_checks_arity_and_bounds() {
        let shape = Shape::new(&[2, 3]).expect("valid shape");
        assert!(shape.contains(&Point::from([1, 2])));
        assert!(!shape.contains(&Point::from([2, 0])));
        assert!(!shape.contains(&Point::from([1])));
    }

    #[test]
    fn odd_axes_decode_face_dimension() {
        assert_eq!(Point::from([2, 4]).odd_axes(), 0);
        assert_eq!(Point::from([1, 4]).odd_axes(), 1);
        assert_eq!(Point::from([1, 3]).odd_axes(), 2);
    }
}
