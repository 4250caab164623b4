//! Minimal n-dimensional image buffer consumed by the tree builders.
//!
//! Only the capabilities the builders need are provided: domain iteration,
//! point/index conversion, element access and neighbour enumeration. Border
//! policies are replaced by explicit domain membership tests.

mod neighborhood;
mod shape;

pub use self::neighborhood::{Connectivity, Neighborhood};
pub use self::shape::{MAX_DIM, Point, Shape};

use crate::error::ImageError;

/// A point together with the value stored there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pixel<T> {
    /// Location of the pixel.
    pub point: Point,
    /// Value stored at [`Self::point`].
    pub value: T,
}

/// Owned, row-major n-dimensional buffer.
///
/// # Examples
/// ```
/// use morphotree_core::{Image, Point};
///
/// let ima = Image::from_rows(vec![vec![0_u8, 1, 2], vec![3, 0, 1]]).expect("rectangular rows");
/// assert_eq!(ima.shape().extents(), &[2, 3]);
/// assert_eq!(ima.get(&Point::from([1, 0])), Some(&3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Image<T> {
    #[cfg_attr(feature = "serde", serde(with = "shape_serde"))]
    shape: Shape,
    data: Vec<T>,
}

impl<T> Image<T> {
    /// Wraps `data` as an image of the given shape.
    ///
    /// # Errors
    /// Returns [`ImageError::DataLengthMismatch`] when `data.len()` does not
    /// equal `shape.len()`.
    pub fn new(shape: Shape, data: Vec<T>) -> Result<Self, ImageError> {
        if data.len() != shape.len() {
            return Err(ImageError::DataLengthMismatch {
                expected: shape.len(),
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Builds a 2-D image from rows of equal length.
    ///
    /// # Errors
    /// Returns [`ImageError::EmptyDomain`] or [`ImageError::ZeroExtent`] for
    /// empty input and [`ImageError::DataLengthMismatch`] for a row whose
    /// length differs from the first row.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, ImageError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(ragged) = rows.iter().find(|row| row.len() != width) {
            return Err(ImageError::DataLengthMismatch {
                expected: width,
                got: ragged.len(),
            });
        }
        let shape = Shape::new(&[height, width])?;
        let data: Vec<T> = rows.into_iter().flatten().collect();
        Self::new(shape, data)
    }

    /// Builds an image by evaluating `f` at every point, in domain order.
    pub fn from_fn(shape: Shape, mut f: impl FnMut(Point) -> T) -> Self {
        let data = shape.points().map(&mut f).collect();
        Self { shape, data }
    }

    /// Domain of the image.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of pixels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Images always hold at least one pixel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `p`, or `None` outside the domain.
    #[must_use]
    pub fn get(&self, p: &Point) -> Option<&T> {
        self.shape.index_of(p).and_then(|i| self.data.get(i))
    }

    /// Mutable value at `p`, or `None` outside the domain.
    pub fn get_mut(&mut self, p: &Point) -> Option<&mut T> {
        self.shape.index_of(p).and_then(|i| self.data.get_mut(i))
    }

    /// Value at linear index `i`.
    #[must_use]
    pub fn get_index(&self, i: usize) -> Option<&T> {
        self.data.get(i)
    }

    /// Iterates the image domain in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.shape.points()
    }

    /// Pixel buffer in domain order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable pixel buffer in domain order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the image and returns its buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Applies `f` to every value, keeping the domain.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Image<U> {
        Image {
            shape: self.shape,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Iterates `(point, &value)` pairs in domain order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<&T>> + '_ {
        self.data.iter().enumerate().map(|(i, value)| Pixel {
            point: self.shape.point_of(i),
            value,
        })
    }

    /// Checks that `other` shares this image's domain.
    ///
    /// # Errors
    /// Returns [`ImageError::ShapeMismatch`] when the extents differ.
    pub fn ensure_same_shape<U>(&self, other: &Image<U>) -> Result<(), ImageError> {
        if self.shape == other.shape {
            Ok(())
        } else {
            Err(ImageError::ShapeMismatch {
                left: self.shape.extents().to_vec(),
                right: other.shape.extents().to_vec(),
            })
        }
    }
}

impl<T: Clone> Image<T> {
    /// Builds an image with every pixel set to `value`.
    pub fn filled(shape: Shape, value: T) -> Self {
        Self {
            shape,
            data: vec![value; shape.len()],
        }
    }
}

#[cfg(feature = "serde")]
mod shape_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

    use super::Shape;

    pub(super) fn serialize<S: Serializer>(shape: &Shape, s: S) -> Result<S::Ok, S::Error> {
        shape.extents().serialize(s)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Shape, D::Error> {
        let extents = Vec::<usize>::deserialize(d)?;
        Shape::new(&extents).map_err(D::Error::custom)
    }
}
