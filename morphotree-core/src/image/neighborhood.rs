//! Neighbour enumeration over row-major domains.

use super::shape::{MAX_DIM, Point, Shape};
use crate::error::{MorphotreeError, Result};

/// Adjacency relation between points of a domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// 1-D: the two neighbours along the single axis.
    Two,
    /// 2-D: the four face-adjacent neighbours.
    Four,
    /// 2-D: face- and corner-adjacent neighbours.
    Eight,
    /// 3-D: the six face-adjacent neighbours.
    Six,
    /// 3-D: every neighbour of the 3x3x3 cube.
    TwentySix,
}

impl Connectivity {
    /// Dimension of the domains this connectivity applies to.
    #[must_use]
    pub const fn ndim(self) -> usize {
        match self {
            Self::Two => 1,
            Self::Four | Self::Eight => 2,
            Self::Six | Self::TwentySix => 3,
        }
    }

    /// Face-adjacent connectivity for `ndim`, if one is named.
    #[must_use]
    pub const fn face_adjacent(ndim: usize) -> Option<Self> {
        match ndim {
            1 => Some(Self::Two),
            2 => Some(Self::Four),
            3 => Some(Self::Six),
            _ => None,
        }
    }

    const fn is_face_adjacent(self) -> bool {
        matches!(self, Self::Two | Self::Four | Self::Six)
    }
}

/// Precomputed neighbour offsets for one shape.
///
/// Offsets are enumerated in lexicographic order over `{-1, 0, 1}^ndim`,
/// which fixes the neighbour visiting order everywhere in the crate.
#[derive(Clone, Debug)]
pub struct Neighborhood {
    shape: Shape,
    offsets: Vec<[isize; MAX_DIM]>,
}

impl Neighborhood {
    /// Builds the neighbourhood of `connectivity` over `shape`.
    ///
    /// # Errors
    /// Returns [`MorphotreeError::UnsupportedConnectivity`] when the
    /// connectivity's dimension differs from the shape's.
    pub fn new(connectivity: Connectivity, shape: Shape) -> Result<Self> {
        if connectivity.ndim() != shape.ndim() {
            return Err(MorphotreeError::UnsupportedConnectivity {
                connectivity,
                ndim: shape.ndim(),
            });
        }
        Ok(Self::build(shape, connectivity.is_face_adjacent()))
    }

    /// Face-adjacent (`2 * ndim`) neighbourhood, available in every dimension.
    #[must_use]
    pub fn face_adjacent(shape: Shape) -> Self {
        Self::build(shape, true)
    }

    /// Keeps only the offsets that come after the origin in raster order.
    ///
    /// Every undirected edge `{p, q}` is then enumerated exactly once, from the
    /// endpoint that comes first in the domain order.
    #[must_use]
    pub fn forward(&self) -> Self {
        let half = self.offsets.len() / 2;
        Self {
            shape: self.shape,
            offsets: self.offsets[half..].to_vec(),
        }
    }

    fn build(shape: Shape, face_only: bool) -> Self {
        let ndim = shape.ndim();
        let total = 3_usize.pow(ndim as u32);
        let mut offsets = Vec::new();
        for code in 0..total {
            let mut offset = [0_isize; MAX_DIM];
            let mut rest = code;
            for axis in (0..ndim).rev() {
                offset[axis] = (rest % 3) as isize - 1;
                rest /= 3;
            }
            let nonzero = offset.iter().filter(|d| **d != 0).count();
            if nonzero == 0 || (face_only && nonzero != 1) {
                continue;
            }
            offsets.push(offset);
        }
        Self { shape, offsets }
    }

    /// Number of offsets (directions).
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns `true` for the degenerate case without offsets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Shape the neighbourhood was built for.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Neighbour of `p` in direction `dir`, if it lies inside the domain.
    #[must_use]
    pub fn neighbor(&self, p: &Point, dir: usize) -> Option<usize> {
        let offset = self.offsets.get(dir)?;
        let mut index = 0_usize;
        for (axis, (&c, &e)) in p.coords().iter().zip(self.shape.extents()).enumerate() {
            let q = c.checked_add_signed(offset[axis]).filter(|q| *q < e)?;
            index = index * e + q;
        }
        Some(index)
    }

    /// Yields `(direction, neighbour index)` for every in-domain neighbour of
    /// the point at linear `index`.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let p = self.shape.point_of(index);
        (0..self.offsets.len()).filter_map(move |dir| self.neighbor(&p, dir).map(|q| (dir, q)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Connectivity::Two, &[5], 2)]
    #[case(Connectivity::Four, &[3, 3], 4)]
    #[case(Connectivity::Eight, &[3, 3], 8)]
    #[case(Connectivity::Six, &[3, 3, 3], 6)]
    #[case(Connectivity::TwentySix, &[3, 3, 3], 26)]
    fn interior_points_have_full_neighbourhoods(
        #[case] connectivity: Connectivity,
        #[case] extents: &[usize],
        #[case] expected: usize,
    ) {
        let shape = Shape::new(extents).expect("valid shape");
        let nbh = Neighborhood::new(connectivity, shape).expect("matching dimension");
        let centre = shape.len() / 2;
        assert_eq!(nbh.neighbors(centre).count(), expected);
        assert_eq!(nbh.forward().len(), expected / 2);
    }

    #[test]
    fn rejects_mismatched_dimension() {
        let shape = Shape::new(&[3, 3]).expect("valid shape");
        let err = Neighborhood::new(Connectivity::Six, shape).expect_err("3-D connectivity on 2-D");
        assert!(matches!(
            err,
            MorphotreeError::UnsupportedConnectivity { ndim: 2, .. }
        ));
    }

    #[test]
    fn border_points_skip_out_of_domain_neighbours() {
        let shape = Shape::new(&[2, 3]).expect("valid shape");
        let nbh = Neighborhood::new(Connectivity::Four, shape).expect("2-D");
        let found: Vec<usize> = nbh.neighbors(0).map(|(_, q)| q).collect();
        assert_eq!(found, vec![1, 3]);
    }

    #[test]
    fn forward_offsets_point_after_the_origin() {
        let shape = Shape::new(&[3, 3]).expect("valid shape");
        let fwd = Neighborhood::new(Connectivity::Four, shape)
            .expect("2-D")
            .forward();
        let found: Vec<usize> = fwd.neighbors(4).map(|(_, q)| q).collect();
        assert_eq!(found, vec![5, 7]);
    }
}
