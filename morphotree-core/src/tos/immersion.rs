//! Immersion of an image into its refined (Khalimsky) grid.

use tracing::instrument;

use crate::image::{Image, MAX_DIM};

/// Lower and upper bound images over the refined grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Immersion<V> {
    /// Minimum of the adjacent original pixels at every refined cell.
    pub inf: Image<V>,
    /// Maximum of the adjacent original pixels at every refined cell.
    pub sup: Image<V>,
}

/// Builds the `(inf, sup)` pair of `image` on a grid of `2 * n - 1` cells per
/// axis.
///
/// Cells with only even coordinates carry the pixel value. A cell with `k`
/// odd coordinates aggregates the `2^k` original pixels around it.
///
/// # Examples
/// ```
/// use morphotree_core::{Image, tos::immerse};
///
/// let ima = Image::from_rows(vec![vec![0_u8, 1, 2], vec![3, 0, 1]]).expect("rows");
/// let imm = immerse(&ima);
/// assert_eq!(imm.inf.as_slice(), &[0, 0, 1, 1, 2, 0, 0, 0, 0, 1, 3, 0, 0, 0, 1]);
/// assert_eq!(imm.sup.as_slice(), &[0, 1, 1, 2, 2, 3, 3, 1, 2, 2, 3, 3, 0, 1, 1]);
/// ```
#[instrument(name = "core.immersion", skip_all, fields(cells = image.shape().refined().len()))]
pub fn immerse<V: Copy + Ord>(image: &Image<V>) -> Immersion<V> {
    let shape = *image.shape();
    let data = image.as_slice();
    let strides: Vec<usize> = (0..shape.ndim()).map(|axis| shape.stride(axis)).collect();

    let bounds = Image::from_fn(shape.refined(), |cell| {
        let mut base = 0;
        let mut odd = [0_usize; MAX_DIM];
        let mut k = 0;
        for (axis, &c) in cell.coords().iter().enumerate() {
            base += (c / 2) * strides[axis];
            if c % 2 == 1 {
                odd[k] = strides[axis];
                k += 1;
            }
        }
        let first = data[base];
        (1..(1_usize << k)).fold((first, first), |(lo, hi), mask| {
            let offset: usize = odd[..k]
                .iter()
                .enumerate()
                .filter(|(bit, _)| (mask >> bit) & 1 == 1)
                .map(|(_, stride)| stride)
                .sum();
            let v = data[base + offset];
            (lo.min(v), hi.max(v))
        })
    });

    Immersion {
        inf: bounds.map(|&(lo, _)| lo),
        sup: bounds.map(|&(_, hi)| hi),
    }
}
