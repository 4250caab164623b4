use std::collections::VecDeque;

use morphotree_core::{Image, Shape};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use test_strategy::Arbitrary;

#[path = "../../src/test_utils.rs"]
mod test_utils;

pub(crate) use test_utils::suite_proptest_config;

/// Family of synthetic images used by the property suites.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub enum ImageKind {
    /// Independent uniform noise over a small palette.
    #[weight(3)]
    Noise,
    /// Axis-aligned rectangles painted over a flat background.
    #[weight(3)]
    Blobs,
    /// A single gray level.
    #[weight(1)]
    Flat,
}

/// Builds a deterministic `rows x cols` image of the given kind.
#[must_use]
pub fn synthetic_image(kind: ImageKind, rows: usize, cols: usize, seed: u64) -> Image<u8> {
    let shape = Shape::new(&[rows, cols]).expect("non-empty extents");
    let mut rng = SmallRng::seed_from_u64(seed);
    match kind {
        ImageKind::Noise => {
            let data = (0..shape.len()).map(|_| rng.gen_range(0..8_u8) * 16).collect();
            Image::new(shape, data).expect("sized buffer")
        }
        ImageKind::Blobs => {
            let mut image = Image::filled(shape, 40_u8);
            for _ in 0..rng.gen_range(1..5) {
                let (r0, c0) = (rng.gen_range(0..rows), rng.gen_range(0..cols));
                let (r1, c1) = (rng.gen_range(r0..rows), rng.gen_range(c0..cols));
                let level = rng.gen_range(0..=255_u8);
                for r in r0..=r1 {
                    for c in c0..=c1 {
                        image.as_mut_slice()[r * cols + c] = level;
                    }
                }
            }
            image
        }
        ImageKind::Flat => Image::filled(shape, rng.r#gen()),
    }
}

/// Labels the 4-connected components of pixels joined by steps of at most
/// `alpha`, numbered in domain order of their first pixel.
#[must_use]
pub fn quasi_flat_zones(image: &Image<u8>, alpha: u8) -> Vec<usize> {
    let extents = image.shape().extents();
    let (rows, cols) = (extents[0], extents[1]);
    let values = image.as_slice();
    let mut labels = vec![usize::MAX; values.len()];
    let mut next = 0;
    for start in 0..values.len() {
        if labels[start] != usize::MAX {
            continue;
        }
        labels[start] = next;
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            let (r, c) = (p / cols, p % cols);
            let mut around = Vec::with_capacity(4);
            if r > 0 {
                around.push(p - cols);
            }
            if r + 1 < rows {
                around.push(p + cols);
            }
            if c > 0 {
                around.push(p - 1);
            }
            if c + 1 < cols {
                around.push(p + 1);
            }
            for q in around {
                if labels[q] == usize::MAX && values[p].abs_diff(values[q]) <= alpha {
                    labels[q] = next;
                    queue.push_back(q);
                }
            }
        }
        next += 1;
    }
    labels
}
