//! Seeded synthetic images.
//!
//! `Noise` draws every pixel independently, which maximises the number of
//! nodes. `Ramp` adds bounded jitter to a diagonal gradient, which yields long
//! nested chains and large quasi-flat zones.

use morphotree_core::{Image, Shape};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Layout of a synthetic image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImagePattern {
    /// Uniform noise over the level range.
    Noise,
    /// Diagonal gradient with jitter of at most `jitter` levels.
    Ramp {
        /// Largest deviation from the gradient.
        jitter: u16,
    },
}

/// Parameters for [`synthetic_image`].
#[derive(Clone, Copy, Debug)]
pub struct SyntheticImageConfig {
    /// Image height.
    pub rows: usize,
    /// Image width.
    pub cols: usize,
    /// Levels are drawn from `0..levels`.
    pub levels: u16,
    /// Pixel layout.
    pub pattern: ImagePattern,
    /// RNG seed; equal seeds yield equal images.
    pub seed: u64,
}

/// Generates a 2-D `u16` image described by `config`.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when `levels` is zero and
/// [`BenchSetupError::Image`] when either extent is zero.
///
/// # Examples
/// ```
/// use morphotree_benches::source::{ImagePattern, SyntheticImageConfig, synthetic_image};
///
/// let config = SyntheticImageConfig {
///     rows: 4,
///     cols: 8,
///     levels: 16,
///     pattern: ImagePattern::Noise,
///     seed: 7,
/// };
/// let image = synthetic_image(&config).expect("valid config");
/// assert_eq!(image.len(), 32);
/// ```
pub fn synthetic_image(config: &SyntheticImageConfig) -> Result<Image<u16>, BenchSetupError> {
    if config.levels == 0 {
        return Err(BenchSetupError::ZeroValue { context: "levels" });
    }
    let shape = Shape::new(&[config.rows, config.cols])?;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let top = config.levels - 1;
    let image = match config.pattern {
        ImagePattern::Noise => Image::from_fn(shape, |_| rng.gen_range(0..=top)),
        ImagePattern::Ramp { jitter } => Image::from_fn(shape, |p| {
            let coords = p.coords();
            let diagonal = coords.iter().sum::<usize>();
            let base = u16::try_from(diagonal).unwrap_or(u16::MAX).min(top);
            let offset = rng.gen_range(0..=jitter);
            if rng.r#gen::<bool>() {
                base.saturating_add(offset).min(top)
            } else {
                base.saturating_sub(offset)
            }
        }),
    };
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config(pattern: ImagePattern, seed: u64) -> SyntheticImageConfig {
        SyntheticImageConfig {
            rows: 16,
            cols: 24,
            levels: 40,
            pattern,
            seed,
        }
    }

    #[rstest]
    #[case(ImagePattern::Noise)]
    #[case(ImagePattern::Ramp { jitter: 3 })]
    fn equal_seeds_give_equal_images(#[case] pattern: ImagePattern) {
        let a = synthetic_image(&config(pattern, 11)).expect("valid config");
        let b = synthetic_image(&config(pattern, 11)).expect("valid config");
        assert_eq!(a, b);
        assert_eq!(a.shape().extents(), &[16, 24]);
        assert!(a.as_slice().iter().all(|&v| v < 40));
    }

    #[test]
    fn ramp_without_jitter_is_the_clamped_diagonal() {
        let image = synthetic_image(&config(ImagePattern::Ramp { jitter: 0 }, 0)).expect("valid");
        assert_eq!(image.as_slice()[0], 0);
        assert_eq!(image.as_slice()[25], 2);
        assert_eq!(image.as_slice()[16 * 24 - 1], 38);
    }

    #[rstest]
    #[case(0, 4, 4)]
    #[case(4, 0, 4)]
    #[case(4, 4, 0)]
    fn rejects_degenerate_configs(#[case] rows: usize, #[case] cols: usize, #[case] levels: u16) {
        let config = SyntheticImageConfig {
            rows,
            cols,
            levels,
            pattern: ImagePattern::Noise,
            seed: 1,
        };
        assert!(synthetic_image(&config).is_err());
    }
}
