//! Scalar level types accepted by the builders.
//!
//! [`Key`] covers unsigned integers usable as priority-queue keys (image
//! values for the tree of shapes). [`Weight`] covers edge dissimilarities for
//! the alpha-tree, including floating point weights that can only be sorted.

use std::cmp::Ordering;
use std::fmt::Debug;

/// Unsigned integer level usable as an ordered-priority-container key.
pub trait Key: Copy + Ord + Debug + Send + Sync + 'static {
    /// Number of significant bits of the type.
    const BITS: u32;

    /// Widens the level to `u64`.
    fn to_u64(self) -> u64;

    /// Narrows a `u64` produced by [`Self::to_u64`] back to the level type.
    fn from_u64(raw: u64) -> Self;
}

macro_rules! impl_key {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Key for $ty {
                const BITS: u32 = <$ty>::BITS;

                fn to_u64(self) -> u64 {
                    u64::from(self)
                }

                fn from_u64(raw: u64) -> Self {
                    <$ty>::try_from(raw).unwrap_or(<$ty>::MAX)
                }
            }
        )+
    };
}

impl_key!(u8, u16, u32, u64);

/// Edge weight for alpha-tree construction.
pub trait Weight: Copy + PartialOrd + Debug + Send + Sync + 'static {
    /// Bit width when the weight is a narrow unsigned integer that can index
    /// bucket queues directly; `None` for wide or floating weights.
    const QUEUE_BITS: Option<u32>;

    /// The weight of an edge between identical values.
    fn zero() -> Self;

    /// Bucket index; only meaningful when [`Self::QUEUE_BITS`] is `Some`.
    fn bucket(self) -> usize;

    /// Inverse of [`Self::bucket`].
    fn from_bucket(bucket: usize) -> Self;

    /// Total order used by the sorted edge container.
    fn total_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_int_weight {
    ($($ty:ty => $bits:expr),+ $(,)?) => {
        $(
            impl Weight for $ty {
                const QUEUE_BITS: Option<u32> = $bits;

                fn zero() -> Self {
                    0
                }

                fn bucket(self) -> usize {
                    usize::try_from(self).unwrap_or(usize::MAX)
                }

                fn from_bucket(bucket: usize) -> Self {
                    <$ty>::try_from(bucket).unwrap_or(<$ty>::MAX)
                }

                fn total_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )+
    };
}

impl_int_weight!(u8 => Some(8), u16 => Some(16), u32 => None, u64 => None);

macro_rules! impl_float_weight {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Weight for $ty {
                const QUEUE_BITS: Option<u32> = None;

                fn zero() -> Self {
                    0.0
                }

                fn bucket(self) -> usize {
                    0
                }

                fn from_bucket(_bucket: usize) -> Self {
                    0.0
                }

                fn total_cmp(&self, other: &Self) -> Ordering {
                    <$ty>::total_cmp(self, other)
                }
            }
        )+
    };
}

impl_float_weight!(f32, f64);
