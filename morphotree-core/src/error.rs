//! Error types for the morphotree core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::{image::Connectivity, pset::QueueStrategy};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing or addressing an [`crate::Image`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ImageError {
    /// The shape declared no axes.
    #[error("image shape must declare at least one axis")]
    EmptyDomain,
    /// One axis had zero extent.
    #[error("axis {axis} has zero extent")]
    ZeroExtent {
        /// Index of the empty axis.
        axis: usize,
    },
    /// The shape declared more axes than supported.
    #[error("image has {ndim} dimensions but at most {max} are supported")]
    TooManyDimensions {
        /// Number of axes requested.
        ndim: usize,
        /// Largest supported dimension count.
        max: usize,
    },
    /// The pixel buffer length did not match the shape.
    #[error("pixel buffer has {got} elements but the shape requires {expected}")]
    DataLengthMismatch {
        /// Number of elements implied by the shape.
        expected: usize,
        /// Number of elements supplied.
        got: usize,
    },
    /// Two images that must share a domain did not.
    #[error("image shapes differ: {left:?} vs {right:?}")]
    ShapeMismatch {
        /// Extents of the first image.
        left: Vec<usize>,
        /// Extents of the second image.
        right: Vec<usize>,
    },
}

define_error_codes! {
    /// Stable codes describing [`ImageError`] variants.
    enum ImageErrorCode for ImageError {
        /// The shape declared no axes.
        EmptyDomain => EmptyDomain => "IMAGE_EMPTY_DOMAIN",
        /// One axis had zero extent.
        ZeroExtent => ZeroExtent { .. } => "IMAGE_ZERO_EXTENT",
        /// The shape declared more axes than supported.
        TooManyDimensions => TooManyDimensions { .. } => "IMAGE_TOO_MANY_DIMENSIONS",
        /// The pixel buffer length did not match the shape.
        DataLengthMismatch => DataLengthMismatch { .. } => "IMAGE_DATA_LENGTH_MISMATCH",
        /// Two images that must share a domain did not.
        ShapeMismatch => ShapeMismatch { .. } => "IMAGE_SHAPE_MISMATCH",
    }
}

/// Error type produced when building or manipulating component trees.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MorphotreeError {
    /// An image operation failed.
    #[error("image error: {error}")]
    Image {
        #[source]
        /// Underlying image error.
        error: ImageError,
    },
    /// The connectivity does not apply to images of this dimension.
    #[error("connectivity {connectivity:?} does not apply to {ndim}-D images")]
    UnsupportedConnectivity {
        /// Requested connectivity.
        connectivity: Connectivity,
        /// Dimension of the image.
        ndim: usize,
    },
    /// The seed point lies outside the image domain or has the wrong arity.
    #[error("seed point {seed:?} is outside the image domain")]
    SeedOutOfDomain {
        /// Offending seed coordinates.
        seed: Vec<usize>,
    },
    /// The requested priority queue cannot hold keys of this width.
    #[error("queue strategy {requested:?} cannot index {key_bits}-bit keys")]
    QueueUnavailable {
        /// Strategy requested by the caller.
        requested: QueueStrategy,
        /// Bit width of the key type.
        key_bits: u32,
    },
    /// Subtractive filtering requires a values buffer.
    #[error("subtractive filtering requires node values")]
    MissingValues,
    /// Subtractive filtering requires values supporting addition and subtraction.
    #[error("subtractive filtering requires arithmetic node values")]
    NonArithmeticValues,
    /// A node map referenced a node id the tree does not contain.
    #[error("node map references node {node} but the tree has {node_count} nodes")]
    NodeMapOutOfRange {
        /// Offending node id.
        node: usize,
        /// Number of nodes in the tree.
        node_count: usize,
    },
    /// A parent array did not describe a tree rooted at node 0 with parents
    /// preceding their children.
    #[error("node {node} has parent {parent}; parents must precede their children")]
    InvalidParent {
        /// Offending node id.
        node: usize,
        /// Parent recorded for that node.
        parent: usize,
    },
    /// A per-node array did not have one entry per node.
    #[error("expected {expected} per-node entries, got {got}")]
    LevelCountMismatch {
        /// Number of nodes in the tree.
        expected: usize,
        /// Number of entries supplied.
        got: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`MorphotreeError`] variants.
    enum MorphotreeErrorCode for MorphotreeError {
        /// An image operation failed.
        ImageFailure => Image { .. } => "MORPHOTREE_IMAGE_FAILURE",
        /// The connectivity does not apply to images of this dimension.
        UnsupportedConnectivity => UnsupportedConnectivity { .. } => "MORPHOTREE_UNSUPPORTED_CONNECTIVITY",
        /// The seed point lies outside the image domain.
        SeedOutOfDomain => SeedOutOfDomain { .. } => "MORPHOTREE_SEED_OUT_OF_DOMAIN",
        /// The requested priority queue cannot hold keys of this width.
        QueueUnavailable => QueueUnavailable { .. } => "MORPHOTREE_QUEUE_UNAVAILABLE",
        /// Subtractive filtering requires a values buffer.
        MissingValues => MissingValues => "MORPHOTREE_MISSING_VALUES",
        /// Subtractive filtering requires arithmetic node values.
        NonArithmeticValues => NonArithmeticValues => "MORPHOTREE_NON_ARITHMETIC_VALUES",
        /// A node map referenced a node id the tree does not contain.
        NodeMapOutOfRange => NodeMapOutOfRange { .. } => "MORPHOTREE_NODE_MAP_OUT_OF_RANGE",
        /// A parent array was not ordered root-first.
        InvalidParent => InvalidParent { .. } => "MORPHOTREE_INVALID_PARENT",
        /// A per-node array did not have one entry per node.
        LevelCountMismatch => LevelCountMismatch { .. } => "MORPHOTREE_LEVEL_COUNT_MISMATCH",
    }
}

impl MorphotreeError {
    /// Retrieve the inner [`ImageErrorCode`] when the error originated in an image operation.
    pub const fn image_code(&self) -> Option<ImageErrorCode> {
        match self {
            Self::Image { error } => Some(error.code()),
            _ => None,
        }
    }
}

impl From<ImageError> for MorphotreeError {
    fn from(error: ImageError) -> Self {
        Self::Image { error }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, MorphotreeError>;
