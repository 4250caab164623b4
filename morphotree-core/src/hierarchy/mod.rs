//! Hierarchy construction shared by the tree of shapes and the alpha-tree.

mod builder;
mod canonicalize;
mod edges;
mod zones;

pub(crate) use self::{
    builder::{BuildOptions, build_hierarchy},
    canonicalize::canonicalize,
    edges::EdgeQueue,
    zones::{ZoneBuilder, Zones},
};
pub use self::edges::Edge;
