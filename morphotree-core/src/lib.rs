//! Morphotree core library.
//!
//! Builds component trees of images: the tree of shapes, through immersion in
//! a refined grid and flood propagation, and the alpha-tree of quasi-flat
//! zones, through edges sorted by dissimilarity. Both feed one union-find
//! hierarchy builder and yield a [`ComponentTree`] plus a node map, which
//! support attribute accumulation, filtering, horizontal cuts and
//! reconstruction.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod alphatree;
mod builder;
mod component_tree;
mod error;
mod hierarchy;
mod image;
mod level;
mod morphotree;
mod pset;
pub mod tos;
mod union_find;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::MorphotreeBuilder,
    component_tree::{
        Accumulator, BoundingBox, ComponentTree, Count, FilterStrategy, Mean, MinMax, NodeValue, Sum,
    },
    error::{ImageError, ImageErrorCode, MorphotreeError, MorphotreeErrorCode, Result},
    hierarchy::Edge,
    image::{Connectivity, Image, MAX_DIM, Neighborhood, Pixel, Point, Shape},
    level::{Key, Weight},
    morphotree::{Morphotree, TreeAndMap},
    pset::{MAX_BUCKET_BITS, PointSet, QueueStrategy},
};
