//! Benchmark support crate for morphotree.
//!
//! Provides seeded synthetic images and parameter types used by the Criterion
//! benchmarks for tree of shapes and alpha-tree construction.

pub mod error;
pub mod params;
pub mod source;
