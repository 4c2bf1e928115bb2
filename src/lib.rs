//! lib target
//!
//! Feature hashing of labeled directed graphs : a graph is summarized by a bag of structural pattern keys
//! (nodes, edges, neighborhoods, shortest paths, components, cycles...), the bag is projected by a 32 bits
//! murmur3 hash into a sparse vector of dimension 2^bits, then optionally binarized and normalized.
//! Vectors are written as libsvm records for machine learning tools.

pub mod errors;

pub mod graph;

pub mod bags;

pub mod hashing;

pub mod renormalize;

pub mod params;

pub mod pipeline;

pub mod io;

pub mod prelude;

pub use errors::{GraphashError, Result};
