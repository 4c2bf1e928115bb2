//! Feature hashing : projection of bags of arbitrary string keys into a bounded vector space.
//!
//! The memory used for one graph is proportional to its bag, whatever the vocabulary of the corpus.

pub mod murmur3;

pub mod fhasher;

pub use murmur3::{murmur3_32, murmur3_str};
pub use fhasher::*;
