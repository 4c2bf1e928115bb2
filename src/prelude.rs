//! To ease access to most frequently used items


pub use crate::errors::{GraphashError, Result};

pub use crate::graph::{GraphBuilder, LabeledGraph};
pub use crate::bags::{Bag, BagMode, ComponentKind};

pub use crate::hashing::{murmur3_32, FeatureHasher, FeatureMap, SparseVector};
pub use crate::renormalize::{MapType, Normalizer, VectorNorm};

pub use crate::params::{HashParams, RunConfig};
pub use crate::pipeline::{GraphRecord, Pipeline, RunReport};

pub use crate::io::{csv::*, libsvm::*, fmap::*};
pub use crate::io::bundle::list_bundle;
