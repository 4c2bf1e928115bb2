//! Vector normalization : value mapping (count or binary) followed by an optional L1 or L2 scaling.
//!
//! Scaling a vector whose entries are all zero (possible after sign cancellation of hashed keys)
//! is an error, a vector with no entry at all is returned unchanged.

use std::str::FromStr;

use crate::errors::{GraphashError, Result};
use crate::hashing::SparseVector;


/// How counts are mapped before scaling
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapType {
    /// values kept as accumulated
    Count,
    /// every non zero value becomes 1.
    Binary,
}

impl MapType {
    pub fn name(&self) -> &'static str {
        match self {
            MapType::Count => "count",
            MapType::Binary => "binary",
        }
    }
}

impl FromStr for MapType {
    type Err = GraphashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(MapType::Count),
            "binary" => Ok(MapType::Binary),
            _ => Err(GraphashError::config(format!("unknown map type {}, expected count or binary", s))),
        }
    }
}


/// Scaling applied after mapping
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VectorNorm {
    None,
    /// divide by the sum of absolute values
    L1,
    /// divide by the euclidean norm
    L2,
}

impl VectorNorm {
    pub fn name(&self) -> &'static str {
        match self {
            VectorNorm::None => "none",
            VectorNorm::L1 => "l1",
            VectorNorm::L2 => "l2",
        }
    }

    /// norm of vector, 0. for an empty vector
    pub fn norm_of(&self, vector: &SparseVector) -> f64 {
        match self {
            VectorNorm::None => 1.,
            VectorNorm::L1 => vector.iter().map(|(_, v)| v.abs()).sum(),
            VectorNorm::L2 => vector.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
        }
    }
}

impl FromStr for VectorNorm {
    type Err = GraphashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(VectorNorm::None),
            "l1" | "manhattan" => Ok(VectorNorm::L1),
            "l2" | "euclidean" => Ok(VectorNorm::L2),
            _ => Err(GraphashError::config(format!("unknown norm {}, expected none, l1, manhattan, l2 or euclidean", s))),
        }
    }
}


/// Combination of a map type and a norm, fixed for a run
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Normalizer {
    map: MapType,
    norm: VectorNorm,
}

impl Normalizer {

    pub fn new(map: MapType, norm: VectorNorm) -> Self {
        Normalizer { map, norm }
    }

    pub fn get_map(&self) -> MapType {
        self.map
    }

    pub fn get_norm(&self) -> VectorNorm {
        self.norm
    }

    /// maps then scales the vector
    pub fn normalize(&self, mut vector: SparseVector) -> Result<SparseVector> {
        if self.map == MapType::Binary {
            // exact zeros stay zero
            for value in vector.values_mut() {
                if *value != 0. {
                    *value = 1.;
                }
            }
        }
        if vector.is_empty() || self.norm == VectorNorm::None {
            return Ok(vector);
        }
        let norm = self.norm.norm_of(&vector);
        if !(norm > 0.) || !norm.is_finite() {
            log::debug!("cannot apply {} norm, norm value : {}", self.norm.name(), norm);
            return Err(GraphashError::DegenerateVector { norm: self.norm.name().to_string(), nb_entries: vector.len() });
        }
        for value in vector.values_mut() {
            *value /= norm;
        }
        Ok(vector)
    } // end of normalize
} // end of impl Normalizer


impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::new(MapType::Count, VectorNorm::None)
    }
}


//===============================================================


// end of mod tests
