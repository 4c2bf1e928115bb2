//! Projection of a bag into a vector space of dimension 2^bits.
//!
//! Each key is hashed with [murmur3_str], the dimension is the hash masked to its low bits and the
//! sign is given by bit 31 : `sign = 2 * (hash >> 31) - 1`. The count of the key times its sign is added
//! to the dimension, collisions between distinct keys just accumulate.
//!
//! Optionally a [FeatureMap] records, for each dimension, the keys that hashed into it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sprs::CsVecI;

use crate::bags::Bag;
use crate::errors::{GraphashError, Result};

use super::murmur3::murmur3_str;

/// maximum number of bits of a dimension
pub const MAX_BITS: u32 = 32;


/// A sparse vector indexed by dimensions, iterated in ascending dimension order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    entries: BTreeMap<u32, f64>,
}

impl SparseVector {

    pub fn new() -> Self {
        SparseVector { entries: BTreeMap::new() }
    }

    /// adds value to dimension dim, the entry is created if necessary
    pub fn add(&mut self, dim: u32, value: f64) {
        *self.entries.entry(dim).or_insert(0.) += value;
    }

    pub fn set(&mut self, dim: u32, value: f64) {
        self.entries.insert(dim, value);
    }

    pub fn get(&self, dim: u32) -> Option<f64> {
        self.entries.get(&dim).copied()
    }

    /// number of entries, including entries that cancelled to 0
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// largest dimension present
    pub fn max_dim(&self) -> Option<u32> {
        self.entries.keys().next_back().copied()
    }

    /// (dim, value) in ascending dim
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.entries.iter().map(|(d, v)| (*d, *v))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut f64> + '_ {
        self.entries.values_mut()
    }

    /// returns a vector with every dimension shifted by offset
    pub fn shifted(&self, offset: u64) -> Result<SparseVector> {
        let mut shifted = SparseVector::new();
        for (dim, value) in self.iter() {
            let new_dim = u32::try_from(dim as u64 + offset)
                .map_err(|_| GraphashError::config(format!("dimension {} + offset {} exceeds 32 bits", dim, offset)))?;
            shifted.set(new_dim, value);
        }
        Ok(shifted)
    }

    /// appends the entries of other, which must not share dimensions with self
    pub fn extend(&mut self, other: &SparseVector) {
        for (dim, value) in other.iter() {
            self.add(dim, value);
        }
    }

    /// conversion to a sprs sparse vector of dimension 2^bits
    pub fn to_csvec(&self, bits: u32) -> Result<CsVecI<f64, u32>> {
        let dim = usize::try_from(1u64 << bits.min(MAX_BITS))
            .map_err(|_| GraphashError::config(format!("2^{} does not fit in usize", bits)))?;
        if let Some(max_dim) = self.max_dim() {
            if max_dim as u64 >= dim as u64 {
                return Err(GraphashError::config(format!("dimension {} out of 2^{} bits space", max_dim, bits)));
            }
        }
        let (indices, data) : (Vec<u32>, Vec<f64>) = self.entries.iter().map(|(d, v)| (*d, *v)).unzip();
        // BTreeMap keys are sorted and distinct
        Ok(CsVecI::new(dim, indices, data))
    } // end of to_csvec
} // end of impl SparseVector


impl FromIterator<(u32, f64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        let mut vector = SparseVector::new();
        for (dim, value) in iter {
            vector.add(dim, value);
        }
        vector
    }
}


//==================================================================================


/// For each dimension the set of distinct keys that hashed into it.
/// Merging is a union per dimension, so it is commutative and associative.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMap {
    keys: BTreeMap<u32, BTreeSet<String>>,
}

impl FeatureMap {

    pub fn new() -> Self {
        FeatureMap { keys: BTreeMap::new() }
    }

    pub fn insert(&mut self, dim: u32, key: &str) {
        let set = self.keys.entry(dim).or_insert_with(BTreeSet::new);
        if !set.contains(key) {
            set.insert(key.to_string());
        }
    }

    /// keys of a dimension
    pub fn get(&self, dim: u32) -> Option<&BTreeSet<String>> {
        self.keys.get(&dim)
    }

    /// number of dimensions with at least one key
    pub fn nb_dims(&self) -> usize {
        self.keys.len()
    }

    /// total number of (dim, key) pairs
    pub fn nb_keys(&self) -> usize {
        self.keys.values().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &BTreeSet<String>)> + '_ {
        self.keys.iter().map(|(d, s)| (*d, s))
    }

    /// union of other into self
    pub fn merge_from(&mut self, other: FeatureMap) {
        for (dim, set) in other.keys {
            match self.keys.get_mut(&dim) {
                Some(mine) => mine.extend(set),
                None => {
                    self.keys.insert(dim, set);
                }
            }
        }
    } // end of merge_from

    /// union of two maps, the larger one is kept as accumulator
    pub fn merge(self, other: FeatureMap) -> FeatureMap {
        let (mut acc, other) = if self.nb_dims() >= other.nb_dims() { (self, other) } else { (other, self) };
        acc.merge_from(other);
        acc
    }
} // end of impl FeatureMap


//==================================================================================


/// Hashes bags into vectors of dimension 2^bits
#[derive(Debug, Copy, Clone)]
pub struct FeatureHasher {
    bits: u32,
    mask: u32,
}

impl FeatureHasher {

    /// bits must be in 1..=32
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > MAX_BITS {
            return Err(GraphashError::config(format!("bits must be in 1..={}, got {}", MAX_BITS, bits)));
        }
        let mask = if bits == MAX_BITS { u32::MAX } else { (1u32 << bits) - 1 };
        Ok(FeatureHasher { bits, mask })
    }

    pub fn get_bits(&self) -> u32 {
        self.bits
    }

    /// dimension of a key
    #[inline]
    pub fn dimension(&self, hash: u32) -> u32 {
        hash & self.mask
    }

    /// +1 if bit 31 is set, -1 otherwise
    #[inline]
    pub fn sign(hash: u32) -> f64 {
        2. * (hash >> 31) as f64 - 1.
    }

    /// hashes a bag. If fmap is given, every key is recorded under its dimension.
    pub fn hash_bag(&self, bag: &Bag, mut fmap: Option<&mut FeatureMap>) -> SparseVector {
        let mut vector = SparseVector::new();
        for (key, count) in bag.iter() {
            let hash = murmur3_str(key);
            let dim = self.dimension(hash);
            vector.add(dim, FeatureHasher::sign(hash) * count);
            if let Some(fmap) = fmap.as_deref_mut() {
                fmap.insert(dim, key);
            }
        }
        log::trace!("hashed {} keys into {} dimensions", bag.len(), vector.len());
        vector
    } // end of hash_bag

    /// hashes a bag and returns its own feature map
    pub fn hash_with_map(&self, bag: &Bag) -> (SparseVector, FeatureMap) {
        let mut fmap = FeatureMap::new();
        let vector = self.hash_bag(bag, Some(&mut fmap));
        (vector, fmap)
    }
} // end of impl FeatureHasher


// end of mod tests
