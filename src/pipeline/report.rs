//! What a run produces : records in corpus order, failures of skipped graphs, the merged feature map.

use std::fmt;

use crate::errors::GraphashError;
use crate::hashing::{FeatureMap, SparseVector};


/// vector of one graph with its label and its rank in the corpus
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRecord {
    pub index: usize,
    pub id: Option<String>,
    pub label: i64,
    pub vector: SparseVector,
}


/// a graph that was reported and skipped
#[derive(Debug)]
pub struct Failure {
    pub index: usize,
    pub source: String,
    pub error: GraphashError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph {} ({}) skipped : {}", self.index, self.source, self.error)
    }
}


/// result of processing a slice of a corpus
#[derive(Debug, Default)]
pub struct ChunkResult {
    pub records: Vec<GraphRecord>,
    pub failures: Vec<Failure>,
    pub fmap: Option<FeatureMap>,
}


/// Summary of a whole run
#[derive(Debug, Default)]
pub struct RunReport {
    /// number of graphs seen
    pub nb_graphs: usize,
    /// number of records written
    pub nb_written: usize,
    pub failures: Vec<Failure>,
    /// merged feature map, if asked
    pub fmap: Option<FeatureMap>,
}

impl RunReport {

    /// accumulates a chunk, records are expected to be already written
    pub fn absorb(&mut self, chunk: ChunkResult) {
        self.nb_graphs += chunk.records.len() + chunk.failures.len();
        self.nb_written += chunk.records.len();
        self.failures.extend(chunk.failures);
        if let Some(fmap) = chunk.fmap {
            self.fmap = Some(match self.fmap.take() {
                Some(acc) => acc.merge(fmap),
                None => fmap,
            });
        }
    } // end of absorb

    pub fn nb_failures(&self) -> usize {
        self.failures.len()
    }
} // end of impl RunReport
