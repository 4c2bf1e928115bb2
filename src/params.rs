//! Run configuration.
//!
//! [HashParams] is the loosely typed surface (command line, json config file). It is validated once,
//! before any graph is read, into a [RunConfig] made of closed enums and checked values.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::bags::{BagMode, ComponentKind};
use crate::errors::{GraphashError, Result};
use crate::hashing::FeatureHasher;
use crate::renormalize::{MapType, Normalizer, VectorNorm};

/// mode names in the order of their numeric ids
pub const MODE_NAMES: [&str; 9] = ["nodes", "edges", "neighborhoods", "reachabilities", "shortest_paths",
                                   "components", "cycles", "branchless_paths", "closure"];


/// Run parameters as given by a user. Every field has a default so a json config can be partial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashParams {
    /// extraction mode, by name or numeric id
    pub mode: String,
    /// vectors have dimension 2^bits
    pub bits: u32,
    /// count or binary
    pub map: String,
    /// none, l1 (manhattan), l2 (euclidean)
    pub norm: String,
    /// hops of neighborhoods
    pub size: usize,
    /// hops of reachabilities
    pub depth: usize,
    /// minimal number of edges of shortest paths
    pub minlen: usize,
    /// maximal number of edges of shortest paths
    pub maxlen: usize,
    /// hop cutoff of closure, unbounded if absent or 0
    pub closure_maxlen: Option<usize>,
    /// closure pairs weighted by 1/length
    pub weighted: bool,
    /// strong, weak or attracting
    pub component: String,
    /// regex applied to the graph identifier to get the record label
    pub label_regex: String,
    /// number of chunks a bundle is split into
    pub chunks: usize,
    /// size of the thread pool
    pub threads: usize,
    /// where to dump the feature map, if asked
    pub fmap: Option<PathBuf>,
} // end of HashParams


impl Default for HashParams {
    fn default() -> Self {
        HashParams {
            mode: String::from("nodes"),
            bits: 24,
            map: String::from("count"),
            norm: String::from("none"),
            size: 1,
            depth: 5,
            minlen: 3,
            maxlen: 3,
            closure_maxlen: None,
            weighted: false,
            component: String::from("strong"),
            label_regex: String::from(r"^\d+"),
            chunks: 1,
            threads: num_cpus::get(),
            fmap: None,
        }
    }
}


impl HashParams {

    /// loads parameters from a json document, missing fields take their default
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GraphashError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| GraphashError::Format {
            path: path.to_path_buf(),
            line: Some(e.line() as u64),
            offset: None,
            reason: e.to_string(),
        })
    }

    /// resolves the extraction mode
    pub fn bag_mode(&self) -> Result<BagMode> {
        let name = self.mode.trim().to_ascii_lowercase();
        let name = name.strip_prefix("bag_of_").unwrap_or(&name);
        // component names that fix the kind, whatever the component field says
        let kind = match name {
            "strongly_connected_components" => Some(ComponentKind::Strong),
            "weakly_connected_components" => Some(ComponentKind::Weak),
            "attracting_components" => Some(ComponentKind::Attracting),
            _ => None,
        };
        if let Some(kind) = kind {
            return Ok(BagMode::Components(kind));
        }
        let rank = match name.parse::<usize>() {
            Ok(rank) if rank < MODE_NAMES.len() => rank,
            Ok(rank) => return Err(GraphashError::config(format!("mode id {} out of 0..{}", rank, MODE_NAMES.len()))),
            Err(_) => match name {
                "neighbors" => 2,
                "connected_components" => 5,
                "elementary_cycles" => 6,
                _ => MODE_NAMES.iter().position(|m| *m == name)
                        .ok_or_else(|| GraphashError::config(format!("unknown extraction mode {}", self.mode)))?,
            },
        };
        let mode = match rank {
            0 => BagMode::Nodes,
            1 => BagMode::Edges,
            2 => BagMode::Neighborhoods { size: self.size },
            3 => BagMode::Reachabilities { depth: self.depth },
            4 => {
                if self.minlen > self.maxlen {
                    return Err(GraphashError::config(format!("minlen {} greater than maxlen {}", self.minlen, self.maxlen)));
                }
                BagMode::ShortestPaths { minlen: self.minlen, maxlen: self.maxlen }
            }
            5 => BagMode::Components(self.component_kind()?),
            6 => BagMode::ElementaryCycles,
            7 => BagMode::BranchlessPaths,
            8 => BagMode::Closure { maxlen: self.closure_maxlen.filter(|l| *l > 0), weighted: self.weighted },
            _ => return Err(GraphashError::config(format!("mode id {} out of 0..{}", rank, MODE_NAMES.len()))),
        };
        Ok(mode)
    } // end of bag_mode


    fn component_kind(&self) -> Result<ComponentKind> {
        match self.component.trim().to_ascii_lowercase().as_str() {
            "strong" => Ok(ComponentKind::Strong),
            "weak" => Ok(ComponentKind::Weak),
            "attracting" => Ok(ComponentKind::Attracting),
            _ => Err(GraphashError::config(format!("unknown component kind {}, expected strong, weak or attracting", self.component))),
        }
    }


    /// checks every field and builds the run configuration
    pub fn validate(&self) -> Result<RunConfig> {
        let mode = self.bag_mode()?;
        let hasher = FeatureHasher::new(self.bits)?;
        let normalizer = Normalizer::new(MapType::from_str(&self.map)?, VectorNorm::from_str(&self.norm)?);
        if self.chunks == 0 {
            return Err(GraphashError::config("chunks must be at least 1"));
        }
        if self.threads == 0 {
            return Err(GraphashError::config("threads must be at least 1"));
        }
        let label_regex = Regex::new(&self.label_regex)
            .map_err(|e| GraphashError::config(format!("invalid label regex {} : {}", self.label_regex, e)))?;
        let config = RunConfig {
            mode,
            hasher,
            normalizer,
            label_regex,
            chunks: self.chunks,
            threads: self.threads,
            fmap: self.fmap.clone(),
        };
        log::debug!("validated run configuration : {:?}", config);
        Ok(config)
    } // end of validate
} // end of impl HashParams


//=====================================================================


/// Checked configuration of a run, fixed for all graphs of the run
#[derive(Debug, Clone)]
pub struct RunConfig {
    mode: BagMode,
    hasher: FeatureHasher,
    normalizer: Normalizer,
    label_regex: Regex,
    chunks: usize,
    threads: usize,
    fmap: Option<PathBuf>,
}

impl RunConfig {

    pub fn get_mode(&self) -> &BagMode { &self.mode }

    pub fn get_hasher(&self) -> &FeatureHasher { &self.hasher }

    pub fn get_normalizer(&self) -> &Normalizer { &self.normalizer }

    pub fn get_chunks(&self) -> usize { self.chunks }

    pub fn get_threads(&self) -> usize { self.threads }

    /// feature map output, None if no map is to be collected
    pub fn get_fmap(&self) -> Option<&Path> { self.fmap.as_deref() }

    pub fn with_fmap(&self) -> bool { self.fmap.is_some() }

    /// Label of a graph from its identifier : the first capture group of the regex if there is one,
    /// else the whole match, parsed as an integer. 0 if there is no identifier, no match or no integer.
    pub fn label_of(&self, id: Option<&str>) -> i64 {
        let id = match id {
            Some(id) => id,
            None => return 0,
        };
        let found = self.label_regex.captures(id)
            .and_then(|c| c.get(1).or_else(|| c.get(0)))
            .map(|m| m.as_str());
        match found.map(|s| s.parse::<i64>()) {
            Some(Ok(label)) => label,
            _ => {
                log::trace!("no label found in {}", id);
                0
            }
        }
    } // end of label_of
} // end of impl RunConfig


// end of mod tests
