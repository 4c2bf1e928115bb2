//! Errors of the crate.
//!
//! Validation errors concern one graph and never stop a corpus run, config errors are fatal
//! before any graph is processed, a degenerate vector is reported for the graph it comes from.

use std::path::PathBuf;

/// crate result type
pub type Result<T> = std::result::Result<T, GraphashError>;

#[derive(Debug, thiserror::Error)]
pub enum GraphashError {
    /// malformed graph : unlabeled node, empty label, edge to an unknown node
    #[error("invalid graph {source_id} : {reason}")]
    Validation { source_id: String, reason: String },

    /// static run misconfiguration
    #[error("configuration error : {0}")]
    Config(String),

    /// normalization of a vector whose entries are all zero
    #[error("cannot apply {norm} norm to an all-zero vector of {nb_entries} entries")]
    DegenerateVector { norm: String, nb_entries: usize },

    /// io error with the file it comes from and the byte offset when known
    #[error("io error on {} (offset {:?}) : {source}", .path.display(), .offset)]
    Io {
        path: PathBuf,
        offset: Option<u64>,
        #[source]
        source: std::io::Error,
    },

    /// unparsable content in a graph file, a libsvm file or a feature map
    #[error("format error in {} (line {:?}, offset {:?}) : {reason}", .path.display(), .line, .offset)]
    Format {
        path: PathBuf,
        line: Option<u64>,
        offset: Option<u64>,
        reason: String,
    },
}

impl GraphashError {
    pub fn validation(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        GraphashError::Validation { source_id: source_id.into(), reason: reason.into() }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        GraphashError::Config(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GraphashError::Io { path: path.into(), offset: None, source }
    }

    /// true for errors that concern a single graph of a corpus and must not abort the run
    pub fn is_per_graph(&self) -> bool {
        matches!(self, GraphashError::Validation { .. } | GraphashError::DegenerateVector { .. }
                     | GraphashError::Format { .. } | GraphashError::Io { .. })
    }
} // end of impl GraphashError


// end of mod tests
