//! The graph model consumed by bag extractors.
//!
//! A [LabeledGraph](labeled::LabeledGraph) is a petgraph directed graph whose nodes carry a non empty string label.
//! Nodes are densely indexed by `0..n-1`, the original node identifiers are kept in an IndexSet so that
//! the rank of an identifier is the node index.
//! Self loops and parallel edges are allowed.
//!
//! Graphs are constructed through a [GraphBuilder](labeled::GraphBuilder) which validates labels and edges,
//! so extractors never see an unlabeled node.


/// Defines the labeled graph and its builder.
pub mod labeled;

/// breadth first exploration with hop cutoff, used by path based extractors.
pub mod traversal;

pub use labeled::*;
