//! Labeled directed graph on top of petgraph.
//!
//! Labels may come as several fields (for example the bits of a function-call graph label),
//! they are concatenated in the order given.


use indexmap::{IndexMap, IndexSet};

use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use crate::errors::{GraphashError, Result};

/// The petgraph type we store. Node weight is the label, edges carry no data.
pub type LGraph = Graph<String, (), Directed, u32>;


/// A directed graph with a non empty label on each node.
/// Node ids are dense: node `i` is `NodeIndex::new(i)` in the petgraph structure
/// and the rank of its original identifier in `node_ids`.
#[derive(Clone, Debug)]
pub struct LabeledGraph {
    /// identifier of the graph (file name, archive entry...), used in reports and for label extraction
    id: Option<String>,
    /// the graph itself
    graph: LGraph,
    /// original node identifiers, indexed by dense node id
    node_ids: IndexSet<String>,
} // end of struct LabeledGraph


impl LabeledGraph {

    /// Builds a graph from dense labels and dense edges. Node `i` gets identifier `i`.
    /// Returns a validation error if a label is empty or an edge references a node out of range.
    pub fn from_labels<S: AsRef<str>>(labels: &[S], edges: &[(usize, usize)]) -> Result<Self> {
        let mut builder = GraphBuilder::new(None);
        for (i, label) in labels.iter().enumerate() {
            builder.add_node(&i.to_string(), &[label.as_ref()]);
        }
        for (from, to) in edges {
            if *from >= labels.len() || *to >= labels.len() {
                return Err(GraphashError::validation("<in memory>", format!("edge ({},{}) references an unknown node", from, to)));
            }
            builder.add_edge(&from.to_string(), &to.to_string());
        }
        builder.build()
    } // end of from_labels


    /// identifier of the graph if any
    pub fn get_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// identifier used in logs and error reports
    pub fn describe(&self) -> &str {
        self.id.as_deref().unwrap_or("<anonymous graph>")
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = Some(id.to_string());
    }

    /// access to petgraph structure
    pub fn get_graph(&self) -> &LGraph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// label of node of dense id node
    pub fn label(&self, node: usize) -> &str {
        &self.graph[NodeIndex::new(node)]
    }

    /// original identifier of a node
    pub fn original_id(&self, node: usize) -> Option<&str> {
        self.node_ids.get_index(node).map(|s| s.as_str())
    }

    /// dense id of an original identifier
    pub fn node_rank(&self, original_id: &str) -> Option<usize> {
        self.node_ids.get_index_of(original_id)
    }

    /// all edges as (source, target), parallel edges repeated, in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph.edge_references().map(|e| (e.source().index(), e.target().index()))
    }

    /// number of outgoing edges, parallel edges counted
    pub fn out_degree(&self, node: usize) -> usize {
        self.graph.edges_directed(NodeIndex::new(node), Direction::Outgoing).count()
    }

    /// distinct successors sorted by ascending id
    pub fn successors(&self, node: usize) -> Vec<usize> {
        let mut succ: Vec<usize> = self.graph.neighbors_directed(NodeIndex::new(node), Direction::Outgoing)
                .map(|n| n.index())
                .collect();
        succ.sort_unstable();
        succ.dedup();
        succ
    } // end of successors

    /// sorted successor lists for all nodes
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        (0..self.node_count()).map(|n| self.successors(n)).collect()
    }

    /// labels of a list of nodes
    pub fn labels_of<'a>(&'a self, nodes: &'a [usize]) -> impl Iterator<Item = &'a str> + 'a {
        nodes.iter().map(move |n| self.label(*n))
    }
} // end of impl LabeledGraph


//=====================================================================================


/// Collects nodes and edges described by original identifiers and checks them.
/// Nodes referenced by an edge but never declared are unlabeled and make [build](GraphBuilder::build) fail.
pub struct GraphBuilder {
    id: Option<String>,
    /// original id -> label, None if node was only seen in an edge or declared without label
    nodes: IndexMap<String, Option<String>>,
    /// declared[rank] is true once an `n` record was seen for the node, with or without label
    declared: Vec<bool>,
    /// edges as ranks in nodes
    edges: Vec<(usize, usize)>,
    /// first structural error met, reported at build time
    error: Option<String>,
} // end of GraphBuilder


impl GraphBuilder {

    pub fn new(id: Option<&str>) -> Self {
        GraphBuilder { id: id.map(|s| s.to_string()), nodes: IndexMap::new(), declared: Vec::new(),
                edges: Vec::new(), error: None }
    }

    /// declares a node. label fields are concatenated. A node declared twice is an error.
    pub fn add_node<S: AsRef<str>>(&mut self, node_id: &str, label_fields: &[S]) {
        let label = if label_fields.is_empty() {
            None
        } else {
            Some(label_fields.iter().map(|f| f.as_ref()).collect::<String>())
        };
        match self.nodes.get_index_of(node_id) {
            Some(rank) if self.declared[rank] => {
                if self.error.is_none() {
                    self.error = Some(format!("node {} declared twice", node_id));
                }
            }
            Some(rank) => {
                // node first seen in an edge
                self.declared[rank] = true;
                if let Some((_, slot)) = self.nodes.get_index_mut(rank) {
                    *slot = label;
                }
            }
            None => {
                self.nodes.insert(node_id.to_string(), label);
                self.declared.push(true);
            }
        }
    } // end of add_node


    /// adds a directed edge between original identifiers
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from = self.rank_or_insert(from);
        let to = self.rank_or_insert(to);
        self.edges.push((from, to));
    }

    fn rank_or_insert(&mut self, node_id: &str) -> usize {
        match self.nodes.get_index_of(node_id) {
            Some(rank) => rank,
            None => {
                self.declared.push(false);
                self.nodes.insert_full(node_id.to_string(), None).0
            }
        }
    }

    pub fn nb_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// checks labels and returns the graph
    pub fn build(self) -> Result<LabeledGraph> {
        let source_id = self.id.clone().unwrap_or_else(|| String::from("<in memory>"));
        if let Some(reason) = self.error {
            return Err(GraphashError::validation(source_id, reason));
        }
        let mut graph = LGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut node_ids = IndexSet::<String>::with_capacity(self.nodes.len());
        for (node_id, label) in self.nodes {
            match label {
                None => {
                    return Err(GraphashError::validation(source_id, format!("node {} is not labeled", node_id)));
                }
                Some(label) if label.is_empty() => {
                    return Err(GraphashError::validation(source_id, format!("label of node {} is empty", node_id)));
                }
                Some(label) => {
                    graph.add_node(label);
                    node_ids.insert(node_id);
                }
            }
        }
        for (from, to) in self.edges {
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
        }
        log::trace!("built graph {} nb nodes {} nb edges {}", source_id, graph.node_count(), graph.edge_count());
        Ok(LabeledGraph { id: self.id, graph, node_ids })
    } // end of build
} // end of impl GraphBuilder


//=====================================================================================


// end of mod tests
