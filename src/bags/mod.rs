//! Bag extraction.
//!
//! A bag is a multiset of pattern keys summarizing a structural census of a graph :
//! labels of nodes, of edges, of neighbourhoods, of shortest paths, of components, of cycles...
//! Each extractor is a deterministic function of the graph and of the mode parameters,
//! it never fails on a structural shape (cycles, self loops, isolated nodes, empty graph).
//!
//! The mode is a closed enum, [BagMode], the dispatch is an exhaustive match.
//!
//! Keys are built from labels only, so two graphs that differ by a renumbering of nodes give the same bag
//! (up to the tie-break rules documented in each extractor for shortest paths, cycles and branchless paths).

use std::collections::HashMap;

use crate::graph::LabeledGraph;

/// bags of nodes, edges
pub mod simple;

/// bags built from bounded breadth first explorations : neighbourhoods, reachabilities, shortest paths, closure
pub mod paths;

/// bags of strongly, weakly connected and attracting components
pub mod components;

/// bags of elementary cycles (Johnson algorithm)
pub mod cycles;

/// bags of branchless paths
pub mod branchless;

pub use simple::*;
pub use paths::*;
pub use components::*;
pub use cycles::*;
pub use branchless::*;

/// separator between labels of a sequence or a set
pub const SEQ_SEP: &str = "-";

/// separator between a node label and its context
pub const CTX_SEP: &str = ":";


/// A multiset of pattern keys. Counts are f64 as the weighted closure gives fractional weights.
/// Two bags are equal when they have the same keys with the same counts, whatever the insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bag {
    counts: HashMap<String, f64, ahash::RandomState>,
}


impl Bag {

    pub fn new() -> Self {
        Bag { counts: HashMap::default() }
    }

    /// adds weight to key
    pub fn add(&mut self, key: String, weight: f64) {
        *self.counts.entry(key).or_insert(0.) += weight;
    }

    /// adds 1 to key
    pub fn incr(&mut self, key: String) {
        self.add(key, 1.);
    }

    /// count of key, None if absent
    pub fn get(&self, key: &str) -> Option<f64> {
        self.counts.get(key).copied()
    }

    /// number of distinct keys
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// sum of counts
    pub fn total(&self) -> f64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// keys sorted, for logs and stable dumps
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.counts.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }
} // end of impl Bag


impl<S: Into<String>> FromIterator<(S, f64)> for Bag {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut bag = Bag::new();
        for (key, weight) in iter {
            bag.add(key.into(), weight);
        }
        bag
    }
} // end of impl FromIterator for Bag


//=====================================================================================


/// Connectivity notion used to build bags of components
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    /// strongly connected components
    Strong,
    /// weakly connected components (edge direction ignored)
    Weak,
    /// strongly connected components with no edge leaving them
    Attracting,
}

impl ComponentKind {
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Strong => "strongly connected",
            ComponentKind::Weak => "weakly connected",
            ComponentKind::Attracting => "attracting",
        }
    }
} // end of impl ComponentKind


/// The bag extraction modes, with their parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BagMode {
    /// label of each node
    Nodes,
    /// `label(u)-label(v)` for each edge, parallel edges counted
    Edges,
    /// node label and sorted labels of nodes within size hops
    Neighborhoods { size: usize },
    /// `label(u):label(w)` for each pair with w reachable from u within depth hops
    Reachabilities { depth: usize },
    /// label sequence of one shortest path per pair, lengths in [minlen, maxlen]
    ShortestPaths { minlen: usize, maxlen: usize },
    /// sorted labels of each component
    Components(ComponentKind),
    /// label sequence of each simple cycle
    ElementaryCycles,
    /// label sequence of each maximal run of nodes with out degree at most 1
    BranchlessPaths,
    /// `label(u):label(w)` for each reachable pair, weighted by 1/length if asked. maxlen None means unbounded
    Closure { maxlen: Option<usize>, weighted: bool },
}


impl BagMode {

    /// runs the extractor corresponding to the mode
    pub fn extract(&self, graph: &LabeledGraph) -> Bag {
        log::trace!("extracting {} from {}", self.describe(), graph.describe());
        match *self {
            BagMode::Nodes => bag_of_nodes(graph),
            BagMode::Edges => bag_of_edges(graph),
            BagMode::Neighborhoods { size } => bag_of_neighborhoods(graph, size),
            BagMode::Reachabilities { depth } => bag_of_reachabilities(graph, depth),
            BagMode::ShortestPaths { minlen, maxlen } => bag_of_shortest_paths(graph, minlen, maxlen),
            BagMode::Components(kind) => bag_of_connected_components(graph, kind),
            BagMode::ElementaryCycles => bag_of_elementary_cycles(graph),
            BagMode::BranchlessPaths => bag_of_branchless_paths(graph),
            BagMode::Closure { maxlen, weighted } => bag_of_closure(graph, maxlen, weighted),
        }
    } // end of extract


    /// human readable name of the mode and of its parameters
    pub fn describe(&self) -> String {
        match *self {
            BagMode::Nodes => String::from("bags of nodes"),
            BagMode::Edges => String::from("bags of edges"),
            BagMode::Neighborhoods { size } => format!("bags of neighborhoods (size: {})", size),
            BagMode::Reachabilities { depth } => format!("bags of reachabilities (depth: {})", depth),
            BagMode::ShortestPaths { minlen, maxlen } => format!("bags of shortest paths (min: {}, max: {})", minlen, maxlen),
            BagMode::Components(kind) => format!("bags of {} components", kind.name()),
            BagMode::ElementaryCycles => String::from("bags of elementary cycles"),
            BagMode::BranchlessPaths => String::from("bags of branchless paths"),
            BagMode::Closure { maxlen, weighted } => {
                let maxlen = maxlen.map(|l| l.to_string()).unwrap_or_else(|| String::from("none"));
                if weighted {
                    format!("bags of weighted closure (max: {})", maxlen)
                } else {
                    format!("bags of closure (max: {})", maxlen)
                }
            }
        }
    } // end of describe
} // end of impl BagMode


impl std::fmt::Display for BagMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}


//=====================================================================================


// end of mod fixtures


#[cfg(test)]
mod tests {

    use super::*;
    use super::fixtures::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn all_modes() -> Vec<BagMode> {
        vec![BagMode::Nodes, BagMode::Edges, BagMode::Neighborhoods { size: 2 }, BagMode::Reachabilities { depth: 2 },
             BagMode::ShortestPaths { minlen: 0, maxlen: 3 }, BagMode::Components(ComponentKind::Strong),
             BagMode::Components(ComponentKind::Weak), BagMode::Components(ComponentKind::Attracting),
             BagMode::ElementaryCycles, BagMode::BranchlessPaths, BagMode::Closure { maxlen: None, weighted: true }]
    }

    #[test]
    fn bag_equality_ignores_order() {
        let mut b1 = Bag::new();
        b1.incr(String::from("A"));
        b1.add(String::from("B"), 2.);
        b1.incr(String::from("A"));
        let b2 = bag(&[("B", 2.), ("A", 2.)]);
        assert_eq!(b1, b2);
        assert_eq!(b1.total(), 4.);
        assert_eq!(b1.sorted_keys(), vec!["A", "B"]);
    }

    #[test]
    fn empty_graph_gives_empty_bags() {
        log_init_test();
        let graph = empty();
        for mode in all_modes() {
            assert!(mode.extract(&graph).is_empty(), "mode {}", mode);
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        log_init_test();
        for graph in all() {
            for mode in all_modes() {
                assert_eq!(mode.extract(&graph), mode.extract(&graph));
            }
        }
    }

    #[test]
    fn extraction_does_not_modify_graph() {
        let graph = readme();
        let _ = BagMode::BranchlessPaths.extract(&graph);
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn readme_scenario() {
        log_init_test();
        let graph = readme();
        assert_eq!(BagMode::Nodes.extract(&graph), bag(&[("A", 2.), ("B", 2.), ("C", 2.)]));
        assert_eq!(BagMode::Edges.extract(&graph), bag(&[("A-B", 2.), ("B-C", 2.), ("C-A", 1.), ("B-B", 1.)]));
        assert_eq!(BagMode::Components(ComponentKind::Attracting).extract(&graph), bag(&[("C", 1.)]));
    }

    #[test]
    fn mode_names() {
        assert_eq!(BagMode::ShortestPaths { minlen: 3, maxlen: 3 }.describe(), "bags of shortest paths (min: 3, max: 3)");
        assert_eq!(BagMode::Components(ComponentKind::Attracting).to_string(), "bags of attracting components");
        assert_eq!(BagMode::Closure { maxlen: Some(2), weighted: true }.describe(), "bags of weighted closure (max: 2)");
    }
} // end of mod tests
