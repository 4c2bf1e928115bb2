//! bags of nodes and edges

use crate::graph::LabeledGraph;

use super::{Bag, SEQ_SEP};


/// counts node labels
pub fn bag_of_nodes(graph: &LabeledGraph) -> Bag {
    let mut bag = Bag::new();
    for node in 0..graph.node_count() {
        bag.incr(graph.label(node).to_string());
    }
    bag
} // end of bag_of_nodes


/// counts `label(u)-label(v)` for each edge u->v. Parallel edges are counted individually.
pub fn bag_of_edges(graph: &LabeledGraph) -> Bag {
    let mut bag = Bag::new();
    for (from, to) in graph.edges() {
        let key = [graph.label(from), graph.label(to)].join(SEQ_SEP);
        bag.incr(key);
    }
    bag
} // end of bag_of_edges


// end of mod tests
