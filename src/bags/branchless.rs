//! Bag of branchless paths.
//!
//! Branch nodes, i.e nodes with more than one outgoing edge in the input graph, are removed from a private copy
//! of the graph. Each weakly connected component of what remains is a run of nodes with at most one successor.
//! Such a run ends at a unique terminal node (the only one without successor) unless it closes a cycle.
//!
//! A run is read by a breadth first walk against edge direction from its terminal node,
//! predecessors taken in ascending id, and the key is the dash joined labels of the walk order reversed.
//! For a run closing a cycle, the terminal is the cycle predecessor of the smallest node id on the cycle.

use std::collections::VecDeque;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeIndexable};
use petgraph::{Directed, Direction};

use indexmap::IndexMap;

use crate::graph::LabeledGraph;

use super::{Bag, SEQ_SEP};

type WorkGraph = StableGraph<String, (), Directed, u32>;


/// counts label sequences of maximal branchless runs. The input graph is left untouched.
pub fn bag_of_branchless_paths(graph: &LabeledGraph) -> Bag {
    let mut bag = Bag::new();
    if graph.is_empty() {
        return bag;
    }
    // private working copy, indices are kept stable while removing nodes
    let mut work = WorkGraph::from(graph.get_graph().clone());
    let branch_nodes: Vec<NodeIndex<u32>> = work.node_indices()
            .filter(|n| graph.out_degree(n.index()) > 1)
            .collect();
    log::trace!("{} : removing {} branch nodes", graph.describe(), branch_nodes.len());
    for node in branch_nodes {
        work.remove_node(node);
    }
    //
    for run in branchless_runs(&work) {
        let key = run.iter().map(|n| work[*n].as_str()).collect::<Vec<&str>>().join(SEQ_SEP);
        bag.incr(key);
    }
    bag
} // end of bag_of_branchless_paths


/// returns node sequences of each weak component of work, in reading order
fn branchless_runs(work: &WorkGraph) -> Vec<Vec<NodeIndex<u32>>> {
    let mut union_find = UnionFind::<usize>::new(work.node_bound());
    for edge in work.edge_references() {
        union_find.union(edge.source().index(), edge.target().index());
    }
    let mut components = IndexMap::<usize, Vec<NodeIndex<u32>>>::new();
    for node in work.node_indices() {
        components.entry(union_find.find(node.index())).or_insert_with(Vec::new).push(node);
    }
    //
    // components are disjoint, so the marks can be shared by all of them
    let mut followed = vec![false; work.node_bound()];
    let mut visited = vec![false; work.node_bound()];
    let mut runs = Vec::<Vec<NodeIndex<u32>>>::with_capacity(components.len());
    for (_, component) in components {
        let terminal = run_terminal(work, &component, &mut followed);
        let mut order = walk_back(work, terminal, &mut visited);
        order.reverse();
        runs.push(order);
    }
    runs
} // end of branchless_runs


fn successor(work: &WorkGraph, node: NodeIndex<u32>) -> Option<NodeIndex<u32>> {
    work.neighbors_directed(node, Direction::Outgoing).next()
}


/// the node without successor, or for a cyclic run the predecessor on the cycle of the smallest cycle node
fn run_terminal(work: &WorkGraph, component: &[NodeIndex<u32>], followed: &mut [bool]) -> NodeIndex<u32> {
    if let Some(sink) = component.iter().find(|n| successor(work, **n).is_none()) {
        return *sink;
    }
    // every node has exactly one successor : follow them until a node repeats, it is on the cycle
    let mut current = component[0];
    while !followed[current.index()] {
        followed[current.index()] = true;
        current = match successor(work, current) {
            Some(next) => next,
            None => return current,
        };
    }
    // collect the cycle through current
    let mut cycle = vec![current];
    let mut next = successor(work, current).unwrap_or(current);
    while next != current {
        cycle.push(next);
        next = successor(work, next).unwrap_or(current);
    }
    let smallest = cycle.iter().copied().min_by_key(|n| n.index()).unwrap_or(current);
    cycle.iter().copied()
        .find(|n| successor(work, *n) == Some(smallest))
        .unwrap_or(smallest)
} // end of run_terminal


/// breadth first walk on incoming edges, predecessors in ascending order
fn walk_back(work: &WorkGraph, terminal: NodeIndex<u32>, visited: &mut [bool]) -> Vec<NodeIndex<u32>> {
    visited[terminal.index()] = true;
    let mut order = vec![terminal];
    let mut queue = VecDeque::from(vec![terminal]);
    while let Some(node) = queue.pop_front() {
        let mut preds: Vec<NodeIndex<u32>> = work.neighbors_directed(node, Direction::Incoming).collect();
        preds.sort_unstable_by_key(|n| n.index());
        preds.dedup();
        for pred in preds {
            if !visited[pred.index()] {
                visited[pred.index()] = true;
                order.push(pred);
                queue.push_back(pred);
            }
        }
    }
    order
} // end of walk_back


// end of mod tests
