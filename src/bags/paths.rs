//! Bags built from breadth first explorations around each node.
//!
//! All explorations follow outgoing edges and stop after a given number of hops.
//! A node is never counted as reachable from itself, even through a cycle.

use crate::graph::LabeledGraph;
use crate::graph::traversal::BfsTree;

use super::{Bag, CTX_SEP, SEQ_SEP};


/// For each node v : `label(v):l1-l2-...` where the li are the sorted labels of nodes
/// reachable within size hops, v excluded.
pub fn bag_of_neighborhoods(graph: &LabeledGraph, size: usize) -> Bag {
    let adjacency = graph.adjacency();
    let mut bag = Bag::new();
    for node in 0..graph.node_count() {
        let tree = BfsTree::explore(&adjacency, node, Some(size));
        let mut labels: Vec<&str> = tree.reached_others().map(|n| graph.label(n)).collect();
        labels.sort_unstable();
        let key = format!("{}{}{}", graph.label(node), CTX_SEP, labels.join(SEQ_SEP));
        bag.incr(key);
    }
    bag
} // end of bag_of_neighborhoods


/// `label(u):label(w)` once for each ordered pair u != w with w reachable from u within depth hops
pub fn bag_of_reachabilities(graph: &LabeledGraph, depth: usize) -> Bag {
    reachable_pairs(graph, Some(depth), false)
} // end of bag_of_reachabilities


/// `label(u):label(w)` for each reachable ordered pair u != w. maxlen None means no hop limit.
/// If weighted, a pair contributes 1/d where d is the length of the shortest path from u to w.
pub fn bag_of_closure(graph: &LabeledGraph, maxlen: Option<usize>, weighted: bool) -> Bag {
    reachable_pairs(graph, maxlen, weighted)
} // end of bag_of_closure


fn reachable_pairs(graph: &LabeledGraph, cutoff: Option<usize>, weighted: bool) -> Bag {
    let adjacency = graph.adjacency();
    let mut bag = Bag::new();
    for node in 0..graph.node_count() {
        let tree = BfsTree::explore(&adjacency, node, cutoff);
        for other in tree.reached_others() {
            let key = format!("{}{}{}", graph.label(node), CTX_SEP, graph.label(other));
            let weight = match (weighted, tree.distance(other)) {
                (true, Some(dist)) => 1. / dist as f64,
                _ => 1.,
            };
            bag.add(key, weight);
        }
    }
    bag
} // end of reachable_pairs


/// For each ordered pair (u, w) with w reachable from u within maxlen hops, the dash joined labels
/// of one shortest path from u to w. Paths with less than minlen edges are discarded,
/// so with minlen 0 each node contributes its own label as a path of length 0.
///
/// Among equal length shortest paths the one with the lexicographically smallest sequence of node ids is kept
/// (see [BfsTree](crate::graph::traversal::BfsTree)).
pub fn bag_of_shortest_paths(graph: &LabeledGraph, minlen: usize, maxlen: usize) -> Bag {
    let adjacency = graph.adjacency();
    let mut bag = Bag::new();
    for node in 0..graph.node_count() {
        let tree = BfsTree::explore(&adjacency, node, Some(maxlen));
        for &other in tree.reached() {
            match tree.distance(other) {
                Some(dist) if dist >= minlen => {}
                _ => continue,
            }
            if let Some(path) = tree.path_to(other) {
                let key = graph.labels_of(&path).collect::<Vec<&str>>().join(SEQ_SEP);
                bag.incr(key);
            }
        }
    }
    bag
} // end of bag_of_shortest_paths


#[cfg(test)]
mod tests {

    use super::*;
    use crate::bags::fixtures::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn neighborhoods_size_2() {
        log_init_test();
        let expected = vec![
            bag(&[]),
            bag(&[("A:", 2.), ("B:", 1.)]),
            bag(&[("A:A-B", 2.), ("B:A-A", 1.)]),
            bag(&[("A:B-B-C", 1.), ("A:B-C", 1.), ("B:A-C", 1.), ("B:B-C-C", 1.), ("C:", 1.), ("C:A-B", 1.)]),
            bag(&[("A:A-B-C", 1.), ("B:A-A-B-C", 1.), ("C:A-B", 2.), ("B:A-C", 1.), ("A:B-C", 1.)]),
        ];
        for (graph, expected) in all().iter().zip(expected.iter()) {
            assert_eq!(&bag_of_neighborhoods(graph, 2), expected);
        }
    } // end of neighborhoods_size_2

    #[test]
    fn neighbors_are_successors() {
        let graph = readme();
        assert_eq!(bag_of_neighborhoods(&graph, 1),
                bag(&[("A:B", 2.), ("B:C", 1.), ("C:A", 1.), ("B:B-C", 1.), ("C:", 1.)]));
        // size 0 keeps only the node itself
        assert_eq!(bag_of_neighborhoods(&graph, 0), bag(&[("A:", 2.), ("B:", 2.), ("C:", 2.)]));
    }

    #[test]
    fn reachabilities_depth_2() {
        log_init_test();
        let expected = vec![
            bag(&[]),
            bag(&[]),
            bag(&[("A:B", 2.), ("A:A", 2.), ("B:A", 2.)]),
            bag(&[("A:B", 3.), ("A:C", 2.), ("B:A", 1.), ("B:B", 1.), ("B:C", 3.), ("C:A", 1.), ("C:B", 1.)]),
            bag(&[("A:B", 2.), ("A:A", 1.), ("A:C", 2.), ("B:A", 3.), ("B:B", 1.), ("B:C", 2.), ("C:A", 2.), ("C:B", 2.)]),
        ];
        for (graph, expected) in all().iter().zip(expected.iter()) {
            assert_eq!(&bag_of_reachabilities(graph, 2), expected);
        }
    } // end of reachabilities_depth_2

    #[test]
    fn shortest_paths_2_3() {
        log_init_test();
        let expected = vec![
            bag(&[]),
            bag(&[]),
            bag(&[("A-B-A", 2.)]),
            bag(&[("B-C-A-B", 1.), ("B-C-A", 1.), ("B-B-C-A", 1.), ("B-B-C", 1.), ("A-B-C-A", 1.), ("C-A-B-B", 1.),
                  ("C-A-B-C", 1.), ("C-A-B", 1.), ("A-B-B", 1.), ("A-B-C", 2.), ("A-B-B-C", 1.)]),
            bag(&[("A-B-A-B", 1.), ("B-A-B", 1.), ("B-A-B-C", 1.), ("B-C-A", 2.), ("C-A-B-A", 1.), ("C-A-B", 2.),
                  ("A-B-C", 2.), ("A-B-A", 1.)]),
        ];
        for (graph, expected) in all().iter().zip(expected.iter()) {
            assert_eq!(&bag_of_shortest_paths(graph, 2, 3), expected);
        }
    } // end of shortest_paths_2_3

    #[test]
    fn shortest_paths_keep_zero_length() {
        let graph = readme();
        assert_eq!(bag_of_shortest_paths(&graph, 0, 1),
                bag(&[("A", 2.), ("A-B", 2.), ("B", 2.), ("B-C", 2.), ("C", 2.), ("C-A", 1.), ("B-B", 1.)]));
        // minlen above maxlen gives nothing
        assert!(bag_of_shortest_paths(&graph, 4, 3).is_empty());
    }

    #[test]
    fn shortest_paths_tie_break() {
        // 0 -> 1 -> 3 and 0 -> 2 -> 3 : the path through the smallest id is kept
        let graph = LabeledGraph::from_labels(&["s", "x", "y", "t"], &[(0, 2), (2, 3), (0, 1), (1, 3)]).unwrap();
        let bag = bag_of_shortest_paths(&graph, 2, 2);
        assert_eq!(bag, crate::bags::fixtures::bag(&[("s-x-t", 1.)]));
    }

    #[test]
    fn closure_unweighted_and_weighted() {
        log_init_test();
        let graph = readme();
        assert_eq!(bag_of_closure(&graph, None, false),
                bag(&[("A:B", 4.), ("A:C", 4.), ("A:A", 1.), ("B:C", 4.), ("B:A", 2.), ("B:B", 2.), ("C:A", 1.),
                      ("C:B", 2.), ("C:C", 1.)]));
        assert_bag_approx(&bag_of_closure(&graph, None, true),
                &bag(&[("A:B", 2.75), ("A:C", 1.5333333333333332), ("A:A", 1. / 3.), ("B:C", 2.75),
                       ("B:A", 0.8333333333333333), ("B:B", 1.3333333333333333), ("C:A", 1.), ("C:B", 0.8333333333333333),
                       ("C:C", 1. / 3.)]));
        // bounded closure is the bag of reachabilities
        for graph in all() {
            assert_eq!(bag_of_closure(&graph, Some(2), false), bag_of_reachabilities(&graph, 2));
        }
    } // end of closure_unweighted_and_weighted

    #[test]
    fn self_loop_is_not_reachability() {
        let graph = LabeledGraph::from_labels(&["A"], &[(0, 0)]).unwrap();
        assert!(bag_of_reachabilities(&graph, 3).is_empty());
        assert_eq!(bag_of_neighborhoods(&graph, 1), bag(&[("A:", 1.)]));
    }
} // end of mod tests
