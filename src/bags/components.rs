//! Bags of components : one key per component made of the sorted labels of its nodes.

use indexmap::IndexMap;

use petgraph::algo::tarjan_scc;
use petgraph::unionfind::UnionFind;

use crate::graph::LabeledGraph;

use super::{Bag, ComponentKind, SEQ_SEP};


/// Bag of components of the given kind. An empty graph gives an empty bag for every kind.
pub fn bag_of_connected_components(graph: &LabeledGraph, kind: ComponentKind) -> Bag {
    // attracting components of an empty node set must not be computed
    if graph.is_empty() {
        return Bag::new();
    }
    let components = match kind {
        ComponentKind::Strong => strong_components(graph),
        ComponentKind::Weak => weak_components(graph),
        ComponentKind::Attracting => attracting_components(graph),
    };
    log::trace!("{} : {} {} components", graph.describe(), components.len(), kind.name());
    bag_of_components(graph, &components)
} // end of bag_of_connected_components


/// one key per node set : sorted labels joined by dashes
pub(crate) fn bag_of_components(graph: &LabeledGraph, components: &[Vec<usize>]) -> Bag {
    let mut bag = Bag::new();
    for component in components {
        let mut labels: Vec<&str> = graph.labels_of(component).collect();
        labels.sort_unstable();
        bag.incr(labels.join(SEQ_SEP));
    }
    bag
} // end of bag_of_components


/// strongly connected components as node id lists
pub fn strong_components(graph: &LabeledGraph) -> Vec<Vec<usize>> {
    tarjan_scc(graph.get_graph()).into_iter()
        .map(|scc| scc.into_iter().map(|n| n.index()).collect())
        .collect()
} // end of strong_components


/// weakly connected components, ordered by their smallest node id
pub fn weak_components(graph: &LabeledGraph) -> Vec<Vec<usize>> {
    let nb_nodes = graph.node_count();
    let mut union_find = UnionFind::<usize>::new(nb_nodes);
    for (from, to) in graph.edges() {
        union_find.union(from, to);
    }
    let mut groups = IndexMap::<usize, Vec<usize>>::new();
    for node in 0..nb_nodes {
        groups.entry(union_find.find(node)).or_insert_with(Vec::new).push(node);
    }
    groups.into_iter().map(|(_, nodes)| nodes).collect()
} // end of weak_components


/// strongly connected components with no edge to a node outside the component
pub fn attracting_components(graph: &LabeledGraph) -> Vec<Vec<usize>> {
    let components = strong_components(graph);
    let mut component_of = vec![0usize; graph.node_count()];
    for (rank, component) in components.iter().enumerate() {
        for node in component {
            component_of[*node] = rank;
        }
    }
    components.into_iter().enumerate()
        .filter(|(rank, component)| {
            component.iter().all(|node| graph.successors(*node).iter().all(|succ| component_of[*succ] == *rank))
        })
        .map(|(_, component)| component)
        .collect()
} // end of attracting_components


#[cfg(test)]
mod tests {

    use super::*;
    use crate::bags::fixtures::*;

    #[test]
    fn strong_on_fixtures() {
        let expected = vec![
            bag(&[]),
            bag(&[("A", 2.), ("B", 1.)]),
            bag(&[("A-A-B", 1.)]),
            bag(&[("A", 1.), ("A-B-B-C", 1.), ("C", 1.)]),
            bag(&[("A-B-C", 2.)]),
        ];
        for (graph, expected) in all().iter().zip(expected.iter()) {
            assert_eq!(&bag_of_connected_components(graph, ComponentKind::Strong), expected);
        }
    } // end of strong_on_fixtures

    #[test]
    fn attracting_on_fixtures() {
        let expected = vec![
            bag(&[]),
            bag(&[("A", 2.), ("B", 1.)]),
            bag(&[("A-A-B", 1.)]),
            bag(&[("C", 1.)]),
            bag(&[("A-B-C", 1.)]),
        ];
        for (graph, expected) in all().iter().zip(expected.iter()) {
            assert_eq!(&bag_of_connected_components(graph, ComponentKind::Attracting), expected);
        }
    } // end of attracting_on_fixtures

    #[test]
    fn weak_on_fixtures() {
        let expected = vec![
            bag(&[]),
            bag(&[("A", 2.), ("B", 1.)]),
            bag(&[("A-A-B", 1.)]),
            bag(&[("A-A-B-B-C-C", 1.)]),
            bag(&[("A-A-B-B-C-C", 1.)]),
        ];
        for (graph, expected) in all().iter().zip(expected.iter()) {
            assert_eq!(&bag_of_connected_components(graph, ComponentKind::Weak), expected);
        }
    } // end of weak_on_fixtures

    #[test]
    fn weak_components_order() {
        let graph = LabeledGraph::from_labels(&["a", "b", "c", "d"], &[(3, 1), (2, 2)]).unwrap();
        assert_eq!(weak_components(&graph), vec![vec![0], vec![1, 3], vec![2]]);
    }
} // end of mod tests
