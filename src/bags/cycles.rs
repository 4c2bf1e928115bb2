//! Bag of elementary cycles.
//!
//! Cycles are enumerated with Johnson's algorithm (Finding all the elementary circuits of a directed graph, 1975).
//! For each start node s in ascending order we search circuits through s in the strongly connected
//! component of s within the subgraph induced by nodes >= s, so each cycle is found once and starts at its smallest node id.
//! A self loop is a cycle of length 1.
//!
//! The key of a cycle is its label sequence rotated to begin at the first occurrence of its smallest label.

use std::collections::VecDeque;

use crate::graph::LabeledGraph;

use super::{Bag, SEQ_SEP};


/// counts rotated label sequences of all simple cycles
pub fn bag_of_elementary_cycles(graph: &LabeledGraph) -> Bag {
    let mut bag = Bag::new();
    let adjacency = graph.adjacency();
    let mut nb_cycles = 0usize;
    johnson_cycles(&adjacency, |cycle| {
        let labels: Vec<&str> = graph.labels_of(cycle).collect();
        bag.incr(rotate_to_smallest(&labels).join(SEQ_SEP));
        nb_cycles += 1;
    });
    log::trace!("{} : {} elementary cycles", graph.describe(), nb_cycles);
    bag
} // end of bag_of_elementary_cycles


/// rotates so that the sequence starts at the first occurrence of its smallest element
fn rotate_to_smallest<'a>(labels: &[&'a str]) -> Vec<&'a str> {
    let mut first_min = 0;
    for (i, label) in labels.iter().enumerate() {
        if *label < labels[first_min] {
            first_min = i;
        }
    }
    let mut rotated = labels[first_min..].to_vec();
    rotated.extend_from_slice(&labels[..first_min]);
    rotated
} // end of rotate_to_smallest


/// Calls emit on each elementary cycle of the graph given by its sorted adjacency lists.
/// A cycle is given as its node sequence starting at its smallest node, following edge direction.
pub fn johnson_cycles<F>(adjacency: &[Vec<usize>], mut emit: F)
    where F: FnMut(&[usize]) {
    //
    let nb_nodes = adjacency.len();
    let mut predecessors = vec![Vec::<usize>::new(); nb_nodes];
    for (node, succs) in adjacency.iter().enumerate() {
        for succ in succs {
            predecessors[*succ].push(node);
        }
    }
    //
    let mut blocked = vec![false; nb_nodes];
    let mut closed = vec![false; nb_nodes];
    let mut b_sets = vec![Vec::<usize>::new(); nb_nodes];
    for start in 0..nb_nodes {
        let in_component = component_from(adjacency, &predecessors, start);
        let has_self_loop = adjacency[start].binary_search(&start).is_ok();
        let component_size = in_component.iter().filter(|b| **b).count();
        if component_size <= 1 && !has_self_loop {
            continue;
        }
        // reset search state on component
        for node in start..nb_nodes {
            blocked[node] = false;
            closed[node] = false;
            b_sets[node].clear();
        }
        let successors_in = |node: usize| -> Vec<usize> {
            adjacency[node].iter().copied().filter(|s| in_component[*s]).collect()
        };
        //
        let mut path = vec![start];
        blocked[start] = true;
        let mut stack: Vec<(usize, Vec<usize>)> = vec![(start, successors_in(start))];
        while !stack.is_empty() {
            let top = stack.len() - 1;
            let this_node = stack[top].0;
            if let Some(next_node) = stack[top].1.pop() {
                if next_node == start {
                    emit(&path);
                    for node in &path {
                        closed[*node] = true;
                    }
                } else if !blocked[next_node] {
                    path.push(next_node);
                    stack.push((next_node, successors_in(next_node)));
                    closed[next_node] = false;
                    blocked[next_node] = true;
                    continue;
                }
            }
            if stack[top].1.is_empty() {
                if closed[this_node] {
                    unblock(this_node, &mut blocked, &mut b_sets);
                } else {
                    for succ in successors_in(this_node) {
                        if !b_sets[succ].contains(&this_node) {
                            b_sets[succ].push(this_node);
                        }
                    }
                }
                stack.pop();
                path.pop();
            }
        } // end while
    } // end for start
} // end of johnson_cycles


fn unblock(node: usize, blocked: &mut [bool], b_sets: &mut [Vec<usize>]) {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        if blocked[node] {
            blocked[node] = false;
            stack.append(&mut b_sets[node]);
        }
    }
} // end of unblock


/// strongly connected component of start in the subgraph of nodes >= start,
/// as the intersection of forward and backward reachable sets.
fn component_from(adjacency: &[Vec<usize>], predecessors: &[Vec<usize>], start: usize) -> Vec<bool> {
    let forward = reachable_from(adjacency, start);
    let backward = reachable_from(predecessors, start);
    forward.iter().zip(backward.iter()).map(|(f, b)| *f && *b).collect()
} // end of component_from


fn reachable_from(neighbours: &[Vec<usize>], start: usize) -> Vec<bool> {
    let mut seen = vec![false; neighbours.len()];
    let mut queue = VecDeque::<usize>::new();
    seen[start] = true;
    queue.push_back(start);
    while let Some(node) = queue.pop_front() {
        for &next in &neighbours[node] {
            if next >= start && !seen[next] {
                seen[next] = true;
                queue.push_back(next);
            }
        }
    }
    seen
} // end of reachable_from


// end of mod tests
