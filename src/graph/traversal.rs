//! Breadth first search from a source node following outgoing edges, with an optional hop cutoff.
//!
//! Successors are visited in ascending node id and the first parent discovering a node is kept.
//! So among the shortest paths from the source to a node, the path recorded is the one
//! whose sequence of node ids is lexicographically smallest.

use std::collections::VecDeque;

const UNREACHED: usize = usize::MAX;

/// Result of a bfs from a source. Nodes are stored in discovery order.
pub struct BfsTree {
    source: usize,
    /// reached nodes in discovery order, source first
    reached: Vec<usize>,
    /// parent of each node in the bfs tree, UNREACHED if not reached
    parent: Vec<usize>,
    /// hop distance from source
    dist: Vec<usize>,
} // end of struct BfsTree


impl BfsTree {

    /// explores from source. adjacency must contain sorted successor lists.
    /// cutoff is the maximal number of hops, None for no limit.
    pub fn explore(adjacency: &[Vec<usize>], source: usize, cutoff: Option<usize>) -> Self {
        let nb_nodes = adjacency.len();
        let mut parent = vec![UNREACHED; nb_nodes];
        let mut dist = vec![UNREACHED; nb_nodes];
        let mut reached = Vec::<usize>::new();
        let mut queue = VecDeque::<usize>::new();
        //
        parent[source] = source;
        dist[source] = 0;
        reached.push(source);
        queue.push_back(source);
        while let Some(node) = queue.pop_front() {
            if let Some(cutoff) = cutoff {
                if dist[node] >= cutoff {
                    continue;
                }
            }
            for &succ in &adjacency[node] {
                if dist[succ] == UNREACHED {
                    dist[succ] = dist[node] + 1;
                    parent[succ] = node;
                    reached.push(succ);
                    queue.push_back(succ);
                }
            }
        }
        BfsTree { source, reached, parent, dist }
    } // end of explore


    pub fn get_source(&self) -> usize {
        self.source
    }

    /// reached nodes in discovery order, the source included
    pub fn reached(&self) -> &[usize] {
        &self.reached
    }

    /// reached nodes other than the source
    pub fn reached_others(&self) -> impl Iterator<Item = usize> + '_ {
        self.reached[1..].iter().copied()
    }

    /// hop distance to node, None if not reached
    pub fn distance(&self, node: usize) -> Option<usize> {
        if self.dist[node] == UNREACHED { None } else { Some(self.dist[node]) }
    }

    /// path from source to node (both included), None if node not reached
    pub fn path_to(&self, node: usize) -> Option<Vec<usize>> {
        if self.dist[node] == UNREACHED {
            return None;
        }
        let mut path = Vec::<usize>::with_capacity(self.dist[node] + 1);
        let mut current = node;
        path.push(current);
        while current != self.source {
            current = self.parent[current];
            path.push(current);
        }
        path.reverse();
        Some(path)
    } // end of path_to
} // end of impl BfsTree


// end of mod tests
