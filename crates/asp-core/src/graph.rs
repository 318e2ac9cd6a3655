//! Arena graph with strongly connected components and topological sorting
//!
//! Nodes are kept in a vector and addressed by index; adjacency is a vector
//! of successor indices per node. The algorithms are free functions over the
//! arena so the same code serves the predicate dependency graph of the
//! grounder and the atom dependency graph of the solver.
//!
//! # Algorithm
//!
//! 1. `strongly_connected_components` runs Tarjan's algorithm with an
//!    explicit work stack
//! 2. `condensation` collapses every component into a single node
//! 3. `topological_sort` orders an acyclic graph so that every node comes
//!    after all nodes it has an edge to
//!
//! # Example
//!
//! ```ignore
//! let mut graph = Graph::new();
//! let p = graph.add_node("p");
//! let q = graph.add_node("q");
//! graph.add_edge(p, q);
//! let sccs = strongly_connected_components(&graph);
//! let order = topological_sort(&condensation(&graph, &sccs));
//! ```

use std::collections::HashMap;
use std::hash::Hash;

const UNVISITED: usize = usize::MAX;

#[derive(Debug, Clone)]
pub struct Graph<N> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    successors: Vec<Vec<usize>>,
}

impl<N: Clone + Eq + Hash> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Clone + Eq + Hash> Graph<N> {
    pub fn new() -> Self {
        Graph {
            nodes: Vec::new(),
            index: HashMap::new(),
            successors: Vec::new(),
        }
    }

    /// Add a node, or return the index of the existing equal node
    pub fn add_node(&mut self, node: N) -> usize {
        if let Some(&index) = self.index.get(&node) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(node.clone());
        self.index.insert(node, index);
        self.successors.push(Vec::new());
        index
    }

    /// Add an edge; parallel edges are collapsed
    pub fn add_edge(&mut self, from: usize, to: usize) {
        let successors = &mut self.successors[from];
        if !successors.contains(&to) {
            successors.push(to);
        }
    }

    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.index.get(node).copied()
    }

    pub fn node(&self, index: usize) -> &N {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }
}

impl<N> Graph<N> {
    pub fn len(&self) -> usize {
        self.successors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.successors.is_empty()
    }

    pub fn successors(&self, index: usize) -> &[usize] {
        &self.successors[index]
    }
}

/// Tarjan's algorithm
///
/// Components are returned so that a component comes after every component
/// reachable from it is already listed, i.e. sinks first.
pub fn strongly_connected_components<N>(graph: &Graph<N>) -> Vec<Vec<usize>> {
    let n = graph.len();
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut components = Vec::new();
    let mut next_index = 0;
    // (node, position of the next successor to visit)
    let mut work: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }
        work.push((root, 0));

        while let Some((node, pos)) = work.pop() {
            if pos == 0 {
                index[node] = next_index;
                lowlink[node] = next_index;
                next_index += 1;
                stack.push(node);
                on_stack[node] = true;
            }

            let successors = graph.successors(node);
            if pos < successors.len() {
                let succ = successors[pos];
                work.push((node, pos + 1));
                if index[succ] == UNVISITED {
                    work.push((succ, 0));
                } else if on_stack[succ] {
                    lowlink[node] = lowlink[node].min(index[succ]);
                }
                continue;
            }

            if lowlink[node] == index[node] {
                let mut component = Vec::new();
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                component.sort_unstable();
                components.push(component);
            }

            if let Some(&(parent, _)) = work.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[node]);
            }
        }
    }

    components
}

/// Component index of every node
pub fn component_index(node_count: usize, components: &[Vec<usize>]) -> Vec<usize> {
    let mut index = vec![0; node_count];
    for (c, members) in components.iter().enumerate() {
        for &member in members {
            index[member] = c;
        }
    }
    index
}

/// Graph with one node per component and an edge wherever some member of
/// one component has an edge to a member of another
pub fn condensation<N>(graph: &Graph<N>, components: &[Vec<usize>]) -> Graph<usize> {
    let of = component_index(graph.len(), components);
    let mut condensed = Graph::new();
    for c in 0..components.len() {
        condensed.add_node(c);
    }
    for (c, members) in components.iter().enumerate() {
        for &member in members {
            for &succ in graph.successors(member) {
                if of[succ] != c {
                    condensed.add_edge(c, of[succ]);
                }
            }
        }
    }
    condensed
}

/// Order the nodes of an acyclic graph so that every node appears after all
/// nodes it has an edge to
pub fn topological_sort<N>(graph: &Graph<N>) -> Vec<usize> {
    let n = graph.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut work: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        work.push((root, 0));

        while let Some((node, pos)) = work.pop() {
            let successors = graph.successors(node);
            if pos < successors.len() {
                work.push((node, pos + 1));
                let succ = successors[pos];
                if !visited[succ] {
                    visited[succ] = true;
                    work.push((succ, 0));
                }
            } else {
                order.push(node);
            }
        }
    }

    order
}
