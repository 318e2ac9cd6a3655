//! Predicate dependency analysis and stratification
//!
//! Grounding proceeds stratum by stratum. A stratum is one strongly
//! connected component of the predicate dependency graph, and strata are
//! numbered so that every predicate a stratum depends on lives in the same
//! or an earlier stratum.
//!
//! # Algorithm
//!
//! 1. Add a node for every predicate of the EDB and of every rule head and
//!    ordinary body literal (builtins are not nodes)
//! 2. Add an edge from each head predicate to each body predicate, and
//!    between the distinct head predicates of a disjunctive rule
//! 3. Compute the strongly connected components and topologically sort the
//!    condensation so that dependencies come first
//! 4. Assign each rule the highest stratum of its head and body predicates
//!
//! # Example
//!
//! ```ignore
//! let stratification = analyze(&registry, &program);
//! for stratum in 0..stratification.num_strata() {
//!     for rule in &stratification.rules_of_stratum[stratum] { /* ... */ }
//! }
//! ```

use asp_core::{
    condensation, strongly_connected_components, topological_sort, AspProgram, Graph, Handle,
    Registry,
};
use std::collections::{BTreeSet, HashMap};

/// Result of stratification analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stratification {
    pub predicates_of_stratum: Vec<BTreeSet<Handle>>,
    pub stratum_of_predicate: HashMap<Handle, usize>,
    pub rules_of_stratum: Vec<Vec<Handle>>,
}

impl Stratification {
    pub fn num_strata(&self) -> usize {
        self.predicates_of_stratum.len()
    }

    pub fn stratum_of(&self, predicate: Handle) -> Option<usize> {
        self.stratum_of_predicate.get(&predicate).copied()
    }
}

/// Ordinary predicates of the head and body of a rule
fn rule_predicates(registry: &Registry, rule: Handle) -> (Vec<Handle>, Vec<Handle>) {
    let rule = registry.rule(rule);
    let head = rule
        .head
        .iter()
        .map(|atom| registry.predicate_of(*atom))
        .collect();
    let body = rule
        .body
        .iter()
        .filter(|literal| literal.atom.is_ordinary_atom())
        .map(|literal| registry.predicate_of(literal.atom))
        .collect();
    (head, body)
}

fn dependency_graph(registry: &Registry, program: &AspProgram) -> Graph<Handle> {
    let mut graph = Graph::new();

    for atom in program.edb.iter() {
        graph.add_node(registry.predicate_of(atom));
    }

    for &rule in &program.idb {
        let (head, body) = rule_predicates(registry, rule);
        let head: Vec<usize> = head.into_iter().map(|p| graph.add_node(p)).collect();
        let body: Vec<usize> = body.into_iter().map(|p| graph.add_node(p)).collect();

        for &h in &head {
            for &b in &body {
                graph.add_edge(h, b);
            }
            for &other in &head {
                if other != h {
                    graph.add_edge(h, other);
                }
            }
        }
    }

    graph
}

/// Stratify the predicates and rules of a program
pub fn analyze(registry: &Registry, program: &AspProgram) -> Stratification {
    let graph = dependency_graph(registry, program);
    let components = strongly_connected_components(&graph);
    let order = topological_sort(&condensation(&graph, &components));

    let mut predicates_of_stratum = Vec::with_capacity(order.len());
    let mut stratum_of_predicate = HashMap::new();
    for (stratum, &component) in order.iter().enumerate() {
        let predicates: BTreeSet<Handle> = components[component]
            .iter()
            .map(|&node| *graph.node(node))
            .collect();
        for &predicate in &predicates {
            stratum_of_predicate.insert(predicate, stratum);
        }
        predicates_of_stratum.push(predicates);
    }

    let mut rules_of_stratum = vec![Vec::new(); predicates_of_stratum.len().max(1)];
    for &rule in &program.idb {
        let (head, body) = rule_predicates(registry, rule);
        let stratum = head
            .iter()
            .chain(body.iter())
            .filter_map(|p| stratum_of_predicate.get(p))
            .copied()
            .max()
            .unwrap_or(0);
        rules_of_stratum[stratum].push(rule);
    }
    if predicates_of_stratum.is_empty() {
        // only constraints over builtins, which still have to be grounded
        predicates_of_stratum.push(BTreeSet::new());
    }

    log::debug!(
        "stratified {} predicates into {} strata",
        stratum_of_predicate.len(),
        predicates_of_stratum.len()
    );

    Stratification {
        predicates_of_stratum,
        stratum_of_predicate,
        rules_of_stratum,
    }
}
