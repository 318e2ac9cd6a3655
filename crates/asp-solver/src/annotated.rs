//! Ground program annotated for solving
//!
//! Builtin literals are dropped (every ground instance the grounder emits
//! already satisfies them), each rule gets an auxiliary body atom, and the
//! ordinary atoms are split into the strongly connected components of the
//! positive dependency graph (head atom to positive body atom). A component
//! is head-cycle-free (HCF) if no rule has two head atoms inside it.

use asp_core::{
    strongly_connected_components, Atom, AspProgram, Graph, Handle, Interpretation, Literal,
    Registry,
};
use std::collections::{BTreeSet, HashMap};

/// A ground rule with its auxiliary body atom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundRule {
    pub handle: Handle,
    pub head: Vec<Handle>,
    /// Ordinary body literals
    pub body: Vec<Literal>,
    /// True exactly when every body literal holds
    pub body_atom: Handle,
}

/// A fresh zero-arity ground atom that cannot clash with program atoms
pub(crate) fn fresh_atom(registry: &mut Registry, prefix: &str) -> Handle {
    let predicate = registry.fresh_constant(prefix);
    registry.store_ground_atom(Atom::new(predicate, Vec::new()))
}

#[derive(Debug, Clone, Default)]
pub struct AnnotatedGroundProgram {
    facts: Interpretation,
    rules: Vec<GroundRule>,
    atoms: Interpretation,
    components: Vec<Vec<Handle>>,
    component_of: HashMap<Handle, usize>,
    hcf: Vec<bool>,
    rules_with_head: HashMap<Handle, Vec<usize>>,
}

impl AnnotatedGroundProgram {
    pub fn new(registry: &mut Registry, program: &AspProgram) -> Self {
        let mut annotated = AnnotatedGroundProgram {
            facts: program.edb.clone(),
            atoms: program.edb.clone(),
            ..Default::default()
        };

        for &handle in &program.idb {
            let rule = registry.rule(handle).clone();
            let body: Vec<Literal> = rule
                .body
                .iter()
                .copied()
                .filter(|literal| literal.atom.is_ordinary_atom())
                .collect();
            for atom in rule.head.iter().chain(body.iter().map(|l| &l.atom)) {
                annotated.atoms.set_fact(*atom);
            }
            let index = annotated.rules.len();
            for &head in &rule.head {
                let rules = annotated.rules_with_head.entry(head).or_default();
                if !rules.contains(&index) {
                    rules.push(index);
                }
            }
            annotated.rules.push(GroundRule {
                handle,
                head: rule.head,
                body,
                body_atom: fresh_atom(registry, "body"),
            });
        }

        annotated.compute_components();
        log::debug!(
            "annotated {} rules over {} atoms: {} components, {} not head-cycle-free",
            annotated.rules.len(),
            annotated.atoms.len(),
            annotated.components.len(),
            annotated.hcf.iter().filter(|hcf| !**hcf).count()
        );
        annotated
    }

    fn compute_components(&mut self) {
        let mut graph = Graph::new();
        for atom in self.atoms.iter() {
            graph.add_node(atom);
        }
        for rule in &self.rules {
            for head in &rule.head {
                for literal in rule.body.iter().filter(|l| !l.naf) {
                    if let (Some(from), Some(to)) =
                        (graph.index_of(head), graph.index_of(&literal.atom))
                    {
                        graph.add_edge(from, to);
                    }
                }
            }
        }

        self.components = strongly_connected_components(&graph)
            .into_iter()
            .map(|component| component.into_iter().map(|n| *graph.node(n)).collect())
            .collect();
        for (index, component) in self.components.iter().enumerate() {
            for &atom in component {
                self.component_of.insert(atom, index);
            }
        }

        self.hcf = (0..self.components.len())
            .map(|component| {
                self.rules.iter().all(|rule| {
                    let inside: BTreeSet<&Handle> = rule
                        .head
                        .iter()
                        .filter(|h| self.component_of.get(h) == Some(&component))
                        .collect();
                    inside.len() <= 1
                })
            })
            .collect();
    }

    /// Atoms that are facts of the ground program
    pub fn facts(&self) -> &Interpretation {
        &self.facts
    }

    pub fn rules(&self) -> &[GroundRule] {
        &self.rules
    }

    pub fn rule(&self, index: usize) -> &GroundRule {
        &self.rules[index]
    }

    /// Ordinary atoms of the program, auxiliary atoms excluded
    pub fn atoms(&self) -> &Interpretation {
        &self.atoms
    }

    pub fn components(&self) -> &[Vec<Handle>] {
        &self.components
    }

    pub fn component(&self, index: usize) -> &[Handle] {
        &self.components[index]
    }

    pub fn component_of(&self, atom: Handle) -> Option<usize> {
        self.component_of.get(&atom).copied()
    }

    pub fn is_hcf(&self, component: usize) -> bool {
        self.hcf.get(component).copied().unwrap_or(true)
    }

    /// Indices of the rules with `atom` in their head
    pub fn rules_with_head(&self, atom: Handle) -> &[usize] {
        self.rules_with_head
            .get(&atom)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Whether `literal` holds in `interpretation`
pub fn holds(interpretation: &Interpretation, literal: Literal) -> bool {
    interpretation.get_fact(literal.atom) != literal.naf
}
