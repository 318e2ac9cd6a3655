//! Answer sets of ground disjunctive programs
//!
//! The solver translates the program into nogoods and lets a
//! [`NogoodSolver`] enumerate candidate models:
//!
//! - Clark's completion: each rule body gets an auxiliary atom that is true
//!   exactly when the body holds, and a true body forces some head atom
//! - support: every atom that is not a fact needs a rule of the shifted
//!   program (a disjunctive rule shifted to one head atom, the others moved
//!   negated into the body) whose body holds
//! - facts are fixed true
//!
//! Every candidate is then checked for unfounded sets, component by
//! component. On the first one found, its loop nogood is learned and the
//! search continues; otherwise the candidate is an answer set.

use crate::annotated::{fresh_atom, holds, AnnotatedGroundProgram};
use crate::nogood::{Nogood, NogoodSet};
use crate::nogood_solver::NogoodSolver;
use crate::unfounded::UnfoundedSetVerifier;
use asp_core::{AspProgram, Handle, Interpretation, Literal, Registry};
use std::collections::HashMap;

pub struct GroundAspSolver {
    program: AnnotatedGroundProgram,
    solver: NogoodSolver,
    mask: Option<Interpretation>,
    candidates: usize,
    unfounded_sets: usize,
    models: usize,
}

/// Nogoods tying `body_atom` to the conjunction of `body`
fn body_nogoods(nogoods: &mut NogoodSet, body_atom: Handle, body: &[Literal]) {
    let mut all_hold: Nogood = body.iter().copied().collect();
    all_hold.insert(Literal::negative(body_atom));
    nogoods.add(all_hold);
    for literal in body {
        nogoods.add([Literal::positive(body_atom), literal.negated()].into_iter().collect());
    }
}

impl GroundAspSolver {
    pub fn new(registry: &mut Registry, program: &AspProgram) -> Self {
        let annotated = AnnotatedGroundProgram::new(registry, program);
        let mut nogoods = NogoodSet::new();

        for fact in annotated.facts().iter() {
            nogoods.add([Literal::negative(fact)].into_iter().collect());
        }

        // completion; single-head rules are their own shifted rule
        let mut supports: HashMap<Handle, Vec<Handle>> = HashMap::new();
        for rule in annotated.rules() {
            body_nogoods(&mut nogoods, rule.body_atom, &rule.body);
            let mut forces_head = Nogood::new();
            forces_head.insert(Literal::positive(rule.body_atom));
            for &head in &rule.head {
                forces_head.insert(Literal::negative(head));
            }
            nogoods.add(forces_head);

            if rule.head.len() == 1 {
                supports.entry(rule.head[0]).or_default().push(rule.body_atom);
            } else {
                for &head in &rule.head {
                    let mut shifted = rule.body.clone();
                    shifted.extend(
                        rule.head
                            .iter()
                            .filter(|other| **other != head)
                            .map(|other| Literal::negative(*other)),
                    );
                    let shifted_atom = fresh_atom(registry, "shifted");
                    body_nogoods(&mut nogoods, shifted_atom, &shifted);
                    supports.entry(head).or_default().push(shifted_atom);
                }
            }
        }

        for atom in annotated.atoms().iter() {
            if annotated.facts().get_fact(atom) {
                continue;
            }
            let mut unsupported = Nogood::new();
            unsupported.insert(Literal::positive(atom));
            for body in supports.get(&atom).into_iter().flatten() {
                unsupported.insert(Literal::negative(*body));
            }
            nogoods.add(unsupported);
        }

        log::debug!(
            "ground program with {} rules translated into {} nogoods",
            annotated.rules().len(),
            nogoods.len()
        );
        let solver = NogoodSolver::with_variables(annotated.atoms().iter(), nogoods);
        GroundAspSolver {
            program: annotated,
            solver,
            mask: program.mask.clone(),
            candidates: 0,
            unfounded_sets: 0,
            models: 0,
        }
    }

    pub fn program(&self) -> &AnnotatedGroundProgram {
        &self.program
    }

    /// Next answer set, or `None` once all have been returned
    pub fn next_model(&mut self) -> Option<Interpretation> {
        loop {
            let candidate = self.solver.next_model()?;
            self.candidates += 1;
            log::trace!("model candidate {:?}", candidate);

            match self.find_unfounded_set(&candidate) {
                None => {
                    self.models += 1;
                    return Some(self.project(&candidate));
                }
                Some(unfounded) => {
                    self.unfounded_sets += 1;
                    let verifier = UnfoundedSetVerifier::new(&self.program);
                    let nogood = verifier.loop_nogood(&unfounded, &candidate);
                    debug_assert!(nogood.iter().all(|l| holds(&candidate, *l)));
                    self.solver.add_nogood(nogood);
                }
            }
        }
    }

    /// The first unfounded set of any component
    fn find_unfounded_set(&self, candidate: &Interpretation) -> Option<Vec<Handle>> {
        let verifier = UnfoundedSetVerifier::new(&self.program);
        (0..self.program.components().len()).find_map(|component| {
            if verifier.is_component_hcf(component) {
                verifier.check_hcf_component(candidate, component)
            } else {
                verifier.check_component(candidate, component)
            }
        })
    }

    /// Ordinary atoms of a candidate minus the masked ones
    fn project(&self, candidate: &Interpretation) -> Interpretation {
        let mut model = candidate.clone();
        model.intersect_with(self.program.atoms());
        if let Some(mask) = &self.mask {
            model.difference_with(mask);
        }
        model
    }

    pub fn statistics(&self) -> String {
        format!(
            "{}\nmodel candidates: {}, unfounded sets: {}, answer sets: {}",
            self.solver.statistics(),
            self.candidates,
            self.unfounded_sets,
            self.models
        )
    }
}
