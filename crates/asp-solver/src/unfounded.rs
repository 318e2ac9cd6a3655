//! Unfounded-set checks for candidate models
//!
//! A set U of atoms true in a candidate model M is unfounded if every rule
//! with a head atom in U is satisfied independently of U: its body is false
//! in M, or one of its positive body atoms is in U, or a head atom outside U
//! is true in M. A candidate with a non-empty unfounded set is not an answer
//! set.
//!
//! Head-cycle-free components are checked with a fixpoint over the shifted
//! program. Other components need a search: the verifier builds a nogood
//! problem whose solutions are exactly the unfounded subsets of the
//! component and hands it to a fresh [`NogoodSolver`].

use crate::annotated::{holds, AnnotatedGroundProgram};
use crate::nogood::{Nogood, NogoodSet};
use crate::nogood_solver::NogoodSolver;
use asp_core::{Handle, Interpretation, Literal};
use std::collections::{BTreeSet, HashSet};

pub struct UnfoundedSetVerifier<'p> {
    program: &'p AnnotatedGroundProgram,
}

impl<'p> UnfoundedSetVerifier<'p> {
    pub fn new(program: &'p AnnotatedGroundProgram) -> Self {
        UnfoundedSetVerifier { program }
    }

    pub fn is_component_hcf(&self, component: usize) -> bool {
        self.program.is_hcf(component)
    }

    /// Literals that satisfy a rule independently of `set`: a false body or
    /// a true head atom outside the set
    pub fn satisfies_independently(&self, rule: usize, set: &HashSet<Handle>) -> Vec<Literal> {
        let rule = self.program.rule(rule);
        let mut literals = vec![Literal::negative(rule.body_atom)];
        literals.extend(
            rule.head
                .iter()
                .filter(|head| !set.contains(head))
                .map(|head| Literal::positive(*head)),
        );
        literals
    }

    /// Rules that could support `set` from outside: a head atom in the set
    /// and no positive body atom in it
    pub fn external_support(&self, set: &HashSet<Handle>) -> BTreeSet<usize> {
        let mut rules = BTreeSet::new();
        for &atom in set {
            for &index in self.program.rules_with_head(atom) {
                let rule = self.program.rule(index);
                if !rule.body.iter().any(|l| !l.naf && set.contains(&l.atom)) {
                    rules.insert(index);
                }
            }
        }
        rules
    }

    /// Search for an unfounded set inside a non-HCF component
    ///
    /// `candidate` is a total assignment including the auxiliary body atoms.
    /// Returns `None` if the component has no unfounded set or is HCF.
    pub fn check_component(&self, candidate: &Interpretation, component: usize) -> Option<Vec<Handle>> {
        if self.is_component_hcf(component) {
            return None;
        }
        let members = self.program.component(component);
        let inside: HashSet<Handle> = members.iter().copied().collect();

        let mut subproblem = NogoodSet::new();
        for (index, rule) in self.program.rules().iter().enumerate() {
            let independent = self
                .satisfies_independently(index, &inside)
                .into_iter()
                .any(|literal| holds(candidate, literal));
            if independent {
                continue;
            }
            // the rule must not justify the set: some positive body atom in
            // the component is in it, or some true head atom is outside it
            let mut justifies = Nogood::new();
            for literal in rule.body.iter().filter(|l| !l.naf && inside.contains(&l.atom)) {
                justifies.insert(Literal::negative(literal.atom));
            }
            for &head in rule.head.iter().filter(|h| inside.contains(h)) {
                if candidate.get_fact(head) {
                    justifies.insert(Literal::positive(head));
                }
            }
            subproblem.add(justifies);
        }

        let mut nonempty = Nogood::new();
        for &atom in members {
            if self.program.facts().get_fact(atom) || !candidate.get_fact(atom) {
                subproblem.add([Literal::positive(atom)].into_iter().collect());
            } else {
                nonempty.insert(Literal::negative(atom));
            }
        }
        subproblem.add(nonempty);

        log::trace!(
            "unfounded set subproblem for component {}: {}",
            component,
            subproblem
        );
        let mut solver = NogoodSolver::with_variables(members.iter().copied(), subproblem);
        let solution = solver.next_model()?;
        let unfounded: Vec<Handle> = members
            .iter()
            .copied()
            .filter(|atom| solution.get_fact(*atom))
            .collect();
        log::debug!(
            "component {} has unfounded set {:?}",
            component,
            unfounded
        );
        Some(unfounded)
    }

    /// Unfounded set of an HCF component, by the shifted fixpoint
    ///
    /// An atom true in the candidate is founded if some rule has it in the
    /// head, a body true in the candidate whose positive atoms inside the
    /// component are founded, and every other head atom false.
    pub fn check_hcf_component(&self, candidate: &Interpretation, component: usize) -> Option<Vec<Handle>> {
        let members = self.program.component(component);
        let inside: HashSet<Handle> = members.iter().copied().collect();
        let true_members: Vec<Handle> = members
            .iter()
            .copied()
            .filter(|atom| candidate.get_fact(*atom))
            .collect();
        let mut founded: HashSet<Handle> = true_members
            .iter()
            .copied()
            .filter(|atom| self.program.facts().get_fact(*atom))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for &atom in &true_members {
                if founded.contains(&atom) {
                    continue;
                }
                let supported = self.program.rules_with_head(atom).iter().any(|&index| {
                    let rule = self.program.rule(index);
                    rule.body.iter().all(|l| holds(candidate, *l))
                        && rule
                            .body
                            .iter()
                            .all(|l| l.naf || !inside.contains(&l.atom) || founded.contains(&l.atom))
                        && rule
                            .head
                            .iter()
                            .all(|h| *h == atom || !candidate.get_fact(*h))
                });
                if supported {
                    founded.insert(atom);
                    changed = true;
                }
            }
        }

        let unfounded: Vec<Handle> = true_members
            .into_iter()
            .filter(|atom| !founded.contains(atom))
            .collect();
        (!unfounded.is_empty()).then_some(unfounded)
    }

    /// A nogood violated by `candidate` that excludes the unfounded set
    ///
    /// It contains one atom of the set true in the candidate and, for every
    /// rule supporting the set from outside, one true literal satisfying
    /// that rule independently of the set.
    pub fn loop_nogood(&self, unfounded: &[Handle], candidate: &Interpretation) -> Nogood {
        let set: HashSet<Handle> = unfounded.iter().copied().collect();
        let mut nogood = Nogood::new();
        if let Some(&atom) = unfounded.iter().find(|atom| candidate.get_fact(**atom)) {
            nogood.insert(Literal::positive(atom));
        }
        for rule in self.external_support(&set) {
            let satisfied = self
                .satisfies_independently(rule, &set)
                .into_iter()
                .find(|literal| holds(candidate, *literal));
            if let Some(literal) = satisfied {
                nogood.insert(literal);
            }
        }
        log::debug!("loop nogood {}", nogood);
        nogood
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asp_core::{Atom, AspProgram, Registry, Rule};

    struct Fixture {
        registry: Registry,
        program: AnnotatedGroundProgram,
    }

    impl Fixture {
        /// Ground program from propositional rules given as (head, positive body)
        fn new(facts: &[&str], rules: &[(&[&str], &[&str])]) -> Self {
            let mut registry = Registry::new();
            let mut edb = Interpretation::new();
            for fact in facts {
                let atom = Self::atom_in(&mut registry, fact);
                edb.set_fact(atom);
            }
            let mut idb = Vec::new();
            for (head, body) in rules {
                let head = head.iter().map(|h| Self::atom_in(&mut registry, h)).collect();
                let body = body
                    .iter()
                    .map(|b| Literal::positive(Self::atom_in(&mut registry, b)))
                    .collect();
                idb.push(registry.store_rule(Rule::new(head, body)));
            }
            let ground = AspProgram::new(edb, idb, 0);
            let program = AnnotatedGroundProgram::new(&mut registry, &ground);
            Fixture { registry, program }
        }

        fn atom_in(registry: &mut Registry, name: &str) -> Handle {
            let predicate = registry.constant(name);
            registry.store_ground_atom(Atom::new(predicate, Vec::new()))
        }

        fn atom(&mut self, name: &str) -> Handle {
            Self::atom_in(&mut self.registry, name)
        }

        /// Candidate with the given atoms true, body atoms set to match
        fn candidate(&mut self, names: &[&str]) -> Interpretation {
            let mut candidate: Interpretation = names.iter().map(|n| self.atom(n)).collect();
            for rule in self.program.rules() {
                if rule.body.iter().all(|l| holds(&candidate, *l)) {
                    candidate.set_fact(rule.body_atom);
                }
            }
            candidate
        }
    }

    #[test]
    fn test_mutual_support_is_unfounded() {
        // a v b :- c. a :- b. b :- a. c v d.  With c false, {a, b, d} is a
        // supported model but nothing outside {a, b} justifies the pair
        let mut fixture = Fixture::new(
            &[],
            &[
                (&["a", "b"], &["c"]),
                (&["a"], &["b"]),
                (&["b"], &["a"]),
                (&["c", "d"], &[]),
            ],
        );
        let (a, b) = (fixture.atom("a"), fixture.atom("b"));
        let candidate = fixture.candidate(&["a", "b", "d"]);
        let verifier = UnfoundedSetVerifier::new(&fixture.program);
        let component = fixture.program.component_of(a).unwrap();
        assert!(!verifier.is_component_hcf(component));

        let mut unfounded = verifier.check_component(&candidate, component).unwrap();
        unfounded.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(unfounded, expected);

        let nogood = verifier.loop_nogood(&unfounded, &candidate);
        assert!(nogood.iter().all(|l| holds(&candidate, *l)));
        assert!(nogood.contains(&Literal::positive(unfounded[0])));
        assert!(nogood.contains(&Literal::negative(fixture.program.rule(0).body_atom)));
        assert_eq!(nogood.len(), 2);
    }

    #[test]
    fn test_disjunction_supports_singleton() {
        let mut fixture = Fixture::new(&[], &[(&["a", "b"], &[])]);
        let a = fixture.atom("a");
        let candidate = fixture.candidate(&["a"]);
        let verifier = UnfoundedSetVerifier::new(&fixture.program);
        let component = fixture.program.component_of(a).unwrap();
        assert!(verifier.is_component_hcf(component));
        assert_eq!(verifier.check_component(&candidate, component), None);
        assert_eq!(verifier.check_hcf_component(&candidate, component), None);
    }

    #[test]
    fn test_externally_supported_cycle_is_founded() {
        // c. a v b :- c. a :- b. b :- a.
        let mut fixture = Fixture::new(
            &["c"],
            &[(&["a", "b"], &["c"]), (&["a"], &["b"]), (&["b"], &["a"])],
        );
        let a = fixture.atom("a");
        let component = fixture.program.component_of(a).unwrap();
        let candidate = fixture.candidate(&["a", "b", "c"]);
        let verifier = UnfoundedSetVerifier::new(&fixture.program);
        assert!(!verifier.is_component_hcf(component));
        assert_eq!(verifier.check_component(&candidate, component), None);
    }

    #[test]
    fn test_facts_are_never_unfounded() {
        let mut fixture = Fixture::new(&["a"], &[(&["a", "b"], &[]), (&["a"], &["b"]), (&["b"], &["a"])]);
        let a = fixture.atom("a");
        let component = fixture.program.component_of(a).unwrap();
        let candidate = fixture.candidate(&["a", "b"]);
        let verifier = UnfoundedSetVerifier::new(&fixture.program);
        assert_eq!(verifier.check_component(&candidate, component), None);
    }

    #[test]
    fn test_hcf_positive_loop_is_unfounded() {
        // a :- b. b :- a. with candidate {a, b}
        let mut fixture = Fixture::new(&[], &[(&["a"], &["b"]), (&["b"], &["a"])]);
        let (a, b) = (fixture.atom("a"), fixture.atom("b"));
        let component = fixture.program.component_of(a).unwrap();
        let candidate = fixture.candidate(&["a", "b"]);
        let verifier = UnfoundedSetVerifier::new(&fixture.program);
        assert!(verifier.is_component_hcf(component));
        assert_eq!(verifier.check_component(&candidate, component), None);

        let mut unfounded = verifier.check_hcf_component(&candidate, component).unwrap();
        unfounded.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(unfounded, expected);

        // no rule supports the loop from outside
        let nogood = verifier.loop_nogood(&unfounded, &candidate);
        assert_eq!(nogood.len(), 1);
    }

    #[test]
    fn test_external_support() {
        let mut fixture = Fixture::new(&["c"], &[(&["a"], &["c"]), (&["a"], &["b"]), (&["b"], &["a"])]);
        let (a, b) = (fixture.atom("a"), fixture.atom("b"));
        let verifier = UnfoundedSetVerifier::new(&fixture.program);
        let set: HashSet<Handle> = [a, b].into_iter().collect();
        let external = verifier.external_support(&set);
        assert_eq!(external.into_iter().collect::<Vec<_>>(), vec![0]);
    }
}
