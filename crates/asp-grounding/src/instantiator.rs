//! Stratified instantiation of non-ground rules
//!
//! The instantiator turns a non-ground disjunctive program into an
//! equivalent ground program. It works stratum by stratum; within a stratum
//! it first grounds every rule against the atoms derivable so far and then
//! re-grounds semi-naively: each newly derivable atom is matched against
//! every positive body position of its predicate and the rest of the body
//! is searched with that binding fixed.
//!
//! # Algorithm
//!
//! 1. Reorder each rule body: positive ordinary literals, then builtins in
//!    binding order, then negated literals
//! 2. Search substitutions with an explicit stack of frames, one per body
//!    position, each holding a cursor into the candidates of that position
//!    and the substitution in force before it
//! 3. On failure, or after emitting an instance, resume at the nearest
//!    preceding positive literal
//! 4. Simplify every instance against the facts and the derivable atoms
//!    known so far; single-atom rules with an empty body become facts
//! 5. After a stratum reaches its fixpoint, its predicates are grounded and,
//!    if every derivable atom is already true, solved
//!
//! # Example
//!
//! ```ignore
//! // a(1). a(2). b(X) :- a(X), X != 1.
//! // Produces the facts a(1), a(2), b(2) and no rules
//! let ground = Instantiator::ground(&mut registry, &program, &GroundingOptions::default());
//! ```

use crate::builtins::{eval_arithmetic, eval_comparison};
use crate::ground_program::GroundProgramStore;
use crate::stratification::{analyze, Stratification};
use asp_core::{
    match_atom, match_term, AspProgram, BuiltinOp, Handle, Interpretation, Literal, Registry,
    Rule, Substitution,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// How aggressively ground instances are simplified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptLevel {
    /// Keep every body literal, builtins included
    None,
    /// Drop builtin literals, which hold for every emitted instance
    Builtin,
    /// Also drop literals decided by facts and discard instances that can
    /// never fire
    #[default]
    Full,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingOptions {
    /// Overrides the `#maxint` of the program
    pub maxint: Option<u32>,
    pub optimization: OptLevel,
}

struct PreparedRule {
    head: Vec<Handle>,
    body: Vec<Literal>,
}

/// Search state of one body position
struct Frame {
    cursor: usize,
    subst: Substitution,
}

pub struct Instantiator<'r> {
    registry: &'r mut Registry,
    optimization: OptLevel,
    maxint: u32,
    stratification: Stratification,
    store: GroundProgramStore,
    derivable: HashMap<Handle, Vec<Handle>>,
    derivable_set: HashSet<Handle>,
    grounded: HashSet<Handle>,
    solved: HashSet<Handle>,
    rules: Vec<PreparedRule>,
    /// Positive ordinary body positions of the current stratum by predicate
    positions: HashMap<Handle, Vec<(usize, usize)>>,
    warned_unbound_builtin: bool,
}

impl<'r> Instantiator<'r> {
    pub fn new(registry: &'r mut Registry, program: &AspProgram, options: &GroundingOptions) -> Self {
        let stratification = analyze(registry, program);
        let mut instantiator = Instantiator {
            registry,
            optimization: options.optimization,
            maxint: options.maxint.unwrap_or(program.maxint),
            stratification,
            store: GroundProgramStore::new(),
            derivable: HashMap::new(),
            derivable_set: HashSet::new(),
            grounded: HashSet::new(),
            solved: HashSet::new(),
            rules: Vec::new(),
            positions: HashMap::new(),
            warned_unbound_builtin: false,
        };
        for fact in program.edb.iter() {
            instantiator.store.set_true(fact);
            instantiator.insert_derivable(fact);
        }
        instantiator
    }

    /// Ground a whole program
    pub fn ground(
        registry: &mut Registry,
        program: &AspProgram,
        options: &GroundingOptions,
    ) -> AspProgram {
        let mut instantiator = Instantiator::new(registry, program, options);
        for stratum in 0..instantiator.num_strata() {
            instantiator.ground_stratum(stratum);
        }
        instantiator.finish(program.mask.clone())
    }

    pub fn num_strata(&self) -> usize {
        self.stratification.num_strata()
    }

    pub fn stratification(&self) -> &Stratification {
        &self.stratification
    }

    pub fn is_atom_derivable(&self, atom: Handle) -> bool {
        self.derivable_set.contains(&atom)
    }

    pub fn is_predicate_grounded(&self, predicate: Handle) -> bool {
        self.grounded.contains(&predicate)
    }

    pub fn is_predicate_solved(&self, predicate: Handle) -> bool {
        self.solved.contains(&predicate)
    }

    /// The ground program produced so far
    pub fn finish(self, mask: Option<Interpretation>) -> AspProgram {
        self.store.into_program(self.maxint, mask)
    }

    /// Ground all rules of one stratum to a fixpoint
    ///
    /// Strata must be grounded in order.
    pub fn ground_stratum(&mut self, stratum: usize) {
        self.prepare_stratum(stratum);
        log::debug!(
            "grounding stratum {} with {} rules",
            stratum,
            self.rules.len()
        );

        let mut new_atoms = BTreeSet::new();
        for rule in 0..self.rules.len() {
            self.ground_rule(rule, Substitution::new(), &mut new_atoms);
        }
        while let Some(atom) = new_atoms.pop_first() {
            self.add_derivable_atom(atom, &mut new_atoms);
        }

        for &predicate in &self.stratification.predicates_of_stratum[stratum] {
            self.grounded.insert(predicate);
            let all_true = self.derivable.get(&predicate).map_or(true, |atoms| {
                atoms.iter().all(|atom| self.store.is_true(*atom))
            });
            if all_true {
                self.solved.insert(predicate);
            }
        }
        log::debug!(
            "stratum {} done: {} derivable atoms, {} ground rules",
            stratum,
            self.derivable_set.len(),
            self.store.rules().len()
        );
    }

    fn prepare_stratum(&mut self, stratum: usize) {
        self.rules.clear();
        self.positions.clear();
        let handles = self.stratification.rules_of_stratum[stratum].clone();
        for handle in handles {
            let rule = self.registry.rule(handle).clone();
            let body = order_body(self.registry, &rule.body);
            let index = self.rules.len();
            for (position, literal) in body.iter().enumerate() {
                if literal.atom.is_ordinary_atom() && !literal.naf {
                    let predicate = self.registry.predicate_of(literal.atom);
                    self.positions
                        .entry(predicate)
                        .or_default()
                        .push((index, position));
                }
            }
            self.rules.push(PreparedRule {
                head: rule.head,
                body,
            });
        }
    }

    fn insert_derivable(&mut self, atom: Handle) -> bool {
        if !self.derivable_set.insert(atom) {
            return false;
        }
        let predicate = self.registry.predicate_of(atom);
        self.derivable.entry(predicate).or_default().push(atom);
        true
    }

    /// Make an atom derivable and ground every rule instance it enables
    fn add_derivable_atom(&mut self, atom: Handle, new_atoms: &mut BTreeSet<Handle>) {
        if !self.insert_derivable(atom) {
            return;
        }
        let predicate = self.registry.predicate_of(atom);
        let positions = match self.positions.get(&predicate) {
            Some(positions) => positions.clone(),
            None => return,
        };
        for (rule, position) in positions {
            let pattern = self.registry.atom(self.rules[rule].body[position].atom);
            let mut subst = Substitution::new();
            if match_atom(pattern, self.registry.atom(atom), &mut subst) {
                self.ground_rule(rule, subst, new_atoms);
            }
        }
    }

    /// Enumerate every substitution extending `initial` that matches the body
    fn ground_rule(&mut self, rule: usize, initial: Substitution, new_atoms: &mut BTreeSet<Handle>) {
        let body = self.rules[rule].body.clone();
        if body.is_empty() {
            self.build_ground_instance(rule, &initial, new_atoms);
            return;
        }

        let mut frames = vec![Frame {
            cursor: 0,
            subst: initial,
        }];
        while let Some(position) = frames.len().checked_sub(1) {
            let cursor = frames[position].cursor;
            let mut subst = frames[position].subst.clone();
            match self.match_next(body[position], &mut subst, cursor) {
                Some(next) => {
                    frames[position].cursor = next;
                    if position + 1 == body.len() {
                        self.build_ground_instance(rule, &subst, new_atoms);
                        backtrack_to_positive(&mut frames, &body);
                    } else {
                        frames.push(Frame { cursor: 0, subst });
                    }
                }
                None => {
                    frames.pop();
                    backtrack_to_positive(&mut frames, &body);
                }
            }
        }
    }

    /// Find the next match of a body literal at or after `cursor`
    ///
    /// On success `subst` is extended and the cursor to resume from is
    /// returned.
    fn match_next(&mut self, literal: Literal, subst: &mut Substitution, cursor: usize) -> Option<usize> {
        if literal.atom.is_builtin_atom() {
            self.match_builtin(literal.atom, subst, cursor)
        } else if literal.naf {
            self.match_naf(literal.atom, subst, cursor)
        } else {
            self.match_ordinary(literal.atom, subst, cursor)
        }
    }

    fn match_ordinary(&self, atom: Handle, subst: &mut Substitution, cursor: usize) -> Option<usize> {
        let pattern = self.registry.atom(atom);
        let candidates = self.derivable.get(&pattern.predicate)?;
        for (index, &candidate) in candidates.iter().enumerate().skip(cursor) {
            let mut attempt = subst.clone();
            if match_atom(pattern, self.registry.atom(candidate), &mut attempt) {
                *subst = attempt;
                return Some(index + 1);
            }
        }
        None
    }

    fn match_naf(&self, atom: Handle, subst: &Substitution, cursor: usize) -> Option<usize> {
        if cursor > 0 {
            return None;
        }
        let pattern = self.registry.atom(atom);
        if !self.solved.contains(&pattern.predicate) {
            return Some(1);
        }
        let ground = subst.apply_atom(pattern);
        match self.registry.lookup_ground_atom(&ground) {
            Some(handle) if self.derivable_set.contains(&handle) => None,
            _ => Some(1),
        }
    }

    fn match_builtin(&mut self, atom: Handle, subst: &mut Substitution, cursor: usize) -> Option<usize> {
        let stored = self.registry.atom(atom);
        let op = stored.predicate.as_builtin()?;
        let args: Vec<Handle> = stored.args.iter().map(|arg| subst.apply(*arg)).collect();
        match (op, args.as_slice()) {
            (BuiltinOp::Int, &[x]) => self.match_int(x, subst, cursor),
            (op, &[left, right]) if op.is_comparison() => {
                self.match_comparison(op, left, right, subst, cursor)
            }
            (op, &[x, y, z]) if op.is_arithmetic() => self.match_arithmetic(op, x, y, z, subst, cursor),
            _ => None,
        }
    }

    fn match_int(&self, x: Handle, subst: &mut Substitution, cursor: usize) -> Option<usize> {
        if x.is_variable() {
            let value = u32::try_from(cursor).ok().filter(|v| *v <= self.maxint)?;
            subst.bind(x, Handle::integer(value));
            Some(cursor + 1)
        } else if cursor == 0 && x.as_integer().is_some_and(|n| n <= self.maxint) {
            Some(1)
        } else {
            None
        }
    }

    fn match_comparison(
        &mut self,
        op: BuiltinOp,
        left: Handle,
        right: Handle,
        subst: &mut Substitution,
        cursor: usize,
    ) -> Option<usize> {
        if cursor > 0 {
            return None;
        }
        if op == BuiltinOp::Eq {
            match (left.is_variable(), right.is_variable()) {
                (true, false) => {
                    subst.bind(left, right);
                    return Some(1);
                }
                (false, true) => {
                    subst.bind(right, left);
                    return Some(1);
                }
                _ => {}
            }
        }
        if left.is_variable() || right.is_variable() {
            if !self.warned_unbound_builtin {
                log::warn!("comparison over an unbound variable never holds; is the rule safe?");
                self.warned_unbound_builtin = true;
            }
            return None;
        }
        eval_comparison(self.registry, op, left, right)
            .filter(|holds| *holds)
            .map(|_| 1)
    }

    /// Enumerate operand pairs in `0..=maxint` row by row; the cursor is the
    /// linear index of the next pair
    fn match_arithmetic(
        &self,
        op: BuiltinOp,
        x: Handle,
        y: Handle,
        z: Handle,
        subst: &mut Substitution,
        cursor: usize,
    ) -> Option<usize> {
        let operand = |h: Handle| {
            if h.is_variable() {
                Some(None)
            } else {
                h.as_integer().map(Some)
            }
        };
        let (fixed_x, fixed_y) = (operand(x)?, operand(y)?);
        if !z.is_variable() && !z.is_integer() {
            return None;
        }

        if let (Some(vx), Some(vy)) = (fixed_x, fixed_y) {
            if cursor > 0 {
                return None;
            }
            let result = eval_arithmetic(op, vx, vy, self.maxint)?;
            return match_term(z, Handle::integer(result), subst).then_some(1);
        }

        let width = self.maxint as usize + 1;
        let (mut index, end) = match fixed_x {
            Some(vx) if vx > self.maxint => return None,
            Some(vx) => (cursor.max(vx as usize * width), (vx as usize + 1) * width),
            None => (cursor, width.checked_mul(width)?),
        };
        while index < end {
            let (vx, vy) = ((index / width) as u32, (index % width) as u32);
            index += 1;
            if fixed_y.is_some_and(|v| v != vy) {
                continue;
            }
            let Some(result) = eval_arithmetic(op, vx, vy, self.maxint) else {
                continue;
            };
            let mut attempt = subst.clone();
            if match_term(x, Handle::integer(vx), &mut attempt)
                && match_term(y, Handle::integer(vy), &mut attempt)
                && match_term(z, Handle::integer(result), &mut attempt)
            {
                *subst = attempt;
                return Some(index);
            }
        }
        None
    }

    /// Apply `subst` to a rule, simplify it and store the instance
    fn build_ground_instance(
        &mut self,
        rule: usize,
        subst: &Substitution,
        new_atoms: &mut BTreeSet<Handle>,
    ) {
        let mut head = Vec::new();
        for atom in self.rules[rule].head.clone() {
            let ground = subst.apply_to_handle(self.registry, atom);
            if !head.contains(&ground) {
                head.push(ground);
            }
        }
        let mut full_body = Vec::new();
        for literal in self.rules[rule].body.clone() {
            full_body.push(Literal {
                atom: subst.apply_to_handle(self.registry, literal.atom),
                naf: literal.naf,
            });
        }

        let non_ground = head
            .iter()
            .chain(full_body.iter().map(|literal| &literal.atom))
            .any(|atom| atom.is_ordinary_atom() && !atom.is_ground_atom());
        if non_ground {
            if !self.warned_unbound_builtin {
                log::warn!("skipping a rule instance that is not ground; is the rule safe?");
                self.warned_unbound_builtin = true;
            }
            return;
        }

        let mut body = match self.simplify_body(&full_body, self.optimization) {
            Some(body) => body,
            None => return,
        };
        if head.is_empty() && body.is_empty() && !full_body.is_empty() {
            // the constraint is violated; keep it unsimplified so the solver sees it
            body = full_body;
        }

        if head.len() == 1 && body.is_empty() {
            if self.store.set_true(head[0]) {
                log::trace!("fact {}", self.registry.display(head[0]));
            }
        } else {
            let handle = self.registry.store_rule(Rule::new(head.clone(), body));
            if self.store.add_rule(handle) {
                log::trace!("rule {}", self.registry.display(handle));
            }
        }

        for atom in head {
            if !self.derivable_set.contains(&atom) {
                new_atoms.insert(atom);
            }
        }
    }

    /// Simplify a ground body
    ///
    /// Returns `None` if the instance can never fire.
    fn simplify_body(&self, body: &[Literal], level: OptLevel) -> Option<Vec<Literal>> {
        let mut kept: Vec<Literal> = Vec::with_capacity(body.len());
        for &literal in body {
            if literal.atom.is_builtin_atom() {
                if level == OptLevel::None {
                    kept.push(literal);
                }
                continue;
            }
            if level == OptLevel::Full {
                let predicate = self.registry.predicate_of(literal.atom);
                let resolved = self.grounded.contains(&predicate);
                let derivable = self.derivable_set.contains(&literal.atom);
                let true_fact = self.store.is_true(literal.atom);
                if literal.naf {
                    if true_fact {
                        return None;
                    }
                    if resolved && !derivable {
                        continue;
                    }
                } else {
                    if true_fact {
                        continue;
                    }
                    if resolved && !derivable {
                        return None;
                    }
                }
                if kept.contains(&literal.negated()) {
                    return None;
                }
            }
            if !kept.contains(&literal) {
                kept.push(literal);
            }
        }
        Some(kept)
    }
}

/// Drop frames of negated literals so the search resumes at the nearest
/// preceding positive literal
fn backtrack_to_positive(frames: &mut Vec<Frame>, body: &[Literal]) {
    while frames.len().checked_sub(1).is_some_and(|top| body[top].naf) {
        frames.pop();
    }
}

/// Positive ordinary literals, then builtins, then negated literals
///
/// Builtins are placed greedily: ready comparisons first, then equalities
/// that bind one variable, arithmetic with bound operands, `#int`
/// generators and finally arithmetic that has to enumerate its operands.
fn order_body(registry: &Registry, body: &[Literal]) -> Vec<Literal> {
    let mut ordered = Vec::with_capacity(body.len());
    let mut bound = BTreeSet::new();
    let mut builtins = Vec::new();
    let mut negated = Vec::new();
    for &literal in body {
        if literal.atom.is_builtin_atom() {
            builtins.push(literal);
        } else if literal.naf {
            negated.push(literal);
        } else {
            registry.variables_in(literal.atom, &mut bound);
            ordered.push(literal);
        }
    }

    while !builtins.is_empty() {
        let index = (0..builtins.len())
            .min_by_key(|&i| (builtin_rank(registry, builtins[i].atom, &bound), i))
            .unwrap_or(0);
        let literal = builtins.remove(index);
        registry.variables_in(literal.atom, &mut bound);
        ordered.push(literal);
    }

    ordered.extend(negated);
    ordered
}

fn builtin_rank(registry: &Registry, atom: Handle, bound: &BTreeSet<Handle>) -> u8 {
    let stored = registry.atom(atom);
    let is_bound = |h: &Handle| !h.is_variable() || bound.contains(h);
    let unbound = stored.args.iter().filter(|h| !is_bound(h)).count();
    match stored.predicate.as_builtin() {
        Some(op) if op.is_comparison() && unbound == 0 => 0,
        Some(BuiltinOp::Eq) if unbound == 1 => 1,
        Some(op) if op.is_arithmetic() && stored.args.iter().take(2).all(is_bound) => 2,
        Some(BuiltinOp::Int) => 3,
        Some(op) if op.is_arithmetic() => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asp_parser::{load_program, SrcId};

    fn load(text: &str) -> (Registry, AspProgram) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut registry = Registry::new();
        let program = load_program(text, SrcId::empty(), &mut registry).unwrap();
        (registry, program)
    }

    fn ground_with(text: &str, options: GroundingOptions) -> (Registry, AspProgram) {
        let (mut registry, program) = load(text);
        let ground = Instantiator::ground(&mut registry, &program, &options);
        (registry, ground)
    }

    fn ground_text(text: &str) -> (Registry, AspProgram) {
        ground_with(text, GroundingOptions::default())
    }

    fn facts(registry: &Registry, program: &AspProgram) -> Vec<String> {
        let mut facts: Vec<String> = program
            .edb
            .iter()
            .map(|atom| registry.display(atom).to_string())
            .collect();
        facts.sort();
        facts
    }

    fn rules(registry: &Registry, program: &AspProgram) -> Vec<String> {
        let mut rules: Vec<String> = program
            .idb
            .iter()
            .map(|rule| registry.display(*rule).to_string())
            .collect();
        rules.sort();
        rules
    }

    #[test]
    fn test_comparison_filters_to_facts() {
        let (registry, ground) = ground_text("a(1). a(2). b(X) :- a(X), X != 1. #maxint = 2.");
        assert_eq!(facts(&registry, &ground), vec!["a(1)", "a(2)", "b(2)"]);
        assert!(ground.idb.is_empty());
        assert_eq!(ground.maxint, 2);
    }

    #[test]
    fn test_single_rule_becomes_fact() {
        let (registry, ground) = ground_text("p(a). q(X) :- p(X).");
        assert_eq!(facts(&registry, &ground), vec!["p(a)", "q(a)"]);
        assert!(ground.idb.is_empty());
    }

    #[test]
    fn test_disjunction_and_constraint_are_kept() {
        let (registry, ground) = ground_text("a v b. :- not a, not b.");
        assert!(ground.edb.is_empty());
        assert_eq!(
            rules(&registry, &ground),
            vec![":- not a, not b.", "a v b."]
        );
    }

    #[test]
    fn test_transitive_closure_reaches_fixpoint() {
        let (registry, ground) = ground_text(
            "edge(1,2). edge(2,3). edge(3,4).
             path(X,Y) :- edge(X,Y).
             path(X,Z) :- path(X,Y), edge(Y,Z).",
        );
        let paths: Vec<String> = facts(&registry, &ground)
            .into_iter()
            .filter(|f| f.starts_with("path"))
            .collect();
        assert_eq!(
            paths,
            vec![
                "path(1,2)",
                "path(1,3)",
                "path(1,4)",
                "path(2,3)",
                "path(2,4)",
                "path(3,4)"
            ]
        );
        assert!(ground.idb.is_empty());
    }

    #[test]
    fn test_rules_over_guessed_atoms_are_instantiated() {
        let (registry, ground) = ground_text(
            "node(1). node(2).
             in(X) v out(X) :- node(X).
             reach(X) :- in(X).
             reach(Y) :- reach(X), in(Y), X < Y.",
        );
        let rules = rules(&registry, &ground);
        assert!(rules.contains(&"in(1) v out(1).".to_string()));
        assert!(rules.contains(&"reach(2) :- in(2).".to_string()));
        assert!(rules.contains(&"reach(2) :- reach(1), in(2).".to_string()));
        assert!(!rules.iter().any(|r| r.starts_with("reach(1) :- reach(2)")));
    }

    #[test]
    fn test_negation_over_solved_predicate_is_decided() {
        let (registry, ground) = ground_text("a(1). b(X) :- #int(X), not a(X). #maxint = 2.");
        assert_eq!(facts(&registry, &ground), vec!["a(1)", "b(0)", "b(2)"]);
        assert!(ground.idb.is_empty());
    }

    #[test]
    fn test_negation_within_stratum_is_kept() {
        let (registry, ground) = ground_text("p :- not q. q :- not p.");
        assert_eq!(rules(&registry, &ground), vec!["p :- not q.", "q :- not p."]);
    }

    #[test]
    fn test_int_and_arithmetic() {
        let (registry, ground) = ground_text(
            "#maxint = 3. n(X) :- #int(X), X < 2. s(Z) :- n(X), n(Y), Z = X + Y.",
        );
        assert_eq!(
            facts(&registry, &ground),
            vec!["n(0)", "n(1)", "s(0)", "s(1)", "s(2)"]
        );
    }

    #[test]
    fn test_arithmetic_enumerates_unbound_operands() {
        let (registry, ground) = ground_text("#maxint = 2. sum(X, Y) :- 2 = X + Y.");
        assert_eq!(
            facts(&registry, &ground),
            vec!["sum(0,2)", "sum(1,1)", "sum(2,0)"]
        );
    }

    #[test]
    fn test_arithmetic_result_bounded_by_maxint() {
        let (registry, ground) = ground_text("#maxint = 4. v(3). d(Z) :- v(X), Z = X * 2.");
        assert_eq!(facts(&registry, &ground), vec!["v(3)"]);
    }

    #[test]
    fn test_equality_binds_variable() {
        let (registry, ground) = ground_text("p(a). q(Y) :- p(X), Y = X.");
        assert_eq!(facts(&registry, &ground), vec!["p(a)", "q(a)"]);
    }

    #[test]
    fn test_violated_constraint_is_kept_unsimplified() {
        let (registry, ground) = ground_text("a. :- a.");
        assert_eq!(rules(&registry, &ground), vec![":- a."]);
    }

    #[test]
    fn test_unreachable_constraint_is_discarded() {
        let (_, ground) = ground_text("a. :- a, c.");
        assert!(ground.idb.is_empty());
    }

    #[test]
    fn test_no_optimization_keeps_builtins() {
        let (registry, ground) = ground_with(
            "a(1). a(2). b(X) :- a(X), X != 1.",
            GroundingOptions {
                maxint: Some(2),
                optimization: OptLevel::None,
            },
        );
        assert_eq!(rules(&registry, &ground), vec!["b(2) :- a(2), 2 != 1."]);
        assert_eq!(facts(&registry, &ground), vec!["a(1)", "a(2)"]);
    }

    #[test]
    fn test_grounding_is_idempotent() {
        let text = "node(1). node(2). in(X) v out(X) :- node(X). :- in(X), in(Y), X != Y.";
        let (mut registry, program) = load(text);
        let options = GroundingOptions::default();
        let first = Instantiator::ground(&mut registry, &program, &options);
        let second = Instantiator::ground(&mut registry, &program, &options);
        assert_eq!(first.idb, second.idb);
        assert_eq!(first.edb, second.edb);
    }

    #[test]
    fn test_predicates_marked_grounded_and_solved() {
        let (mut registry, program) = load("a(1). b(X) :- a(X). c v d.");
        let mut instantiator =
            Instantiator::new(&mut registry, &program, &GroundingOptions::default());
        for stratum in 0..instantiator.num_strata() {
            instantiator.ground_stratum(stratum);
        }
        let lookup = |name: &str| instantiator.registry.lookup_constant(name).unwrap();
        let (a, b, c) = (lookup("a"), lookup("b"), lookup("c"));
        assert!(instantiator.is_predicate_grounded(a));
        assert!(instantiator.is_predicate_solved(b));
        assert!(instantiator.is_predicate_grounded(c));
        assert!(!instantiator.is_predicate_solved(c));
    }

    #[test]
    fn test_order_body_places_builtins_after_binders() {
        let (registry, program) = load("p(Z) :- not r(Z), Z = X + 1, X < 3, q(X).");
        let rule = registry.rule(program.idb[0]);
        let ordered = order_body(&registry, &rule.body);
        let rendered: Vec<String> = ordered
            .iter()
            .map(|l| registry.display_literal(*l).to_string())
            .collect();
        assert_eq!(rendered, vec!["q(X)", "X < 3", "Z = X + 1", "not r(Z)"]);
    }
}
