//! Variable substitutions and matching against ground atoms
//!
//! Grounding only ever matches a non-ground atom against a ground one, so
//! there is no need for general unification: a variable is either unbound,
//! in which case it is bound to the ground term at the same position, or it
//! is bound, in which case the two terms must be equal.
//!
//! # Example
//!
//! ```ignore
//! // Match p(X, a) against p(b, a)
//! // Result: X=b
//! let mut subst = Substitution::new();
//! assert!(match_atom(&pattern, &ground, &mut subst));
//! ```

use crate::handle::Handle;
use crate::registry::{Atom, Registry};
use std::collections::{BTreeMap, BTreeSet};

/// A substitution maps variables to ground terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: BTreeMap<Handle, Handle>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable to a term
    pub fn bind(&mut self, var: Handle, term: Handle) {
        debug_assert!(var.is_variable());
        self.bindings.insert(var, term);
    }

    pub fn get(&self, var: Handle) -> Option<Handle> {
        self.bindings.get(&var).copied()
    }

    pub fn contains(&self, var: Handle) -> bool {
        self.bindings.contains_key(&var)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, Handle)> + '_ {
        self.bindings.iter().map(|(var, term)| (*var, *term))
    }

    /// Drop every binding of a variable outside `keep`
    pub fn restrict_to(&mut self, keep: &BTreeSet<Handle>) {
        self.bindings.retain(|var, _| keep.contains(var));
    }

    /// Apply substitution to a term
    pub fn apply(&self, term: Handle) -> Handle {
        if term.is_variable() {
            self.get(term).unwrap_or(term)
        } else {
            term
        }
    }

    /// Apply substitution to an atom
    pub fn apply_atom(&self, atom: &Atom) -> Atom {
        Atom {
            predicate: self.apply(atom.predicate),
            args: atom.args.iter().map(|arg| self.apply(*arg)).collect(),
        }
    }

    /// Apply the substitution to a stored atom and store the result
    pub fn apply_to_handle(&self, registry: &mut Registry, atom: Handle) -> Handle {
        if atom.is_ground_atom() {
            return atom;
        }
        let applied = self.apply_atom(registry.atom(atom));
        registry.store_atom(applied)
    }
}

/// Extend `subst` so that `pattern` becomes equal to `ground`
///
/// On failure `subst` may contain bindings made before the mismatch was
/// found; callers restore it from a saved copy.
pub fn match_atom(pattern: &Atom, ground: &Atom, subst: &mut Substitution) -> bool {
    if pattern.args.len() != ground.args.len() {
        return false;
    }
    if !match_term(pattern.predicate, ground.predicate, subst) {
        return false;
    }
    pattern
        .args
        .iter()
        .zip(&ground.args)
        .all(|(p, g)| match_term(*p, *g, subst))
}

/// Match one pattern term against a ground term
pub fn match_term(pattern: Handle, ground: Handle, subst: &mut Substitution) -> bool {
    if !pattern.is_variable() {
        return pattern == ground;
    }
    match subst.get(pattern) {
        Some(bound) => bound == ground,
        None => {
            subst.bind(pattern, ground);
            true
        }
    }
}
