//! Constant environment for `#const` declarations.

use crate::ast::{Atom, Term};
use asp_core::Symbol;
use std::collections::HashMap;

/// Environment storing constant declarations
#[derive(Debug, Clone, Default)]
pub struct ConstantEnv {
    constants: HashMap<Symbol, Term>,
}

impl ConstantEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constant; returns false if the name was already defined
    pub fn define(&mut self, name: Symbol, value: Term) -> bool {
        self.constants.insert(name, value).is_none()
    }

    pub fn get(&self, name: &Symbol) -> Option<&Term> {
        self.constants.get(name)
    }

    /// Replace a symbolic constant that names a declared constant
    pub fn substitute_term(&self, term: &Term) -> Term {
        match term {
            Term::Constant(name) => self.get(name).cloned().unwrap_or_else(|| term.clone()),
            _ => term.clone(),
        }
    }

    pub fn substitute_atom(&self, atom: &Atom) -> Atom {
        Atom {
            predicate: atom.predicate,
            terms: atom.terms.iter().map(|t| self.substitute_term(t)).collect(),
        }
    }
}
