//! Output of grounding: true atoms and deduplicated ground rules

use asp_core::{AspProgram, Handle, Interpretation};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct GroundProgramStore {
    true_atoms: Interpretation,
    rules: Vec<Handle>,
    seen: HashSet<Handle>,
}

impl GroundProgramStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a ground atom as a fact; returns false if it already was one
    pub fn set_true(&mut self, atom: Handle) -> bool {
        self.true_atoms.set_fact(atom)
    }

    pub fn is_true(&self, atom: Handle) -> bool {
        self.true_atoms.get_fact(atom)
    }

    /// Append a ground rule unless an identical one was already added
    pub fn add_rule(&mut self, rule: Handle) -> bool {
        debug_assert!(rule.is_rule());
        if self.seen.insert(rule) {
            self.rules.push(rule);
            true
        } else {
            false
        }
    }

    pub fn rules(&self) -> &[Handle] {
        &self.rules
    }

    pub fn true_atoms(&self) -> &Interpretation {
        &self.true_atoms
    }

    pub fn into_program(self, maxint: u32, mask: Option<Interpretation>) -> AspProgram {
        AspProgram {
            edb: self.true_atoms,
            idb: self.rules,
            maxint,
            mask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asp_core::{HandleKind, RuleKind};

    #[test]
    fn test_rules_are_deduplicated() {
        let mut store = GroundProgramStore::new();
        let rule = Handle::new(HandleKind::Rule(RuleKind::Regular), 0);
        assert!(store.add_rule(rule));
        assert!(!store.add_rule(rule));
        assert_eq!(store.rules(), &[rule]);
    }

    #[test]
    fn test_facts() {
        let mut store = GroundProgramStore::new();
        let atom = Handle::ground_atom(4);
        assert!(!store.is_true(atom));
        assert!(store.set_true(atom));
        assert!(!store.set_true(atom));
        let program = store.into_program(3, None);
        assert_eq!(program.edb.len(), 1);
        assert_eq!(program.maxint, 3);
    }
}
