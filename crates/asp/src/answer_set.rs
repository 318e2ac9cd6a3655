use asp_core::{Interpretation, Registry};
use std::fmt;

/// An answer set with its atoms rendered as text
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSet {
    interpretation: Interpretation,
    atoms: Vec<String>,
}

impl AnswerSet {
    pub fn new(registry: &Registry, interpretation: Interpretation) -> Self {
        let mut atoms: Vec<String> = interpretation
            .iter()
            .map(|atom| registry.display(atom).to_string())
            .collect();
        atoms.sort();
        AnswerSet {
            interpretation,
            atoms,
        }
    }

    pub fn interpretation(&self) -> &Interpretation {
        &self.interpretation
    }

    /// Atoms in lexicographic order
    pub fn atoms(&self) -> &[String] {
        &self.atoms
    }

    pub fn contains(&self, atom: &str) -> bool {
        self.atoms.binary_search_by(|a| a.as_str().cmp(atom)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

impl fmt::Display for AnswerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.atoms.join(", "))
    }
}
