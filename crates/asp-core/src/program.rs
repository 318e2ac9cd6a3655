//! The value passed between the parser, the grounder and the solver

use crate::handle::Handle;
use crate::interpretation::Interpretation;
use crate::registry::Registry;
use std::fmt::Write;

/// Facts, rules and the integer bound of a program
///
/// Before grounding `idb` holds non-ground rules; after grounding it holds
/// ground rules and `edb` holds every atom known to be true.
#[derive(Debug, Clone, Default)]
pub struct AspProgram {
    pub edb: Interpretation,
    pub idb: Vec<Handle>,
    pub maxint: u32,
    /// Atoms hidden from answer sets
    pub mask: Option<Interpretation>,
}

impl AspProgram {
    pub fn new(edb: Interpretation, idb: Vec<Handle>, maxint: u32) -> Self {
        AspProgram {
            edb,
            idb,
            maxint,
            mask: None,
        }
    }

    pub fn with_mask(mut self, mask: Interpretation) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Facts first, then rules, one per line
    pub fn to_asp_string(&self, registry: &Registry) -> String {
        let mut out = String::new();
        for atom in self.edb.iter() {
            let _ = writeln!(out, "{}.", registry.display(atom));
        }
        for rule in &self.idb {
            let _ = writeln!(out, "{}", registry.display(*rule));
        }
        out
    }
}
