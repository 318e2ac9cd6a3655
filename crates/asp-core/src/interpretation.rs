//! Sets of true ground atoms

use crate::handle::Handle;
use crate::registry::Registry;
use roaring::RoaringBitmap;
use std::fmt;

/// Bit-vector over ground atom addresses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    bits: RoaringBitmap,
}

impl Interpretation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a ground atom true; returns false if it already was
    pub fn set_fact(&mut self, atom: Handle) -> bool {
        debug_assert!(atom.is_ground_atom(), "{:?} is not a ground atom", atom);
        self.bits.insert(atom.address)
    }

    pub fn clear_fact(&mut self, atom: Handle) -> bool {
        self.bits.remove(atom.address)
    }

    pub fn get_fact(&self, atom: Handle) -> bool {
        atom.is_ground_atom() && self.bits.contains(atom.address)
    }

    pub fn len(&self) -> usize {
        self.bits.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// True atoms in address order
    pub fn iter(&self) -> impl Iterator<Item = Handle> + '_ {
        self.bits.iter().map(Handle::ground_atom)
    }

    pub fn union_with(&mut self, other: &Interpretation) {
        self.bits |= &other.bits;
    }

    pub fn intersect_with(&mut self, other: &Interpretation) {
        self.bits &= &other.bits;
    }

    pub fn difference_with(&mut self, other: &Interpretation) {
        self.bits -= &other.bits;
    }

    pub fn is_subset(&self, other: &Interpretation) -> bool {
        self.bits.is_subset(&other.bits)
    }

    /// Render as `{a, p(1)}`
    pub fn display<'a>(&'a self, registry: &'a Registry) -> DisplayInterpretation<'a> {
        DisplayInterpretation {
            interpretation: self,
            registry,
        }
    }
}

impl FromIterator<Handle> for Interpretation {
    fn from_iter<T: IntoIterator<Item = Handle>>(iter: T) -> Self {
        let mut interpretation = Interpretation::new();
        for atom in iter {
            interpretation.set_fact(atom);
        }
        interpretation
    }
}

pub struct DisplayInterpretation<'a> {
    interpretation: &'a Interpretation,
    registry: &'a Registry,
}

impl fmt::Display for DisplayInterpretation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, atom) in self.interpretation.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.registry.display(atom))?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Atom;

    #[test]
    fn test_set_and_clear() {
        let mut interpretation = Interpretation::new();
        let a = Handle::ground_atom(3);
        assert!(interpretation.set_fact(a));
        assert!(!interpretation.set_fact(a));
        assert!(interpretation.get_fact(a));
        assert!(interpretation.clear_fact(a));
        assert!(interpretation.is_empty());
    }

    #[test]
    fn test_non_ground_handles_are_never_true() {
        let mut interpretation = Interpretation::new();
        interpretation.set_fact(Handle::ground_atom(0));
        assert!(!interpretation.get_fact(Handle::integer(0)));
    }

    #[test]
    fn test_difference_and_display() {
        let mut registry = Registry::new();
        let p = registry.constant("p");
        let a = registry.store_ground_atom(Atom::new(p, vec![Handle::integer(1)]));
        let b = registry.store_ground_atom(Atom::new(p, vec![Handle::integer(2)]));

        let mut all: Interpretation = [a, b].into_iter().collect();
        let mask: Interpretation = [b].into_iter().collect();
        all.difference_with(&mask);

        assert_eq!(all.display(&registry).to_string(), "{p(1)}");
        assert!(all.is_subset(&[a, b].into_iter().collect()));
    }
}
