//! Content-addressed storage for terms, atoms and rules
//!
//! The registry owns every symbolic object of a program. Each kind of object
//! lives in its own insertion-ordered table; storing an object that is
//! already present returns the existing handle, so structurally equal atoms
//! and rules always share one handle.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = Registry::new();
//! let p = registry.constant("p");
//! let a = registry.constant("a");
//! let atom = registry.store_atom(Atom::new(p, vec![a]));
//! assert_eq!(registry.display(atom).to_string(), "p(a)");
//! ```

use crate::handle::{AtomKind, BuiltinOp, Handle, HandleKind, Literal, RuleKind, TermKind};
use indexmap::IndexSet;
use internment::Intern;
use std::collections::BTreeSet;
use std::fmt;

pub type Symbol = Intern<String>;

/// Predicate applied to argument terms
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub predicate: Handle,
    pub args: Vec<Handle>,
}

impl Atom {
    pub fn new(predicate: Handle, args: Vec<Handle>) -> Self {
        Atom { predicate, args }
    }

    pub fn is_ground(&self) -> bool {
        !self.predicate.is_variable() && self.args.iter().all(|arg| !arg.is_variable())
    }
}

/// Disjunctive rule `h1 v ... v hn :- b1, ..., bm.`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub head: Vec<Handle>,
    pub body: Vec<Literal>,
}

impl Rule {
    pub fn new(head: Vec<Handle>, body: Vec<Literal>) -> Self {
        Rule { head, body }
    }

    pub fn kind(&self) -> RuleKind {
        match self.head.len() {
            0 => RuleKind::Constraint,
            1 => RuleKind::Regular,
            _ => RuleKind::Disjunctive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TermData {
    kind: TermKind,
    name: Symbol,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    terms: IndexSet<TermData>,
    ground_atoms: IndexSet<Atom>,
    nonground_atoms: IndexSet<Atom>,
    builtin_atoms: IndexSet<Atom>,
    rules: IndexSet<Rule>,
    fresh_counter: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn store_term(&mut self, kind: TermKind, name: &str) -> Handle {
        let (index, _) = self.terms.insert_full(TermData {
            kind,
            name: Intern::new(name.to_string()),
        });
        Handle::new(HandleKind::Term(kind), index as u32)
    }

    /// Constant symbol term
    pub fn constant(&mut self, name: &str) -> Handle {
        self.store_term(TermKind::Constant, name)
    }

    /// Variable term
    pub fn variable(&mut self, name: &str) -> Handle {
        self.store_term(TermKind::Variable, name)
    }

    /// Look up a constant without creating it
    pub fn lookup_constant(&self, name: &str) -> Option<Handle> {
        let key = TermData {
            kind: TermKind::Constant,
            name: Intern::new(name.to_string()),
        };
        self.terms
            .get_index_of(&key)
            .map(|index| Handle::new(HandleKind::Term(TermKind::Constant), index as u32))
    }

    /// A constant whose name is not used by any existing constant
    pub fn fresh_constant(&mut self, prefix: &str) -> Handle {
        loop {
            let name = format!("{}_{}", prefix, self.fresh_counter);
            self.fresh_counter += 1;
            if self.lookup_constant(&name).is_none() {
                log::trace!("fresh constant {}", name);
                return self.constant(&name);
            }
        }
    }

    /// Name of a constant or variable term
    pub fn term_name(&self, term: Handle) -> Option<Symbol> {
        match term.kind {
            HandleKind::Term(TermKind::Constant) | HandleKind::Term(TermKind::Variable) => {
                self.terms.get_index(term.address as usize).map(|data| data.name)
            }
            _ => None,
        }
    }

    /// Store an atom in the table matching its shape
    pub fn store_atom(&mut self, atom: Atom) -> Handle {
        if atom.predicate.is_builtin_predicate() {
            self.store_builtin_atom(atom)
        } else if atom.is_ground() {
            self.store_ground_atom(atom)
        } else {
            self.store_nonground_atom(atom)
        }
    }

    pub fn store_ground_atom(&mut self, atom: Atom) -> Handle {
        debug_assert!(atom.is_ground(), "ground atom table requires ground atoms");
        let (index, _) = self.ground_atoms.insert_full(atom);
        Handle::new(HandleKind::Atom(AtomKind::Ground), index as u32)
    }

    pub fn store_nonground_atom(&mut self, atom: Atom) -> Handle {
        let (index, _) = self.nonground_atoms.insert_full(atom);
        Handle::new(HandleKind::Atom(AtomKind::Nonground), index as u32)
    }

    pub fn store_builtin_atom(&mut self, atom: Atom) -> Handle {
        debug_assert!(atom.predicate.is_builtin_predicate());
        let (index, _) = self.builtin_atoms.insert_full(atom);
        Handle::new(HandleKind::Atom(AtomKind::Builtin), index as u32)
    }

    /// Handle of an already stored ground atom
    pub fn lookup_ground_atom(&self, atom: &Atom) -> Option<Handle> {
        self.ground_atoms
            .get_index_of(atom)
            .map(|index| Handle::ground_atom(index as u32))
    }

    /// The atom behind an atom handle
    ///
    /// Panics if `handle` does not refer to a stored atom.
    pub fn atom(&self, handle: Handle) -> &Atom {
        let index = handle.address as usize;
        match handle.kind {
            HandleKind::Atom(AtomKind::Ground) => &self.ground_atoms[index],
            HandleKind::Atom(AtomKind::Nonground) => &self.nonground_atoms[index],
            HandleKind::Atom(AtomKind::Builtin) => &self.builtin_atoms[index],
            _ => panic!("{:?} is not an atom handle", handle),
        }
    }

    pub fn predicate_of(&self, atom: Handle) -> Handle {
        self.atom(atom).predicate
    }

    pub fn ground_atom_count(&self) -> usize {
        self.ground_atoms.len()
    }

    /// Store a rule, returning the existing handle for an identical rule
    pub fn store_rule(&mut self, rule: Rule) -> Handle {
        let kind = rule.kind();
        let (index, _) = self.rules.insert_full(rule);
        Handle::new(HandleKind::Rule(kind), index as u32)
    }

    pub fn lookup_rule(&self, rule: &Rule) -> Option<Handle> {
        self.rules
            .get_index_of(rule)
            .map(|index| Handle::new(HandleKind::Rule(rule.kind()), index as u32))
    }

    /// The rule behind a rule handle
    ///
    /// Panics if `handle` does not refer to a stored rule.
    pub fn rule(&self, handle: Handle) -> &Rule {
        assert!(handle.is_rule(), "{:?} is not a rule handle", handle);
        &self.rules[handle.address as usize]
    }

    pub fn is_variable(&self, handle: Handle) -> bool {
        handle.is_variable()
    }

    pub fn is_constant(&self, handle: Handle) -> bool {
        handle.is_constant()
    }

    pub fn is_builtin_predicate(&self, handle: Handle) -> bool {
        handle.is_builtin_predicate()
    }

    /// Collect the variables occurring in a term, atom or rule
    pub fn variables_in(&self, handle: Handle, vars: &mut BTreeSet<Handle>) {
        match handle.kind {
            HandleKind::Term(TermKind::Variable) => {
                vars.insert(handle);
            }
            HandleKind::Term(_) => {}
            HandleKind::Atom(AtomKind::Ground) => {}
            HandleKind::Atom(_) => {
                let atom = self.atom(handle);
                if atom.predicate.is_variable() {
                    vars.insert(atom.predicate);
                }
                vars.extend(atom.args.iter().copied().filter(Handle::is_variable));
            }
            HandleKind::Rule(_) => {
                let rule = self.rule(handle);
                for &head in &rule.head {
                    self.variables_in(head, vars);
                }
                for literal in &rule.body {
                    self.variables_in(literal.atom, vars);
                }
            }
        }
    }

    pub fn variables_in_literal(&self, literal: Literal, vars: &mut BTreeSet<Handle>) {
        self.variables_in(literal.atom, vars);
    }

    /// Render a handle in ASP syntax
    pub fn display(&self, handle: Handle) -> Pretty<'_> {
        Pretty {
            registry: self,
            item: Item::Handle(handle),
        }
    }

    /// Render a literal in ASP syntax
    pub fn display_literal(&self, literal: Literal) -> Pretty<'_> {
        Pretty {
            registry: self,
            item: Item::Literal(literal),
        }
    }

    fn fmt_term(&self, f: &mut fmt::Formatter<'_>, term: Handle) -> fmt::Result {
        match term.kind {
            HandleKind::Term(TermKind::Integer) => write!(f, "{}", term.address),
            HandleKind::Term(TermKind::Builtin) => match term.as_builtin() {
                Some(op) => write!(f, "{}", op),
                None => write!(f, "#builtin{}", term.address),
            },
            HandleKind::Term(_) => match self.term_name(term) {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "{:?}", term),
            },
            _ => self.fmt_handle(f, term),
        }
    }

    fn fmt_atom(&self, f: &mut fmt::Formatter<'_>, handle: Handle) -> fmt::Result {
        let atom = self.atom(handle);
        if let Some(op) = atom.predicate.as_builtin() {
            return match (op.arity(), atom.args.as_slice()) {
                (1, [x]) => {
                    write!(f, "{}(", op)?;
                    self.fmt_term(f, *x)?;
                    write!(f, ")")
                }
                (2, [x, y]) => {
                    self.fmt_term(f, *x)?;
                    write!(f, " {} ", op)?;
                    self.fmt_term(f, *y)
                }
                (3, [x, y, z]) => {
                    self.fmt_term(f, *z)?;
                    write!(f, " = ")?;
                    self.fmt_term(f, *x)?;
                    write!(f, " {} ", op)?;
                    self.fmt_term(f, *y)
                }
                _ => write!(f, "{}{:?}", op, atom.args),
            };
        }

        self.fmt_term(f, atom.predicate)?;
        if !atom.args.is_empty() {
            write!(f, "(")?;
            for (i, arg) in atom.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                self.fmt_term(f, *arg)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }

    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>, literal: Literal) -> fmt::Result {
        if literal.naf {
            write!(f, "not ")?;
        }
        self.fmt_atom(f, literal.atom)
    }

    fn fmt_handle(&self, f: &mut fmt::Formatter<'_>, handle: Handle) -> fmt::Result {
        match handle.kind {
            HandleKind::Term(_) => self.fmt_term(f, handle),
            HandleKind::Atom(_) => self.fmt_atom(f, handle),
            HandleKind::Rule(_) => {
                let rule = self.rule(handle);
                for (i, head) in rule.head.iter().enumerate() {
                    if i > 0 {
                        write!(f, " v ")?;
                    }
                    self.fmt_atom(f, *head)?;
                }
                if !rule.body.is_empty() || rule.head.is_empty() {
                    if rule.head.is_empty() {
                        write!(f, ":- ")?;
                    } else {
                        write!(f, " :- ")?;
                    }
                    for (i, literal) in rule.body.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        self.fmt_literal(f, *literal)?;
                    }
                }
                write!(f, ".")
            }
        }
    }
}

enum Item {
    Handle(Handle),
    Literal(Literal),
}

/// Display adapter returned by [`Registry::display`]
pub struct Pretty<'a> {
    registry: &'a Registry,
    item: Item,
}

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item {
            Item::Handle(handle) => self.registry.fmt_handle(f, handle),
            Item::Literal(literal) => self.registry.fmt_literal(f, literal),
        }
    }
}

/// Shorthand for the builtin operator of an atom, if any
pub fn builtin_op(registry: &Registry, atom: Handle) -> Option<BuiltinOp> {
    if atom.is_builtin_atom() {
        registry.atom(atom).predicate.as_builtin()
    } else {
        None
    }
}
