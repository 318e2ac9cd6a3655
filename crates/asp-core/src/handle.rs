//! Handles into the registry
//!
//! Every term, atom and rule the engine works with is referred to by a
//! [`Handle`]: a kind tag plus an address. For stored objects the address is
//! the index into the registry table for that kind. Integer terms and builtin
//! predicates are not stored at all; their value is the address.
//!
//! Handles are `Copy` and compare by kind, then address, so they can be used
//! directly as keys of ordered and hashed collections.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermKind {
    Constant,
    Integer,
    Variable,
    /// A builtin predicate such as `#int` or `<`
    Builtin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AtomKind {
    Ground,
    Nonground,
    Builtin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    /// At most one head atom
    Regular,
    /// More than one head atom
    Disjunctive,
    /// No head atom
    Constraint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandleKind {
    Term(TermKind),
    Atom(AtomKind),
    Rule(RuleKind),
}

/// Reference to a term, atom or rule
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    pub kind: HandleKind,
    pub address: u32,
}

impl Handle {
    pub const fn new(kind: HandleKind, address: u32) -> Self {
        Handle { kind, address }
    }

    /// Integer term; the value is the address
    pub const fn integer(value: u32) -> Self {
        Handle::new(HandleKind::Term(TermKind::Integer), value)
    }

    /// Predicate term of a builtin operator
    pub const fn builtin(op: BuiltinOp) -> Self {
        Handle::new(HandleKind::Term(TermKind::Builtin), op as u32)
    }

    /// Ground ordinary atom stored at `address`
    pub const fn ground_atom(address: u32) -> Self {
        Handle::new(HandleKind::Atom(AtomKind::Ground), address)
    }

    pub fn is_term(&self) -> bool {
        matches!(self.kind, HandleKind::Term(_))
    }

    pub fn is_atom(&self) -> bool {
        matches!(self.kind, HandleKind::Atom(_))
    }

    pub fn is_rule(&self) -> bool {
        matches!(self.kind, HandleKind::Rule(_))
    }

    pub fn is_variable(&self) -> bool {
        self.kind == HandleKind::Term(TermKind::Variable)
    }

    pub fn is_integer(&self) -> bool {
        self.kind == HandleKind::Term(TermKind::Integer)
    }

    /// Constant symbol or integer
    pub fn is_constant(&self) -> bool {
        matches!(
            self.kind,
            HandleKind::Term(TermKind::Constant) | HandleKind::Term(TermKind::Integer)
        )
    }

    pub fn is_ground_atom(&self) -> bool {
        self.kind == HandleKind::Atom(AtomKind::Ground)
    }

    pub fn is_builtin_atom(&self) -> bool {
        self.kind == HandleKind::Atom(AtomKind::Builtin)
    }

    /// Ordinary (non-builtin) atom, ground or not
    pub fn is_ordinary_atom(&self) -> bool {
        matches!(
            self.kind,
            HandleKind::Atom(AtomKind::Ground) | HandleKind::Atom(AtomKind::Nonground)
        )
    }

    pub fn is_builtin_predicate(&self) -> bool {
        self.kind == HandleKind::Term(TermKind::Builtin)
    }

    pub fn is_constraint(&self) -> bool {
        self.kind == HandleKind::Rule(RuleKind::Constraint)
    }

    pub fn is_disjunctive(&self) -> bool {
        self.kind == HandleKind::Rule(RuleKind::Disjunctive)
    }

    /// The value of an integer term
    pub fn as_integer(&self) -> Option<u32> {
        self.is_integer().then_some(self.address)
    }

    /// The operator of a builtin predicate term
    pub fn as_builtin(&self) -> Option<BuiltinOp> {
        if self.is_builtin_predicate() {
            BuiltinOp::from_address(self.address)
        } else {
            None
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            HandleKind::Term(TermKind::Constant) => "c",
            HandleKind::Term(TermKind::Integer) => "i",
            HandleKind::Term(TermKind::Variable) => "v",
            HandleKind::Term(TermKind::Builtin) => "b",
            HandleKind::Atom(AtomKind::Ground) => "ga",
            HandleKind::Atom(AtomKind::Nonground) => "na",
            HandleKind::Atom(AtomKind::Builtin) => "ba",
            HandleKind::Rule(RuleKind::Regular) => "r",
            HandleKind::Rule(RuleKind::Disjunctive) => "dr",
            HandleKind::Rule(RuleKind::Constraint) => "cr",
        };
        write!(f, "{}{}", tag, self.address)
    }
}

/// Builtin predicates understood by the grounder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinOp {
    /// `#int(X)`: X ranges over `0..=maxint`
    Int = 0,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// `Z = X + Y`, stored with arguments `(X, Y, Z)`
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BuiltinOp {
    const ALL: [BuiltinOp; 12] = [
        BuiltinOp::Int,
        BuiltinOp::Eq,
        BuiltinOp::Ne,
        BuiltinOp::Lt,
        BuiltinOp::Le,
        BuiltinOp::Gt,
        BuiltinOp::Ge,
        BuiltinOp::Add,
        BuiltinOp::Sub,
        BuiltinOp::Mul,
        BuiltinOp::Div,
        BuiltinOp::Mod,
    ];

    pub fn from_address(address: u32) -> Option<Self> {
        Self::ALL.get(address as usize).copied()
    }

    /// Number of arguments the builtin takes
    pub fn arity(&self) -> usize {
        match self {
            BuiltinOp::Int => 1,
            BuiltinOp::Eq
            | BuiltinOp::Ne
            | BuiltinOp::Lt
            | BuiltinOp::Le
            | BuiltinOp::Gt
            | BuiltinOp::Ge => 2,
            BuiltinOp::Add | BuiltinOp::Sub | BuiltinOp::Mul | BuiltinOp::Div | BuiltinOp::Mod => 3,
        }
    }

    pub fn is_comparison(&self) -> bool {
        self.arity() == 2
    }

    pub fn is_arithmetic(&self) -> bool {
        self.arity() == 3
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BuiltinOp::Int => "#int",
            BuiltinOp::Eq => "=",
            BuiltinOp::Ne => "!=",
            BuiltinOp::Lt => "<",
            BuiltinOp::Le => "<=",
            BuiltinOp::Gt => ">",
            BuiltinOp::Ge => ">=",
            BuiltinOp::Add => "+",
            BuiltinOp::Sub => "-",
            BuiltinOp::Mul => "*",
            BuiltinOp::Div => "/",
            BuiltinOp::Mod => "\\",
        }
    }
}

impl fmt::Display for BuiltinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A body literal, or a nogood literal where `naf` means "must be false"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub atom: Handle,
    pub naf: bool,
}

impl Literal {
    pub const fn positive(atom: Handle) -> Self {
        Literal { atom, naf: false }
    }

    pub const fn negative(atom: Handle) -> Self {
        Literal { atom, naf: true }
    }

    pub fn negated(self) -> Self {
        Literal {
            atom: self.atom,
            naf: !self.naf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_handle_encodes_value() {
        let h = Handle::integer(42);
        assert!(h.is_integer());
        assert!(h.is_constant());
        assert!(!h.is_variable());
        assert_eq!(h.as_integer(), Some(42));
    }

    #[test]
    fn test_builtin_round_trip() {
        for op in BuiltinOp::ALL {
            assert_eq!(Handle::builtin(op).as_builtin(), Some(op));
        }
        assert_eq!(BuiltinOp::from_address(99), None);
    }

    #[test]
    fn test_ordering_is_kind_then_address() {
        let a = Handle::new(HandleKind::Term(TermKind::Constant), 5);
        let b = Handle::new(HandleKind::Term(TermKind::Integer), 0);
        let c = Handle::new(HandleKind::Term(TermKind::Constant), 6);
        assert!(a < b);
        assert!(a < c);
        assert_ne!(a, Handle::integer(5));
    }

    #[test]
    fn test_literal_negation() {
        let lit = Literal::positive(Handle::ground_atom(3));
        assert!(lit.negated().naf);
        assert_eq!(lit.negated().negated(), lit);
    }

    #[test]
    fn test_builtin_arity() {
        assert_eq!(BuiltinOp::Int.arity(), 1);
        assert!(BuiltinOp::Lt.is_comparison());
        assert!(BuiltinOp::Mod.is_arithmetic());
    }
}
