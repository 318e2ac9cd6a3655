//! Syntax tree of a disjunctive logic program

use asp_core::Symbol;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Variable(Symbol),
    Constant(Symbol),
    Integer(u32),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) | Term::Constant(name) => write!(f, "{}", name),
            Term::Integer(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub predicate: Symbol,
    pub terms: Vec<Term>,
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.predicate)?;
        if !self.terms.is_empty() {
            let args: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();
            write!(f, "({})", args.join(","))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterOrEqual => ">=",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "\\",
        };
        write!(f, "{}", text)
    }
}

/// `left op right`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonLiteral {
    pub left: Term,
    pub op: ComparisonOp,
    pub right: Term,
}

/// `result = left op right`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArithmeticLiteral {
    pub result: Term,
    pub left: Term,
    pub op: ArithOp,
    pub right: Term,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Positive(Atom),
    Negative(Atom),
    Comparison(ComparisonLiteral),
    Arithmetic(ArithmeticLiteral),
    /// `#int(X)`
    Int(Term),
}

/// Single ground atom, `p(a).`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub atom: Atom,
}

/// `h1 v ... v hn :- body.`; the body may be empty for disjunctive facts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub head: Vec<Atom>,
    pub body: Vec<Literal>,
}

/// `:- body.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub body: Vec<Literal>,
}

/// `#const name = value.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstDecl {
    pub name: Symbol,
    pub value: Term,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Fact(Fact),
    Rule(Rule),
    Constraint(Constraint),
    /// `#maxint = N.`
    MaxInt(u32),
    Const(ConstDecl),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}
