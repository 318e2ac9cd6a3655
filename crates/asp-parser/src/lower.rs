//! Lowering of the syntax tree into registry handles
//!
//! Facts go into the EDB interpretation, rules and constraints into the IDB
//! list. `#const` names are replaced by their values and every `_` becomes a
//! distinct fresh variable.

use crate::ast::{self, ArithOp, ComparisonOp, Statement, Term};
use crate::constants::ConstantEnv;
use asp_core::{AspProgram, Atom, BuiltinOp, Handle, Interpretation, Literal, Registry, Rule};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    #[error("fact '{0}' is not ground")]
    NonGroundFact(String),
    #[error("constant '{0}' is declared more than once")]
    DuplicateConstant(String),
    #[error("value of constant '{0}' must not be a variable")]
    VariableConstant(String),
}

struct Lowering<'r> {
    registry: &'r mut Registry,
    constants: ConstantEnv,
    anonymous: u32,
}

impl Lowering<'_> {
    fn term(&mut self, term: &Term) -> Handle {
        match self.constants.substitute_term(term) {
            Term::Variable(name) if name.as_str() == "_" => {
                let name = format!("_{}", self.anonymous);
                self.anonymous += 1;
                self.registry.variable(&name)
            }
            Term::Variable(name) => self.registry.variable(&name),
            Term::Constant(name) => self.registry.constant(&name),
            Term::Integer(n) => Handle::integer(n),
        }
    }

    fn atom(&mut self, atom: &ast::Atom) -> Handle {
        let predicate = self.registry.constant(&atom.predicate);
        let args = atom.terms.iter().map(|t| self.term(t)).collect();
        self.registry.store_atom(Atom::new(predicate, args))
    }

    fn builtin(&mut self, op: BuiltinOp, args: &[&Term]) -> Handle {
        let args = args.iter().map(|t| self.term(t)).collect();
        self.registry
            .store_builtin_atom(Atom::new(Handle::builtin(op), args))
    }

    fn literal(&mut self, literal: &ast::Literal) -> Literal {
        match literal {
            ast::Literal::Positive(atom) => Literal::positive(self.atom(atom)),
            ast::Literal::Negative(atom) => Literal::negative(self.atom(atom)),
            ast::Literal::Comparison(c) => {
                let op = match c.op {
                    ComparisonOp::Equal => BuiltinOp::Eq,
                    ComparisonOp::NotEqual => BuiltinOp::Ne,
                    ComparisonOp::LessThan => BuiltinOp::Lt,
                    ComparisonOp::LessOrEqual => BuiltinOp::Le,
                    ComparisonOp::GreaterThan => BuiltinOp::Gt,
                    ComparisonOp::GreaterOrEqual => BuiltinOp::Ge,
                };
                Literal::positive(self.builtin(op, &[&c.left, &c.right]))
            }
            ast::Literal::Arithmetic(a) => {
                let op = match a.op {
                    ArithOp::Add => BuiltinOp::Add,
                    ArithOp::Sub => BuiltinOp::Sub,
                    ArithOp::Mul => BuiltinOp::Mul,
                    ArithOp::Div => BuiltinOp::Div,
                    ArithOp::Mod => BuiltinOp::Mod,
                };
                Literal::positive(self.builtin(op, &[&a.left, &a.right, &a.result]))
            }
            ast::Literal::Int(term) => Literal::positive(self.builtin(BuiltinOp::Int, &[term])),
        }
    }

    fn rule(&mut self, head: &[ast::Atom], body: &[ast::Literal]) -> Handle {
        let head = head.iter().map(|a| self.atom(a)).collect();
        let body = body.iter().map(|l| self.literal(l)).collect();
        self.registry.store_rule(Rule::new(head, body))
    }
}

/// Intern a parsed program into `registry`
pub fn lower(program: &ast::Program, registry: &mut Registry) -> Result<AspProgram, LowerError> {
    let mut constants = ConstantEnv::new();
    let mut maxint = 0;
    for statement in &program.statements {
        match statement {
            Statement::Const(decl) => {
                if let Term::Variable(_) = decl.value {
                    return Err(LowerError::VariableConstant(decl.name.to_string()));
                }
                if !constants.define(decl.name, decl.value.clone()) {
                    return Err(LowerError::DuplicateConstant(decl.name.to_string()));
                }
            }
            Statement::MaxInt(n) => maxint = *n,
            _ => {}
        }
    }

    let mut lowering = Lowering {
        registry,
        constants,
        anonymous: 0,
    };
    let mut edb = Interpretation::new();
    let mut idb = Vec::new();

    for statement in &program.statements {
        match statement {
            Statement::Fact(fact) => {
                let atom = lowering.atom(&fact.atom);
                if !atom.is_ground_atom() {
                    return Err(LowerError::NonGroundFact(fact.atom.to_string()));
                }
                edb.set_fact(atom);
            }
            Statement::Rule(rule) => {
                let handle = lowering.rule(&rule.head, &rule.body);
                idb.push(handle);
            }
            Statement::Constraint(constraint) => {
                let handle = lowering.rule(&[], &constraint.body);
                idb.push(handle);
            }
            Statement::MaxInt(_) | Statement::Const(_) => {}
        }
    }

    log::debug!(
        "lowered program: {} facts, {} rules, maxint {}",
        edb.len(),
        idb.len(),
        maxint
    );
    Ok(AspProgram::new(edb, idb, maxint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_program, SrcId};

    fn lower_text(text: &str) -> (Registry, Result<AspProgram, LowerError>) {
        let mut registry = Registry::new();
        let program = parse_program(text, SrcId::empty()).unwrap();
        let result = lower(&program, &mut registry);
        (registry, result)
    }

    #[test]
    fn test_facts_and_rules() {
        let (registry, result) = lower_text("a(1). a(2). b(X) :- a(X), X != 1. #maxint = 2.");
        let program = result.unwrap();
        assert_eq!(program.edb.len(), 2);
        assert_eq!(program.idb.len(), 1);
        assert_eq!(program.maxint, 2);
        assert_eq!(
            registry.display(program.idb[0]).to_string(),
            "b(X) :- a(X), X != 1."
        );
    }

    #[test]
    fn test_const_substitution() {
        let (registry, result) = lower_text("#const n = 3. size(n). p(X) :- q(X), X < n.");
        let program = result.unwrap();
        assert_eq!(
            program.edb.display(&registry).to_string(),
            "{size(3)}"
        );
        assert_eq!(
            registry.display(program.idb[0]).to_string(),
            "p(X) :- q(X), X < 3."
        );
    }

    #[test]
    fn test_duplicate_const() {
        let (_, result) = lower_text("#const n = 3. #const n = 4.");
        assert_eq!(result.unwrap_err(), LowerError::DuplicateConstant("n".to_string()));
    }

    #[test]
    fn test_non_ground_fact_rejected() {
        let (_, result) = lower_text("p(X).");
        assert_eq!(result.unwrap_err(), LowerError::NonGroundFact("p(X)".to_string()));
    }

    #[test]
    fn test_anonymous_variables_are_distinct() {
        let (registry, result) = lower_text("p(X) :- q(X, _), r(_, X).");
        let program = result.unwrap();
        assert_eq!(
            registry.display(program.idb[0]).to_string(),
            "p(X) :- q(X,_0), r(_1,X)."
        );
    }

    #[test]
    fn test_constraint_and_arithmetic() {
        let (registry, result) = lower_text(":- a, not b. s(Z) :- n(X), n(Y), Z = X + Y.");
        let program = result.unwrap();
        assert!(program.idb[0].is_constraint());
        assert_eq!(
            registry.display(program.idb[1]).to_string(),
            "s(Z) :- n(X), n(Y), Z = X + Y."
        );
    }
}
