//! Safety checking for rules
//!
//! A rule is safe if every variable occurring in its head, in a negated
//! literal or in a comparison is bound by the body. Grounding relies on this:
//! once the positive part of a body is matched, the remaining literals are
//! ground.
//!
//! # Binding
//!
//! A variable is bound if it occurs in
//! 1. a positive ordinary body literal
//! 2. `#int(X)`
//! 3. an arithmetic builtin, which enumerates its operands up to `maxint`
//! 4. an equality `X = t` whose other side is bound
//!
//! # Example
//!
//! ```ignore
//! // Safe: p(X) :- q(X), not r(X).
//! // Unsafe: p(X) :- not r(X).  // X appears only in negation
//! ```

use asp_core::{builtin_op, AspProgram, BuiltinOp, Handle, Registry};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SafetyError {
    #[error("unsafe variables {} in rule '{rule}'", .variables.join(", "))]
    UnsafeVariables { rule: String, variables: Vec<String> },
}

fn variables(registry: &Registry, atom: Handle) -> BTreeSet<Handle> {
    let mut vars = BTreeSet::new();
    registry.variables_in(atom, &mut vars);
    vars
}

/// Variables bound by the body of a rule
fn bound_variables(registry: &Registry, rule: Handle) -> BTreeSet<Handle> {
    let body = &registry.rule(rule).body;
    let mut bound = BTreeSet::new();
    for literal in body {
        if literal.atom.is_ordinary_atom() && !literal.naf {
            registry.variables_in(literal.atom, &mut bound);
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for literal in body {
            let op = match builtin_op(registry, literal.atom) {
                Some(op) => op,
                None => continue,
            };
            let args = &registry.atom(literal.atom).args;
            let newly: Vec<Handle> = match op {
                BuiltinOp::Int => args.clone(),
                _ if op.is_arithmetic() => args.clone(),
                BuiltinOp::Eq => {
                    let is_bound = |h: &Handle| !h.is_variable() || bound.contains(h);
                    match (is_bound(&args[0]), is_bound(&args[1])) {
                        (true, false) => vec![args[1]],
                        (false, true) => vec![args[0]],
                        _ => Vec::new(),
                    }
                }
                _ => Vec::new(),
            };
            for var in newly.into_iter().filter(Handle::is_variable) {
                changed |= bound.insert(var);
            }
        }
    }
    bound
}

/// Check that every variable of a rule is bound by its body
pub fn check_rule_safety(registry: &Registry, rule: Handle) -> Result<(), SafetyError> {
    let bound = bound_variables(registry, rule);
    let stored = registry.rule(rule);

    let mut needed = BTreeSet::new();
    for &head in &stored.head {
        registry.variables_in(head, &mut needed);
    }
    for literal in &stored.body {
        let needs_binding = literal.naf
            || builtin_op(registry, literal.atom).is_some_and(|op| op.is_comparison());
        if needs_binding {
            needed.extend(variables(registry, literal.atom));
        }
    }

    let unsafe_vars: Vec<String> = needed
        .difference(&bound)
        .map(|var| registry.display(*var).to_string())
        .collect();

    if unsafe_vars.is_empty() {
        Ok(())
    } else {
        Err(SafetyError::UnsafeVariables {
            rule: registry.display(rule).to_string(),
            variables: unsafe_vars,
        })
    }
}

/// Check if all rules in a program are safe
pub fn check_program_safety(registry: &Registry, program: &AspProgram) -> Result<(), SafetyError> {
    for &rule in &program.idb {
        check_rule_safety(registry, rule)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use asp_parser::{load_program, SrcId};

    fn check(text: &str) -> Result<(), SafetyError> {
        let mut registry = Registry::new();
        let program = load_program(text, SrcId::empty(), &mut registry).unwrap();
        check_program_safety(&registry, &program)
    }

    #[test]
    fn test_safe_rules() {
        assert!(check("p(X) :- q(X), not r(X).").is_ok());
        assert!(check("n(X) :- #int(X).").is_ok());
        assert!(check("s(Z) :- Z = X + Y.").is_ok());
        assert!(check("p(Y) :- q(X), Y = X.").is_ok());
        assert!(check("p(X) :- q(X), X != 1.").is_ok());
        assert!(check("a v b.").is_ok());
    }

    #[test]
    fn test_unsafe_negation() {
        let err = check("p(X) :- not r(X).").unwrap_err();
        assert_eq!(
            err,
            SafetyError::UnsafeVariables {
                rule: "p(X) :- not r(X).".to_string(),
                variables: vec!["X".to_string()],
            }
        );
    }

    #[test]
    fn test_unsafe_head() {
        assert!(check("p(X, Y) :- q(X).").is_err());
        assert!(check("p(X) v q.").is_err());
    }

    #[test]
    fn test_unsafe_comparison() {
        let err = check(":- q(X), X < Y.").unwrap_err();
        assert!(err.to_string().contains("Y"));
    }
}
