//! Evaluation of builtin predicates
//!
//! Comparison builtins order integers by value and place every integer
//! before every symbolic constant; symbolic constants compare by name.
//! Arithmetic is over `0..=maxint`: results outside that range, and division
//! or modulo by zero, have no value.

use asp_core::{BuiltinOp, Handle, Registry};
use std::cmp::Ordering;

/// Compare two ground terms
///
/// Returns `None` if either term is not ground.
pub fn compare_terms(registry: &Registry, left: Handle, right: Handle) -> Option<Ordering> {
    if !left.is_constant() || !right.is_constant() {
        return None;
    }
    let ordering = match (left.as_integer(), right.as_integer()) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) if left == right => Ordering::Equal,
        (None, None) => {
            let l = registry.term_name(left)?;
            let r = registry.term_name(right)?;
            l.as_str().cmp(r.as_str())
        }
    };
    Some(ordering)
}

/// Evaluate a comparison builtin on ground terms
pub fn eval_comparison(
    registry: &Registry,
    op: BuiltinOp,
    left: Handle,
    right: Handle,
) -> Option<bool> {
    let ordering = compare_terms(registry, left, right)?;
    let holds = match op {
        BuiltinOp::Eq => ordering == Ordering::Equal,
        BuiltinOp::Ne => ordering != Ordering::Equal,
        BuiltinOp::Lt => ordering == Ordering::Less,
        BuiltinOp::Le => ordering != Ordering::Greater,
        BuiltinOp::Gt => ordering == Ordering::Greater,
        BuiltinOp::Ge => ordering != Ordering::Less,
        _ => return None,
    };
    Some(holds)
}

/// Result of an arithmetic builtin, bounded by `maxint`
pub fn eval_arithmetic(op: BuiltinOp, x: u32, y: u32, maxint: u32) -> Option<u32> {
    let result = match op {
        BuiltinOp::Add => x.checked_add(y),
        BuiltinOp::Sub => x.checked_sub(y),
        BuiltinOp::Mul => x.checked_mul(y),
        BuiltinOp::Div => x.checked_div(y),
        BuiltinOp::Mod => x.checked_rem(y),
        _ => None,
    }?;
    (result <= maxint).then_some(result)
}
