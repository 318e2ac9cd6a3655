//! Parser for disjunctive ASP programs
//!
//! This crate implements a parser combinator-based parser using the Chumsky
//! library and lowers the resulting syntax tree into an [`asp_core::AspProgram`].
//!
//! # Supported Syntax
//!
//! - **Facts**: `edge(a, b).`
//! - **Disjunctive rules**: `a v b :- c.` (`|` and `;` are accepted too)
//! - **Constraints**: `:- a, not b.`
//! - **Builtins**: `#int(X)`, comparisons (`X != Y`), arithmetic (`Z = X + Y`)
//! - **Directives**: `#maxint = 10.`, `#const n = 3.`
//!
//! # Example
//!
//! ```ignore
//! use asp_parser::{load_program, SrcId};
//!
//! let mut registry = Registry::new();
//! let program = load_program("a v b. :- not a, not b.", SrcId::empty(), &mut registry)?;
//! ```

pub mod ast;
mod constants;
mod lower;
mod parser;
mod span;
mod token;

pub use constants::ConstantEnv;
pub use lower::{lower, LowerError};
pub use parser::{parse_program, ParseError};
pub use span::{Span, SrcId};
pub use token::{Directive, LexError, Token};

use asp_core::{AspProgram, Registry};

#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("{}", join_errors(.0))]
    Parse(Vec<ParseError>),
    #[error(transparent)]
    Lower(#[from] LowerError),
}

fn join_errors(errors: &[ParseError]) -> String {
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    messages.join("; ")
}

/// Parse and lower a program in one step
pub fn load_program(
    input: &str,
    src: SrcId,
    registry: &mut Registry,
) -> Result<AspProgram, LoadError> {
    let program = parse_program(input, src).map_err(LoadError::Parse)?;
    Ok(lower(&program, registry)?)
}
