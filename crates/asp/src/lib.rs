//! Disjunctive Answer Set Programming
//!
//! Grounds disjunctive logic programs with negation and builtins and
//! enumerates their answer sets.
//!
//! # Features
//!
//! - **Stratified grounding**: predicate dependency analysis and semi-naive
//!   instantiation stratum by stratum
//! - **Builtins**: `#int`, comparisons and arithmetic bounded by `#maxint`
//! - **Disjunction**: unfounded-set checks for components with head cycles
//! - **Worker thread**: optional bounded-queue model generation
//!
//! # Example
//!
//! ```ignore
//! use asp::Engine;
//!
//! let mut engine = Engine::default();
//! for answer_set in engine.answer_sets("a v b. :- not a, not b.")? {
//!     println!("{}", answer_set);
//! }
//! ```

mod answer_set;
mod config;
mod engine;

pub use answer_set::AnswerSet;
pub use config::EngineConfig;
pub use engine::{Engine, EngineError};

// Re-export the pipeline crates for advanced usage
pub use asp_core;
pub use asp_grounding;
pub use asp_parser;
pub use asp_solver;
