//! Answer-set search over ground disjunctive programs
//!
//! - [`nogood`]: nogoods and the deduplicated [`NogoodSet`]
//! - [`nogood_solver`]: DPLL enumeration of the models of a nogood set
//! - [`annotated`]: ground rules with body atoms, atom components, HCF flags
//! - [`unfounded`]: unfounded-set checks and loop nogoods
//! - [`ground_solver`]: the [`GroundAspSolver`] tying these together
//! - [`asynchronous`]: model generation on a worker thread

pub mod annotated;
pub mod asynchronous;
pub mod ground_solver;
pub mod nogood;
pub mod nogood_solver;
pub mod unfounded;

pub use annotated::{AnnotatedGroundProgram, GroundRule};
pub use asynchronous::{AsynchronousModelGenerator, ModelGenerator};
pub use ground_solver::GroundAspSolver;
pub use nogood::{Nogood, NogoodSet};
pub use nogood_solver::NogoodSolver;
pub use unfounded::UnfoundedSetVerifier;
