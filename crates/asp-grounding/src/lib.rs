pub mod builtins;
pub mod ground_program;
pub mod instantiator;
pub mod safety;
pub mod stratification;

// Re-export builtin evaluation
pub use builtins::{compare_terms, eval_arithmetic, eval_comparison};

pub use ground_program::GroundProgramStore;
pub use instantiator::{GroundingOptions, Instantiator, OptLevel};
pub use safety::{check_program_safety, check_rule_safety, SafetyError};
pub use stratification::{analyze, Stratification};
