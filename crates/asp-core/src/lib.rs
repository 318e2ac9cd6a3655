pub mod graph;
pub mod handle;
pub mod interpretation;
pub mod program;
pub mod registry;
pub mod substitution;

pub use graph::{
    component_index, condensation, strongly_connected_components, topological_sort, Graph,
};
pub use handle::{AtomKind, BuiltinOp, Handle, HandleKind, Literal, RuleKind, TermKind};
pub use interpretation::Interpretation;
pub use program::AspProgram;
pub use registry::{builtin_op, Atom, Registry, Rule, Symbol};
pub use substitution::{match_atom, match_term, Substitution};
