//! Statement explanation, plan inspection and read-only guarding.

pub mod explainer;
pub mod guard;
pub mod plan;

pub use explainer::{Advice, Explanation, Insight, QueryExplainer};
pub use guard::{classify_statement, statement_count, StatementKind};
pub use plan::PlanInspector;
