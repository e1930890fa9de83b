mod engine;
mod rule;
mod text;

pub use engine::{WorkingSet, compute_working_set, select_records};
pub use rule::{CombineOp, FilterRule, Operator, RuleParseError, RuleSet};
pub use text::{search_suggestions, suggestion_label};
