use tracing::debug;

use crate::{property::Property, selection::Selection};
use super::RuleSet;

/// The filtered view of the source records, as indices into the source.
///
/// `base` is the hierarchical (selection) result. `rows` is `base` narrowed
/// by the rule set. Both keep source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    base: Vec<usize>,
    rows: Vec<usize>,
}

impl WorkingSet {
    /// Result of the selection pass.
    #[inline] pub fn base(&self) -> &[usize] { &self.base }

    /// Result of the selection and rule passes.
    #[inline] pub fn rows(&self) -> &[usize] { &self.rows }

    #[inline] pub fn len(&self) -> usize { self.rows.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Re-run the rule pass over `base`. An inert rule set restores `base`.
    pub fn apply_rules(&mut self, source: &[Property], rules: &RuleSet) {
        self.rows = if rules.is_inert() {
            self.base.clone()
        } else {
            self.base.iter().copied().filter(|&i| rules.matches(&source[i])).collect()
        };
    }

    /// Drop all rule narrowing.
    pub fn clear_rules(&mut self) { self.rows = self.base.clone() }
}

/// Selection pass: indices of records the selection matches, in source order.
/// An empty selection matches nothing; `show_all` matches everything.
pub fn select_records(source: &[Property], selection: &Selection) -> Vec<usize> {
    if selection.show_all {
        return (0..source.len()).collect();
    }
    if selection.is_empty() {
        return Vec::new();
    }
    source.iter().enumerate()
        .filter(|(_, p)| selection.matches(p))
        .map(|(i, _)| i)
        .collect()
}

/// Run the selection pass and then the rule pass.
pub fn compute_working_set(source: &[Property], selection: &Selection, rules: &RuleSet) -> WorkingSet {
    let mut working = WorkingSet { base: select_records(source, selection), rows: Vec::new() };
    working.apply_rules(source, rules);

    debug!(source = source.len(), base = working.base.len(), rows = working.rows.len(), "computed working set");
    working
}
