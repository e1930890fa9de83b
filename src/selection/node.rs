use serde::{Deserialize, Serialize};

/// A checkbox in the owner → category → subcategory tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "lowercase")]
pub enum SelectionNode {
    Owner { owner: String },
    Category { owner: String, category: String },
    Subcategory { owner: String, category: String, subcategory: String },
}

impl SelectionNode {
    pub fn owner(owner: impl Into<String>) -> Self {
        Self::Owner { owner: owner.into() }
    }

    pub fn category(owner: impl Into<String>, category: impl Into<String>) -> Self {
        Self::Category { owner: owner.into(), category: category.into() }
    }

    pub fn subcategory(owner: impl Into<String>, category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self::Subcategory { owner: owner.into(), category: category.into(), subcategory: subcategory.into() }
    }

    /// The owner this node belongs to.
    #[inline]
    pub fn owner_name(&self) -> &str {
        match self {
            Self::Owner { owner } | Self::Category { owner, .. } | Self::Subcategory { owner, .. } => owner,
        }
    }

    /// The enclosing node, `None` for owners.
    pub fn parent(&self) -> Option<SelectionNode> {
        match self {
            Self::Owner { .. } => None,
            Self::Category { owner, .. } => Some(Self::owner(owner.as_str())),
            Self::Subcategory { owner, category, .. } => Some(Self::category(owner.as_str(), category.as_str())),
        }
    }
}

/// Tri-state checkbox state. `indeterminate` implies `!checked`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeState {
    pub checked: bool,
    pub indeterminate: bool,
}

impl NodeState {
    pub const CHECKED: Self = Self { checked: true, indeterminate: false };
    pub const UNCHECKED: Self = Self { checked: false, indeterminate: false };
    pub const MIXED: Self = Self { checked: false, indeterminate: true };

    /// Fold child states into a parent state: checked when all children are,
    /// indeterminate when some (or some partially) are. No children means unchecked.
    pub(crate) fn aggregate(children: impl IntoIterator<Item = NodeState>) -> Self {
        let (mut any, mut all, mut seen) = (false, true, false);
        for child in children {
            seen = true;
            all &= child.checked;
            any |= child.checked || child.indeterminate;
        }

        match (seen && all, any) {
            (true, _) => Self::CHECKED,
            (false, true) => Self::MIXED,
            (false, false) => Self::UNCHECKED,
        }
    }

    /// True when the node is checked or partially checked.
    #[inline] pub fn is_active(&self) -> bool { self.checked || self.indeterminate }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_states() {
        use NodeState as S;
        assert_eq!(S::aggregate([S::CHECKED, S::CHECKED]), S::CHECKED);
        assert_eq!(S::aggregate([S::CHECKED, S::UNCHECKED]), S::MIXED);
        assert_eq!(S::aggregate([S::MIXED, S::UNCHECKED]), S::MIXED);
        assert_eq!(S::aggregate([S::MIXED, S::CHECKED]), S::MIXED);
        assert_eq!(S::aggregate([S::UNCHECKED, S::UNCHECKED]), S::UNCHECKED);
        assert_eq!(S::aggregate([]), S::UNCHECKED);
    }

    #[test]
    fn parents() {
        let sub = SelectionNode::subcategory("A", "Park", "Urban Park");
        assert_eq!(sub.parent(), Some(SelectionNode::category("A", "Park")));
        assert_eq!(sub.parent().and_then(|c| c.parent()), Some(SelectionNode::owner("A")));
        assert_eq!(SelectionNode::owner("A").parent(), None);
        assert_eq!(sub.owner_name(), "A");
    }

    #[test]
    fn serializes_with_level_tag() {
        let json = serde_json::to_value(SelectionNode::category("A", "Park")).unwrap();
        assert_eq!(json, serde_json::json!({"level": "category", "owner": "A", "category": "Park"}));
    }
}
