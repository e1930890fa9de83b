use std::collections::BTreeSet;

use ahash::AHashSet;

use crate::property::Property;
use super::{GroupedLayers, NodeState, SelectionNode};

/// Tri-state checkbox tree over owner → category → subcategory.
///
/// Only childless nodes carry a stored flag. Category and owner states are
/// folded from their children on every read, so a parent can never disagree
/// with its descendants.
#[derive(Debug, Clone, Default)]
pub struct SelectionTree {
    groups: GroupedLayers,
    checked: AHashSet<SelectionNode>, // checked childless nodes
}

impl SelectionTree {
    /// Build an all-unchecked tree from grouping metadata.
    pub fn from_groups(groups: GroupedLayers) -> Self {
        Self { groups, checked: AHashSet::new() }
    }

    #[inline] pub fn groups(&self) -> &GroupedLayers { &self.groups }

    /// True if the node exists in this tree.
    pub fn contains(&self, node: &SelectionNode) -> bool {
        self.leaves_under(node).is_some()
    }

    /// Check or uncheck a node together with all of its descendants.
    /// Returns `false` (and changes nothing) for nodes not in the tree.
    pub fn toggle(&mut self, node: &SelectionNode, checked: bool) -> bool {
        let Some(leaves) = self.leaves_under(node) else { return false };
        for leaf in leaves {
            if checked {
                self.checked.insert(leaf);
            } else {
                self.checked.remove(&leaf);
            }
        }
        true
    }

    /// Check or uncheck every node.
    pub fn set_all(&mut self, checked: bool) {
        self.checked.clear();
        if checked {
            self.checked = self.all_leaves().collect();
        }
    }

    /// Current state of a node; unknown nodes read as unchecked.
    pub fn state(&self, node: &SelectionNode) -> NodeState {
        match node {
            SelectionNode::Owner { owner } => {
                let Some(group) = self.groups.owner(owner) else { return NodeState::UNCHECKED };
                if group.categories.is_empty() {
                    return self.flag(node);
                }
                NodeState::aggregate(group.categories.iter()
                    .map(|c| self.state(&SelectionNode::category(owner.as_str(), c.category.as_str()))))
            }
            SelectionNode::Category { owner, category } => {
                let Some(group) = self.groups.owner(owner).and_then(|g| g.category(category)) else {
                    return NodeState::UNCHECKED
                };
                if group.subcategories.is_empty() {
                    return self.flag(node);
                }
                NodeState::aggregate(group.subcategories.iter()
                    .map(|s| self.flag(&SelectionNode::subcategory(owner.as_str(), category.as_str(), s.as_str()))))
            }
            SelectionNode::Subcategory { .. } => self.flag(node),
        }
    }

    /// The constraints the current checkboxes express, in tree order: every
    /// checked subcategory, every checked category, and every checked owner
    /// that has no categories.
    pub fn selected_leaves(&self) -> Vec<SelectionNode> {
        let mut selected = Vec::new();

        for group in self.groups.owners() {
            let owner = group.owner.as_str();
            if group.categories.is_empty() {
                let node = SelectionNode::owner(owner);
                if self.flag(&node).checked { selected.push(node) }
                continue;
            }

            for cat in &group.categories {
                let node = SelectionNode::category(owner, cat.category.as_str());
                if self.state(&node).checked { selected.push(node) }

                for sub in &cat.subcategories {
                    let node = SelectionNode::subcategory(owner, cat.category.as_str(), sub.as_str());
                    if self.flag(&node).checked { selected.push(node) }
                }
            }
        }

        selected
    }

    /// Fold the selected leaves into a record filter.
    pub fn selection(&self) -> Selection {
        Selection::from_nodes(&self.selected_leaves())
    }

    /// Every node with its state, owners first then their children.
    pub fn nodes(&self) -> Vec<(SelectionNode, NodeState)> {
        let mut nodes = Vec::new();
        for group in self.groups.owners() {
            let owner = group.owner.as_str();
            let node = SelectionNode::owner(owner);
            nodes.push((node.clone(), self.state(&node)));

            for cat in &group.categories {
                let node = SelectionNode::category(owner, cat.category.as_str());
                nodes.push((node.clone(), self.state(&node)));

                for sub in &cat.subcategories {
                    let node = SelectionNode::subcategory(owner, cat.category.as_str(), sub.as_str());
                    nodes.push((node.clone(), self.state(&node)));
                }
            }
        }
        nodes
    }

    #[inline]
    fn flag(&self, node: &SelectionNode) -> NodeState {
        if self.checked.contains(node) { NodeState::CHECKED } else { NodeState::UNCHECKED }
    }

    /// The childless nodes at or below `node`; `None` if the node is unknown.
    fn leaves_under(&self, node: &SelectionNode) -> Option<Vec<SelectionNode>> {
        match node {
            SelectionNode::Owner { owner } => {
                let group = self.groups.owner(owner)?;
                if group.categories.is_empty() {
                    return Some(vec![node.clone()]);
                }
                Some(group.categories.iter()
                    .flat_map(|c| self.leaves_under(&SelectionNode::category(owner.as_str(), c.category.as_str()))
                        .unwrap_or_default())
                    .collect())
            }
            SelectionNode::Category { owner, category } => {
                let group = self.groups.owner(owner)?.category(category)?;
                if group.subcategories.is_empty() {
                    return Some(vec![node.clone()]);
                }
                Some(group.subcategories.iter()
                    .map(|s| SelectionNode::subcategory(owner.as_str(), category.as_str(), s.as_str()))
                    .collect())
            }
            SelectionNode::Subcategory { owner, category, subcategory } => {
                let group = self.groups.owner(owner)?.category(category)?;
                group.subcategories.contains(subcategory).then(|| vec![node.clone()])
            }
        }
    }

    fn all_leaves(&self) -> impl Iterator<Item = SelectionNode> + '_ {
        self.groups.owners().iter()
            .flat_map(|g| self.leaves_under(&SelectionNode::owner(g.owner.as_str())).unwrap_or_default())
    }
}

/// A record filter derived from checked layers.
///
/// A record matches when its trimmed subcategory is in `subcategories`, or its
/// category is in `categories`, or its owner is in `owners`. Matching is
/// case-sensitive. `show_all` bypasses every constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub owners: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub subcategories: BTreeSet<String>,
    pub show_all: bool,
}

impl Selection {
    /// Build from selected tree nodes.
    pub fn from_nodes(nodes: &[SelectionNode]) -> Self {
        let mut selection = Self::default();
        for node in nodes {
            match node {
                SelectionNode::Owner { owner } => { selection.owners.insert(owner.clone()); }
                SelectionNode::Category { category, .. } => { selection.categories.insert(category.clone()); }
                SelectionNode::Subcategory { subcategory, .. } => { selection.subcategories.insert(subcategory.clone()); }
            }
        }
        selection
    }

    /// A selection that matches every record.
    pub fn everything() -> Self {
        Self { show_all: true, ..Self::default() }
    }

    /// True when nothing can match.
    pub fn is_empty(&self) -> bool {
        !self.show_all && self.owners.is_empty() && self.categories.is_empty() && self.subcategories.is_empty()
    }

    pub fn matches(&self, property: &Property) -> bool {
        if self.show_all { return true }

        let hit = |set: &BTreeSet<String>, value: Option<String>| {
            !set.is_empty() && value.is_some_and(|v| set.contains(&v))
        };

        hit(&self.subcategories, property.subcategory())
            || hit(&self.categories, property.category())
            || hit(&self.owners, property.owner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{CategoryGroup, OwnerGroup};

    fn tree() -> SelectionTree {
        SelectionTree::from_groups(GroupedLayers::new(vec![
            OwnerGroup {
                owner: "A".into(),
                categories: vec![
                    CategoryGroup { category: "Park".into(), subcategories: vec!["Urban".into(), "Panoramic".into()] },
                    CategoryGroup { category: "Museum".into(), subcategories: vec!["Art".into()] },
                ],
            },
            OwnerGroup { owner: "B".into(), categories: vec![] },
        ]))
    }

    #[test]
    fn subcategory_toggle_updates_ancestors() {
        let mut t = tree();
        assert!(t.toggle(&SelectionNode::subcategory("A", "Park", "Urban"), true));

        assert_eq!(t.state(&SelectionNode::category("A", "Park")), NodeState::MIXED);
        assert_eq!(t.state(&SelectionNode::owner("A")), NodeState::MIXED);

        t.toggle(&SelectionNode::subcategory("A", "Park", "Panoramic"), true);
        assert_eq!(t.state(&SelectionNode::category("A", "Park")), NodeState::CHECKED);
        assert_eq!(t.state(&SelectionNode::owner("A")), NodeState::MIXED);

        t.toggle(&SelectionNode::subcategory("A", "Museum", "Art"), true);
        assert_eq!(t.state(&SelectionNode::owner("A")), NodeState::CHECKED);
    }

    #[test]
    fn owner_toggle_cascades() {
        let mut t = tree();
        t.toggle(&SelectionNode::owner("A"), true);
        assert_eq!(t.state(&SelectionNode::subcategory("A", "Park", "Panoramic")), NodeState::CHECKED);

        t.toggle(&SelectionNode::category("A", "Park"), false);
        assert_eq!(t.state(&SelectionNode::subcategory("A", "Park", "Urban")), NodeState::UNCHECKED);
        assert_eq!(t.state(&SelectionNode::owner("A")), NodeState::MIXED);

        t.toggle(&SelectionNode::owner("A"), false);
        assert_eq!(t.state(&SelectionNode::owner("A")), NodeState::UNCHECKED);
    }

    #[test]
    fn unknown_nodes_are_ignored() {
        let mut t = tree();
        assert!(!t.toggle(&SelectionNode::category("A", "Nope"), true));
        assert!(!t.toggle(&SelectionNode::subcategory("Z", "Park", "Urban"), true));
        assert!(t.selected_leaves().is_empty());
        assert_eq!(t.state(&SelectionNode::owner("Z")), NodeState::UNCHECKED);
    }

    #[test]
    fn selected_leaves_cover_three_granularities() {
        let mut t = tree();
        t.toggle(&SelectionNode::category("A", "Park"), true);
        t.toggle(&SelectionNode::owner("B"), true);

        assert_eq!(t.selected_leaves(), vec![
            SelectionNode::category("A", "Park"),
            SelectionNode::subcategory("A", "Park", "Urban"),
            SelectionNode::subcategory("A", "Park", "Panoramic"),
            SelectionNode::owner("B"),
        ]);

        let selection = t.selection();
        assert!(selection.owners.contains("B"));
        assert!(selection.categories.contains("Park"));
        assert_eq!(selection.subcategories.len(), 2);
    }

    #[test]
    fn set_all_checks_everything() {
        let mut t = tree();
        t.set_all(true);
        assert!(t.nodes().iter().all(|(_, s)| s.checked));
        t.set_all(false);
        assert!(t.nodes().iter().all(|(_, s)| *s == NodeState::UNCHECKED));
    }

    #[test]
    fn selection_matching() {
        let selection = Selection::from_nodes(&[SelectionNode::subcategory("A", "Park", "Urban")]);
        let urban = Property::new().with("category", "Park").with("subcategory", " Urban ");
        let other = Property::new().with("category", "Park").with("subcategory", "Panoramic");
        let lower = Property::new().with("subcategory", "urban");

        assert!(selection.matches(&urban));
        assert!(!selection.matches(&other));
        assert!(!selection.matches(&lower));
        assert!(Selection::default().is_empty());
        assert!(Selection::everything().matches(&other));
    }
}
