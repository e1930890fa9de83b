// Property tests for SelectionTree over generated trees:
//   parent states always agree with their children after any toggle
//   sequence, and selected leaves are consistent with node states.
//   Trees include owners without categories and categories without
//   subcategories.

use parcelview::{CategoryGroup, GroupedLayers, NodeState, OwnerGroup, SelectionNode, SelectionTree};
use proptest::{prelude::*, sample::Index};

/// 1-4 owners, each with 0-3 categories of 0-3 subcategories.
fn arb_groups() -> impl Strategy<Value = GroupedLayers> {
    prop::collection::vec(prop::collection::vec(0usize..4, 0..4), 1..5).prop_map(|owners| {
        GroupedLayers::new(owners.into_iter().enumerate()
            .map(|(o, categories)| OwnerGroup {
                owner: format!("Owner {o}"),
                categories: categories.into_iter().enumerate()
                    .map(|(c, subs)| CategoryGroup {
                        category: format!("Category {c}"),
                        subcategories: (0..subs).map(|s| format!("Sub {s}")).collect(),
                    })
                    .collect(),
            })
            .collect())
    })
}

fn arb_toggles() -> impl Strategy<Value = Vec<(Index, bool)>> {
    prop::collection::vec((any::<Index>(), any::<bool>()), 0..40)
}

fn all_nodes(tree: &SelectionTree) -> Vec<SelectionNode> {
    tree.nodes().into_iter().map(|(node, _)| node).collect()
}

fn toggled(groups: &GroupedLayers, toggles: &[(Index, bool)]) -> SelectionTree {
    let mut tree = SelectionTree::from_groups(groups.clone());
    let nodes = all_nodes(&tree);
    for (idx, checked) in toggles {
        tree.toggle(&nodes[idx.index(nodes.len())], *checked);
    }
    tree
}

fn children(tree: &SelectionTree, node: &SelectionNode) -> Vec<NodeState> {
    tree.nodes().into_iter()
        .filter(|(child, _)| child.parent().as_ref() == Some(node))
        .map(|(_, state)| state)
        .collect()
}

proptest! {
    #[test]
    fn parents_agree_with_children(groups in arb_groups(), toggles in arb_toggles()) {
        let tree = toggled(&groups, &toggles);

        for (node, state) in tree.nodes() {
            prop_assert!(!(state.checked && state.indeterminate));

            let kids = children(&tree, &node);
            if kids.is_empty() { continue }

            let all = kids.iter().all(|k| k.checked);
            let some = kids.iter().any(|k| k.checked || k.indeterminate);
            prop_assert_eq!(state.checked, all);
            prop_assert_eq!(state.indeterminate, !all && some);
        }
    }

    #[test]
    fn toggling_a_node_sets_its_subtree(
        groups in arb_groups(),
        toggles in arb_toggles(),
        target in any::<Index>(),
        checked in any::<bool>(),
    ) {
        let mut tree = toggled(&groups, &toggles);
        let nodes = all_nodes(&tree);
        let target = &nodes[target.index(nodes.len())];
        tree.toggle(target, checked);

        let expected = if checked { NodeState::CHECKED } else { NodeState::UNCHECKED };
        prop_assert_eq!(tree.state(target), expected);
        for (node, state) in tree.nodes() {
            let mut ancestor = node.parent();
            while let Some(a) = ancestor {
                if &a == target { prop_assert_eq!(state, expected); }
                ancestor = a.parent();
            }
        }
    }

    #[test]
    fn toggle_is_idempotent(groups in arb_groups(), toggles in arb_toggles()) {
        let doubled: Vec<(Index, bool)> = toggles.iter()
            .flat_map(|&(idx, checked)| [(idx, checked), (idx, checked)])
            .collect();
        prop_assert_eq!(toggled(&groups, &toggles).nodes(), toggled(&groups, &doubled).nodes());
    }

    #[test]
    fn selected_leaves_are_checked(groups in arb_groups(), toggles in arb_toggles()) {
        let tree = toggled(&groups, &toggles);

        for leaf in tree.selected_leaves() {
            prop_assert!(tree.state(&leaf).checked);
            match &leaf {
                SelectionNode::Owner { owner } => {
                    prop_assert!(groups.owner(owner).is_some_and(|g| g.categories.is_empty()));
                }
                SelectionNode::Category { owner, category } => {
                    let group = groups.owner(owner).and_then(|g| g.category(category));
                    prop_assert!(group.is_some());
                }
                SelectionNode::Subcategory { .. } => {}
            }
        }
    }
}
