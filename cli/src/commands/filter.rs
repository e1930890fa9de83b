use anyhow::Result;
use parcelview::{
    CombineOp, Property, PropertyQuery, RuleSet, SelectionNode, SyncController, suggestion_label, write_csv_file,
};
use tracing::info;

use super::HeadlessMap;
use crate::cli::{Cli, FilterArgs};

pub fn run(cli: &Cli, args: &FilterArgs) -> Result<()> {
    let mut config = super::load_config(cli)?;
    config.select_all_on_load = false;

    let records = super::fetch_records(&args.data, &PropertyQuery::All)?;

    let mut controller = SyncController::new(config);
    controller.attach_map(Box::new(HeadlessMap));
    controller.load(records);

    for node in nodes_for(&controller, args) {
        controller.toggle_node(&node, true);
    }
    if !args.layer.is_empty() {
        controller.apply_static_layers(&args.layer);
    }
    if args.show_all {
        controller.set_show_all(true);
    }
    if !args.rule.is_empty() {
        let combine = if args.or { CombineOp::Or } else { CombineOp::And };
        controller.set_rules(RuleSet::new(args.rule.clone(), combine));
    }
    if let Some(sort) = &args.sort {
        let (key, descending) = match sort.strip_prefix('-') {
            Some(key) => (key, true),
            None => (sort.as_str(), false),
        };
        controller.sort_by(key);
        if descending {
            controller.sort_by(key);
        }
    }

    let table = controller.table();
    info!(rows = table.len(), total = controller.source().len(), "filtered");

    match &args.output {
        Some(path) => {
            let rows: Vec<&Property> = table.rows().iter().map(|&i| &controller.source()[i]).collect();
            write_csv_file(&rows, table.visible_columns(), path)?;
            println!("[filter] wrote {} rows to {}", table.len(), path.display());
        }
        None => {
            println!("[filter] {} of {} records", table.len(), controller.source().len());
            for &idx in table.rows() {
                println!("{}", suggestion_label(&controller.source()[idx]));
            }
        }
    }

    Ok(())
}

/// Tree nodes named by `--owner`, `--category` and `--subcategory`.
/// Categories and subcategories are checked under every owner that has them.
fn nodes_for(controller: &SyncController, args: &FilterArgs) -> Vec<SelectionNode> {
    let mut nodes: Vec<SelectionNode> = args.owner.iter().map(SelectionNode::owner).collect();

    for group in controller.tree().groups().owners() {
        for cat in &group.categories {
            if args.category.contains(&cat.category) {
                nodes.push(SelectionNode::category(group.owner.as_str(), cat.category.as_str()));
            }
            for sub in cat.subcategories.iter().filter(|s| args.subcategory.contains(s)) {
                nodes.push(SelectionNode::subcategory(group.owner.as_str(), cat.category.as_str(), sub.as_str()));
            }
        }
    }

    nodes
}
