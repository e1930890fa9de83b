use anyhow::Result;

use crate::cli::{Cli, GroupsArgs};

pub fn run(_cli: &Cli, args: &GroupsArgs) -> Result<()> {
    let groups = super::fetch_groups(&args.data)?;
    println!("{}", serde_json::to_string_pretty(&groups)?);
    Ok(())
}
