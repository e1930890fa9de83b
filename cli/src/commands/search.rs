use anyhow::Result;
use parcelview::{PropertyQuery, search_suggestions, suggestion_label};

use crate::cli::{Cli, SearchArgs};

pub fn run(cli: &Cli, args: &SearchArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let records = super::fetch_records(&args.data, &PropertyQuery::All)?;

    for idx in search_suggestions(&records, &args.text, config.suggestion_limit) {
        println!("{}", suggestion_label(&records[idx]));
    }
    Ok(())
}
