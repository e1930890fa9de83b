use anyhow::{Result, bail};
use parcelview::{PropertyQuery, compute_target};

use crate::cli::{Cli, ZoomArgs};

pub fn run(_cli: &Cli, args: &ZoomArgs) -> Result<()> {
    let records = super::fetch_records(&args.data, &PropertyQuery::All)?;

    let Some(record) = records.iter().find(|p| p.special_code() == Some(args.special_code)) else {
        bail!("[zoom] No record with special code {}", args.special_code);
    };
    let Some(target) = compute_target(record) else {
        bail!("[zoom] Record {} has no coordinates", args.special_code);
    };

    println!("{}", serde_json::to_string_pretty(&target)?);
    Ok(())
}
