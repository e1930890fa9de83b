use std::path::PathBuf;

use parcelview::FilterRule;

/// Property portfolio viewer engine, run headless
#[derive(clap::Parser, Debug)]
#[command(name = "parcelview", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Viewer settings (JSON), defaults apply when omitted
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Print the owner → category → subcategory grouping as JSON
    Groups(GroupsArgs),

    /// Apply layer selection and rules, then report or export the result
    Filter(FilterArgs),

    /// Print search suggestions
    Search(SearchArgs),

    /// Print the map target for a record
    Zoom(ZoomArgs),
}

#[derive(clap::Args, Debug)]
pub struct GroupsArgs {
    /// Local data.json or backend base URL
    pub data: String,
}

#[derive(clap::Args, Debug)]
pub struct FilterArgs {
    /// Local data.json or backend base URL
    pub data: String,

    /// Check an owner (repeatable)
    #[arg(long)]
    pub owner: Vec<String>,

    /// Check a category under every owner (repeatable)
    #[arg(long)]
    pub category: Vec<String>,

    /// Check a subcategory under every owner (repeatable)
    #[arg(long)]
    pub subcategory: Vec<String>,

    /// Use the flat layer list with these layer ids checked (repeatable)
    #[arg(long, conflicts_with_all = ["owner", "category", "subcategory"])]
    pub layer: Vec<String>,

    /// Show every record regardless of layers
    #[arg(long)]
    pub show_all: bool,

    /// Column rule as `column:operator:value`, e.g. `total_area:>:100` (repeatable)
    #[arg(short, long)]
    pub rule: Vec<FilterRule>,

    /// Combine rules with OR instead of AND
    #[arg(long)]
    pub or: bool,

    /// Sort the table by this column (prefix with `-` for descending)
    #[arg(long, allow_hyphen_values = true)]
    pub sort: Option<String>,

    /// Write the table to this CSV file instead of printing it
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Local data.json or backend base URL
    pub data: String,

    /// Text to search for
    pub text: String,
}

#[derive(clap::Args, Debug)]
pub struct ZoomArgs {
    /// Local data.json or backend base URL
    pub data: String,

    /// Special code of the record
    pub special_code: i64,
}
