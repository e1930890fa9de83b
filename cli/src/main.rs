mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{filter, groups, search, zoom};
use tracing_subscriber::filter::LevelFilter;

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Commands::Groups(args) => groups::run(&cli, args),
        Commands::Filter(args) => filter::run(&cli, args),
        Commands::Search(args) => search::run(&cli, args),
        Commands::Zoom(args) => zoom::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
