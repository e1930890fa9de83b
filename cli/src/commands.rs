pub(crate) mod filter;
pub(crate) mod groups;
pub(crate) mod search;
pub(crate) mod zoom;

use std::path::Path;

use anyhow::{Context, Result};
use parcelview::{
    DataProvider, FileProvider, FitTarget, GroupedLayers, HttpProvider, MapRenderer, Property, PropertyQuery, Shape,
    ShapeAttributes, ShapeStyle, ViewerConfig,
};

use crate::cli::Cli;

/// Load viewer settings from `--config`, or defaults.
pub(crate) fn load_config(cli: &Cli) -> Result<ViewerConfig> {
    match &cli.config {
        Some(path) => ViewerConfig::from_file(path),
        None => Ok(ViewerConfig::default()),
    }
}

fn is_url(data: &str) -> bool {
    data.starts_with("http://") || data.starts_with("https://")
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("[cli] Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Fetch records from a local file or the REST backend.
pub(crate) fn fetch_records(data: &str, query: &PropertyQuery) -> Result<Vec<Property>> {
    let records = if is_url(data) {
        block_on(HttpProvider::new(data).fetch(query))?
    } else {
        block_on(FileProvider::new(Path::new(data)).fetch(query))?
    };
    records.with_context(|| format!("[cli] Failed to load properties from {data}"))
}

/// Fetch the grouping from a local file or the REST backend.
pub(crate) fn fetch_groups(data: &str) -> Result<GroupedLayers> {
    let groups = if is_url(data) {
        block_on(HttpProvider::new(data).fetch_groups())?
    } else {
        block_on(FileProvider::new(Path::new(data)).fetch_groups())?
    };
    groups.with_context(|| format!("[cli] Failed to load grouping from {data}"))
}

/// Map surface that draws nothing; it keeps the controller live.
#[derive(Debug, Default)]
pub(crate) struct HeadlessMap;

impl MapRenderer for HeadlessMap {
    fn add_shape(&mut self, _shape: &Shape, _attributes: &ShapeAttributes, _style: &ShapeStyle) {}
    fn remove_all_shapes(&mut self) {}
    fn highlight(&mut self, _predicate: &dyn Fn(&ShapeAttributes) -> bool) {}
    fn go_to(&mut self, _target: &FitTarget) {}
}
