mod file;
mod mem;
mod query;

#[cfg(feature = "http")]
mod http;

use std::{future::Future, path::PathBuf};

use thiserror::Error;

use crate::{property::Property, selection::GroupedLayers};

pub use file::FileProvider;
pub use mem::MemProvider;
pub use query::PropertyQuery;

#[cfg(feature = "http")]
pub use http::HttpProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[cfg(feature = "http")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed property data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("request cancelled")]
    Cancelled,
}

/// Source of property records. Fetching is the only suspension point in the
/// engine; everything downstream is synchronous over the returned records.
pub trait DataProvider: Send + Sync {
    /// Fetch records for a query. Equal queries return equal results.
    fn fetch(&self, query: &PropertyQuery) -> impl Future<Output = Result<Vec<Property>, ProviderError>> + Send;

    /// Fetch the owner → category → subcategory grouping.
    fn fetch_groups(&self) -> impl Future<Output = Result<GroupedLayers, ProviderError>> + Send {
        async move {
            let records = self.fetch(&PropertyQuery::All).await?;
            Ok(GroupedLayers::from_properties(&records))
        }
    }
}
