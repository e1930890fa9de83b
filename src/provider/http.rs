use reqwest::Client;
use tracing::{debug, instrument};

use crate::{property::Property, selection::GroupedLayers};
use super::{DataProvider, PropertyQuery, ProviderError};

/// REST backend: `GET {base}/properties`, `{base}/properties/search` and
/// `{base}/grouped-layers`.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    base: String,
    client: Client,
}

impl HttpProvider {
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_client(base, Client::new())
    }

    pub fn with_client(base: impl Into<String>, client: Client) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self { base, client }
    }

    #[inline] pub fn base(&self) -> &str { &self.base }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, ProviderError> {
        let response = self.client
            .get(format!("{}{}", self.base, path))
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status: status.as_u16(), body });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl DataProvider for HttpProvider {
    #[instrument(skip(self), fields(base = %self.base))]
    async fn fetch(&self, query: &PropertyQuery) -> Result<Vec<Property>, ProviderError> {
        if matches!(query, PropertyQuery::Search { text } if text.trim().is_empty()) {
            return Ok(Vec::new());
        }
        let records: Vec<Property> = self.get_json(query.path(), &query.params()).await?;
        debug!(records = records.len(), "fetched properties");
        Ok(records)
    }

    #[instrument(skip(self), fields(base = %self.base))]
    async fn fetch_groups(&self) -> Result<GroupedLayers, ProviderError> {
        self.get_json("/grouped-layers", &[]).await
    }
}
