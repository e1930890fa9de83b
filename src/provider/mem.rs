use std::sync::Arc;

use crate::property::Property;
use super::{DataProvider, PropertyQuery, ProviderError};

/// In-memory provider that answers queries the way the backend would.
#[derive(Debug, Default, Clone)]
pub struct MemProvider {
    records: Arc<[Property]>,
}

impl MemProvider {
    pub fn new(records: impl Into<Arc<[Property]>>) -> Self { Self { records: records.into() } }

    #[inline] pub fn records(&self) -> &[Property] { &self.records }
}

impl DataProvider for MemProvider {
    async fn fetch(&self, query: &PropertyQuery) -> Result<Vec<Property>, ProviderError> {
        Ok(self.records.iter().filter(|p| query.matches(p)).cloned().collect())
    }
}
