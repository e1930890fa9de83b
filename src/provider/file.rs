use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use tracing::debug;

use crate::property::Property;
use super::{DataProvider, PropertyQuery, ProviderError};

/// Reads a local JSON array of records once and serves queries from the cache.
#[derive(Debug)]
pub struct FileProvider {
    path: PathBuf,
    cache: Mutex<Option<Arc<[Property]>>>,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), cache: Mutex::new(None) }
    }

    #[inline] pub fn path(&self) -> &Path { &self.path }

    /// All records in the file, read on first use.
    pub fn load(&self) -> Result<Arc<[Property]>, ProviderError> {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(records) = cache.as_ref() {
            return Ok(records.clone());
        }

        let bytes = std::fs::read(&self.path)
            .map_err(|source| ProviderError::Io { path: self.path.clone(), source })?;
        let records: Arc<[Property]> = serde_json::from_slice::<Vec<Property>>(&bytes)?.into();
        debug!(path = %self.path.display(), records = records.len(), "loaded property file");

        *cache = Some(records.clone());
        Ok(records)
    }
}

impl DataProvider for FileProvider {
    async fn fetch(&self, query: &PropertyQuery) -> Result<Vec<Property>, ProviderError> {
        let records = self.load()?;
        Ok(records.iter().filter(|p| query.matches(p)).cloned().collect())
    }
}
