pub mod object_url;

pub use object_url::{CoverHandle, ObjectUrlRegistry};

use std::future::Future;
use std::sync::Arc;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use crate::errors::{CoverError, Result};

/// Extraction results keyed by absolute source URL.
///
/// A value of `None` records a source known to carry no usable cover.
/// Created once per extractor and never cleared: there is no capacity bound
/// and no expiry, since the keys are the tracks browsed in one session.
pub struct CoverCache {
    entries: Cache<String, Option<CoverHandle>>,
}

impl CoverCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Option<CoverHandle>> {
        self.entries.get(key).await
    }

    /// Returns the cached result for `key`, running `init` on a miss.
    ///
    /// Concurrent callers for the same key share a single `init` run. An error
    /// from `init` is handed to every waiting caller and is not cached, so
    /// the next call tries again.
    pub async fn get_or_extract<F>(&self, key: String, init: F) -> Result<Option<CoverHandle>>
    where
        F: Future<Output = Result<Option<CoverHandle>>>,
    {
        self.entries
            .try_get_with(key, init)
            .await
            .map_err(|error: Arc<CoverError>| {
                Arc::try_unwrap(error)
                    .unwrap_or_else(|shared| CoverError::NetworkFailure(shared.to_string()))
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for (_, entry) in self.entries.iter() {
            stats.entries += 1;
            match entry {
                Some(_) => stats.covers += 1,
                None => stats.absent += 1,
            }
        }
        stats
    }
}

impl Default for CoverCache {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub covers: usize,
    pub absent: usize,
}
