use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::CachedDatastore;
use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryDatastore;
use crate::traits::Datastore;

/// Configuration for an embedded Kiln datastore.
///
/// ```toml
/// first_id = 1000
///
/// [cache]
/// enabled = true
/// capacity = 4096
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// First integer id handed out for incomplete keys.
    pub first_id: i64,
    /// Read-through cache settings.
    pub cache: CacheConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            first_id: 1,
            cache: CacheConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether reads and writes go through an LRU cache.
    pub enabled: bool,
    /// Maximum number of cached documents.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1024,
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Build the configured datastore.
    pub fn open(&self) -> StoreResult<Box<dyn Datastore>> {
        if self.first_id <= 0 {
            return Err(StoreError::Config(format!(
                "first_id must be positive, got {}",
                self.first_id
            )));
        }
        let memory = MemoryDatastore::with_first_id(self.first_id);
        if !self.cache.enabled {
            return Ok(Box::new(memory));
        }
        let capacity = NonZeroUsize::new(self.cache.capacity)
            .ok_or_else(|| StoreError::Config("cache capacity must be non-zero".into()))?;
        Ok(Box::new(CachedDatastore::new(memory, capacity)))
    }
}
