//! Store configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hasher::HashScheme;
use crate::kv::JsonFileStore;
use crate::pin::PinStorage;

/// Where and how the verifier is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON store file
    #[serde(default = "StoreConfig::default_path")]
    pub path: PathBuf,

    /// Verifier scheme used for new and existing records
    #[serde(default)]
    pub scheme: HashScheme,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            scheme: HashScheme::default(),
        }
    }
}

impl StoreConfig {
    /// Get the default store path
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pinpad")
            .join("pin.json")
    }

    /// Create config with custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Open file-backed storage for this config
    pub fn open(&self) -> Result<PinStorage<JsonFileStore>> {
        let store = JsonFileStore::open(&self.path)?;
        Ok(PinStorage::with_scheme(store, self.scheme))
    }
}
