//! Local persistent key-value store and the service URL config kept in it.
//!
//! [`KeyValueStore`] is a JSON object file mapping keys to serialized
//! string values. [`ConfigStore`] keeps the service URLs under a single
//! key. Reading never fails the caller: a missing or corrupt record loads
//! as empty URLs.

use std::path::{Path, PathBuf};

use brainrot_core::config::{ServiceUrls, CONFIG_STORE_KEY};
use serde_json::{Map, Value};

use crate::error::PanelError;

/// JSON-object file of `key -> string` entries.
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    path: PathBuf,
}

impl KeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole store. A missing file is an empty store; a file that
    /// is not a JSON object is treated as empty and logged.
    fn read_entries(&self) -> Result<Map<String, Value>, PanelError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) | Err(_) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Local store is not a JSON object, ignoring its contents"
                );
                Ok(Map::new())
            }
        }
    }

    /// Value stored under `key`, if any. Non-string entries read as absent.
    pub fn get(&self, key: &str) -> Result<Option<String>, PanelError> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&self, key: &str, value: String) -> Result<(), PanelError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), Value::String(value));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(entries))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Service URL persistence, last write wins.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    store: KeyValueStore,
}

impl ConfigStore {
    pub fn new(store: KeyValueStore) -> Self {
        Self { store }
    }

    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(KeyValueStore::new(path))
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Persist the URLs, overwriting whatever was stored before.
    pub fn save(&self, urls: &ServiceUrls) -> Result<(), PanelError> {
        let serialized = serde_json::to_string(&urls.to_record())?;
        self.store.set(CONFIG_STORE_KEY, serialized)?;
        tracing::info!(path = %self.store.path().display(), "Service URLs saved");
        Ok(())
    }

    /// Load the stored URLs, or empty ones when nothing usable is stored.
    pub fn load(&self) -> ServiceUrls {
        let raw = match self.store.get(CONFIG_STORE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ServiceUrls::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read local store");
                return ServiceUrls::default();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => ServiceUrls::from_record_value(&value),
            Err(e) => {
                tracing::warn!(error = %e, "Stored service URLs are corrupt, ignoring");
                ServiceUrls::default()
            }
        }
    }
}
