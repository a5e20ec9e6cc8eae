//! File-backed key/value store for credentials, roles, and permissions.
//!
//! Missing keys read as the empty string. Token validation feeds the result
//! straight into a signature hash, so an unknown identity still produces a
//! deterministic (and unguessable) expected signature instead of a separate
//! "unknown user" code path.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};

/// One store file: a flat JSON object of string keys to string values.
pub struct KeyStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl KeyStore {
    /// Open a store file, loading existing entries if present.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read key store: {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse key store: {:?}", path))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Read a value; missing keys yield the empty string.
    pub fn read(&self, key: &str) -> String {
        let entries = self.entries.read().unwrap();
        entries.get(key).cloned().unwrap_or_default()
    }

    /// Insert a value and persist the store.
    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        let content = {
            let mut entries = self.entries.write().unwrap();
            entries.insert(key.to_string(), value.to_string());
            serde_json::to_string_pretty(&*entries)?
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory: {:?}", parent))?;
        }
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write key store: {:?}", self.path))?;
        Ok(())
    }
}
