//! Durable key-value store backed by `state.toml`.
//!
//! The file is shared between windows (and processes), so every read goes to
//! disk and every write is a locked read-modify-write.

use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use recall_core::error::{RecallError, Result};
use recall_core::platform::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// [`KeyValueStore`] persisted in a TOML file.
#[derive(Clone)]
pub struct FileKeyValueStore {
    file: Arc<AtomicTomlFile<StateFile>>,
}

impl FileKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    /// Runs a blocking file operation off the async executor.
    async fn blocking<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&AtomicTomlFile<StateFile>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || f(&file))
            .await
            .map_err(|e| RecallError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.blocking(move |file| {
            let state = file.load()?.unwrap_or_default();
            Ok(state.entries.get(&key).cloned())
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.blocking(move |file| {
            file.update(StateFile::default(), |state| {
                state.entries.insert(key, value);
            })?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.blocking(move |file| {
            file.update(StateFile::default(), |state| {
                state.entries.remove(&key);
            })?;
            Ok(())
        })
        .await
    }
}
