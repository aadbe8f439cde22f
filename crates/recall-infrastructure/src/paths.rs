//! Unified path management for Recall files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/recall/            # Config directory
//! ├── config.toml              # Application configuration
//! ├── settings.toml            # Settings page values
//! ├── state.toml               # Durable key-value store
//! └── logs/                    # Application logs
//!     └── recall.log.YYYY-MM-DD
//!
//! ~/.local/share/recall/       # Data directory
//! └── conversations/           # One JSON document per conversation
//! ```
//!
//! With a base override (`RECALL_HOME` / `--home`), both trees live under
//! `<base>/config` and `<base>/data`, and downloads go to `<base>/downloads`.

use recall_core::config::RecallConfig;
use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "recall";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

impl From<PathError> for recall_core::RecallError {
    fn from(err: PathError) -> Self {
        recall_core::RecallError::config(err.to_string())
    }
}

/// Resolves every location Recall reads or writes.
#[derive(Debug, Clone, Default)]
pub struct RecallPaths {
    base: Option<PathBuf>,
    data_override: Option<PathBuf>,
    downloads_override: Option<PathBuf>,
}

impl RecallPaths {
    /// Creates a resolver, optionally rooted at `base` instead of the
    /// platform directories.
    pub fn new(base: Option<PathBuf>) -> Self {
        Self {
            base,
            data_override: None,
            downloads_override: None,
        }
    }

    /// Applies the directory overrides from the loaded configuration.
    pub fn with_config(mut self, config: &RecallConfig) -> Self {
        self.data_override = config.data_dir.clone();
        self.downloads_override = config.downloads_dir.clone();
        self
    }

    /// Returns the configuration directory (e.g. `~/.config/recall/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/recall/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(dir) = &self.data_override {
            return Ok(dir.clone());
        }
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn settings_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("settings.toml"))
    }

    pub fn state_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("state.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    pub fn conversations_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("conversations"))
    }

    /// Where downloaded documents are written. Falls back to the data
    /// directory on hosts without a downloads folder.
    pub fn downloads_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(dir) = &self.downloads_override {
            return Ok(dir.clone());
        }
        if let Some(base) = &self.base {
            return Ok(base.join("downloads"));
        }
        match dirs::download_dir() {
            Some(dir) => Ok(dir),
            None => Ok(self.data_dir()?.join("downloads")),
        }
    }
}
