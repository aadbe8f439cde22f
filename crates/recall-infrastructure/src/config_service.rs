//! Loads `config.toml`.

use crate::paths::RecallPaths;
use crate::storage::AtomicTomlFile;
use recall_core::config::RecallConfig;
use recall_core::error::Result;

/// Reads the application configuration, creating the file with defaults on
/// first run.
pub struct ConfigService {
    file: AtomicTomlFile<RecallConfig>,
}

impl ConfigService {
    pub fn new(paths: &RecallPaths) -> Result<Self> {
        Ok(Self {
            file: AtomicTomlFile::new(paths.config_file()?),
        })
    }

    pub fn load(&self) -> Result<RecallConfig> {
        let config = self.file.load_or_init(RecallConfig::default())?;
        tracing::debug!(path = %self.file.path().display(), "Loaded configuration");
        Ok(config)
    }
}
