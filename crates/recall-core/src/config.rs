//! Application configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// How long transient success marks (download, attach) stay visible.
pub const DOWNLOAD_SUCCESS_DISPLAY_MS: u64 = 2000;

/// How long an overlay handoff stays valid before the overlay ignores it.
pub const OVERLAY_HANDOFF_MAX_AGE_SECS: u64 = 30;

/// Root configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    /// Overrides where conversations are stored
    pub data_dir: Option<PathBuf>,
    /// Overrides where downloaded documents are written
    pub downloads_dir: Option<PathBuf>,
    /// Display duration of transient success marks, in milliseconds
    pub success_display_ms: u64,
    /// Maximum age of an overlay handoff, in seconds
    pub overlay_handoff_max_age_secs: u64,
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            downloads_dir: None,
            success_display_ms: DOWNLOAD_SUCCESS_DISPLAY_MS,
            overlay_handoff_max_age_secs: OVERLAY_HANDOFF_MAX_AGE_SECS,
            log_level: "info".to_string(),
        }
    }
}

impl RecallConfig {
    pub fn success_display(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }

    pub fn overlay_handoff_max_age(&self) -> Duration {
        Duration::from_secs(self.overlay_handoff_max_age_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RecallConfig = toml::from_str("log_level = \"debug\"").unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.success_display_ms, DOWNLOAD_SUCCESS_DISPLAY_MS);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_durations() {
        let config = RecallConfig::default();
        assert_eq!(config.success_display(), Duration::from_millis(2000));
        assert_eq!(config.overlay_handoff_max_age(), Duration::from_secs(30));
    }
}
