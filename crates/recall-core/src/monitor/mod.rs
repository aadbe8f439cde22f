//! Multi-monitor capability reporting.
//!
//! Capturing on the monitor under the cursor needs a helper tool to read the
//! pointer position. The warning panel tells the user when none is installed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of probing the host for pointer-position helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiMonitorSupport {
    pub supported: bool,
    /// Display session type ("x11", "wayland", "macos", ...)
    pub session_type: String,
    pub available_tools: Vec<String>,
    pub missing_tools: Vec<String>,
    /// Shell command that installs a suitable helper
    pub install_command: String,
}

/// Probes the host for multi-monitor support.
#[async_trait]
pub trait MonitorSupportProbe: Send + Sync {
    async fn check(&self) -> MultiMonitorSupport;
}
