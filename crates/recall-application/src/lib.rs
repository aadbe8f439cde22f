//! Application layer for Recall.
//!
//! Use cases for the leaf panels of the client (settings page, multi-monitor
//! warning) that coordinate domain traits with their infrastructure.

pub mod monitor_warning_service;
pub mod settings_service;

pub use monitor_warning_service::{MONITOR_WARNING_DISMISSED_KEY, MonitorWarningService};
pub use settings_service::SettingsService;
