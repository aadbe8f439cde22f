//! Multi-monitor warning panel.
//!
//! The panel appears when no pointer-position helper is installed. The user
//! can copy the suggested install command or dismiss the panel for good.

use recall_core::error::Result;
use recall_core::monitor::{MonitorSupportProbe, MultiMonitorSupport};
use recall_core::platform::{Clipboard, KeyValueStore};
use recall_core::settings::SettingsRepository;
use std::sync::Arc;

/// Durable flag set once the user dismisses the warning.
pub const MONITOR_WARNING_DISMISSED_KEY: &str = "monitor_warning.dismissed";

pub struct MonitorWarningService {
    probe: Arc<dyn MonitorSupportProbe>,
    store: Arc<dyn KeyValueStore>,
    settings: Arc<dyn SettingsRepository>,
    clipboard: Arc<dyn Clipboard>,
}

impl MonitorWarningService {
    pub fn new(
        probe: Arc<dyn MonitorSupportProbe>,
        store: Arc<dyn KeyValueStore>,
        settings: Arc<dyn SettingsRepository>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            probe,
            store,
            settings,
            clipboard,
        }
    }

    pub async fn check(&self) -> MultiMonitorSupport {
        self.probe.check().await
    }

    pub async fn is_dismissed(&self) -> Result<bool> {
        Ok(self
            .store
            .get(MONITOR_WARNING_DISMISSED_KEY)
            .await?
            .is_some_and(|v| v == "true"))
    }

    /// Whether the warning panel should be displayed.
    ///
    /// Returns the probe result alongside so the panel can render it without
    /// probing twice.
    pub async fn should_show(&self) -> Result<(bool, MultiMonitorSupport)> {
        let support = self.probe.check().await;
        if support.supported {
            return Ok((false, support));
        }
        if !self.settings.load().await?.show_monitor_warning {
            return Ok((false, support));
        }
        let show = !self.is_dismissed().await?;
        Ok((show, support))
    }

    pub async fn dismiss(&self) -> Result<()> {
        self.store.set(MONITOR_WARNING_DISMISSED_KEY, "true").await?;
        tracing::info!("Multi-monitor warning dismissed");
        Ok(())
    }

    /// Copies the probe's install command and returns it.
    pub async fn copy_install_command(&self) -> Result<String> {
        let command = self.probe.check().await.install_command;
        self.clipboard.copy_text(&command)?;
        tracing::debug!(command = %command, "Copied install command");
        Ok(command)
    }
}
