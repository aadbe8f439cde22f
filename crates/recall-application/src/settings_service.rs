//! Settings page use cases.

use recall_core::error::Result;
use recall_core::settings::{AppSettings, SettingsRepository, Theme};
use std::sync::Arc;

/// Reads and edits [`AppSettings`].
///
/// Every edit is a single [`SettingsRepository::update`], so an edit made in
/// another window between our read and write is kept.
pub struct SettingsService {
    repository: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn SettingsRepository>) -> Self {
        Self { repository }
    }

    pub async fn get(&self) -> Result<AppSettings> {
        self.repository.load().await
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<AppSettings> {
        self.edit(move |s| s.theme = theme).await
    }

    pub async fn set_language(&self, language: impl Into<String>) -> Result<AppSettings> {
        let language = language.into();
        self.edit(move |s| s.language = language).await
    }

    /// Flips close-to-tray and returns the updated settings.
    pub async fn toggle_close_to_tray(&self) -> Result<AppSettings> {
        self.edit(|s| s.close_to_tray = !s.close_to_tray).await
    }

    pub async fn reset(&self) -> Result<AppSettings> {
        let settings = AppSettings::default();
        self.repository.save(&settings).await?;
        tracing::info!("Settings reset to defaults");
        Ok(settings)
    }

    async fn edit<F>(&self, f: F) -> Result<AppSettings>
    where
        F: FnOnce(&mut AppSettings) + Send + 'static,
    {
        let settings = self.repository.update(Box::new(f)).await?;
        tracing::debug!(
            theme = %settings.theme,
            language = %settings.language,
            close_to_tray = settings.close_to_tray,
            "Settings updated"
        );
        Ok(settings)
    }
}
