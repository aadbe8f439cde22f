//! Settings persisted in `settings.toml`.

use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use recall_core::error::{RecallError, Result};
use recall_core::settings::{AppSettings, SettingsEdit, SettingsRepository};
use std::path::PathBuf;
use std::sync::Arc;

pub struct TomlSettingsRepository {
    file: Arc<AtomicTomlFile<AppSettings>>,
}

impl TomlSettingsRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }
}

#[async_trait]
impl SettingsRepository for TomlSettingsRepository {
    async fn load(&self) -> Result<AppSettings> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || Ok(file.load()?.unwrap_or_default()))
            .await
            .map_err(|e| RecallError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn save(&self, settings: &AppSettings) -> Result<()> {
        let file = self.file.clone();
        let settings = settings.clone();
        tokio::task::spawn_blocking(move || {
            file.save(&settings)?;
            tracing::debug!(path = %file.path().display(), "Saved settings");
            Ok(())
        })
        .await
        .map_err(|e| RecallError::internal(format!("Failed to join task: {}", e)))?
    }

    async fn update(&self, edit: SettingsEdit) -> Result<AppSettings> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || {
            let settings = file.update(AppSettings::default(), |settings| {
                edit(settings);
                settings.clone()
            })?;
            Ok(settings)
        })
        .await
        .map_err(|e| RecallError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::settings::Theme;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_defaults_then_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TomlSettingsRepository::new(temp_dir.path().join("settings.toml"));

        let mut settings = repo.load().await.unwrap();
        assert_eq!(settings, AppSettings::default());

        settings.theme = Theme::Dark;
        settings.close_to_tray = true;
        repo.save(&settings).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), settings);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_edits_from_two_windows_are_kept() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let repo = TomlSettingsRepository::new(path.clone());
                tokio::spawn(async move {
                    for _ in 0..25 {
                        repo.update(Box::new(|s: &mut AppSettings| s.language.push('x')))
                            .await
                            .unwrap();
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let settings = TomlSettingsRepository::new(path).load().await.unwrap();
        assert_eq!(settings.language, format!("en{}", "x".repeat(100)));
    }
}
