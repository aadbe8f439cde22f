//! Composition root: wires the infrastructure into the domain services.

use anyhow::{Context, Result};
use recall_application::{MonitorWarningService, SettingsService};
use recall_core::config::RecallConfig;
use recall_core::conversation::ConversationRepository;
use recall_core::event::ConversationEventBus;
use recall_core::history::{HistoryManager, HistoryOptions};
use recall_core::overlay::OverlayMailbox;
use recall_core::platform::KeyValueStore;
use recall_core::settings::SettingsRepository;
use recall_infrastructure::{
    ConfigService, DirConversationRepository, DownloadDirFileSaver, FileKeyValueStore,
    KvOverlayMailbox, RecallPaths, SystemClipboard, SystemMonitorProbe, TomlSettingsRepository,
};
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppContext {
    pub config: RecallConfig,
    pub paths: RecallPaths,
    pub repository: Arc<dyn ConversationRepository>,
    pub overlay_mailbox: Arc<dyn OverlayMailbox>,
    pub history: HistoryManager,
    pub settings: SettingsService,
    pub monitor_warning: MonitorWarningService,
}

impl AppContext {
    /// Resolves paths and loads `config.toml`. Runs before logging is set
    /// up, since the log level and directory come from here.
    pub fn load_config(home: Option<PathBuf>) -> Result<(RecallPaths, RecallConfig)> {
        let paths = RecallPaths::new(home);
        let config = ConfigService::new(&paths)?
            .load()
            .context("Failed to load config.toml")?;
        let paths = paths.with_config(&config);
        Ok((paths, config))
    }

    pub async fn bootstrap(paths: RecallPaths, config: RecallConfig) -> Result<Self> {
        tracing::debug!(
            conversations_dir = ?paths.conversations_dir().ok(),
            downloads_dir = ?paths.downloads_dir().ok(),
            "Opening stores"
        );

        let repository: Arc<dyn ConversationRepository> = Arc::new(
            DirConversationRepository::new(paths.conversations_dir()?)
                .await
                .context("Failed to open conversation store")?,
        );
        let store: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::new(paths.state_file()?));
        let overlay_mailbox: Arc<dyn OverlayMailbox> = Arc::new(KvOverlayMailbox::new(
            store.clone(),
            config.overlay_handoff_max_age(),
        ));
        let settings_repository: Arc<dyn SettingsRepository> =
            Arc::new(TomlSettingsRepository::new(paths.settings_file()?));

        let history = HistoryManager::new(
            repository.clone(),
            Arc::new(DownloadDirFileSaver::new(paths.downloads_dir()?)),
            overlay_mailbox.clone(),
            ConversationEventBus::new(),
            HistoryOptions::from(&config),
        );
        let settings = SettingsService::new(settings_repository.clone());
        let monitor_warning = MonitorWarningService::new(
            Arc::new(SystemMonitorProbe),
            store,
            settings_repository,
            Arc::new(SystemClipboard),
        );

        Ok(Self {
            config,
            paths,
            repository,
            overlay_mailbox,
            history,
            settings,
            monitor_warning,
        })
    }
}
