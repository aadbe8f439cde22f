//! Infrastructure layer for Recall: file-backed repositories and host
//! platform services.

pub mod config_service;
pub mod dir_conversation_repository;
pub mod download_file_saver;
pub mod file_kv_store;
pub mod kv_overlay_mailbox;
pub mod paths;
pub mod storage;
pub mod system_clipboard;
pub mod system_monitor_probe;
pub mod toml_settings_repository;

pub use config_service::ConfigService;
pub use dir_conversation_repository::DirConversationRepository;
pub use download_file_saver::DownloadDirFileSaver;
pub use file_kv_store::FileKeyValueStore;
pub use kv_overlay_mailbox::{KvOverlayMailbox, OVERLAY_HANDOFF_KEY};
pub use paths::{PathError, RecallPaths};
pub use system_clipboard::SystemClipboard;
pub use system_monitor_probe::SystemMonitorProbe;
pub use toml_settings_repository::TomlSettingsRepository;
