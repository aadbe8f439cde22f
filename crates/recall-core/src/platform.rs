//! Platform services consumed by the history screen and leaf panels.
//!
//! These are opaque calls into the host (file saving, clipboard, durable
//! key-value storage). Implementations live in `recall-infrastructure`.

use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Triggers a user-facing save of a UTF-8 text document.
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Saves `content` under a name derived from `filename`.
    ///
    /// Returns the location the document was written to.
    async fn save_text_file(&self, filename: &str, content: &str) -> Result<PathBuf>;
}

/// Writes text to the system clipboard.
pub trait Clipboard: Send + Sync {
    fn copy_text(&self, text: &str) -> Result<()>;
}

/// Durable string key-value storage that survives restarts.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
