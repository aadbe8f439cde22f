//! Settings repository trait.

use super::model::AppSettings;
use crate::error::Result;
use async_trait::async_trait;

/// Edit applied by [`SettingsRepository::update`].
pub type SettingsEdit = Box<dyn FnOnce(&mut AppSettings) + Send>;

/// Persistence for [`AppSettings`].
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Loads the stored settings, or the defaults when none are stored.
    async fn load(&self) -> Result<AppSettings>;

    async fn save(&self, settings: &AppSettings) -> Result<()>;

    /// Applies `edit` to the stored settings as one atomic read-modify-write
    /// and returns the result. Concurrent edits from other handles are not
    /// lost.
    async fn update(&self, edit: SettingsEdit) -> Result<AppSettings>;
}
