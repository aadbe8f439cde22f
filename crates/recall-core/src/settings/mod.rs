//! Settings page domain.

mod model;
mod repository;

pub use model::{AppSettings, Theme};
pub use repository::{SettingsEdit, SettingsRepository};
