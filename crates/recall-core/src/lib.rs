//! Core domain of Recall: conversation models, collaborator interfaces and
//! the history screen state manager.

pub mod config;
pub mod conversation;
pub mod error;
pub mod event;
pub mod export;
pub mod history;
pub mod monitor;
pub mod overlay;
pub mod platform;
pub mod settings;

// Re-export common error type
pub use error::RecallError;
