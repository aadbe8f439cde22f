//! Conversation domain module.
//!
//! This module contains the conversation model as stored by the external
//! conversation store, and the repository interface used to reach it.
//!
//! # Module Structure
//!
//! - `model`: Core conversation model (`Conversation`)
//! - `message`: Message types (`MessageRole`, `Message`)
//! - `repository`: Repository trait for conversation persistence
//! - `search`: Title/content filtering for the history search box

mod message;
mod model;
mod repository;
pub mod search;

// Re-export public API
pub use message::{Message, MessageRole};
pub use model::Conversation;
pub use repository::ConversationRepository;
