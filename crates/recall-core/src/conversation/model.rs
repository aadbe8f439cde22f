//! Conversation domain model.

use super::message::Message;
use serde::{Deserialize, Serialize};

/// A titled, timestamped sequence of messages persisted by the conversation store.
///
/// The history screen only ever holds read-through copies of these; titles and
/// messages are never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation identifier (UUID format)
    pub id: String,
    /// Human-readable conversation title
    pub title: String,
    /// Timestamp when the conversation was created (RFC 3339 format)
    pub created_at: String,
    /// Timestamp when the conversation was last updated (RFC 3339 format)
    pub updated_at: String,
    /// Messages in the order they were exchanged
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Creates a conversation stamped with the current time.
    pub fn new(id: impl Into<String>, title: impl Into<String>, messages: Vec<Message>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: id.into(),
            title: title.into(),
            created_at: now.clone(),
            updated_at: now,
            messages,
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}
