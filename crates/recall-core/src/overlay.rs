//! Handoff of a conversation to the overlay window.
//!
//! The overlay runs in a separate window, so the history screen leaves a
//! one-shot message in a mailbox that the overlay picks up later. The
//! timestamp lets the reader ignore handoffs that sat around too long.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A request for the overlay window to show a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayHandoff {
    /// Conversation to attach
    #[serde(rename = "id")]
    pub conversation_id: String,
    /// Unix timestamp in milliseconds when the handoff was posted
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
}

impl OverlayHandoff {
    /// Creates a handoff stamped with the current time.
    pub fn now(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// True when the handoff is older than `max_age` relative to `now_ms`.
    pub fn is_stale(&self, now_ms: i64, max_age: Duration) -> bool {
        let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.timestamp_ms) > max_age_ms
    }
}

/// One-shot mailbox between the history screen and the overlay window.
#[async_trait]
pub trait OverlayMailbox: Send + Sync {
    /// Posts a handoff, replacing any unread one.
    async fn post(&self, handoff: OverlayHandoff) -> Result<()>;

    /// Reads the pending handoff without consuming it.
    async fn peek(&self) -> Result<Option<OverlayHandoff>>;

    /// Consumes the pending handoff. Stale handoffs are discarded and
    /// reported as `None`.
    async fn take(&self) -> Result<Option<OverlayHandoff>>;
}
