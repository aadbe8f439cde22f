//! Overlay mailbox stored in the durable key-value store.

use async_trait::async_trait;
use recall_core::error::Result;
use recall_core::overlay::{OverlayHandoff, OverlayMailbox};
use recall_core::platform::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;

/// Well-known key the overlay window polls.
pub const OVERLAY_HANDOFF_KEY: &str = "overlay.attached_conversation";

/// [`OverlayMailbox`] that serializes the handoff as JSON under
/// [`OVERLAY_HANDOFF_KEY`].
pub struct KvOverlayMailbox {
    store: Arc<dyn KeyValueStore>,
    max_age: Duration,
}

impl KvOverlayMailbox {
    pub fn new(store: Arc<dyn KeyValueStore>, max_age: Duration) -> Self {
        Self { store, max_age }
    }
}

#[async_trait]
impl OverlayMailbox for KvOverlayMailbox {
    async fn post(&self, handoff: OverlayHandoff) -> Result<()> {
        let json = serde_json::to_string(&handoff)?;
        self.store.set(OVERLAY_HANDOFF_KEY, &json).await
    }

    async fn peek(&self) -> Result<Option<OverlayHandoff>> {
        match self.store.get(OVERLAY_HANDOFF_KEY).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn take(&self) -> Result<Option<OverlayHandoff>> {
        let handoff = match self.peek().await {
            Ok(handoff) => handoff,
            Err(e) if e.is_serialization() => {
                tracing::warn!(error = %e, "Discarding malformed overlay handoff");
                None
            }
            Err(e) => return Err(e),
        };
        self.store.remove(OVERLAY_HANDOFF_KEY).await?;

        let now_ms = chrono::Utc::now().timestamp_millis();
        Ok(handoff.filter(|h| {
            let stale = h.is_stale(now_ms, self.max_age);
            if stale {
                tracing::debug!(conversation_id = %h.conversation_id, "Ignoring stale overlay handoff");
            }
            !stale
        }))
    }
}
