//! Conversation repository trait.
//!
//! Defines the interface for the external conversation store.

use super::model::Conversation;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for the persistent conversation store.
///
/// The history screen treats the store as a passive source and sink: it
/// never pushes changes back, so the cached list is only refreshed on demand.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Lists every stored conversation, most recently updated first.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Conversation>)`: All stored conversations
    /// - `Err(_)`: The listing could not be retrieved
    async fn list_all(&self) -> Result<Vec<Conversation>>;

    /// Finds a conversation by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Conversation))`: Conversation found
    /// - `Ok(None)`: Conversation not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, conversation_id: &str) -> Result<Option<Conversation>>;

    /// Saves a conversation, replacing any stored copy with the same ID.
    async fn save(&self, conversation: &Conversation) -> Result<()>;

    /// Deletes a conversation from storage.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Conversation deleted
    /// - `Err(_)`: Deletion failed, including `NotFound` for unknown IDs
    async fn delete(&self, conversation_id: &str) -> Result<()>;
}
