//! Directory-backed ConversationRepository implementation.
//!
//! Directory structure:
//! ```text
//! conversations/
//! ├── <conversation-id-1>.json
//! └── <conversation-id-2>.json
//! ```

use async_trait::async_trait;
use recall_core::conversation::{Conversation, ConversationRepository};
use recall_core::error::{RecallError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

const EXTENSION: &str = "json";

/// Stores each conversation as a pretty-printed JSON document.
pub struct DirConversationRepository {
    dir: PathBuf,
}

impl DirConversationRepository {
    /// Opens the repository, creating `dir` if needed.
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, conversation_id: &str) -> Result<PathBuf> {
        let valid = !conversation_id.is_empty()
            && conversation_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RecallError::data_access(format!(
                "Invalid conversation id: {:?}",
                conversation_id
            )));
        }
        Ok(self.dir.join(format!("{}.{}", conversation_id, EXTENSION)))
    }

    async fn read_file(path: &Path) -> Result<Conversation> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl ConversationRepository for DirConversationRepository {
    async fn list_all(&self) -> Result<Vec<Conversation>> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut conversations = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            match Self::read_file(&path).await {
                Ok(conversation) => conversations.push(conversation),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable conversation file");
                }
            }
        }

        // RFC 3339 strings in UTC sort chronologically.
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        tracing::debug!(count = conversations.len(), dir = %self.dir.display(), "Listed conversations");
        Ok(conversations)
    }

    async fn find_by_id(&self, conversation_id: &str) -> Result<Option<Conversation>> {
        let path = self.file_path(conversation_id)?;
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        Self::read_file(&path).await.map(Some)
    }

    async fn save(&self, conversation: &Conversation) -> Result<()> {
        let path = self.file_path(&conversation.id)?;
        let json = serde_json::to_string_pretty(conversation)?;

        let tmp_path = self
            .dir
            .join(format!(".{}.{}.tmp", conversation.id, uuid::Uuid::new_v4()));
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &path).await?;

        tracing::debug!(conversation_id = %conversation.id, "Saved conversation");
        Ok(())
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        let path = self.file_path(conversation_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RecallError::not_found("conversation", conversation_id))
            }
            Err(e) => Err(e.into()),
        }
    }
}
