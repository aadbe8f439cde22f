use super::lock;
use super::state::{HistorySnapshot, HistoryState};
use super::transient::TransientTimers;
use crate::config::{RecallConfig, DOWNLOAD_SUCCESS_DISPLAY_MS};
use crate::conversation::{Conversation, ConversationRepository};
use crate::error::{RecallError, Result};
use crate::event::{ConversationEvent, ConversationEventBus};
use crate::export::{export_filename, render_markdown};
use crate::overlay::{OverlayHandoff, OverlayMailbox};
use crate::platform::FileSaver;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Tunables for the history manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryOptions {
    /// How long download/attach success marks stay set
    pub success_display: Duration,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            success_display: Duration::from_millis(DOWNLOAD_SUCCESS_DISPLAY_MS),
        }
    }
}

impl From<&RecallConfig> for HistoryOptions {
    fn from(config: &RecallConfig) -> Self {
        Self {
            success_display: config.success_display(),
        }
    }
}

/// Result of a confirmed batch delete.
#[derive(Debug, Default)]
pub struct BatchDeleteOutcome {
    /// Ids removed from the store, in selection order
    pub deleted: Vec<String>,
    /// Ids the store refused to delete, with the reason
    pub failed: Vec<(String, RecallError)>,
}

impl BatchDeleteOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Clears the pending single-delete id however `confirm_delete` exits.
struct PendingDeleteGuard(Arc<Mutex<HistoryState>>);

impl Drop for PendingDeleteGuard {
    fn drop(&mut self) {
        lock(&self.0).pending_delete = None;
    }
}

/// Closes the batch-delete confirmation however `confirm_batch_delete` exits.
struct BatchDialogGuard(Arc<Mutex<HistoryState>>);

impl Drop for BatchDialogGuard {
    fn drop(&mut self) {
        lock(&self.0).confirming_batch_delete = false;
    }
}

/// State manager behind the conversation-history screen.
///
/// All collaborators are injected, so several independent managers can run
/// side by side (one per window, or one per test).
///
/// Store deletions only evict conversations from the cache after the store
/// confirmed them; a failed delete leaves the conversation listed and records
/// the failure in [`HistorySnapshot::last_error`].
pub struct HistoryManager {
    repository: Arc<dyn ConversationRepository>,
    file_saver: Arc<dyn FileSaver>,
    overlay_mailbox: Arc<dyn OverlayMailbox>,
    events: ConversationEventBus,
    state: Arc<Mutex<HistoryState>>,
    timers: TransientTimers,
    refresh_generation: AtomicU64,
}

impl HistoryManager {
    pub fn new(
        repository: Arc<dyn ConversationRepository>,
        file_saver: Arc<dyn FileSaver>,
        overlay_mailbox: Arc<dyn OverlayMailbox>,
        events: ConversationEventBus,
        options: HistoryOptions,
    ) -> Self {
        Self {
            repository,
            file_saver,
            overlay_mailbox,
            events,
            state: Arc::new(Mutex::new(HistoryState::default())),
            timers: TransientTimers::new(options.success_display),
            refresh_generation: AtomicU64::new(0),
        }
    }

    /// The bus deletions are announced on.
    pub fn events(&self) -> &ConversationEventBus {
        &self.events
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        lock(&self.state).snapshot()
    }

    fn update<R>(&self, f: impl FnOnce(&mut HistoryState) -> R) -> R {
        let mut state = lock(&self.state);
        f(&mut state)
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Called when the screen becomes active: loads the conversation list.
    pub async fn activate(&self) {
        tracing::debug!("History screen activated");
        self.refresh().await;
    }

    /// Called when the screen is torn down: pending success-mark timers are
    /// cancelled and will not touch the state any more.
    pub fn dispose(&self) {
        tracing::debug!("History screen disposed");
        self.timers.cancel_all();
    }

    pub fn is_disposed(&self) -> bool {
        self.timers.is_cancelled()
    }

    // ============================================================================
    // Conversation cache
    // ============================================================================

    /// Reloads the conversation list from the store.
    ///
    /// A failed listing replaces the cache with an empty list. When refreshes
    /// overlap, only the most recently started one is applied.
    pub async fn refresh(&self) {
        let generation = self.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.update(|s| s.loading = true);

        let result = self.repository.list_all().await;

        if self.refresh_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding superseded conversation listing");
            return;
        }

        self.update(|s| {
            match result {
                Ok(conversations) => {
                    tracing::info!(count = conversations.len(), "Loaded conversations");
                    s.conversations = conversations;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load conversations");
                    s.conversations = Vec::new();
                }
            }
            s.loading = false;
        });
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.update(|s| s.search_query = query);
    }

    // ============================================================================
    // Single-item interaction
    // ============================================================================

    /// Opens `conversation` in the detail view.
    pub fn view(&self, conversation: Conversation) {
        self.update(|s| s.viewing = Some(conversation));
    }

    pub fn close_view(&self) {
        self.update(|s| s.viewing = None);
    }

    /// Highlights a conversation card, or clears the highlight.
    pub fn select(&self, id: Option<String>) {
        self.update(|s| s.selected = id);
    }

    /// Asks for confirmation before deleting `id`. Nothing is deleted yet.
    pub fn request_delete(&self, id: impl Into<String>) {
        let id = id.into();
        self.update(|s| s.pending_delete = Some(id));
    }

    pub fn cancel_delete(&self) {
        self.update(|s| s.pending_delete = None);
    }

    /// Deletes the conversation awaiting confirmation.
    ///
    /// # Returns
    ///
    /// - `Ok(None)`: nothing was pending
    /// - `Ok(Some(id))`: `id` was deleted, evicted and broadcast
    /// - `Err(_)`: the store refused; the conversation stays cached
    ///
    /// The pending id is cleared in every case.
    pub async fn confirm_delete(&self) -> Result<Option<String>> {
        let id = self.update(|s| {
            let id = s.pending_delete.clone()?;
            s.viewing = None;
            s.selected = None;
            Some(id)
        });
        let Some(id) = id else {
            return Ok(None);
        };
        let _pending = PendingDeleteGuard(self.state.clone());

        match self.repository.delete(&id).await {
            Ok(()) => {
                tracing::info!(conversation_id = %id, "Deleted conversation");
                self.update(|s| s.evict(std::slice::from_ref(&id)));
                self.events.publish(ConversationEvent::deleted(id.clone()));
                Ok(Some(id))
            }
            Err(e) => {
                tracing::error!(conversation_id = %id, error = %e, "Failed to delete conversation");
                self.update(|s| {
                    s.last_error = Some(format!("Failed to delete conversation {}: {}", id, e))
                });
                Err(e)
            }
        }
    }

    /// Saves `conversation` as a markdown document.
    ///
    /// On success the conversation is marked as recently downloaded until
    /// the display duration elapses. On failure the mark is removed at once.
    /// After [`dispose`](Self::dispose) the document is still saved but no
    /// mark is set, since nothing would clear it.
    pub async fn download(&self, conversation: &Conversation) -> Result<PathBuf> {
        let id = conversation.id.clone();
        let disposed = self.is_disposed();
        let mark = self.update(|s| (!disposed).then(|| s.mark_downloaded(&id)));

        let content = render_markdown(conversation);
        let filename = export_filename(&conversation.title);

        match self.file_saver.save_text_file(&filename, &content).await {
            Ok(path) => {
                tracing::info!(conversation_id = %id, path = %path.display(), "Downloaded conversation");
                if let Some(mark) = mark {
                    let clear = move |s: &mut HistoryState| s.clear_download_mark(&id, mark);
                    self.timers.arm(self.state.clone(), clear);
                }
                Ok(path)
            }
            Err(e) => {
                tracing::warn!(conversation_id = %id, error = %e, "Failed to download conversation");
                if let Some(mark) = mark {
                    self.update(|s| s.clear_download_mark(&id, mark));
                }
                Err(e)
            }
        }
    }

    /// Hands `id` over to the overlay window.
    ///
    /// Sets the attached mark for the display duration on success, unless
    /// the screen has been disposed.
    pub async fn attach_to_overlay(&self, id: &str) -> Result<()> {
        if let Err(e) = self.overlay_mailbox.post(OverlayHandoff::now(id)).await {
            tracing::warn!(conversation_id = %id, error = %e, "Failed to attach conversation to overlay");
            return Err(e);
        }

        tracing::info!(conversation_id = %id, "Attached conversation to overlay");
        if !self.is_disposed() {
            let mark = self.update(|s| s.mark_attached());
            self.timers.arm(self.state.clone(), move |s| s.clear_attach_mark(mark));
        }
        Ok(())
    }

    // ============================================================================
    // Batch selection
    // ============================================================================

    pub fn toggle_selection_mode(&self) {
        self.update(|s| s.toggle_selection_mode());
    }

    pub fn toggle_select_item(&self, id: &str) {
        self.update(|s| s.toggle_select_item(id));
    }

    pub fn select_all(&self) {
        self.update(|s| s.select_all());
    }

    pub fn deselect_all(&self) {
        self.update(|s| s.deselect_all());
    }

    /// Opens the batch-delete confirmation if anything is selected.
    pub fn request_batch_delete(&self) -> bool {
        self.update(|s| s.request_batch_delete())
    }

    pub fn cancel_batch_delete(&self) {
        self.update(|s| s.cancel_batch_delete());
    }

    /// Deletes every selected conversation, one after another in selection
    /// order.
    ///
    /// Returns `None` without touching the store when nothing is selected.
    /// Otherwise only the ids the store deleted are evicted and broadcast;
    /// the selection is cleared, selection mode ends and the confirmation
    /// closes whatever the outcome.
    pub async fn confirm_batch_delete(&self) -> Option<BatchDeleteOutcome> {
        let ids = self.update(|s| s.selected_ids.clone());
        if ids.is_empty() {
            return None;
        }
        let _dialog = BatchDialogGuard(self.state.clone());

        let mut outcome = BatchDeleteOutcome::default();
        for id in ids {
            match self.repository.delete(&id).await {
                Ok(()) => outcome.deleted.push(id),
                Err(e) => {
                    tracing::error!(conversation_id = %id, error = %e, "Failed to delete conversation in batch");
                    outcome.failed.push((id, e));
                }
            }
        }

        self.update(|s| {
            s.evict(&outcome.deleted);
            s.finish_batch_delete();
            if !outcome.failed.is_empty() {
                s.last_error = Some(format!(
                    "Failed to delete {} of {} conversations",
                    outcome.failed.len(),
                    outcome.failed.len() + outcome.deleted.len()
                ));
            }
        });

        for id in &outcome.deleted {
            self.events.publish(ConversationEvent::deleted(id.clone()));
        }

        tracing::info!(
            deleted = outcome.deleted.len(),
            failed = outcome.failed.len(),
            "Batch delete finished"
        );
        Some(outcome)
    }
}

impl Drop for HistoryManager {
    fn drop(&mut self) {
        self.timers.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Message;
    use crate::history::SelectionPhase;
    use std::collections::HashSet;
    use crate::event::ConversationEventReceiver;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    // Mock ConversationRepository for testing
    struct MockConversationRepository {
        conversations: Mutex<Vec<Conversation>>,
        failing_ids: HashSet<String>,
        fail_listing: bool,
        delete_calls: Mutex<Vec<String>>,
    }

    impl MockConversationRepository {
        fn with(ids: &[&str]) -> Self {
            Self {
                conversations: Mutex::new(
                    ids.iter()
                        .map(|id| {
                            Conversation::new(
                                *id,
                                format!("Chat {}", id),
                                vec![Message::user("Hi"), Message::assistant("Hello")],
                            )
                        })
                        .collect(),
                ),
                failing_ids: HashSet::new(),
                fail_listing: false,
                delete_calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(mut self, ids: &[&str]) -> Self {
            self.failing_ids = ids.iter().map(|s| s.to_string()).collect();
            self
        }

        fn failing_listing(mut self) -> Self {
            self.fail_listing = true;
            self
        }

        fn delete_calls(&self) -> Vec<String> {
            self.delete_calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ConversationRepository for MockConversationRepository {
        async fn list_all(&self) -> Result<Vec<Conversation>> {
            if self.fail_listing {
                return Err(RecallError::data_access("store offline"));
            }
            Ok(self.conversations.lock().unwrap().clone())
        }

        async fn find_by_id(&self, conversation_id: &str) -> Result<Option<Conversation>> {
            let conversations = self.conversations.lock().unwrap();
            Ok(conversations.iter().find(|c| c.id == conversation_id).cloned())
        }

        async fn save(&self, conversation: &Conversation) -> Result<()> {
            self.conversations.lock().unwrap().push(conversation.clone());
            Ok(())
        }

        async fn delete(&self, conversation_id: &str) -> Result<()> {
            self.delete_calls
                .lock()
                .unwrap()
                .push(conversation_id.to_string());
            if self.failing_ids.contains(conversation_id) {
                return Err(RecallError::data_access("locked"));
            }
            self.conversations
                .lock()
                .unwrap()
                .retain(|c| c.id != conversation_id);
            Ok(())
        }
    }

    // Mock FileSaver for testing
    #[derive(Default)]
    struct MockFileSaver {
        fail: bool,
        saved: Mutex<Vec<(String, String)>>,
    }

    #[async_trait::async_trait]
    impl FileSaver for MockFileSaver {
        async fn save_text_file(&self, filename: &str, content: &str) -> Result<PathBuf> {
            if self.fail {
                return Err(RecallError::export("save dialog denied"));
            }
            self.saved
                .lock()
                .unwrap()
                .push((filename.to_string(), content.to_string()));
            Ok(PathBuf::from("/downloads").join(filename))
        }
    }

    // Mock OverlayMailbox for testing
    #[derive(Default)]
    struct MockOverlayMailbox {
        fail: bool,
        slot: Mutex<Option<OverlayHandoff>>,
    }

    #[async_trait::async_trait]
    impl OverlayMailbox for MockOverlayMailbox {
        async fn post(&self, handoff: OverlayHandoff) -> Result<()> {
            if self.fail {
                return Err(RecallError::io("storage full"));
            }
            *self.slot.lock().unwrap() = Some(handoff);
            Ok(())
        }

        async fn peek(&self) -> Result<Option<OverlayHandoff>> {
            Ok(self.slot.lock().unwrap().clone())
        }

        async fn take(&self) -> Result<Option<OverlayHandoff>> {
            Ok(self.slot.lock().unwrap().take())
        }
    }

    struct Fixture {
        repository: Arc<MockConversationRepository>,
        mailbox: Arc<MockOverlayMailbox>,
        manager: HistoryManager,
    }

    fn fixture_with(
        repository: MockConversationRepository,
        saver: MockFileSaver,
        mailbox: MockOverlayMailbox,
    ) -> Fixture {
        let repository = Arc::new(repository);
        let mailbox = Arc::new(mailbox);
        let manager = HistoryManager::new(
            repository.clone(),
            Arc::new(saver),
            mailbox.clone(),
            ConversationEventBus::new(),
            HistoryOptions::default(),
        );
        Fixture {
            repository,
            mailbox,
            manager,
        }
    }

    fn fixture(ids: &[&str]) -> Fixture {
        fixture_with(
            MockConversationRepository::with(ids),
            MockFileSaver::default(),
            MockOverlayMailbox::default(),
        )
    }

    fn drain(rx: &mut ConversationEventReceiver) -> Vec<String> {
        let mut ids = Vec::new();
        while let Ok(event) = rx.try_recv() {
            ids.push(event.conversation_id().to_string());
        }
        ids
    }

    #[tokio::test]
    async fn test_activate_loads_conversations() {
        let f = fixture(&["a", "b"]);
        assert!(f.manager.snapshot().conversations.is_empty());

        f.manager.activate().await;

        let snapshot = f.manager.snapshot();
        assert_eq!(snapshot.conversations.len(), 2);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_refresh_failure_empties_cache() {
        let f = fixture(&["a"]);
        f.manager.refresh().await;
        assert_eq!(f.manager.snapshot().conversations.len(), 1);

        let failing = fixture_with(
            MockConversationRepository::with(&["a"]).failing_listing(),
            MockFileSaver::default(),
            MockOverlayMailbox::default(),
        );
        failing.manager.refresh().await;

        let snapshot = failing.manager.snapshot();
        assert!(snapshot.conversations.is_empty());
        assert!(!snapshot.loading);
        assert_eq!(snapshot.last_error, None);
    }

    #[tokio::test]
    async fn test_search_filters_visible_only() {
        let f = fixture(&["a", "b"]);
        f.manager.refresh().await;

        f.manager.set_search_query("chat b");

        let snapshot = f.manager.snapshot();
        assert_eq!(snapshot.conversations.len(), 2);
        assert_eq!(snapshot.visible.len(), 1);
        assert_eq!(snapshot.visible[0].id, "b");
    }

    #[tokio::test]
    async fn test_confirm_delete_evicts_and_broadcasts_once() {
        let f = fixture(&["a", "b", "c"]);
        f.manager.activate().await;
        let mut rx = f.manager.events().subscribe();

        let target = f.manager.snapshot().conversations[1].clone();
        f.manager.view(target.clone());
        f.manager.select(Some(target.id.clone()));
        f.manager.request_delete(target.id.clone());
        assert_eq!(f.manager.snapshot().pending_delete, Some(target.id.clone()));

        let deleted = f.manager.confirm_delete().await.unwrap();

        assert_eq!(deleted, Some(target.id.clone()));
        let snapshot = f.manager.snapshot();
        assert!(snapshot.conversations.iter().all(|c| c.id != target.id));
        assert_eq!(snapshot.pending_delete, None);
        assert_eq!(snapshot.viewing, None);
        assert_eq!(snapshot.selected, None);
        assert_eq!(drain(&mut rx), vec![target.id]);
    }

    #[tokio::test]
    async fn test_confirm_delete_without_pending_is_noop() {
        let f = fixture(&["a"]);
        f.manager.refresh().await;

        assert_eq!(f.manager.confirm_delete().await.unwrap(), None);
        assert!(f.repository.delete_calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_delete_keeps_conversation() {
        let f = fixture(&["a"]);
        f.manager.refresh().await;

        f.manager.request_delete("a");
        f.manager.cancel_delete();

        assert_eq!(f.manager.snapshot().pending_delete, None);
        assert_eq!(f.manager.confirm_delete().await.unwrap(), None);
        assert_eq!(f.manager.snapshot().conversations.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_cache_and_clears_pending() {
        let f = fixture_with(
            MockConversationRepository::with(&["a", "b"]).failing_on(&["a"]),
            MockFileSaver::default(),
            MockOverlayMailbox::default(),
        );
        f.manager.refresh().await;
        let mut rx = f.manager.events().subscribe();

        f.manager.request_delete("a");
        let result = f.manager.confirm_delete().await;

        assert!(result.is_err());
        let snapshot = f.manager.snapshot();
        assert_eq!(snapshot.pending_delete, None);
        assert!(snapshot.conversations.iter().any(|c| c.id == "a"));
        assert!(snapshot.last_error.is_some());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_mark_clears_after_display_duration() {
        let f = fixture(&["a"]);
        f.manager.refresh().await;
        let conversation = f.manager.snapshot().conversations[0].clone();

        let path = f.manager.download(&conversation).await.unwrap();

        assert_eq!(path, PathBuf::from("/downloads/chat_a.md"));
        assert!(f.manager.snapshot().is_recently_downloaded("a"));

        tokio::time::sleep(Duration::from_millis(DOWNLOAD_SUCCESS_DISPLAY_MS + 10)).await;

        assert!(!f.manager.snapshot().is_recently_downloaded("a"));
    }

    #[tokio::test]
    async fn test_download_failure_removes_mark_immediately() {
        let f = fixture_with(
            MockConversationRepository::with(&["a"]),
            MockFileSaver {
                fail: true,
                ..Default::default()
            },
            MockOverlayMailbox::default(),
        );
        f.manager.refresh().await;
        let conversation = f.manager.snapshot().conversations[0].clone();

        let result = f.manager.download(&conversation).await;

        assert!(result.unwrap_err().is_export());
        assert!(!f.manager.snapshot().is_recently_downloaded("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_cancels_pending_timers() {
        let f = fixture(&["a"]);
        f.manager.refresh().await;
        let conversation = f.manager.snapshot().conversations[0].clone();
        f.manager.download(&conversation).await.unwrap();

        f.manager.dispose();
        tokio::time::sleep(Duration::from_millis(DOWNLOAD_SUCCESS_DISPLAY_MS * 2)).await;

        assert!(f.manager.is_disposed());
        assert!(f.manager.snapshot().is_recently_downloaded("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_posts_handoff_and_flag_self_clears() {
        let f = fixture(&["a"]);

        f.manager.attach_to_overlay("a").await.unwrap();

        let handoff = f.mailbox.peek().await.unwrap().unwrap();
        assert_eq!(handoff.conversation_id, "a");
        assert!(f.manager.snapshot().attached);

        tokio::time::sleep(Duration::from_millis(DOWNLOAD_SUCCESS_DISPLAY_MS + 10)).await;

        assert!(!f.manager.snapshot().attached);
    }

    #[tokio::test]
    async fn test_attach_failure_leaves_flag_unset() {
        let f = fixture_with(
            MockConversationRepository::with(&["a"]),
            MockFileSaver::default(),
            MockOverlayMailbox {
                fail: true,
                ..Default::default()
            },
        );

        assert!(f.manager.attach_to_overlay("a").await.is_err());
        assert!(!f.manager.snapshot().attached);
    }

    #[tokio::test]
    async fn test_batch_delete_scenario() {
        let f = fixture(&["a", "b", "c"]);
        f.manager.activate().await;
        let mut rx = f.manager.events().subscribe();

        f.manager.toggle_selection_mode();
        f.manager.toggle_select_item("c");
        f.manager.toggle_select_item("a");
        assert!(f.manager.request_batch_delete());
        assert_eq!(
            f.manager.snapshot().phase,
            SelectionPhase::ConfirmingBatchDelete
        );

        let outcome = f.manager.confirm_batch_delete().await.unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.deleted, vec!["c".to_string(), "a".to_string()]);
        assert_eq!(f.repository.delete_calls(), vec!["c", "a"]);

        let snapshot = f.manager.snapshot();
        let remaining: Vec<&str> = snapshot.conversations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(remaining, vec!["b"]);
        assert!(!snapshot.selection_mode);
        assert!(snapshot.selected_ids.is_empty());
        assert!(!snapshot.confirming_batch_delete);
        assert_eq!(snapshot.phase, SelectionPhase::Idle);
        assert_eq!(drain(&mut rx), vec!["c".to_string(), "a".to_string()]);
    }

    #[tokio::test]
    async fn test_batch_delete_with_empty_selection_is_noop() {
        let f = fixture(&["a"]);
        f.manager.refresh().await;
        let mut rx = f.manager.events().subscribe();
        f.manager.toggle_selection_mode();

        assert!(f.manager.confirm_batch_delete().await.is_none());

        let snapshot = f.manager.snapshot();
        assert!(f.repository.delete_calls().is_empty());
        assert!(drain(&mut rx).is_empty());
        assert_eq!(snapshot.phase, SelectionPhase::Selecting);
        assert_eq!(snapshot.conversations.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_partial_failure_only_evicts_deleted() {
        let f = fixture_with(
            MockConversationRepository::with(&["a", "b", "c"]).failing_on(&["b"]),
            MockFileSaver::default(),
            MockOverlayMailbox::default(),
        );
        f.manager.refresh().await;
        let mut rx = f.manager.events().subscribe();

        f.manager.toggle_selection_mode();
        f.manager.select_all();
        f.manager.request_batch_delete();
        let outcome = f.manager.confirm_batch_delete().await.unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(outcome.deleted, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, "b");

        let snapshot = f.manager.snapshot();
        let remaining: Vec<&str> = snapshot.conversations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(remaining, vec!["b"]);
        assert!(!snapshot.selection_mode);
        assert!(!snapshot.confirming_batch_delete);
        assert!(snapshot.last_error.unwrap().contains("1 of 3"));
        assert_eq!(drain(&mut rx), vec!["a".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn test_managers_with_separate_buses_are_isolated() {
        let first = fixture(&["a"]);
        let second = fixture(&["a"]);
        first.manager.refresh().await;
        let mut rx = second.manager.events().subscribe();

        first.manager.request_delete("a");
        first.manager.confirm_delete().await.unwrap();

        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_large_batch_announces_every_deletion() {
        let ids: Vec<String> = (0..150).map(|i| format!("c{}", i)).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let f = fixture(&id_refs);
        f.manager.refresh().await;
        let mut rx = f.manager.events().subscribe();

        f.manager.toggle_selection_mode();
        f.manager.select_all();
        f.manager.request_batch_delete();
        let outcome = f.manager.confirm_batch_delete().await.unwrap();

        assert_eq!(outcome.deleted.len(), 150);
        assert_eq!(drain(&mut rx), ids);
    }

    #[tokio::test]
    async fn test_download_after_dispose_sets_no_mark() {
        let f = fixture(&["a"]);
        f.manager.refresh().await;
        let conversation = f.manager.snapshot().conversations[0].clone();
        f.manager.dispose();

        f.manager.download(&conversation).await.unwrap();
        f.manager.attach_to_overlay("a").await.unwrap();

        let snapshot = f.manager.snapshot();
        assert!(!snapshot.is_recently_downloaded("a"));
        assert!(!snapshot.attached);
        assert!(f.mailbox.peek().await.unwrap().is_some());
    }

    // Repository whose listings resolve only when the test releases them,
    // one gate per `list_all` call in call order.
    struct GatedRepository {
        gates: Mutex<VecDeque<oneshot::Receiver<Vec<Conversation>>>>,
        calls: AtomicUsize,
    }

    impl GatedRepository {
        fn new(gates: Vec<oneshot::Receiver<Vec<Conversation>>>) -> Self {
            Self {
                gates: Mutex::new(gates.into()),
                calls: AtomicUsize::new(0),
            }
        }

        async fn wait_for_calls(&self, n: usize) {
            while self.calls.load(Ordering::SeqCst) < n {
                tokio::task::yield_now().await;
            }
        }
    }

    #[async_trait::async_trait]
    impl ConversationRepository for GatedRepository {
        async fn list_all(&self) -> Result<Vec<Conversation>> {
            let gate = self.gates.lock().unwrap().pop_front();
            self.calls.fetch_add(1, Ordering::SeqCst);
            match gate {
                Some(rx) => rx
                    .await
                    .map_err(|_| RecallError::internal("listing abandoned")),
                None => Ok(Vec::new()),
            }
        }

        async fn find_by_id(&self, _conversation_id: &str) -> Result<Option<Conversation>> {
            Ok(None)
        }

        async fn save(&self, _conversation: &Conversation) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _conversation_id: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_refresh_shows_loading_and_latest_issued_wins() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let repository = Arc::new(GatedRepository::new(vec![first_rx, second_rx]));
        let manager = Arc::new(HistoryManager::new(
            repository.clone(),
            Arc::new(MockFileSaver::default()),
            Arc::new(MockOverlayMailbox::default()),
            ConversationEventBus::new(),
            HistoryOptions::default(),
        ));

        let first = tokio::spawn({
            let manager = manager.clone();
            async move { manager.refresh().await }
        });
        repository.wait_for_calls(1).await;
        assert!(manager.snapshot().loading);

        let second = tokio::spawn({
            let manager = manager.clone();
            async move { manager.refresh().await }
        });
        repository.wait_for_calls(2).await;

        second_tx
            .send(vec![Conversation::new("new", "Newer listing", vec![])])
            .unwrap();
        second.await.unwrap();
        first_tx
            .send(vec![Conversation::new("old", "Older listing", vec![])])
            .unwrap();
        first.await.unwrap();

        let snapshot = manager.snapshot();
        let ids: Vec<&str> = snapshot.conversations.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["new"]);
        assert!(!snapshot.loading);
    }
}
