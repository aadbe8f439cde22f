//! In-memory state of the history screen.

use crate::conversation::{search, Conversation};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Where the batch-selection flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    /// Selection mode is off.
    Idle,
    /// Selection mode is on; zero or more conversations are selected.
    Selecting,
    /// Selection mode is on and the batch-delete confirmation is open.
    ConfirmingBatchDelete,
}

/// Mutable state behind the history manager.
///
/// Transient marks carry the sequence number they were set with so a timer
/// armed for an older mark never clears a newer one.
#[derive(Debug, Default)]
pub(crate) struct HistoryState {
    pub conversations: Vec<Conversation>,
    pub loading: bool,
    pub viewing: Option<Conversation>,
    pub selected: Option<String>,
    pub pending_delete: Option<String>,
    pub recently_downloaded: HashMap<String, u64>,
    pub attached: Option<u64>,
    pub selection_mode: bool,
    /// Selected ids in the order they were picked.
    pub selected_ids: Vec<String>,
    pub confirming_batch_delete: bool,
    pub search_query: String,
    pub last_error: Option<String>,
    mark_seq: u64,
}

impl HistoryState {
    pub fn phase(&self) -> SelectionPhase {
        match (self.selection_mode, self.confirming_batch_delete) {
            (false, _) => SelectionPhase::Idle,
            (true, false) => SelectionPhase::Selecting,
            (true, true) => SelectionPhase::ConfirmingBatchDelete,
        }
    }

    fn next_mark(&mut self) -> u64 {
        self.mark_seq += 1;
        self.mark_seq
    }

    pub fn mark_downloaded(&mut self, id: &str) -> u64 {
        let mark = self.next_mark();
        self.recently_downloaded.insert(id.to_string(), mark);
        mark
    }

    pub fn clear_download_mark(&mut self, id: &str, mark: u64) {
        if self.recently_downloaded.get(id) == Some(&mark) {
            self.recently_downloaded.remove(id);
        }
    }

    pub fn mark_attached(&mut self) -> u64 {
        let mark = self.next_mark();
        self.attached = Some(mark);
        mark
    }

    pub fn clear_attach_mark(&mut self, mark: u64) {
        if self.attached == Some(mark) {
            self.attached = None;
        }
    }

    /// Drops the given conversations from every region of the state.
    pub fn evict(&mut self, ids: &[String]) {
        if ids.is_empty() {
            return;
        }
        self.conversations.retain(|c| !ids.contains(&c.id));
        self.selected_ids.retain(|id| !ids.contains(id));
        if self
            .viewing
            .as_ref()
            .is_some_and(|c| ids.contains(&c.id))
        {
            self.viewing = None;
        }
        if self.selected.as_ref().is_some_and(|id| ids.contains(id)) {
            self.selected = None;
        }
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            visible: search::filter(&self.conversations, &self.search_query)
                .into_iter()
                .cloned()
                .collect(),
            conversations: self.conversations.clone(),
            loading: self.loading,
            viewing: self.viewing.clone(),
            selected: self.selected.clone(),
            pending_delete: self.pending_delete.clone(),
            recently_downloaded: self.recently_downloaded.keys().cloned().collect(),
            attached: self.attached.is_some(),
            selection_mode: self.selection_mode,
            selected_ids: self.selected_ids.clone(),
            confirming_batch_delete: self.confirming_batch_delete,
            phase: self.phase(),
            search_query: self.search_query.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Read-only view of the history screen that presentation renders from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    /// Every cached conversation
    pub conversations: Vec<Conversation>,
    /// Cached conversations matching the search query
    pub visible: Vec<Conversation>,
    pub loading: bool,
    /// Conversation open in the detail view
    pub viewing: Option<Conversation>,
    /// Highlighted conversation card
    pub selected: Option<String>,
    /// Conversation awaiting single-delete confirmation
    pub pending_delete: Option<String>,
    /// Conversations whose download succeeded within the display window
    pub recently_downloaded: BTreeSet<String>,
    /// Whether an overlay attach succeeded within the display window
    pub attached: bool,
    pub selection_mode: bool,
    /// Batch selection in pick order
    pub selected_ids: Vec<String>,
    pub confirming_batch_delete: bool,
    pub phase: SelectionPhase,
    pub search_query: String,
    /// Description of the most recent deletion failure
    pub last_error: Option<String>,
}

impl HistorySnapshot {
    pub fn is_recently_downloaded(&self, id: &str) -> bool {
        self.recently_downloaded.contains(id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }
}
