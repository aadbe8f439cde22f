//! Batch selection transitions.
//!
//! These only touch in-memory state; the store is reached from
//! `HistoryManager::confirm_batch_delete`.

use super::state::HistoryState;

impl HistoryState {
    /// Flips selection mode. The selection always starts empty afterwards.
    pub fn toggle_selection_mode(&mut self) {
        self.selection_mode = !self.selection_mode;
        self.selected_ids.clear();
        if !self.selection_mode {
            self.confirming_batch_delete = false;
        }
    }

    /// Adds `id` to the selection, or removes it when already selected.
    pub fn toggle_select_item(&mut self, id: &str) {
        if let Some(pos) = self.selected_ids.iter().position(|s| s == id) {
            self.selected_ids.remove(pos);
        } else {
            self.selected_ids.push(id.to_string());
        }
    }

    /// Selects every cached conversation, ignoring the search filter.
    pub fn select_all(&mut self) {
        self.selected_ids = self.conversations.iter().map(|c| c.id.clone()).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected_ids.clear();
    }

    /// Opens the batch-delete confirmation. Returns false with an empty selection.
    pub fn request_batch_delete(&mut self) -> bool {
        if self.selected_ids.is_empty() {
            return false;
        }
        self.confirming_batch_delete = true;
        true
    }

    /// Closes the confirmation, keeping mode and selection.
    pub fn cancel_batch_delete(&mut self) {
        self.confirming_batch_delete = false;
    }

    /// Resets the batch flow after a confirmed delete.
    pub fn finish_batch_delete(&mut self) {
        self.selected_ids.clear();
        self.selection_mode = false;
        self.confirming_batch_delete = false;
    }
}
