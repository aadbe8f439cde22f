//! History screen state management.
//!
//! `HistoryManager` owns the state behind the conversation-history screen:
//!
//! - the cached conversation list and its loading flag
//! - single-item view/delete/download/attach interaction
//! - the batch selection flow (`Idle` → `Selecting` → `ConfirmingBatchDelete`)
//! - deletion broadcasts on a [`ConversationEventBus`](crate::event::ConversationEventBus)
//!
//! Presentation reads [`HistorySnapshot`]s and calls manager actions.

mod manager;
mod selection;
mod state;
mod transient;

pub use manager::{BatchDeleteOutcome, HistoryManager, HistoryOptions};
pub use state::{HistorySnapshot, SelectionPhase};

use state::HistoryState;
use std::sync::{Mutex, MutexGuard};

/// Locks the state, recovering from a poisoned lock.
///
/// State updates are single assignments, so a panic mid-update cannot leave
/// a region half written.
fn lock(state: &Mutex<HistoryState>) -> MutexGuard<'_, HistoryState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
