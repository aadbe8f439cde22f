//! Auto-clearing timers for transient success marks.
//!
//! Every timer is tied to one cancellation token owned by the history
//! manager; cancelling it on teardown stops all pending clears.

use super::state::HistoryState;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub(crate) struct TransientTimers {
    display: Duration,
    token: CancellationToken,
}

impl TransientTimers {
    pub fn new(display: Duration) -> Self {
        Self {
            display,
            token: CancellationToken::new(),
        }
    }

    /// Runs `clear` against the state once the display duration elapses,
    /// unless the timers are cancelled first.
    pub fn arm<F>(&self, state: Arc<Mutex<HistoryState>>, clear: F)
    where
        F: FnOnce(&mut HistoryState) + Send + 'static,
    {
        if self.token.is_cancelled() {
            return;
        }

        let token = self.token.clone();
        let display = self.display;
        tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    tracing::trace!("Transient timer cancelled");
                }

                _ = tokio::time::sleep(display) => {
                    let mut state = super::lock(&state);
                    clear(&mut state);
                }
            }
        });
    }

    pub fn cancel_all(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TransientTimers {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
