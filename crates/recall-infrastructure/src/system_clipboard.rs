//! Clipboard implementation using `arboard`.

use recall_core::error::{RecallError, Result};
use recall_core::platform::Clipboard;

/// Writes to the desktop clipboard.
///
/// A fresh `arboard::Clipboard` is opened per call; holding one open keeps
/// an X11 connection alive for the life of the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| RecallError::platform(format!("Clipboard unavailable: {}", e)))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| RecallError::platform(format!("Failed to copy to clipboard: {}", e)))
    }
}
