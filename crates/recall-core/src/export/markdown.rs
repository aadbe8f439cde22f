//! Markdown rendering of a conversation.
//!
//! Layout:
//!
//! ```text
//! # <title>
//!
//! **Created:** <local time>
//! **Updated:** <local time>
//! **Messages:** <count>
//!
//! ---
//!
//! ## USER: <content>
//!
//! ## ASSISTANT: <content>
//! ```

use crate::conversation::Conversation;
use chrono::{DateTime, Local};

/// Maximum length of the sanitized filename stem.
pub const FILENAME_STEM_MAX_CHARS: usize = 16;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders `conversation` as a markdown document.
///
/// Messages are separated by exactly one blank line and the document ends
/// with a single newline after the last message.
pub fn render_markdown(conversation: &Conversation) -> String {
    let mut doc = String::new();

    doc.push_str(&format!("# {}\n\n", conversation.title));
    doc.push_str(&format!(
        "**Created:** {}\n",
        format_timestamp(&conversation.created_at)
    ));
    doc.push_str(&format!(
        "**Updated:** {}\n",
        format_timestamp(&conversation.updated_at)
    ));
    doc.push_str(&format!(
        "**Messages:** {}\n\n",
        conversation.message_count()
    ));
    doc.push_str("---\n\n");

    let body = conversation
        .messages
        .iter()
        .map(|m| {
            format!(
                "## {}: {}",
                m.role.as_str().to_uppercase(),
                m.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    doc.push_str(&body);
    if !body.is_empty() {
        doc.push('\n');
    }

    doc
}

/// Builds the download filename for a conversation title.
///
/// Every character outside `[a-zA-Z0-9]` becomes `_`, the result is
/// lower-cased and cut to [`FILENAME_STEM_MAX_CHARS`] characters, then `.md`
/// is appended.
pub fn export_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .take(FILENAME_STEM_MAX_CHARS)
        .collect();

    format!("{}.md", stem)
}

/// Formats an RFC 3339 timestamp in local time; anything unparsable is
/// printed as stored.
fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
