//! Document export for downloaded conversations.

mod markdown;

pub use markdown::{export_filename, render_markdown, FILENAME_STEM_MAX_CHARS};
