//! Markdown formatting and preview rendering
//!
//! - [`formatting`]: bold/italic/strikethrough toggles on the active surface
//! - [`render`]: Markdown to HTML preview pages using comrak

pub mod formatting;
pub mod render;

pub use formatting::{
    is_formatted_with, toggle_bold, toggle_italic, toggle_strikethrough, FormattingEngine,
    FormattingState, InlineToggle, Marker,
};
pub use render::{ComrakRenderer, MarkdownRenderer, EMPTY_PREVIEW_TEXT};
