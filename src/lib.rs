//! Tabmark - core of a tabbed Markdown editor
//!
//! The crate tracks unsaved changes per document, keeps the raw editor,
//! split editor and preview panes in sync, toggles inline Markdown styles
//! and decodes files by byte-order mark. Widgets are reached only through
//! the [`surface`] traits, so the core runs headless.

pub mod config;
pub mod document;
pub mod encoding;
pub mod error;
pub mod markdown;
pub mod state;
pub mod surface;
pub mod tab;
pub mod view;

pub use document::{ContentChanged, DocumentState};
pub use error::{Error, Result};
pub use markdown::FormattingState;
pub use state::TabSet;
pub use tab::DocumentTab;
pub use view::ViewMode;
