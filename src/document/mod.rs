//! Document state module for tabmark
//!
//! This module tracks a single open document: its file identity, the
//! snapshot taken at the last load or save, the live content, and the
//! dirty flag derived from the two. Listeners are notified only when the
//! dirty flag flips.

mod events;
mod state;
mod stats;

pub use events::{ContentChanged, EventEmitter, ListenerId};
pub use state::{DocumentState, NEW_DOCUMENT_NAME, UNTITLED_NAME};
pub use stats::TextStats;
