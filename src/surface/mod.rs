//! Editing and preview surfaces
//!
//! A *surface* is one widget presenting a view of the document. The core
//! never talks to a concrete widget toolkit; it drives surfaces through the
//! [`TextSurface`] and [`PreviewSurface`] traits. In-memory implementations
//! are provided for headless hosts and tests.

mod buffer;
mod preview;

pub use buffer::TextBuffer;
pub use preview::HtmlPreview;

/// An editable text widget.
///
/// Line indices are zero-based. Lines are separated by `\n`; an empty
/// surface has exactly one empty line.
pub trait TextSurface {
    /// Full text of the surface.
    fn text(&self) -> String;

    /// Replace the whole text programmatically, resetting selection and history.
    fn load_text(&mut self, text: &str);

    /// Whether a non-empty selection exists.
    fn has_selection(&self) -> bool;

    /// Selected text, if any.
    fn selected_text(&self) -> Option<String>;

    /// Replace the selected text. No-op without a selection.
    fn replace_selection(&mut self, text: &str);

    /// Text of line `index`, or `None` if out of range.
    fn line_text(&self, index: usize) -> Option<String>;

    /// Replace line `index`. Returns `false` if out of range.
    fn set_line_text(&mut self, index: usize, text: &str) -> bool;

    /// Insert a new line before line `index`, or append when past the end.
    fn insert_line(&mut self, index: usize, text: &str);

    /// Line holding the caret.
    fn current_line_index(&self) -> usize;

    /// Number of lines.
    fn line_count(&self) -> usize;

    /// Ordered lines, without terminators.
    fn lines(&self) -> Vec<String> {
        (0..self.line_count())
            .filter_map(|index| self.line_text(index))
            .collect()
    }

    /// Undo the last edit. Returns `true` if the text changed.
    fn undo(&mut self) -> bool;

    /// Redo the last undone edit. Returns `true` if the text changed.
    fn redo(&mut self) -> bool;

    /// Move the selection to the clipboard. Returns `true` if the text changed.
    fn cut(&mut self) -> bool;

    /// Copy the selection to the clipboard. Never changes the text.
    fn copy(&mut self) -> bool;

    /// Insert the clipboard at the caret. Returns `true` if the text changed.
    fn paste(&mut self) -> bool;
}

/// A widget displaying rendered HTML.
pub trait PreviewSurface {
    /// Display a complete HTML page.
    fn show_html(&mut self, html: &str);
}
