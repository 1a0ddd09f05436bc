//! One open document tab
//!
//! `DocumentTab` is the entry point the window layer talks to. It owns the
//! dirty tracker, the view controller with its surfaces and the formatting
//! engine, and sequences them so every path that changes text goes through
//! the same change handler.
//!
//! # Example
//!
//! ```
//! use tabmark::config::Settings;
//! use tabmark::tab::DocumentTab;
//!
//! let mut tab = DocumentTab::new(0, &Settings::default());
//! tab.set_content("hello", Some("note.md"));
//! tab.apply_bold();
//! assert_eq!(tab.content(), "**hello**");
//! assert!(tab.is_dirty());
//! ```

use crate::config::Settings;
use crate::document::{ContentChanged, DocumentState, ListenerId, TextStats};
use crate::encoding::{normalize_line_endings, LineEnding};
use crate::markdown::{ComrakRenderer, FormattingEngine, FormattingState, InlineToggle};
use crate::surface::{HtmlPreview, PreviewSurface, TextBuffer, TextSurface};
use crate::view::{ViewMode, ViewModeController};
use log::debug;
use std::path::{Path, PathBuf};

/// Runtime state for an open tab.
pub struct DocumentTab<S = TextBuffer, P = HtmlPreview> {
    /// Unique identifier for this tab
    id: usize,
    document: DocumentState,
    view: ViewModeController<S, P>,
    formatting: FormattingEngine,
    /// Line ending the file was loaded with, restored on save
    line_ending: LineEnding,
}

impl DocumentTab {
    /// Create an empty "Untitled" tab with in-memory surfaces configured
    /// from `settings`.
    pub fn new(id: usize, settings: &Settings) -> Self {
        let renderer = ComrakRenderer::new(settings.markdown.clone())
            .with_stylesheet(settings.preview_stylesheet.clone());
        let view = ViewModeController::in_memory(
            settings.default_view_mode,
            renderer,
            settings.max_undo_history,
        );
        Self::with_view(id, view)
    }
}

impl<S: TextSurface, P: PreviewSurface> DocumentTab<S, P> {
    /// Create a tab over caller-provided surfaces.
    pub fn with_view(id: usize, view: ViewModeController<S, P>) -> Self {
        let mut tab = Self {
            id,
            document: DocumentState::new(),
            view,
            formatting: FormattingEngine::new(),
            line_ending: LineEnding::system_default(),
        };
        tab.view.populate(&mut tab.document);
        tab
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    pub fn view(&self) -> &ViewModeController<S, P> {
        &self.view
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view.mode()
    }

    /// The active editable surface, for hosts forwarding user input.
    /// Call [`handle_text_changed`](Self::handle_text_changed) after editing it.
    pub fn active_surface_mut(&mut self) -> Option<&mut S> {
        self.view.active_surface_mut()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────

    /// Load `text` as the clean content of this tab.
    ///
    /// Line endings are normalized to `\n` and the original style is kept
    /// for [`text_to_save`](Self::text_to_save). No listener is notified.
    pub fn set_content(&mut self, text: &str, file_name: Option<&str>) {
        self.line_ending = LineEnding::detect(text);
        let text = normalize_line_endings(text);
        self.document.load(text.into_owned(), file_name);
        self.view.populate(&mut self.document);
    }

    /// The live document text.
    pub fn content(&self) -> &str {
        self.document.current_content()
    }

    /// The content as an ordered sequence of lines for persistence.
    pub fn content_to_save_file(&self) -> Vec<String> {
        self.content().split('\n').map(str::to_string).collect()
    }

    /// The content joined with the line ending it was loaded with.
    pub fn text_to_save(&self) -> String {
        self.content_to_save_file().join(self.line_ending.as_str())
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    pub fn stats(&self) -> TextStats {
        TextStats::from_text(self.content())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File Identity and Dirty State
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>, name: impl Into<String>) {
        self.document.set_file_path(path, name);
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.document.file_path()
    }

    pub fn file_name(&self) -> &str {
        self.document.file_name()
    }

    pub fn reset_for_new_file(&mut self) {
        self.document.reset_for_new_file();
    }

    pub fn is_dirty(&self) -> bool {
        self.document.is_dirty()
    }

    /// Call after the I/O layer saved [`text_to_save`](Self::text_to_save).
    pub fn mark_as_clean(&mut self) {
        self.document.mark_as_clean();
    }

    /// Get the display title for this tab.
    pub fn title(&self) -> String {
        self.document.title()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View Mode
    // ─────────────────────────────────────────────────────────────────────────

    /// Switch by mode tag (`"md"`, `"split"`, `"preview"`). Unknown tags are
    /// ignored.
    pub fn set_view_mode(&mut self, tag: &str) -> bool {
        self.view.set_view_mode_tag(tag, &mut self.document)
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.view.set_view_mode(mode, &mut self.document);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Formatting
    // ─────────────────────────────────────────────────────────────────────────

    pub fn apply_bold(&mut self) {
        self.apply_format(InlineToggle::Bold);
    }

    pub fn apply_italic(&mut self) {
        self.apply_format(InlineToggle::Italic);
    }

    pub fn apply_strikethrough(&mut self) {
        self.apply_format(InlineToggle::Strikethrough);
    }

    fn apply_format(&mut self, toggle: InlineToggle) {
        let surface = self
            .view
            .active_surface_mut()
            .map(|s| s as &mut dyn TextSurface);
        if self.formatting.apply(surface, toggle).is_some() {
            self.sync_content();
        }
    }

    /// Republish the formatting state after the caret or selection moved.
    pub fn handle_selection_changed(&mut self) -> Option<FormattingState> {
        if self.document.is_loading() {
            return None;
        }
        let surface = self.view.active_surface().map(|s| s as &dyn TextSurface);
        self.formatting.refresh(surface)
    }

    /// Pull the active surface's text into the document after an edit and
    /// republish the formatting state.
    ///
    /// Ignored while loading. Refreshes the live preview in split mode.
    pub fn handle_text_changed(&mut self) {
        if self.sync_content() {
            let surface = self.view.active_surface().map(|s| s as &dyn TextSurface);
            self.formatting.refresh(surface);
        }
    }

    /// Returns `false` when nothing was synced.
    fn sync_content(&mut self) -> bool {
        if self.document.is_loading() {
            return false;
        }
        let Some(text) = self.view.active_surface().map(|s| s.text()) else {
            return false;
        };
        self.document.update_current_content(text);
        if self.view.mode() == ViewMode::SplitView {
            self.view.refresh_preview(self.document.current_content());
        }
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing Commands
    // ─────────────────────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.edit(|s| s.undo())
    }

    pub fn redo(&mut self) -> bool {
        self.edit(|s| s.redo())
    }

    pub fn cut(&mut self) -> bool {
        self.edit(|s| s.cut())
    }

    pub fn paste(&mut self) -> bool {
        self.edit(|s| s.paste())
    }

    pub fn copy(&mut self) -> bool {
        self.view.active_surface_mut().is_some_and(|s| s.copy())
    }

    /// Insert `text` as a new line at the caret's line.
    pub fn insert_text(&mut self, text: &str) -> bool {
        self.edit(|s| {
            let line = s.current_line_index();
            s.insert_line(line, text);
            true
        })
    }

    /// Run `action` on the active surface and sync the document if it
    /// reports a change.
    fn edit(&mut self, action: impl FnOnce(&mut S) -> bool) -> bool {
        let changed = match self.view.active_surface_mut() {
            Some(surface) => action(surface),
            None => {
                debug!("Tab {}: no editable surface in this mode", self.id);
                return false;
            }
        };
        if changed {
            self.handle_text_changed();
        }
        changed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listeners
    // ─────────────────────────────────────────────────────────────────────────

    pub fn on_content_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ContentChanged) + 'static,
    {
        self.document.on_content_changed(listener)
    }

    pub fn on_formatting_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&FormattingState) + 'static,
    {
        self.formatting.on_state_changed(listener)
    }
}
