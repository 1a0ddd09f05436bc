//! Per-document dirty tracking
//!
//! `DocumentState` owns the two strings that define "unsaved changes": the
//! snapshot from the last load or save and the live content reported by the
//! editing surface. `is_dirty()` is always computed from them, never stored.
//!
//! # Notifications
//! A [`ContentChanged`] event fires only when the dirty flag *transitions*
//! relative to the last value sent to listeners, and never while the loading
//! flag is set. Programmatic population of surfaces happens under that flag,
//! and `finish_loading` reconciles anything that flipped while it was held.

use super::events::{ContentChanged, EventEmitter, ListenerId};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Name of a freshly opened tab that has no file yet.
pub const UNTITLED_NAME: &str = "Untitled";

/// Name given by [`DocumentState::reset_for_new_file`].
pub const NEW_DOCUMENT_NAME: &str = "New Document";

/// Dirty-tracking state for one open document.
#[derive(Debug)]
pub struct DocumentState {
    /// File path (None for unsaved/new documents)
    file_path: Option<PathBuf>,
    /// Display name
    file_name: String,
    /// Snapshot as of the last load or save
    original_content: String,
    /// Live content
    current_content: String,
    /// Suppresses notifications during programmatic population
    loading: bool,
    /// Dirty value most recently sent to listeners
    last_notified_dirty: bool,
    content_changed: EventEmitter<ContentChanged>,
}

impl DocumentState {
    /// Create an empty, clean "Untitled" document.
    pub fn new() -> Self {
        Self {
            file_path: None,
            file_name: UNTITLED_NAME.to_string(),
            original_content: String::new(),
            current_content: String::new(),
            loading: false,
            last_notified_dirty: false,
            content_changed: EventEmitter::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace both snapshots with `content` and clear the dirty state.
    ///
    /// Runs with the loading flag held, so no listener is notified. A second
    /// call simply overwrites the first.
    pub fn load(&mut self, content: impl Into<String>, file_name: Option<&str>) {
        let was_loading = self.loading;
        self.loading = true;

        let content = content.into();
        self.original_content = content.clone();
        self.current_content = content;
        self.last_notified_dirty = false;
        if let Some(name) = file_name {
            self.file_name = name.to_string();
        }

        self.loading = was_loading;
        info!(
            "Loaded document '{}' ({} bytes)",
            self.file_name,
            self.current_content.len()
        );
    }

    /// Raise the loading flag before populating surfaces programmatically.
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Lower the loading flag and notify listeners if the dirty flag moved
    /// while it was held.
    pub fn finish_loading(&mut self) {
        self.loading = false;
        self.notify_if_transitioned();
    }

    /// Whether notifications are currently suppressed.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────

    /// Record the live content reported by the editing surface.
    pub fn update_current_content(&mut self, text: impl Into<String>) {
        self.current_content = text.into();
        if self.loading {
            return;
        }
        self.notify_if_transitioned();
    }

    /// Take the current content as the new clean snapshot, typically after
    /// the I/O layer saved it. Calling it again is a no-op.
    pub fn mark_as_clean(&mut self) {
        if self.original_content != self.current_content {
            self.original_content = self.current_content.clone();
        }
        if self.loading {
            return;
        }
        if self.last_notified_dirty {
            self.last_notified_dirty = false;
            self.emit(false);
        }
        info!("Marked '{}' as clean", self.file_name);
    }

    /// Whether the live content differs from the last snapshot.
    pub fn is_dirty(&self) -> bool {
        self.current_content != self.original_content
    }

    /// The live content.
    pub fn current_content(&self) -> &str {
        &self.current_content
    }

    /// The snapshot from the last load or save.
    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    fn notify_if_transitioned(&mut self) {
        let dirty = self.is_dirty();
        if dirty != self.last_notified_dirty {
            self.last_notified_dirty = dirty;
            debug!("'{}' dirty state changed to {}", self.file_name, dirty);
            self.emit(dirty);
        }
    }

    fn emit(&mut self, is_dirty: bool) {
        let event = ContentChanged {
            file_identifier: self.file_identifier(),
            is_dirty,
        };
        self.content_changed.emit(&event);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File Identity
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the path and display name, e.g. after "Save As". Does not touch
    /// the dirty state.
    pub fn set_file_path(&mut self, path: impl Into<PathBuf>, name: impl Into<String>) {
        self.file_path = Some(path.into());
        self.file_name = name.into();
    }

    /// Forget the file identity so the next save asks for a location.
    pub fn reset_for_new_file(&mut self) {
        self.file_path = None;
        self.file_name = NEW_DOCUMENT_NAME.to_string();
    }

    /// File path, if the document was ever saved or opened from disk.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Display name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Whether the document has a file path.
    pub fn is_saved(&self) -> bool {
        self.file_path.is_some()
    }

    /// Identifier carried by [`ContentChanged`]: the path, or empty if unsaved.
    pub fn file_identifier(&self) -> String {
        self.file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    /// Tab title, with a trailing `*` when dirty.
    pub fn title(&self) -> String {
        if self.is_dirty() {
            format!("{}*", self.file_name)
        } else {
            self.file_name.clone()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listeners
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a listener on the content-changed channel.
    pub fn on_content_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ContentChanged) + 'static,
    {
        self.content_changed.subscribe(listener)
    }

    /// Remove a content-changed listener.
    pub fn remove_content_listener(&mut self, id: ListenerId) -> bool {
        self.content_changed.unsubscribe(id)
    }
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorded(doc: &mut DocumentState) -> Rc<RefCell<Vec<ContentChanged>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        doc.on_content_changed(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_new_document_is_clean_untitled() {
        let doc = DocumentState::new();
        assert_eq!(doc.file_name(), UNTITLED_NAME);
        assert!(!doc.is_dirty());
        assert!(!doc.is_saved());
        assert_eq!(doc.file_identifier(), "");
    }

    #[test]
    fn test_load_sets_both_snapshots() {
        let mut doc = DocumentState::new();
        let events = recorded(&mut doc);

        doc.load("# Notes", Some("notes.md"));

        assert_eq!(doc.original_content(), "# Notes");
        assert_eq!(doc.current_content(), "# Notes");
        assert_eq!(doc.file_name(), "notes.md");
        assert!(!doc.is_dirty());
        assert!(!doc.is_loading());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_reload_overwrites_dirty_state() {
        let mut doc = DocumentState::new();
        doc.load("a", None);
        doc.update_current_content("b");
        assert!(doc.is_dirty());

        doc.load("c", None);
        assert!(!doc.is_dirty());
        assert_eq!(doc.current_content(), "c");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dirty Transition Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_notifies_only_on_transition() {
        let mut doc = DocumentState::new();
        doc.load("hello", None);
        let events = recorded(&mut doc);

        doc.update_current_content("hello!");
        doc.update_current_content("hello!!");
        doc.update_current_content("hello!!");
        assert_eq!(events.borrow().len(), 1);
        assert!(events.borrow()[0].is_dirty);

        doc.update_current_content("hello");
        assert_eq!(events.borrow().len(), 2);
        assert!(!events.borrow()[1].is_dirty);
    }

    #[test]
    fn test_dirty_matches_content_at_every_step() {
        let mut doc = DocumentState::new();
        doc.load("base", None);
        for text in ["base", "", "b", "base", "base2", "base"] {
            doc.update_current_content(text);
            assert_eq!(doc.is_dirty(), text != "base");
        }
    }

    #[test]
    fn test_identical_update_emits_nothing() {
        let mut doc = DocumentState::new();
        doc.load("same", None);
        let events = recorded(&mut doc);

        doc.update_current_content("same");
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_loading_flag_suppresses_notifications() {
        let mut doc = DocumentState::new();
        doc.load("text", None);
        let events = recorded(&mut doc);

        doc.begin_loading();
        doc.update_current_content("changed while loading");
        assert!(doc.is_dirty());
        assert!(events.borrow().is_empty());

        doc.update_current_content("text");
        doc.finish_loading();
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_finish_loading_reconciles_missed_transition() {
        let mut doc = DocumentState::new();
        doc.load("text", None);
        let events = recorded(&mut doc);

        doc.begin_loading();
        doc.update_current_content("edited");
        doc.finish_loading();

        assert_eq!(events.borrow().len(), 1);
        assert!(events.borrow()[0].is_dirty);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mark Clean Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_mark_as_clean_is_idempotent() {
        let mut doc = DocumentState::new();
        doc.set_file_path("/docs/a.md", "a.md");
        doc.load("v1", None);
        let events = recorded(&mut doc);

        doc.update_current_content("v2");
        doc.mark_as_clean();
        assert!(!doc.is_dirty());
        assert_eq!(doc.original_content(), "v2");

        doc.mark_as_clean();
        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            ContentChanged {
                file_identifier: "/docs/a.md".to_string(),
                is_dirty: false,
            }
        );
    }

    #[test]
    fn test_mark_as_clean_on_clean_document_is_silent() {
        let mut doc = DocumentState::new();
        let events = recorded(&mut doc);
        doc.mark_as_clean();
        assert!(events.borrow().is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File Identity Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_set_file_path_keeps_dirty_state() {
        let mut doc = DocumentState::new();
        doc.update_current_content("draft");
        assert!(doc.is_dirty());

        doc.set_file_path("/tmp/draft.md", "draft.md");
        assert!(doc.is_dirty());
        assert!(doc.is_saved());
        assert_eq!(doc.file_identifier(), "/tmp/draft.md");
        assert_eq!(doc.title(), "draft.md*");
    }

    #[test]
    fn test_reset_for_new_file() {
        let mut doc = DocumentState::new();
        doc.set_file_path("/tmp/x.md", "x.md");
        doc.reset_for_new_file();
        assert!(!doc.is_saved());
        assert_eq!(doc.file_name(), NEW_DOCUMENT_NAME);
        assert_eq!(doc.title(), NEW_DOCUMENT_NAME);
    }

    #[test]
    fn test_remove_content_listener() {
        let mut doc = DocumentState::new();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = doc.on_content_changed(move |_| *counter.borrow_mut() += 1);

        assert!(doc.remove_content_listener(id));
        doc.update_current_content("changed");
        assert_eq!(*count.borrow(), 0);
    }
}
