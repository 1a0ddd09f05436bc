//! Keeps the raw editor, the split editor and the preview panes in sync.
//!
//! Only one editable surface is active at a time. Whenever the mode changes
//! the text the user last edited is pulled out of the outgoing surface and
//! pushed into the incoming one, so nothing typed is lost.
//!
//! All programmatic surface population happens inside a loading window on
//! the [`DocumentState`], so it never produces change notifications.

use super::mode::{ActiveSurface, ViewMode};
use crate::document::DocumentState;
use crate::markdown::{ComrakRenderer, MarkdownRenderer};
use crate::surface::{HtmlPreview, PreviewSurface, TextBuffer, TextSurface};
use log::{debug, info};

/// Owns the surfaces of one tab and the renderer feeding its previews.
pub struct ViewModeController<S = TextBuffer, P = HtmlPreview> {
    mode: ViewMode,
    active: Option<ActiveSurface>,
    raw: S,
    split: S,
    split_preview: P,
    full_preview: P,
    renderer: Box<dyn MarkdownRenderer>,
}

impl ViewModeController {
    /// In-memory surfaces rendered with comrak.
    pub fn in_memory(mode: ViewMode, renderer: ComrakRenderer, max_undo: usize) -> Self {
        Self::new(
            mode,
            TextBuffer::with_max_undo(max_undo),
            TextBuffer::with_max_undo(max_undo),
            HtmlPreview::new(),
            HtmlPreview::new(),
            Box::new(renderer),
        )
    }
}

impl<S: TextSurface, P: PreviewSurface> ViewModeController<S, P> {
    pub fn new(
        mode: ViewMode,
        raw: S,
        split: S,
        split_preview: P,
        full_preview: P,
        renderer: Box<dyn MarkdownRenderer>,
    ) -> Self {
        Self {
            mode,
            active: mode.active_surface(),
            raw,
            split,
            split_preview,
            full_preview,
            renderer,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Which editable surface is active, if any.
    pub fn active(&self) -> Option<ActiveSurface> {
        self.active
    }

    pub fn active_surface(&self) -> Option<&S> {
        match self.active? {
            ActiveSurface::Raw => Some(&self.raw),
            ActiveSurface::Split => Some(&self.split),
        }
    }

    pub fn active_surface_mut(&mut self) -> Option<&mut S> {
        match self.active? {
            ActiveSurface::Raw => Some(&mut self.raw),
            ActiveSurface::Split => Some(&mut self.split),
        }
    }

    pub fn raw_surface(&self) -> &S {
        &self.raw
    }

    pub fn split_surface(&self) -> &S {
        &self.split
    }

    /// Preview pane shown next to the split editor.
    pub fn split_preview(&self) -> &P {
        &self.split_preview
    }

    /// Preview pane shown in preview-only mode.
    pub fn full_preview(&self) -> &P {
        &self.full_preview
    }

    pub fn renderer(&self) -> &dyn MarkdownRenderer {
        self.renderer.as_ref()
    }

    /// Switch to `mode`, carrying the latest text across.
    pub fn set_view_mode(&mut self, mode: ViewMode, doc: &mut DocumentState) {
        doc.begin_loading();

        // The outgoing surface holds the freshest text, even when empty.
        if let Some(surface) = self.active_surface() {
            doc.update_current_content(surface.text());
        }

        self.mode = mode;
        self.active = mode.active_surface();
        self.push_content(doc);

        doc.finish_loading();
        info!("View mode set to {}", mode.tag());
    }

    /// Switch by mode tag. Unknown tags are ignored and return `false`.
    pub fn set_view_mode_tag(&mut self, tag: &str, doc: &mut DocumentState) -> bool {
        match ViewMode::from_tag(tag) {
            Some(mode) => {
                self.set_view_mode(mode, doc);
                true
            }
            None => {
                debug!("Ignoring unknown view mode tag {:?}", tag);
                false
            }
        }
    }

    /// Repopulate the visible surfaces from the document, e.g. after a load.
    pub fn populate(&mut self, doc: &mut DocumentState) {
        doc.begin_loading();
        self.push_content(doc);
        doc.finish_loading();
    }

    /// Re-render the visible preview pane for `markdown`.
    pub fn refresh_preview(&mut self, markdown: &str) {
        let pane = match self.mode {
            ViewMode::SplitView => &mut self.split_preview,
            ViewMode::PreviewOnly => &mut self.full_preview,
            ViewMode::RawEditor => return,
        };
        pane.show_html(&self.renderer.render_preview(markdown));
    }

    fn push_content(&mut self, doc: &DocumentState) {
        let content = doc.current_content();
        if let Some(surface) = self.active_surface_mut() {
            surface.load_text(content);
        }
        if self.mode.shows_preview() {
            self.refresh_preview(content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::EMPTY_PREVIEW_TEXT;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn controller(mode: ViewMode) -> ViewModeController {
        ViewModeController::in_memory(mode, ComrakRenderer::default(), 100)
    }

    fn loaded(text: &str, mode: ViewMode) -> (ViewModeController, DocumentState) {
        let mut doc = DocumentState::new();
        doc.load(text, Some("note.md"));
        let mut view = controller(mode);
        view.populate(&mut doc);
        (view, doc)
    }

    #[test]
    fn test_populate_fills_active_surface_and_preview() {
        let (view, _doc) = loaded("# Title", ViewMode::SplitView);
        assert_eq!(view.split_surface().text(), "# Title");
        assert!(view.split_preview().html().contains("Title</h1>"));
        assert_eq!(view.raw_surface().text(), "");
    }

    #[test]
    fn test_raw_mode_renders_nothing() {
        let (view, _doc) = loaded("# Title", ViewMode::RawEditor);
        assert_eq!(view.split_preview().navigations(), 0);
        assert_eq!(view.full_preview().navigations(), 0);
    }

    #[test]
    fn test_edits_survive_mode_switch() {
        let (mut view, mut doc) = loaded("# Title", ViewMode::SplitView);
        view.set_view_mode_tag("md", &mut doc);

        if let Some(surface) = view.active_surface_mut() {
            surface.load_text("# Title!");
        }
        view.set_view_mode_tag("split", &mut doc);

        assert_eq!(view.split_surface().text(), "# Title!");
        assert_eq!(doc.current_content(), "# Title!");
        assert!(view.split_preview().html().contains("Title!"));
    }

    #[test]
    fn test_cleared_surface_is_carried_over() {
        let (mut view, mut doc) = loaded("text", ViewMode::RawEditor);
        if let Some(surface) = view.active_surface_mut() {
            surface.load_text("");
        }
        view.set_view_mode(ViewMode::PreviewOnly, &mut doc);

        assert_eq!(doc.current_content(), "");
        assert!(view.full_preview().html().contains(EMPTY_PREVIEW_TEXT));
    }

    #[test]
    fn test_preview_only_has_no_active_surface() {
        let (mut view, mut doc) = loaded("body", ViewMode::SplitView);
        view.set_view_mode(ViewMode::PreviewOnly, &mut doc);

        assert!(view.active_surface().is_none());
        assert!(view.full_preview().html().contains("<p>body</p>"));

        view.set_view_mode(ViewMode::RawEditor, &mut doc);
        assert_eq!(view.raw_surface().text(), "body");
    }

    #[test]
    fn test_mode_switch_emits_nothing() {
        let (mut view, mut doc) = loaded("start", ViewMode::RawEditor);
        let events = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&events);
        doc.on_content_changed(move |_| *counter.borrow_mut() += 1);

        view.set_view_mode(ViewMode::SplitView, &mut doc);
        view.set_view_mode(ViewMode::PreviewOnly, &mut doc);
        assert_eq!(*events.borrow(), 0);
        assert!(!doc.is_loading());
    }

    #[test]
    fn test_unknown_tag_is_ignored() {
        let (mut view, mut doc) = loaded("x", ViewMode::SplitView);
        assert!(!view.set_view_mode_tag("rich", &mut doc));
        assert_eq!(view.mode(), ViewMode::SplitView);
    }
}
