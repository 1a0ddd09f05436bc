//! In-memory editable surface
//!
//! `TextBuffer` keeps the text as one `String` with a byte-offset caret and
//! an optional byte-range selection. Offsets handed in from outside are
//! snapped to UTF-8 character boundaries, so no index can split a
//! multi-byte character.

use super::TextSurface;

/// Default maximum undo history size.
const DEFAULT_MAX_UNDO: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    text: String,
    cursor: usize,
    selection: Option<(usize, usize)>,
}

/// A headless text widget with selection, undo history, and a clipboard.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    /// Caret position (byte offset)
    cursor: usize,
    /// Selection range (start, end) with start < end
    selection: Option<(usize, usize)>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_undo_size: usize,
    clipboard: String,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::with_max_undo(DEFAULT_MAX_UNDO)
    }

    /// Create an empty buffer with a custom undo limit (at least one entry).
    pub fn with_max_undo(max_undo_size: usize) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            selection: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_size: max_undo_size.max(1),
            clipboard: String::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Caret & Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Caret position as a byte offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the caret and clear the selection.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = floor_char_boundary(&self.text, offset);
        self.selection = None;
    }

    /// Place the caret at the start of line `index` (clamped to the last line).
    pub fn move_to_line(&mut self, index: usize) {
        let last = self.line_count() - 1;
        if let Some((start, _)) = self.line_bounds(index.min(last)) {
            self.set_cursor(start);
        }
    }

    /// Select a byte range. An empty range clears the selection.
    pub fn select(&mut self, start: usize, end: usize) {
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        let start = floor_char_boundary(&self.text, start);
        let end = ceil_char_boundary(&self.text, end);
        self.cursor = end;
        self.selection = (start < end).then_some((start, end));
    }

    /// Select the first occurrence of `needle`. Returns `false` if absent.
    pub fn select_text(&mut self, needle: &str) -> bool {
        match self.text.find(needle) {
            Some(start) if !needle.is_empty() => {
                self.select(start, start + needle.len());
                true
            }
            _ => false,
        }
    }

    /// Drop the selection, keeping the caret.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Selected byte range.
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    /// Clipboard register shared by cut, copy, and paste.
    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User Edits
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert `input` at the caret, replacing the selection, as a keystroke would.
    pub fn type_text(&mut self, input: &str) {
        self.record_undo();
        let (start, end) = self.selection.unwrap_or((self.cursor, self.cursor));
        self.text.replace_range(start..end, input);
        self.cursor = start + input.len();
        self.selection = None;
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            cursor: self.cursor,
            selection: self.selection,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.text = snapshot.text;
        self.cursor = snapshot.cursor;
        self.selection = snapshot.selection;
    }

    fn record_undo(&mut self) {
        self.undo_stack.push(self.snapshot());
        if self.undo_stack.len() > self.max_undo_size {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Byte range of line `index`, excluding its terminator.
    fn line_bounds(&self, index: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (i, line) in self.text.split('\n').enumerate() {
            if i == index {
                return Some((start, start + line.len()));
            }
            start += line.len() + 1;
        }
        None
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSurface for TextBuffer {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn load_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = 0;
        self.selection = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    fn selected_text(&self) -> Option<String> {
        self.selection
            .map(|(start, end)| self.text[start..end].to_string())
    }

    fn replace_selection(&mut self, text: &str) {
        let Some((start, end)) = self.selection else {
            return;
        };
        self.record_undo();
        self.text.replace_range(start..end, text);
        let new_end = start + text.len();
        self.cursor = new_end;
        self.selection = (start < new_end).then_some((start, new_end));
    }

    fn line_text(&self, index: usize) -> Option<String> {
        self.line_bounds(index)
            .map(|(start, end)| self.text[start..end].to_string())
    }

    fn set_line_text(&mut self, index: usize, text: &str) -> bool {
        let Some((start, end)) = self.line_bounds(index) else {
            return false;
        };
        self.record_undo();
        self.text.replace_range(start..end, text);
        self.cursor = start + text.len();
        self.selection = None;
        true
    }

    fn insert_line(&mut self, index: usize, text: &str) {
        self.record_undo();
        match self.line_bounds(index) {
            Some((start, _)) => {
                self.text.insert_str(start, &format!("{}\n", text));
                self.cursor = start + text.len();
            }
            None => {
                self.text.push('\n');
                self.text.push_str(text);
                self.cursor = self.text.len();
            }
        }
        self.selection = None;
    }

    fn current_line_index(&self) -> usize {
        self.text[..self.cursor].matches('\n').count()
    }

    fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.redo_stack.push(self.snapshot());
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push(self.snapshot());
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn cut(&mut self) -> bool {
        let Some((start, end)) = self.selection else {
            return false;
        };
        self.record_undo();
        self.clipboard = self.text[start..end].to_string();
        self.text.replace_range(start..end, "");
        self.cursor = start;
        self.selection = None;
        true
    }

    fn copy(&mut self) -> bool {
        match self.selected_text() {
            Some(selected) => {
                self.clipboard = selected;
                true
            }
            None => false,
        }
    }

    fn paste(&mut self) -> bool {
        if self.clipboard.is_empty() {
            return false;
        }
        let clip = self.clipboard.clone();
        self.type_text(&clip);
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Largest char boundary `<= index`, clamped to the string length.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary `>= index`, clamped to the string length.
fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> TextBuffer {
        let mut buffer = TextBuffer::new();
        buffer.load_text(text);
        buffer
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_text(0).as_deref(), Some(""));
        assert_eq!(buffer.line_text(1), None);
    }

    #[test]
    fn test_lines_and_current_line() {
        let mut buffer = buffer("one\ntwo\nthree");
        assert_eq!(buffer.lines(), vec!["one", "two", "three"]);

        buffer.move_to_line(2);
        assert_eq!(buffer.current_line_index(), 2);
        buffer.move_to_line(99);
        assert_eq!(buffer.current_line_index(), 2);
    }

    #[test]
    fn test_set_line_text() {
        let mut buffer = buffer("one\ntwo\nthree");
        assert!(buffer.set_line_text(1, "**two**"));
        assert_eq!(buffer.text(), "one\n**two**\nthree");
        assert_eq!(buffer.current_line_index(), 1);
        assert!(!buffer.set_line_text(5, "nope"));
    }

    #[test]
    fn test_insert_line() {
        let mut buffer = buffer("a\nb");
        buffer.insert_line(1, "inserted");
        assert_eq!(buffer.text(), "a\ninserted\nb");
        buffer.insert_line(10, "tail");
        assert_eq!(buffer.text(), "a\ninserted\nb\ntail");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_replace_selection_keeps_new_text_selected() {
        let mut buffer = buffer("say hello now");
        assert!(buffer.select_text("hello"));
        buffer.replace_selection("**hello**");
        assert_eq!(buffer.text(), "say **hello** now");
        assert_eq!(buffer.selected_text().as_deref(), Some("**hello**"));
    }

    #[test]
    fn test_select_snaps_to_char_boundaries() {
        let mut buffer = buffer("Hei på deg");
        // Byte 6 is inside 'å'
        buffer.select(4, 6);
        assert_eq!(buffer.selected_text().as_deref(), Some("på"));
    }

    #[test]
    fn test_empty_selection_is_none() {
        let mut buffer = buffer("abc");
        buffer.select(2, 2);
        assert!(!buffer.has_selection());
        assert_eq!(buffer.cursor(), 2);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History & Clipboard Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_undo_redo() {
        let mut buffer = buffer("abc");
        buffer.set_cursor(3);
        buffer.type_text("d");
        assert_eq!(buffer.text(), "abcd");

        assert!(buffer.undo());
        assert_eq!(buffer.text(), "abc");
        assert!(buffer.redo());
        assert_eq!(buffer.text(), "abcd");
        assert!(!buffer.redo());
    }

    #[test]
    fn test_load_text_clears_history() {
        let mut buffer = buffer("abc");
        buffer.type_text("x");
        buffer.load_text("fresh");
        assert!(!buffer.can_undo());
        assert!(!buffer.undo());
    }

    #[test]
    fn test_max_undo_size() {
        let mut buffer = TextBuffer::with_max_undo(2);
        for ch in ["a", "b", "c"] {
            buffer.type_text(ch);
        }
        assert!(buffer.undo());
        assert!(buffer.undo());
        assert!(!buffer.undo());
        assert_eq!(buffer.text(), "a");
    }

    #[test]
    fn test_cut_copy_paste() {
        let mut buffer = buffer("copy me");
        assert!(!buffer.cut());

        buffer.select_text("copy");
        assert!(buffer.copy());
        assert_eq!(buffer.clipboard(), "copy");
        assert_eq!(buffer.text(), "copy me");

        assert!(buffer.cut());
        assert_eq!(buffer.text(), " me");

        buffer.set_cursor(buffer.text().len());
        assert!(buffer.paste());
        assert_eq!(buffer.text(), " mecopy");
    }
}
