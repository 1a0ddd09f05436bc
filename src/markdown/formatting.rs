//! Inline Markdown Style Toggles
//!
//! This module implements the bold/italic/strikethrough toggle state machine
//! used by the toolbar. Every toggle works on a single "text to format": the
//! active selection if there is one, otherwise the whole current line.
//!
//! # Marker Composition
//! - Strikethrough (`~~`) is always the outermost wrapper.
//! - Bold (`**`) and italic (`*`) nest inside it and merge into `***`.
//!
//! Bold and italic toggles peel the strikethrough layer off first, transform
//! the core, and wrap it back. The strikethrough toggle looks only at the
//! outer layer.
//!
//! # Usage
//! ```
//! use tabmark::markdown::formatting::{toggle_bold, toggle_italic, toggle_strikethrough};
//!
//! assert_eq!(toggle_bold("hello"), "**hello**");
//! assert_eq!(toggle_italic("**hello**"), "***hello***");
//! assert_eq!(toggle_bold("***hello***"), "*hello*");
//! assert_eq!(toggle_bold(&toggle_strikethrough("hello")), "~~**hello**~~");
//! ```

use crate::document::{EventEmitter, ListenerId};
use crate::surface::TextSurface;
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Markers
// ─────────────────────────────────────────────────────────────────────────────

/// Inline style delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `**`
    Bold,
    /// `*`
    Italic,
    /// `~~`
    Strikethrough,
    /// `***`
    BoldItalic,
}

impl Marker {
    /// The delimiter string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bold => "**",
            Self::Italic => "*",
            Self::Strikethrough => "~~",
            Self::BoldItalic => "***",
        }
    }
}

/// True iff `text` starts and ends with `marker` and is strictly longer than
/// two markers, so a bare `**` never reads as italic around nothing.
pub fn is_formatted_with(text: &str, marker: Marker) -> bool {
    let marker = marker.as_str();
    text.len() > 2 * marker.len() && text.starts_with(marker) && text.ends_with(marker)
}

/// The text between a pair of `marker`s, if `text` is wrapped in it.
fn unwrap_marker(text: &str, marker: Marker) -> Option<&str> {
    if !is_formatted_with(text, marker) {
        return None;
    }
    let len = marker.as_str().len();
    // Markers are ASCII, so these offsets are char boundaries.
    Some(&text[len..text.len() - len])
}

fn wrap(text: &str, marker: Marker) -> String {
    let marker = marker.as_str();
    format!("{}{}{}", marker, text, marker)
}

// ─────────────────────────────────────────────────────────────────────────────
// Toggle Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Toolbar toggle commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineToggle {
    Bold,
    Italic,
    Strikethrough,
}

impl InlineToggle {
    /// Get the keyboard shortcut label for this command.
    pub fn shortcut_label(&self) -> &'static str {
        match self {
            Self::Bold => "Ctrl+B",
            Self::Italic => "Ctrl+I",
            Self::Strikethrough => "Ctrl+Shift+S",
        }
    }

    /// Get the tooltip text for this command.
    pub fn tooltip(&self) -> String {
        let name = match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Strikethrough => "Strikethrough",
        };
        format!("{} ({})", name, self.shortcut_label())
    }

    /// Compute the toggled text.
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Bold => toggle_bold(text),
            Self::Italic => toggle_italic(text),
            Self::Strikethrough => toggle_strikethrough(text),
        }
    }
}

/// Run `transform` on the text inside an outer `~~` layer, if present.
fn within_strikethrough(text: &str, transform: fn(&str) -> String) -> String {
    match unwrap_marker(text, Marker::Strikethrough) {
        Some(core) => wrap(&transform(core), Marker::Strikethrough),
        None => transform(text),
    }
}

/// Toggle bold.
///
/// | core      | result      |
/// |-----------|-------------|
/// | `***x***` | `*x*`       |
/// | `**x**`   | `x`         |
/// | `*x*`     | `***x***`   |
/// | `x`       | `**x**`     |
pub fn toggle_bold(text: &str) -> String {
    within_strikethrough(text, |core| {
        if let Some(inner) = unwrap_marker(core, Marker::BoldItalic) {
            wrap(inner, Marker::Italic)
        } else if let Some(inner) = unwrap_marker(core, Marker::Bold) {
            inner.to_string()
        } else if let Some(inner) = unwrap_marker(core, Marker::Italic) {
            wrap(inner, Marker::BoldItalic)
        } else {
            wrap(core, Marker::Bold)
        }
    })
}

/// Toggle italic.
///
/// | core      | result      |
/// |-----------|-------------|
/// | `***x***` | `**x**`     |
/// | `**x**`   | `***x***`   |
/// | `*x*`     | `x`         |
/// | `x`       | `*x*`       |
pub fn toggle_italic(text: &str) -> String {
    within_strikethrough(text, |core| {
        if let Some(inner) = unwrap_marker(core, Marker::BoldItalic) {
            wrap(inner, Marker::Bold)
        } else if let Some(inner) = unwrap_marker(core, Marker::Bold) {
            wrap(inner, Marker::BoldItalic)
        } else if let Some(inner) = unwrap_marker(core, Marker::Italic) {
            inner.to_string()
        } else {
            wrap(core, Marker::Italic)
        }
    })
}

/// Toggle the outer `~~` layer without looking at bold/italic nesting.
pub fn toggle_strikethrough(text: &str) -> String {
    match unwrap_marker(text, Marker::Strikethrough) {
        Some(inner) => inner.to_string(),
        None => wrap(text, Marker::Strikethrough),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting State
// ─────────────────────────────────────────────────────────────────────────────

/// Toolbar indicator state, always derived from text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormattingState {
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_strikethrough: bool,
}

impl FormattingState {
    /// Detect which styles wrap `text`.
    pub fn from_text(text: &str) -> Self {
        let stripped = unwrap_marker(text, Marker::Strikethrough);
        let core = stripped.unwrap_or(text);

        let bold_italic = is_formatted_with(core, Marker::BoldItalic);
        let bold = is_formatted_with(core, Marker::Bold);
        let italic = is_formatted_with(core, Marker::Italic) && !bold;

        Self {
            is_bold: bold || bold_italic,
            is_italic: italic || bold_italic,
            is_strikethrough: stripped.is_some(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting Engine
// ─────────────────────────────────────────────────────────────────────────────

/// Applies toggles to whichever surface is active and publishes the
/// resulting [`FormattingState`].
///
/// "Nothing to act on" (no surface, an empty text-to-format, a current line
/// out of range) is a silent no-op that publishes nothing.
#[derive(Debug, Default)]
pub struct FormattingEngine {
    state_changed: EventEmitter<FormattingState>,
}

impl FormattingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selection if one exists, otherwise the current line.
    pub fn text_to_format(surface: &dyn TextSurface) -> Option<String> {
        if surface.has_selection() {
            return surface.selected_text();
        }
        surface.line_text(surface.current_line_index())
    }

    /// Apply `toggle` and write the result back in place of the selection or
    /// the current line. Returns the published state, or `None` on a no-op.
    pub fn apply(
        &mut self,
        surface: Option<&mut dyn TextSurface>,
        toggle: InlineToggle,
    ) -> Option<FormattingState> {
        let Some(surface) = surface else {
            debug!("{:?} ignored: no active surface", toggle);
            return None;
        };
        let text = Self::text_to_format(surface)?;
        if text.is_empty() {
            debug!("{:?} ignored: nothing to format", toggle);
            return None;
        }

        let new_text = toggle.apply(&text);
        if surface.has_selection() {
            surface.replace_selection(&new_text);
        } else {
            let line = surface.current_line_index();
            if !surface.set_line_text(line, &new_text) {
                return None;
            }
        }
        debug!("{:?}: {:?} -> {:?}", toggle, text, new_text);

        let state = FormattingState::from_text(&new_text);
        self.state_changed.emit(&state);
        Some(state)
    }

    /// Recompute the state from the surface and publish it, e.g. after the
    /// selection moved.
    pub fn refresh(&mut self, surface: Option<&dyn TextSurface>) -> Option<FormattingState> {
        let text = Self::text_to_format(surface?)?;
        let state = FormattingState::from_text(&text);
        self.state_changed.emit(&state);
        Some(state)
    }

    /// Register a listener on the formatting-state channel.
    pub fn on_state_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&FormattingState) + 'static,
    {
        self.state_changed.subscribe(listener)
    }

    /// Remove a formatting-state listener.
    pub fn remove_state_listener(&mut self, id: ListenerId) -> bool {
        self.state_changed.unsubscribe(id)
    }
}
