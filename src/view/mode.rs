use serde::{Deserialize, Serialize};

/// Which surfaces a tab presents.
///
/// Serialized with the tags the window layer uses: `"md"`, `"split"` and
/// `"preview"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ViewMode {
    /// Raw markdown editor only
    #[serde(rename = "md")]
    RawEditor,
    /// Editor with a live preview next to it
    #[default]
    #[serde(rename = "split")]
    SplitView,
    /// Rendered preview only, nothing editable
    #[serde(rename = "preview")]
    PreviewOnly,
}

/// The editable surface that receives edits and toolbar commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSurface {
    Raw,
    Split,
}

impl ViewMode {
    /// Parse a mode tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "md" => Some(Self::RawEditor),
            "split" => Some(Self::SplitView),
            "preview" => Some(Self::PreviewOnly),
            _ => None,
        }
    }

    /// The mode tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::RawEditor => "md",
            Self::SplitView => "split",
            Self::PreviewOnly => "preview",
        }
    }

    /// Get a display label for the mode.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RawEditor => "Markdown",
            Self::SplitView => "Split",
            Self::PreviewOnly => "Preview",
        }
    }

    /// Whether a rendered preview is visible in this mode.
    pub fn shows_preview(&self) -> bool {
        matches!(self, Self::SplitView | Self::PreviewOnly)
    }

    /// The editable surface this mode presents, if any.
    pub fn active_surface(&self) -> Option<ActiveSurface> {
        match self {
            Self::RawEditor => Some(ActiveSurface::Raw),
            Self::SplitView => Some(ActiveSurface::Split),
            Self::PreviewOnly => None,
        }
    }

    /// Cycle Markdown -> Split -> Preview -> Markdown.
    pub fn next(&self) -> Self {
        match self {
            Self::RawEditor => Self::SplitView,
            Self::SplitView => Self::PreviewOnly,
            Self::PreviewOnly => Self::RawEditor,
        }
    }
}
