//! In-memory preview surface.

use super::PreviewSurface;

/// Holds the last page shown, for headless hosts and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlPreview {
    html: String,
    /// Number of pages shown so far
    navigations: usize,
}

impl HtmlPreview {
    /// Create a blank preview.
    pub fn new() -> Self {
        Self::default()
    }

    /// The page currently displayed.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// How many times a page was pushed into this preview.
    pub fn navigations(&self) -> usize {
        self.navigations
    }
}

impl PreviewSurface for HtmlPreview {
    fn show_html(&mut self, html: &str) {
        self.html = html.to_string();
        self.navigations += 1;
    }
}
