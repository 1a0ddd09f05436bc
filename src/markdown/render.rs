//! Markdown to HTML preview rendering
//!
//! The preview panes receive complete HTML pages. [`MarkdownRenderer`] is the
//! seam the view controller renders through. [`ComrakRenderer`] is the
//! default CommonMark + GFM implementation.

use crate::config::MarkdownSettings;
use comrak::{markdown_to_html, Options};
use log::debug;

/// Text shown in an empty preview pane.
pub const EMPTY_PREVIEW_TEXT: &str = "Preview will show here...";

/// Converts Markdown into preview pages.
pub trait MarkdownRenderer {
    /// Render `markdown` into a complete HTML page.
    fn convert_markdown_to_html(&self, markdown: &str) -> String;

    /// The page shown when there is nothing to preview.
    fn empty_preview_html(&self) -> String;

    /// The page for `markdown`, or the empty page if it is blank.
    fn render_preview(&self, markdown: &str) -> String {
        if markdown.trim().is_empty() {
            self.empty_preview_html()
        } else {
            self.convert_markdown_to_html(markdown)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Comrak Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// GitHub-flavoured renderer backed by comrak.
#[derive(Debug, Clone, Default)]
pub struct ComrakRenderer {
    settings: MarkdownSettings,
    stylesheet: Option<String>,
}

impl ComrakRenderer {
    pub fn new(settings: MarkdownSettings) -> Self {
        Self {
            settings,
            stylesheet: None,
        }
    }

    /// Link an external stylesheet into every page.
    pub fn with_stylesheet(mut self, href: Option<String>) -> Self {
        self.stylesheet = href;
        self
    }

    /// Convert to comrak Options.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = self.settings.strikethrough;
        options.extension.table = self.settings.tables;
        options.extension.autolink = self.settings.autolink;
        options.extension.tasklist = self.settings.tasklist;
        options.extension.footnotes = self.settings.footnotes;
        if self.settings.header_ids {
            options.extension.header_ids = Some(String::new());
        }

        options.render.unsafe_ = self.settings.allow_raw_html;

        options
    }

    /// Render only the HTML body fragment.
    pub fn render_body(&self, markdown: &str) -> String {
        markdown_to_html(markdown, &self.to_comrak_options())
    }

    /// Wrap a body fragment in the preview page.
    pub fn wrap_page(&self, body: &str) -> String {
        let stylesheet = self
            .stylesheet
            .as_deref()
            .map(|href| format!("\n    <link rel=\"stylesheet\" href=\"{}\">", html_escape(href)))
            .unwrap_or_default();

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">{stylesheet}
    <style>
{base_css}
    </style>
</head>
<body>
    <article class="markdown-body">
{body}
    </article>
</body>
</html>"#,
            stylesheet = stylesheet,
            base_css = BASE_CSS,
            body = body,
        )
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn convert_markdown_to_html(&self, markdown: &str) -> String {
        let body = self.render_body(markdown);
        debug!("Rendered {} bytes of markdown into preview", markdown.len());
        self.wrap_page(&body)
    }

    fn empty_preview_html(&self) -> String {
        self.wrap_page(&format!(
            r#"<p class="empty-preview">{}</p>"#,
            EMPTY_PREVIEW_TEXT
        ))
    }
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Base CSS for the preview page.
const BASE_CSS: &str = r#"
body {
    margin: 0;
    padding: 20px;
    overflow-y: auto;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
}

.markdown-body {
    max-width: 900px;
    margin: 0 auto;
}

.empty-preview {
    color: #888;
    text-align: center;
    margin-top: 50px;
}

.markdown-body pre {
    padding: 16px;
    overflow: auto;
    border-radius: 6px;
}

.markdown-body table {
    border-collapse: collapse;
}

.markdown-body th, .markdown-body td {
    padding: 6px 13px;
    border: 1px solid #d0d7de;
}
"#;
