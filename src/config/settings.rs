//! User settings and preferences for Tabmark
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::view::ViewMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Markdown Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown extensions enabled for the preview renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownSettings {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable footnotes
    pub footnotes: bool,
    /// Generate GitHub-style heading IDs
    pub header_ids: bool,
    /// Pass raw HTML in the document through to the preview
    pub allow_raw_html: bool,
}

impl Default for MarkdownSettings {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
            header_ids: true,
            allow_raw_html: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// View mode new tabs open in
    pub default_view_mode: ViewMode,

    /// Preview renderer options
    pub markdown: MarkdownSettings,

    /// Optional stylesheet linked into every preview page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_stylesheet: Option<String>,

    /// Undo steps kept per editing surface
    pub max_undo_history: usize,

    /// Recently opened files (most recent first)
    pub recent_files: Vec<PathBuf>,

    /// Maximum number of recent files to remember
    pub max_recent_files: usize,

    /// Folder of the last file opened or saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_folder_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_view_mode: ViewMode::SplitView,
            markdown: MarkdownSettings::default(),
            preview_stylesheet: None,
            max_undo_history: 100,
            recent_files: Vec::new(),
            max_recent_files: 10,
            last_folder_path: None,
        }
    }
}

impl Settings {
    /// Add a file to the recent files list.
    ///
    /// If the file already exists in the list, it's moved to the front.
    /// The list is trimmed to `max_recent_files`. The file's folder becomes
    /// `last_folder_path`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_folder_path = Some(parent.to_path_buf());
        }
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum undo history size.
    pub const MIN_UNDO_HISTORY: usize = 1;
    /// Maximum undo history size.
    pub const MAX_UNDO_HISTORY: usize = 1000;
    /// Minimum recent files kept.
    pub const MIN_RECENT_FILES: usize = 1;
    /// Maximum recent files kept.
    pub const MAX_RECENT_FILES: usize = 100;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.max_undo_history = self
            .max_undo_history
            .clamp(Self::MIN_UNDO_HISTORY, Self::MAX_UNDO_HISTORY);

        self.max_recent_files = self
            .max_recent_files
            .clamp(Self::MIN_RECENT_FILES, Self::MAX_RECENT_FILES);
        self.recent_files.truncate(self.max_recent_files);

        if self
            .preview_stylesheet
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
        {
            self.preview_stylesheet = None;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.default_view_mode, ViewMode::SplitView);
        assert!(settings.markdown.strikethrough);
        assert!(!settings.markdown.allow_raw_html);
        assert!(settings.recent_files.is_empty());
        assert_eq!(settings.max_recent_files, 10);
        assert_eq!(settings.max_undo_history, 100);
    }

    #[test]
    fn test_add_recent_file() {
        let mut settings = Settings {
            max_recent_files: 3,
            ..Default::default()
        };

        settings.add_recent_file(PathBuf::from("/file1.md"));
        settings.add_recent_file(PathBuf::from("/file2.md"));
        settings.add_recent_file(PathBuf::from("/file3.md"));

        assert_eq!(settings.recent_files.len(), 3);
        assert_eq!(settings.recent_files[0], PathBuf::from("/file3.md"));
        assert_eq!(settings.recent_files[2], PathBuf::from("/file1.md"));

        // Add existing file - should move to front
        settings.add_recent_file(PathBuf::from("/file1.md"));
        assert_eq!(settings.recent_files[0], PathBuf::from("/file1.md"));
        assert_eq!(settings.recent_files.len(), 3);

        // Add new file - should trim oldest
        settings.add_recent_file(PathBuf::from("/file4.md"));
        assert_eq!(settings.recent_files.len(), 3);
        assert_eq!(settings.recent_files[0], PathBuf::from("/file4.md"));
        assert!(!settings.recent_files.contains(&PathBuf::from("/file2.md")));
    }

    #[test]
    fn test_add_recent_file_records_folder() {
        let mut settings = Settings::default();
        settings.add_recent_file(PathBuf::from("/notes/today.md"));
        assert_eq!(settings.last_folder_path, Some(PathBuf::from("/notes")));

        // A bare file name has no folder to remember
        settings.add_recent_file(PathBuf::from("loose.md"));
        assert_eq!(settings.last_folder_path, Some(PathBuf::from("/notes")));
    }

    #[test]
    fn test_view_mode_serialization() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"default_view_mode\":\"split\""));
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let original = Settings {
            preview_stylesheet: Some("https://example.com/github.css".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string_pretty(&original).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        // Minimal JSON - should fill in defaults
        let json = r#"{"default_view_mode": "preview", "markdown": {"tables": false}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.default_view_mode, ViewMode::PreviewOnly);
        assert!(!settings.markdown.tables);
        assert!(settings.markdown.footnotes);
        assert_eq!(settings.max_recent_files, 10);
    }

    #[test]
    fn test_settings_ignore_unknown_fields() {
        let json = r#"{"last_open_folder_path": "/old/workspace", "max_recent_files": 4}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.max_recent_files, 4);
        assert_eq!(settings.last_folder_path, None);
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_sanitize_limits() {
        let mut settings = Settings {
            max_undo_history: 0,
            max_recent_files: 500,
            ..Default::default()
        };
        settings.sanitize();
        assert_eq!(settings.max_undo_history, Settings::MIN_UNDO_HISTORY);
        assert_eq!(settings.max_recent_files, Settings::MAX_RECENT_FILES);
    }

    #[test]
    fn test_sanitize_recent_files() {
        let mut settings = Settings {
            max_recent_files: 2,
            recent_files: vec!["/a.md".into(), "/b.md".into(), "/c.md".into()],
            ..Default::default()
        };
        settings.sanitize();
        assert_eq!(settings.recent_files.len(), 2);
    }

    #[test]
    fn test_sanitize_blank_stylesheet() {
        let mut settings = Settings {
            preview_stylesheet: Some("  ".to_string()),
            ..Default::default()
        };
        settings.sanitize();
        assert_eq!(settings.preview_stylesheet, None);
    }

    #[test]
    fn test_from_json_sanitized() {
        let json = r#"{"max_undo_history": 5000}"#;
        let settings = Settings::from_json_sanitized(json).unwrap();
        assert_eq!(settings.max_undo_history, Settings::MAX_UNDO_HISTORY);
    }
}
