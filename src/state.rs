//! Open tab management for Tabmark
//!
//! This module defines `TabSet`, which owns every open [`DocumentTab`],
//! tracks the active one and keeps the recent-files list in the user
//! settings up to date.

use crate::config::{save_config_silent, Settings};
use crate::encoding::decode_bytes;
use crate::error::{Error, Result};
use crate::tab::DocumentTab;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// All open tabs plus the settings they were created from.
///
/// There is always at least one tab; closing the last one opens a fresh
/// "Untitled" tab.
///
/// # Example
///
/// ```
/// use tabmark::config::Settings;
/// use tabmark::state::TabSet;
///
/// let mut tabs = TabSet::new(Settings::default());
/// let index = tabs.open_bytes("/notes/a.md", b"\xEF\xBB\xBF# A");
/// assert_eq!(tabs.active_tab_index(), index);
/// assert_eq!(tabs.tab(index).map(|t| t.content()), Some("# A"));
/// ```
pub struct TabSet {
    /// All open tabs
    tabs: Vec<DocumentTab>,
    /// Index of the currently active tab
    active_tab_index: usize,
    /// Next tab ID (for unique identification)
    next_tab_id: usize,
    /// User settings
    settings: Settings,
    /// Whether settings have been modified and need saving
    settings_dirty: bool,
}

impl TabSet {
    /// Create a tab set holding a single empty tab.
    pub fn new(settings: Settings) -> Self {
        let mut set = Self {
            tabs: Vec::new(),
            active_tab_index: 0,
            next_tab_id: 0,
            settings,
            settings_dirty: false,
        };
        set.new_tab();
        set
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tab Access
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the number of open tabs.
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn tabs(&self) -> &[DocumentTab] {
        &self.tabs
    }

    pub fn active_tab_index(&self) -> usize {
        self.active_tab_index
    }

    pub fn active_tab(&self) -> Option<&DocumentTab> {
        self.tabs.get(self.active_tab_index)
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut DocumentTab> {
        self.tabs.get_mut(self.active_tab_index)
    }

    pub fn tab(&self, index: usize) -> Option<&DocumentTab> {
        self.tabs.get(index)
    }

    pub fn tab_mut(&mut self, index: usize) -> Option<&mut DocumentTab> {
        self.tabs.get_mut(index)
    }

    /// Find a tab by file path.
    pub fn find_tab_by_path(&self, path: &Path) -> Option<usize> {
        self.tabs.iter().position(|t| t.file_path() == Some(path))
    }

    /// Set the active tab by index.
    ///
    /// Returns `true` if the index was valid and the tab was switched.
    pub fn set_active_tab(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.active_tab_index = index;
            debug!("Switched to tab {}", index);
            true
        } else {
            warn!("Invalid tab index: {}", index);
            false
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Opening Tabs
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new empty tab and make it active.
    ///
    /// Returns the index of the new tab.
    pub fn new_tab(&mut self) -> usize {
        let tab = DocumentTab::new(self.next_tab_id, &self.settings);
        self.next_tab_id += 1;
        self.tabs.push(tab);
        self.active_tab_index = self.tabs.len() - 1;
        debug!("Created new tab at index {}", self.active_tab_index);
        self.active_tab_index
    }

    /// Open raw file bytes read by the caller from `path`.
    ///
    /// The bytes are decoded by BOM sniffing. If `path` is already open its
    /// tab is focused and left untouched. Returns the tab index.
    pub fn open_bytes(&mut self, path: impl Into<PathBuf>, bytes: &[u8]) -> usize {
        let path = path.into();
        if let Some(index) = self.find_tab_by_path(&path) {
            self.active_tab_index = index;
            info!("File already open, switching to tab {}", index);
            return index;
        }

        let decoded = decode_bytes(bytes);
        if decoded.lossy {
            warn!(
                "Decoding {} ({}) replaced invalid bytes",
                path.display(),
                decoded.encoding.label()
            );
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let index = self.new_tab();
        if let Some(tab) = self.tabs.get_mut(index) {
            tab.set_content(&decoded.text, Some(name.as_str()));
            tab.set_file_path(path.clone(), name);
        }
        info!(
            "Opened file: {} ({})",
            path.display(),
            decoded.encoding.label()
        );

        self.settings.add_recent_file(path);
        self.settings_dirty = true;
        index
    }

    /// Read `path` from disk and open it.
    pub fn open_file(&mut self, path: impl Into<PathBuf>) -> Result<usize> {
        let path = path.into();
        if let Some(index) = self.find_tab_by_path(&path) {
            self.active_tab_index = index;
            return Ok(index);
        }
        let bytes = std::fs::read(&path).map_err(|source| Error::FileRead {
            path: path.clone(),
            source,
        })?;
        Ok(self.open_bytes(path, &bytes))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Closing Tabs
    // ─────────────────────────────────────────────────────────────────────────

    /// Close a tab by index.
    ///
    /// Returns `true` if the tab was closed, `false` if it does not exist or
    /// has unsaved changes (use `force_close_tab` to close anyway).
    pub fn close_tab(&mut self, index: usize) -> bool {
        if let Some(tab) = self.tabs.get(index) {
            if tab.is_dirty() {
                info!("'{}' has unsaved changes, not closing", tab.title());
                return false;
            }
        }
        self.force_close_tab(index)
    }

    /// Force close a tab by index, ignoring unsaved changes.
    ///
    /// Returns `true` if the tab existed and was closed.
    pub fn force_close_tab(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }

        self.tabs.remove(index);

        if self.tabs.is_empty() {
            self.new_tab();
        } else if self.active_tab_index >= self.tabs.len() {
            self.active_tab_index = self.tabs.len() - 1;
        } else if index < self.active_tab_index {
            self.active_tab_index -= 1;
        }

        debug!(
            "Closed tab {}, active is now {}",
            index, self.active_tab_index
        );
        true
    }

    /// Close the active tab.
    pub fn close_active_tab(&mut self) -> bool {
        self.close_tab(self.active_tab_index)
    }

    /// Check if any tabs have unsaved changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.tabs.iter().any(|t| t.is_dirty())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Update settings and mark as dirty. Only tabs opened afterwards pick
    /// up renderer and view-mode changes.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings.sanitize();
        self.settings_dirty = true;
    }

    pub fn settings_dirty(&self) -> bool {
        self.settings_dirty
    }

    /// Save settings to the config file if modified.
    ///
    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if !self.settings_dirty {
            return false;
        }
        if save_config_silent(&self.settings) {
            self.settings_dirty = false;
            return true;
        }
        false
    }
}

impl Default for TabSet {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
