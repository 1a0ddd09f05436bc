//! Text statistics for the status bar
//!
//! Word counting follows the `\b\w+\b` rule: every maximal run of word
//! characters counts as one word, so `don't` is two words and `**bold**`
//! is one.

use regex::Regex;
use std::sync::OnceLock;

static WORD_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn word_pattern() -> Option<&'static Regex> {
    WORD_PATTERN
        .get_or_init(|| Regex::new(r"\b\w+\b").ok())
        .as_ref()
}

/// Text statistics for a document.
///
/// # Example
///
/// ```
/// use tabmark::document::TextStats;
///
/// let stats = TextStats::from_text("Hello, **World**!\nBye");
/// assert_eq!(stats.words, 3);
/// assert_eq!(stats.lines, 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Number of `\b\w+\b` matches
    pub words: usize,
    /// Number of characters including whitespace
    pub characters: usize,
    /// Number of characters excluding whitespace
    pub characters_no_spaces: usize,
    /// Number of lines (an empty document has one)
    pub lines: usize,
}

impl TextStats {
    /// Calculate statistics from the given text.
    pub fn from_text(text: &str) -> Self {
        let words = if text.trim().is_empty() {
            0
        } else {
            match word_pattern() {
                Some(pattern) => pattern.find_iter(text).count(),
                None => text.split_whitespace().count(),
            }
        };

        Self {
            words,
            characters: text.chars().count(),
            characters_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
            lines: text.split('\n').count(),
        }
    }

    /// Compact status bar string like "150 words | 892 chars | 25 lines".
    pub fn format_compact(&self) -> String {
        format!(
            "{} words | {} chars | {} lines",
            self.words, self.characters, self.lines
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_empty_text() {
        let stats = TextStats::from_text("");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.characters, 0);
        assert_eq!(stats.lines, 1);
    }

    #[test]
    fn test_stats_whitespace_only_has_no_words() {
        let stats = TextStats::from_text("  \n\t ");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.characters, 5);
        assert_eq!(stats.characters_no_spaces, 0);
        assert_eq!(stats.lines, 2);
    }

    #[test]
    fn test_stats_markdown_markers_are_not_words() {
        let stats = TextStats::from_text("# Title\n\n~~***hello***~~ world");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.lines, 3);
    }

    #[test]
    fn test_stats_apostrophe_splits_words() {
        assert_eq!(TextStats::from_text("don't stop").words, 3);
    }

    #[test]
    fn test_stats_unicode_words() {
        let stats = TextStats::from_text("Hei på deg");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.characters, 10);
    }

    #[test]
    fn test_format_compact() {
        let stats = TextStats::from_text("one two\nthree");
        assert_eq!(stats.format_compact(), "3 words | 13 chars | 2 lines");
    }
}
