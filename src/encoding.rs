//! Byte-order-mark sniffing and text decoding
//!
//! Files arrive from the I/O layer as raw bytes. [`decode_bytes`] turns them
//! into text by checking for a byte-order mark first and falling back to
//! UTF-8 when none is present. Decoding is total: malformed input produces
//! replacement characters, never an error.
//!
//! # Example
//! ```
//! use tabmark::encoding::{decode_bytes, DetectedEncoding};
//!
//! let result = decode_bytes(&[0xEF, 0xBB, 0xBF, b'h', b'i']);
//! assert_eq!(result.text, "hi");
//! assert_eq!(result.encoding, DetectedEncoding::Utf8Bom);
//! ```

use log::{debug, warn};
use std::borrow::Cow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

// ─────────────────────────────────────────────────────────────────────────────
// Detection Result
// ─────────────────────────────────────────────────────────────────────────────

/// Which detection branch matched the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedEncoding {
    /// `EF BB BF` prefix
    Utf8Bom,
    /// `FF FE` prefix
    Utf16Le,
    /// `FE FF` prefix
    Utf16Be,
    /// No recognized byte-order mark
    NoBom,
}

impl DetectedEncoding {
    /// Short stable label for logs and status bars.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8Bom => "utf8-bom",
            Self::Utf16Le => "utf16-le",
            Self::Utf16Be => "utf16-be",
            Self::NoBom => "no-bom",
        }
    }
}

/// Decoded text plus the branch that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingResult {
    /// The decoded text, without the byte-order mark
    pub text: String,
    /// Detection branch that matched
    pub encoding: DetectedEncoding,
    /// True when invalid sequences were replaced with U+FFFD
    pub lossy: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Decode raw file bytes into text. First matching rule wins:
///
/// 1. `EF BB BF` → UTF-8 of the remainder
/// 2. `FF FE` → UTF-16 little-endian of the remainder
/// 3. `FE FF` → UTF-16 big-endian of the remainder
/// 4. otherwise strict UTF-8, falling back to lossy UTF-8 on failure
pub fn decode_bytes(bytes: &[u8]) -> EncodingResult {
    let result = if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        let (text, lossy) = decode_utf8(rest);
        EncodingResult {
            text,
            encoding: DetectedEncoding::Utf8Bom,
            lossy,
        }
    } else if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        let (text, lossy) = decode_utf16(rest, u16::from_le_bytes);
        EncodingResult {
            text,
            encoding: DetectedEncoding::Utf16Le,
            lossy,
        }
    } else if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        let (text, lossy) = decode_utf16(rest, u16::from_be_bytes);
        EncodingResult {
            text,
            encoding: DetectedEncoding::Utf16Be,
            lossy,
        }
    } else {
        let (text, lossy) = decode_utf8(bytes);
        EncodingResult {
            text,
            encoding: DetectedEncoding::NoBom,
            lossy,
        }
    };

    debug!(
        "Decoded {} bytes as {} ({} chars, lossy: {})",
        bytes.len(),
        result.encoding.label(),
        result.text.chars().count(),
        result.lossy
    );
    result
}

fn decode_utf8(bytes: &[u8]) -> (String, bool) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), false),
        Err(err) => {
            warn!(
                "Invalid UTF-8 at byte {}, falling back to lossy decoding",
                err.valid_up_to()
            );
            (String::from_utf8_lossy(bytes).into_owned(), true)
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> (String, bool) {
    let chunks = bytes.chunks_exact(2);
    // A dangling odd byte cannot form a code unit.
    let mut lossy = !chunks.remainder().is_empty();
    let units = chunks.map(|pair| unit([pair[0], pair[1]]));

    let mut text: String = char::decode_utf16(units)
        .map(|decoded| {
            decoded.unwrap_or_else(|_| {
                lossy = true;
                char::REPLACEMENT_CHARACTER
            })
        })
        .collect();

    if bytes.len() % 2 == 1 {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    if lossy {
        warn!("Malformed UTF-16 input, replaced invalid code units");
    }
    (text, lossy)
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Endings
// ─────────────────────────────────────────────────────────────────────────────

/// Line terminator style of a loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
    /// `\r`
    Cr,
}

impl LineEnding {
    /// The platform's native line ending.
    pub fn system_default() -> Self {
        if cfg!(windows) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    /// Detect the line ending used by `text`.
    ///
    /// Text without any line break reports the platform default.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else if text.contains('\r') {
            LineEnding::Cr
        } else if text.contains('\n') {
            LineEnding::Lf
        } else {
            LineEnding::system_default()
        }
    }

    /// The terminator characters.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }

    /// Display label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            LineEnding::Lf => "LF",
            LineEnding::CrLf => "CRLF",
            LineEnding::Cr => "CR",
        }
    }
}

/// Convert every `\r\n` and lone `\r` to `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}
