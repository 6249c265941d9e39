//! Extracted Block Model
//!
//! A runnable fenced code block lifted out of a markdown document.

use serde::{Deserialize, Serialize};

/// Maximum characters shown when previewing a block's first line
pub const PREVIEW_WIDTH: usize = 60;

/// A shell-tagged fenced code block, in document order
///
/// `index` counts shell blocks only; fences in other languages never
/// consume an index. Blocks are immutable once extracted, so re-running a
/// block always re-executes the same source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedBlock {
    /// Zero-based position among shell blocks
    pub index: usize,

    /// Lower-cased fence language
    pub language: String,

    /// Code inside the fence, without the trailing newline
    pub source: String,
}

impl ExtractedBlock {
    /// Create a new extracted block
    pub fn new(index: usize, language: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            index,
            language: language.into(),
            source: source.into(),
        }
    }

    /// First line of the source, truncated for headers and progress lines
    pub fn preview(&self) -> String {
        self.source
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(PREVIEW_WIDTH)
            .collect()
    }

    /// Human-facing ordinal (1-based)
    pub fn number(&self) -> usize {
        self.index + 1
    }
}
