//! Output post-processing
//!
//! Best-effort content-type detection of a block's output and the
//! display form derived from it. Parse failures are never errors: the raw
//! text is shown instead.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Recognized output content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    /// Output starts with `{` or `[`
    Json,
    /// Output starts with `<`
    Markup,
}

/// Guess the content type from the first non-blank character
pub fn sniff_content_type(text: &str) -> Option<ContentType> {
    match text.trim_start().chars().next()? {
        '{' | '[' => Some(ContentType::Json),
        '<' => Some(ContentType::Markup),
        _ => None,
    }
}

/// Re-serialize JSON with two-space indentation, `None` if it does not parse
pub fn pretty_json(text: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => serde_json::to_string_pretty(&value).ok(),
        Err(e) => {
            debug!("Output looked like JSON but did not parse: {}", e);
            None
        }
    }
}

/// Text to present for a finished run, `None` when there is nothing to show
pub fn format_for_display(output: &str, content_type: Option<ContentType>) -> Option<String> {
    if output.trim().is_empty() {
        return None;
    }

    if content_type == Some(ContentType::Json) {
        if let Some(pretty) = pretty_json(output) {
            return Some(pretty);
        }
    }

    Some(output.strip_suffix('\n').unwrap_or(output).to_string())
}
