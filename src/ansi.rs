//! ANSI styling for console output
//!
//! Small SGR helpers used by the headless reporter and the interactive
//! front end. Styling is switched off when stdout is not a terminal or
//! `NO_COLOR` is set.

use std::io::IsTerminal;

const RESET: &str = "\x1b[0m";

/// Text style applied to a span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
    Dim,
    Italic,
    Red,
    Green,
    Yellow,
}

impl Style {
    /// SGR parameter for this style
    fn code(self) -> u8 {
        match self {
            Style::Bold => 1,
            Style::Dim => 2,
            Style::Italic => 3,
            Style::Red => 31,
            Style::Green => 32,
            Style::Yellow => 33,
        }
    }
}

/// Applies styles when enabled, passes text through otherwise
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    /// Create a painter with styling explicitly on or off
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enable styling only for an interactive stdout without `NO_COLOR`
    pub fn auto() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::new(!no_color && std::io::stdout().is_terminal())
    }

    /// Wrap `text` in `style`
    pub fn paint(&self, text: impl AsRef<str>, style: Style) -> String {
        let text = text.as_ref();
        if self.enabled {
            format!("\x1b[{}m{}{}", style.code(), text, RESET)
        } else {
            text.to_string()
        }
    }
}

impl Default for Painter {
    fn default() -> Self {
        Self::auto()
    }
}
