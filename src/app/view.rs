//! Block rendering for the interactive prompt

use runmd::ansi::{Painter, Style};
use runmd::models::{BlockRunState, BlockState};
use runmd::output::{self, ContentType};
use runmd::run_block::RunBlock;
use runmd::session::Session;

/// One-line header reflecting the block's run state
pub fn header(block: &RunBlock, focused: bool, painter: &Painter) -> String {
    let state = block.state();
    let marker = if focused { ">" } else { " " };
    let number = format!("{:>2}", block.block().number());
    let language = painter.paint(&block.block().language, Style::Bold);

    let status = match state.state {
        BlockState::Idle => format!(
            "{} {}  {}",
            painter.paint("▶", Style::Dim),
            language,
            painter.paint(block.block().preview(), Style::Dim)
        ),
        BlockState::Running => format!(
            "{} {}",
            painter.paint("⟳", Style::Yellow),
            painter.paint("running...", Style::Italic)
        ),
        BlockState::Done if state.is_successful() => format!(
            "{} {}  {}{}",
            painter.paint("✓", Style::Green),
            language,
            painter.paint("done", Style::Dim),
            elapsed(&state)
        ),
        BlockState::Done => format!(
            "{} {}  {}{}",
            painter.paint("✗", Style::Red),
            language,
            painter.paint(format!("exit {}", state.exit_code), Style::Red),
            elapsed(&state)
        ),
    };

    format!("{} {} {}", marker, number, status)
}

/// Every block's header, one per line
pub fn listing(session: &Session, painter: &Painter) -> String {
    if session.is_empty() {
        return painter.paint("No shell blocks in this document", Style::Dim);
    }

    session
        .blocks()
        .iter()
        .map(|block| header(block, session.focus() == Some(block.index()), painter))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Source and latest output of one block
pub fn details(block: &RunBlock, painter: &Painter) -> String {
    let mut text = String::new();
    for line in block.block().source.lines() {
        text.push_str(&format!("  │ {}\n", line));
    }

    if let Some(shown) = block.state().display_output() {
        let style = if block.state().is_failed() {
            Style::Red
        } else {
            Style::Dim
        };
        for line in shown.lines() {
            text.push_str(&painter.paint(format!("  ┃ {}", line), style));
            text.push('\n');
        }
    }

    text.trim_end().to_string()
}

/// Reformatted output worth printing after a finished run
///
/// Output is streamed raw while the block runs, so only JSON that was
/// pretty-printed differs from what is already on screen.
pub fn finished_output(state: &BlockRunState) -> Option<String> {
    if state.content_type != Some(ContentType::Json) {
        return None;
    }
    output::pretty_json(&state.output).filter(|pretty| pretty.trim() != state.output.trim())
}

fn elapsed(state: &BlockRunState) -> String {
    state
        .duration
        .map(|d| format!(" ({}ms)", d.as_millis()))
        .unwrap_or_default()
}
