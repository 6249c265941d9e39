//! Batch run reporting
//!
//! The batch runner announces progress through a [`Reporter`]. The console
//! reporter prints the human-readable progress log; library callers that
//! only want the [`BatchResult`] pass a [`NullReporter`].

use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use crate::ansi::{Painter, Style};
use crate::error::Result;
use crate::models::{BatchResult, BlockResult, ExtractedBlock};

/// Width of the separator rule
const RULE_WIDTH: usize = 40;

/// Why a block was not executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not part of the requested block subset
    NotSelected,
    /// An earlier block failed under fail-fast
    FailFast,
}

/// Receives progress notifications from a batch run
///
/// Every method defaults to doing nothing.
pub trait Reporter {
    /// The document was loaded and has `total_blocks` shell blocks
    fn run_started(&mut self, _document: &Path, _total_blocks: usize) -> Result<()> {
        Ok(())
    }

    /// `block` is about to execute
    fn block_started(&mut self, _block: &ExtractedBlock) -> Result<()> {
        Ok(())
    }

    /// A block finished executing
    fn block_finished(&mut self, _result: &BlockResult) -> Result<()> {
        Ok(())
    }

    /// `block` was skipped
    fn block_skipped(&mut self, _block: &ExtractedBlock, _reason: SkipReason) -> Result<()> {
        Ok(())
    }

    /// The run is complete
    fn run_finished(&mut self, _result: &BatchResult) -> Result<()> {
        Ok(())
    }
}

/// Reporter that prints nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Prints progress and a summary to a writer
pub struct ConsoleReporter<W: Write> {
    out: W,
    painter: Painter,
}

impl ConsoleReporter<io::Stdout> {
    /// Report to stdout, colored when stdout is a terminal
    pub fn stdout() -> Self {
        Self::new(io::stdout(), Painter::auto())
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Report to `out`
    pub fn new(out: W, painter: Painter) -> Self {
        Self { out, painter }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule() -> String {
        "─".repeat(RULE_WIDTH)
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn run_started(&mut self, document: &Path, total_blocks: usize) -> Result<()> {
        if total_blocks == 0 {
            return Ok(());
        }

        let name = document
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| document.to_string_lossy());
        writeln!(self.out, "\nRunning: {}", name)?;
        writeln!(self.out, "{}", Self::rule())?;
        Ok(())
    }

    fn block_started(&mut self, block: &ExtractedBlock) -> Result<()> {
        writeln!(
            self.out,
            "\nBlock {} [{}]: {}",
            block.number(),
            block.language,
            block.preview()
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn block_finished(&mut self, result: &BlockResult) -> Result<()> {
        if result.passed() {
            writeln!(
                self.out,
                "{} ({}ms)",
                self.painter.paint("✓ passed", Style::Green),
                result.duration_ms
            )?;
            return Ok(());
        }

        writeln!(
            self.out,
            "{} ({}ms)",
            self.painter.paint("✗ failed", Style::Red),
            result.duration_ms
        )?;
        writeln!(self.out, "  exit code: {}", result.exit_code)?;

        let stderr = result.stderr.trim();
        if !stderr.is_empty() {
            let indented = stderr
                .lines()
                .map(|line| format!("  {}", line))
                .collect::<Vec<_>>()
                .join("\n");
            writeln!(self.out, "{}", self.painter.paint(indented, Style::Red))?;
        }
        Ok(())
    }

    fn block_skipped(&mut self, block: &ExtractedBlock, reason: SkipReason) -> Result<()> {
        debug!("Skipping block {} ({:?})", block.index, reason);
        Ok(())
    }

    fn run_finished(&mut self, result: &BatchResult) -> Result<()> {
        if result.total_blocks == 0 {
            return Ok(());
        }

        let mut parts = Vec::new();
        if result.passed > 0 {
            parts.push(
                self.painter
                    .paint(format!("{} passed", result.passed), Style::Green),
            );
        }
        if result.failed > 0 {
            parts.push(
                self.painter
                    .paint(format!("{} failed", result.failed), Style::Red),
            );
        }
        if result.skipped > 0 {
            parts.push(format!("{} skipped", result.skipped));
        }

        writeln!(self.out, "\n{}", Self::rule())?;
        writeln!(
            self.out,
            "{} ({}ms)\n",
            parts.join(", "),
            result.total_duration_ms()
        )?;
        self.out.flush()?;
        Ok(())
    }
}
