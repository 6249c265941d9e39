//! Block Run State Model
//!
//! Lifecycle record for one interactively executed block. Owned by the
//! core; a UI only observes it through block events.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::output::{self, ContentType};

/// Lifecycle state of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BlockState {
    /// Never run
    #[default]
    Idle,
    /// Currently executing
    Running,
    /// Finished; may be run again
    Done,
}

/// State and accumulated data of the latest run of a block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockRunState {
    /// Lifecycle state
    pub state: BlockState,

    /// Exit code of the latest finished run
    pub exit_code: i32,

    /// Stdout and stderr chunks in arrival order
    pub output: String,

    /// Sniffed content type of the output, if recognized
    pub content_type: Option<ContentType>,

    /// When the latest run started (in local time)
    pub started_at: Option<DateTime<Local>>,

    /// How long the latest run took (None while running)
    pub duration: Option<Duration>,

    /// Whether the sniff has already looked at non-blank output this run
    #[serde(skip)]
    sniffed: bool,
}

impl BlockRunState {
    /// Create an idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Running`, discarding the previous run's output
    pub fn begin_run(&mut self) {
        self.state = BlockState::Running;
        self.exit_code = 0;
        self.output.clear();
        self.content_type = None;
        self.sniffed = false;
        self.started_at = Some(Local::now());
        self.duration = None;
    }

    /// Append a streamed chunk and sniff the content type once per run
    pub fn append_output(&mut self, chunk: &str) {
        self.output.push_str(chunk);

        if !self.sniffed {
            let trimmed = self.output.trim_start();
            if !trimmed.is_empty() {
                self.content_type = output::sniff_content_type(trimmed);
                self.sniffed = true;
            }
        }
    }

    /// Enter `Done` with the final exit code
    pub fn finish(&mut self, exit_code: i32, duration: Duration) {
        self.state = BlockState::Done;
        self.exit_code = exit_code;
        self.duration = Some(duration);
    }

    /// Check if the block is executing
    pub fn is_running(&self) -> bool {
        matches!(self.state, BlockState::Running)
    }

    /// Check if the latest run finished with status 0
    pub fn is_successful(&self) -> bool {
        matches!(self.state, BlockState::Done) && self.exit_code == 0
    }

    /// Check if the latest run finished with a non-zero status
    pub fn is_failed(&self) -> bool {
        matches!(self.state, BlockState::Done) && self.exit_code != 0
    }

    /// Output as it should be presented once the run is done
    ///
    /// `None` when the output is empty or only whitespace.
    pub fn display_output(&self) -> Option<String> {
        output::format_for_display(&self.output, self.content_type)
    }
}
