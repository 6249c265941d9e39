//! Interactive Session
//!
//! Single owner of everything an interactive front end needs for one
//! document:
//!
//! - the ordered [`RunBlock`]s, one per shell block
//! - the focus index used for keyboard navigation
//! - the [`RunContext`] shared by every block
//!
//! It also enforces that at most one block of the document runs at a
//! time, so streamed output is always attributable to a single block.

use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::Config;
use crate::env::load_env_file;
use crate::error::{Error, Result};
use crate::events::EventSender;
use crate::execution::{CommandRunner, ShellExecutor};
use crate::markdown::BlockExtractor;
use crate::models::{ExecResult, ExtractedBlock};
use crate::run_block::{RunBlock, RunContext};
use crate::runner::Document;

/// Blocks of one document plus focus and run coordination
pub struct Session {
    blocks: Vec<RunBlock>,
    focus: Option<usize>,
    context: RunContext,
}

impl Session {
    /// Create a session over already extracted blocks
    pub fn new(blocks: Vec<ExtractedBlock>, context: RunContext) -> Self {
        let blocks: Vec<RunBlock> = blocks.into_iter().map(RunBlock::new).collect();
        let focus = if blocks.is_empty() { None } else { Some(0) };
        Self {
            blocks,
            focus,
            context,
        }
    }

    /// Open a document from disk
    ///
    /// Loads the dotenv file next to the document and extracts the shell
    /// blocks from the raw text; substitution happens per block at run time.
    pub fn open(path: &Path, config: &Config, events: Option<EventSender>) -> Result<Self> {
        let runner = ShellExecutor::from_config(&config.shell).with_timeout(config.runner.timeout());
        Self::open_with(path, config, Arc::new(runner), events)
    }

    /// Open a document with a specific command runner
    pub fn open_with(
        path: &Path,
        config: &Config,
        runner: Arc<dyn CommandRunner>,
        events: Option<EventSender>,
    ) -> Result<Self> {
        let document = Document::open(path)?;
        let env = load_env_file(&document.dir, &config.env.file)?;
        let extractor = BlockExtractor::new(config.runner.language_set());
        let blocks = extractor.extract(&document.content);
        info!(
            "Opened {} with {} shell blocks",
            document.path.display(),
            blocks.len()
        );

        let mut context = RunContext::new(runner, document.dir, env);
        if let Some(events) = events {
            context = context.with_events(events);
        }
        Ok(Self::new(blocks, context))
    }

    /// All blocks in document order
    pub fn blocks(&self) -> &[RunBlock] {
        &self.blocks
    }

    /// Block at `index`
    pub fn block(&self, index: usize) -> Option<&RunBlock> {
        self.blocks.get(index)
    }

    /// Number of shell blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no shell blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Shared run context
    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Index of the focused block, `None` when there are no blocks
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// The focused block
    pub fn focused(&self) -> Option<&RunBlock> {
        self.focus.and_then(|index| self.blocks.get(index))
    }

    /// Move focus to the next block, wrapping around
    pub fn focus_next(&mut self) -> Option<usize> {
        if self.blocks.is_empty() {
            return None;
        }
        let next = self.focus.map_or(0, |index| (index + 1) % self.blocks.len());
        self.focus = Some(next);
        self.focus
    }

    /// Move focus to the previous block, wrapping around
    pub fn focus_prev(&mut self) -> Option<usize> {
        if self.blocks.is_empty() {
            return None;
        }
        let len = self.blocks.len();
        let prev = self.focus.map_or(len - 1, |index| (index + len - 1) % len);
        self.focus = Some(prev);
        self.focus
    }

    /// Focus a specific block
    pub fn set_focus(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.focus = Some(index);
        Ok(())
    }

    /// Index of the block currently running, if any
    pub fn running(&self) -> Option<usize> {
        self.blocks
            .iter()
            .find(|block| block.is_running())
            .map(RunBlock::index)
    }

    /// Start `index` on a spawned task
    ///
    /// Rejected while any block of the document is running.
    pub fn trigger(&mut self, index: usize) -> Result<JoinHandle<ExecResult>> {
        self.check_can_start(index)?;
        self.blocks[index]
            .trigger(&self.context)
            .ok_or(Error::BlockAlreadyRunning { index })
    }

    /// Start the focused block on a spawned task
    pub fn trigger_focused(&mut self) -> Result<JoinHandle<ExecResult>> {
        let index = self.focus.ok_or(Error::BlockIndexOutOfRange {
            index: 0,
            total: 0,
        })?;
        self.trigger(index)
    }

    /// Run `index` in place and wait for it to finish
    pub async fn run(&mut self, index: usize) -> Result<ExecResult> {
        self.check_can_start(index)?;
        self.blocks[index]
            .run(&self.context)
            .await
            .ok_or(Error::BlockAlreadyRunning { index })
    }

    fn check_can_start(&self, index: usize) -> Result<()> {
        self.check_index(index)?;
        match self.running() {
            Some(running) if running == index => Err(Error::BlockAlreadyRunning { index }),
            Some(running) => {
                debug!("Rejecting block {} while block {} runs", index, running);
                Err(Error::SessionBusy { running })
            }
            None => Ok(()),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.blocks.len() {
            Ok(())
        } else {
            Err(Error::BlockIndexOutOfRange {
                index,
                total: self.blocks.len(),
            })
        }
    }
}
