//! Interactive block execution
//!
//! A [`RunBlock`] pairs an immutable [`ExtractedBlock`] with the
//! [`BlockRunState`] of its latest run and drives the
//! `Idle -> Running -> Done` lifecycle:
//!
//! - a trigger while `Running` is ignored
//! - entering `Running` clears the previous output
//! - every streamed chunk is appended and announced
//! - execution failures become a failed run, never an error
//!
//! The state sits behind a shared lock so a run can proceed on a spawned
//! task while the front end keeps reading it.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::env::{substitute_env, EnvMap};
use crate::events::{BlockEvent, EventSender};
use crate::execution::{CommandRunner, OutputChunk, StreamType};
use crate::models::{BlockRunState, ExecResult, ExtractedBlock};

/// Everything a block needs to run, shared across a session
#[derive(Clone)]
pub struct RunContext {
    /// Executes the block source
    pub runner: Arc<dyn CommandRunner>,
    /// Working directory for spawned commands
    pub cwd: PathBuf,
    /// Variables substituted into the source and overlaid on the environment
    pub env: Arc<EnvMap>,
    /// Where state and output notifications go, if anyone listens
    pub events: Option<EventSender>,
}

impl RunContext {
    /// Create a context without event delivery
    pub fn new(runner: Arc<dyn CommandRunner>, cwd: impl Into<PathBuf>, env: EnvMap) -> Self {
        Self {
            runner,
            cwd: cwd.into(),
            env: Arc::new(env),
            events: None,
        }
    }

    /// Publish notifications through `events`
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    fn publish(&self, event: BlockEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }
}

/// One runnable block and the state of its latest run
#[derive(Debug, Clone)]
pub struct RunBlock {
    block: Arc<ExtractedBlock>,
    state: Arc<Mutex<BlockRunState>>,
}

impl RunBlock {
    /// Wrap an extracted block in the `Idle` state
    pub fn new(block: ExtractedBlock) -> Self {
        Self {
            block: Arc::new(block),
            state: Arc::new(Mutex::new(BlockRunState::new())),
        }
    }

    /// The extracted block
    pub fn block(&self) -> &ExtractedBlock {
        &self.block
    }

    /// Position among the document's shell blocks
    pub fn index(&self) -> usize {
        self.block.index
    }

    /// Snapshot of the current run state
    pub fn state(&self) -> BlockRunState {
        self.lock_state().clone()
    }

    /// Whether a run is in flight
    pub fn is_running(&self) -> bool {
        self.lock_state().is_running()
    }

    /// Start a run on a spawned task
    ///
    /// Returns `None` when the block is already running. The block is
    /// `Running` by the time this returns.
    pub fn trigger(&self, context: &RunContext) -> Option<JoinHandle<ExecResult>> {
        if !self.try_begin(context) {
            return None;
        }

        let block = self.clone();
        let context = context.clone();
        Some(tokio::spawn(async move { block.execute(&context).await }))
    }

    /// Run in place and wait for the result
    ///
    /// Returns `None` when the block is already running.
    pub async fn run(&self, context: &RunContext) -> Option<ExecResult> {
        if !self.try_begin(context) {
            return None;
        }
        Some(self.execute(context).await)
    }

    /// Enter `Running` unless a run is already in flight
    fn try_begin(&self, context: &RunContext) -> bool {
        {
            let mut state = self.lock_state();
            if state.is_running() {
                debug!("Block {} is already running, ignoring trigger", self.index());
                return false;
            }
            state.begin_run();
        }

        context.publish(self.header_event());
        true
    }

    /// Execute the source of a block that has entered `Running`
    async fn execute(&self, context: &RunContext) -> ExecResult {
        let started = Instant::now();
        let command = substitute_env(&self.block.source, &context.env);
        info!(
            "Running block {} [{}] in {}",
            self.index(),
            self.block.language,
            context.cwd.display()
        );

        let sink = |chunk: OutputChunk| {
            self.lock_state().append_output(&chunk.text);
            context.publish(BlockEvent::OutputChanged {
                index: self.index(),
                chunk,
            });
        };

        let result = match context
            .runner
            .run_streaming(&command, &context.cwd, &context.env, &sink)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                let result = ExecResult::from_error(&e);
                // Nothing was streamed, surface the message as output
                sink(OutputChunk::new(StreamType::Stderr, result.stderr.clone()));
                result
            }
        };

        self.lock_state().finish(result.exit_code, started.elapsed());
        info!("Block {} finished with exit code {}", self.index(), result.exit_code);
        context.publish(self.header_event());
        result
    }

    fn header_event(&self) -> BlockEvent {
        let state = self.lock_state();
        BlockEvent::HeaderChanged {
            index: self.index(),
            state: state.state,
            exit_code: state.duration.map(|_| state.exit_code),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, BlockRunState> {
        // A panicking sink cannot leave the state half-written
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
