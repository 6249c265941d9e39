//! Batch Result Models
//!
//! Aggregate outcome of a headless run over a document's shell blocks.

use serde::{Deserialize, Serialize};

use crate::models::{ExecResult, ExtractedBlock};

/// Outcome of one executed block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockResult {
    /// Index of the block among shell blocks
    pub index: usize,
    /// Fence language
    pub language: String,
    /// Source that was executed
    pub code: String,
    /// Process exit status
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl BlockResult {
    /// Build a result from the block that ran and what it produced
    pub fn new(block: &ExtractedBlock, result: ExecResult, duration_ms: u64) -> Self {
        Self {
            index: block.index,
            language: block.language.clone(),
            code: block.source.clone(),
            exit_code: result.exit_code,
            stdout: result.stdout,
            stderr: result.stderr,
            duration_ms,
        }
    }

    /// Whether the block exited with status 0
    pub fn passed(&self) -> bool {
        self.exit_code == 0
    }
}

/// Aggregate counts and per-block results of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Shell blocks found in the document
    pub total_blocks: usize,
    /// Blocks that were actually run
    pub executed: usize,
    /// Executed blocks that exited 0
    pub passed: usize,
    /// Executed blocks that exited non-zero
    pub failed: usize,
    /// Blocks not run (deselected or skipped by fail-fast)
    pub skipped: usize,
    /// Executed blocks in index order
    pub results: Vec<BlockResult>,
}

impl BatchResult {
    /// Empty result for a document with `total_blocks` shell blocks
    pub fn new(total_blocks: usize) -> Self {
        Self {
            total_blocks,
            ..Self::default()
        }
    }

    /// Record an executed block and classify it
    pub fn record(&mut self, result: BlockResult) {
        self.executed += 1;
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }

    /// Record a block that was not run
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Sum of per-block durations
    pub fn total_duration_ms(&self) -> u64 {
        self.results.iter().map(|r| r.duration_ms).sum()
    }

    /// Whether no executed block failed
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit code for a headless run
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}
