//! Headless batch runner
//!
//! Runs a document's shell blocks one after another and aggregates the
//! outcome into a [`BatchResult`]. Per block, in index order:
//!
//! 1. a block outside the requested subset is skipped
//! 2. once any block has failed under fail-fast, every later block is skipped,
//!    including explicitly requested ones
//! 3. otherwise the block runs with the buffered executor and is classified
//!    as passed (exit code 0) or failed
//!
//! The dotenv variables are substituted into the raw document before
//! extraction, so placeholders inside fences are resolved too.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::env::{load_env_file, substitute_env};
use crate::error::{Error, Result};
use crate::execution::{CommandRunner, ShellExecutor};
use crate::markdown::BlockExtractor;
use crate::models::{BatchResult, BlockResult, ExecResult};
use crate::report::{NullReporter, Reporter, SkipReason};

/// A markdown document read from disk
#[derive(Debug, Clone)]
pub struct Document {
    /// Absolute path of the document
    pub path: PathBuf,
    /// Directory containing the document, used as the working directory
    pub dir: PathBuf,
    /// Raw document text
    pub content: String,
}

impl Document {
    /// Read a document, failing with `FileNotFound` unless `path` is a file
    ///
    /// Invalid UTF-8 is replaced with U+FFFD rather than rejected.
    pub fn open(path: &Path) -> Result<Self> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        if !path.is_file() {
            return Err(Error::FileNotFound { path });
        }

        let content = String::from_utf8_lossy(&fs::read(&path)?).into_owned();
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { path, dir, content })
    }
}

/// Options of a batch run
#[derive(Debug, Clone, Default)]
pub struct RunnerOptions {
    /// Markdown document to run
    pub file_path: PathBuf,
    /// Skip remaining blocks after the first failure
    pub fail_fast: bool,
    /// Only run these block indices (all blocks when `None`)
    pub blocks: Option<BTreeSet<usize>>,
}

impl RunnerOptions {
    /// Run every block of `file_path`
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    /// Enable or disable fail-fast
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Restrict the run to the given block indices
    pub fn blocks(mut self, blocks: impl IntoIterator<Item = usize>) -> Self {
        self.blocks = Some(blocks.into_iter().collect());
        self
    }

    fn is_selected(&self, index: usize) -> bool {
        self.blocks
            .as_ref()
            .map_or(true, |blocks| blocks.contains(&index))
    }
}

/// Run a document with the default configuration and no progress output
pub async fn run_markdown(options: &RunnerOptions) -> Result<BatchResult> {
    let config = Config::default();
    let executor = ShellExecutor::from_config(&config.shell).with_timeout(config.runner.timeout());
    run_markdown_with(options, &config, &executor, &mut NullReporter).await
}

/// Run a document with an explicit configuration, runner and reporter
///
/// Only a missing document or a reporting failure is an error. Blocks that
/// cannot be spawned are recorded as failed with exit code 1.
pub async fn run_markdown_with(
    options: &RunnerOptions,
    config: &Config,
    runner: &dyn CommandRunner,
    reporter: &mut dyn Reporter,
) -> Result<BatchResult> {
    let document = Document::open(&options.file_path)?;
    let env = load_env_file(&document.dir, &config.env.file)?;
    let content = substitute_env(&document.content, &env);

    let blocks = BlockExtractor::new(config.runner.language_set()).extract(&content);
    let mut result = BatchResult::new(blocks.len());
    info!(
        "Running {} ({} shell blocks)",
        document.path.display(),
        blocks.len()
    );

    if blocks.is_empty() {
        return Ok(result);
    }

    reporter.run_started(&document.path, blocks.len())?;

    for block in &blocks {
        if !options.is_selected(block.index) {
            result.record_skip();
            reporter.block_skipped(block, SkipReason::NotSelected)?;
            continue;
        }

        if options.fail_fast && result.failed > 0 {
            result.record_skip();
            reporter.block_skipped(block, SkipReason::FailFast)?;
            continue;
        }

        reporter.block_started(block)?;

        let started = Instant::now();
        let exec = match runner.run(&block.source, &document.dir, &env).await {
            Ok(exec) => exec,
            Err(e) => {
                debug!("Block {} did not run: {}", block.index, e);
                ExecResult::from_error(&e)
            }
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        let block_result = BlockResult::new(block, exec, duration_ms);
        reporter.block_finished(&block_result)?;
        result.record(block_result);
    }

    info!(
        "Finished: {} passed, {} failed, {} skipped",
        result.passed, result.failed, result.skipped
    );
    reporter.run_finished(&result)?;
    Ok(result)
}
