//! runmd - run the shell code blocks of a markdown document
//!
//! Documentation often carries snippets meant to be pasted into a shell.
//! This library extracts those snippets and runs them, either one at a time
//! under interactive control or as an unattended batch that reports what
//! passed, failed and was skipped.
//!
//! ## Features
//!
//! - **Block extraction:** Top-level fenced blocks tagged `sh`, `bash`, `shell` or `zsh`
//! - **Dotenv support:** `.env` next to the document, `${NAME}` placeholders
//! - **Streaming execution:** Output chunks delivered as they are produced
//! - **Block lifecycle:** `Idle -> Running -> Done`, re-runnable, JSON pretty-printing
//! - **Batch runs:** Block subsets, fail-fast, aggregate counts and durations
//! - **Configuration:** TOML-based configuration files
//!
//! ## Module Organization
//!
//! ### Core Functionality
//!
//! - [`env`] - Dotenv loading and placeholder substitution
//! - [`markdown`] - Shell block extraction
//! - [`execution`] - Buffered and streaming shell execution
//! - [`run_block`] - Per-block state machine
//! - [`session`] - Interactive session over a document
//! - [`runner`] - Headless batch runner
//!
//! ### Supporting Modules
//!
//! - [`config`] - Configuration loading and validation
//! - [`models`] - Data structures (ExtractedBlock, ExecResult, BatchResult)
//! - [`events`] - Block state and output notifications
//! - [`output`] - Content-type sniffing and pretty-printing
//! - [`report`] - Batch progress reporting
//! - [`ansi`] - Console styling
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use runmd::{run_markdown, RunnerOptions};
//!
//! # async fn example() -> runmd::Result<()> {
//! let result = run_markdown(&RunnerOptions::new("README.md").fail_fast(true)).await?;
//! println!("{} passed, {} failed", result.passed, result.failed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! One shell process is outstanding at a time: the batch runner awaits each
//! block before starting the next, and a [`Session`] rejects a trigger while
//! any of its blocks is running. Within a process, stdout, stderr and the
//! exit wait are driven concurrently.

pub mod ansi;
pub mod config;
pub mod env;
pub mod error;
pub mod events;
pub mod execution;
pub mod markdown;
pub mod models;
pub mod output;
pub mod report;
pub mod run_block;
pub mod runner;
pub mod session;

// Re-exports for core functionality
pub use config::{Config, ConfigLoader};
pub use env::{load_env, substitute_env, EnvMap};
pub use error::{Error, Result};
pub use execution::{CommandRunner, ShellExecutor};
pub use markdown::{extract_shell_blocks, BlockExtractor};
pub use models::{BatchResult, BlockResult, BlockRunState, BlockState, ExecResult, ExtractedBlock};
pub use run_block::{RunBlock, RunContext};
pub use runner::{run_markdown, run_markdown_with, RunnerOptions};
pub use session::Session;

// Version information
/// The current version of runmd from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
