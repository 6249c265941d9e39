//! Shell command execution
//!
//! Spawns the configured interpreter with a block's source as its command
//! string. Two entry points share one contract: [`CommandRunner::run`]
//! waits and returns everything at once, [`CommandRunner::run_streaming`]
//! additionally hands each decoded chunk to a sink as it arrives. For the
//! same command, directory and environment both produce the same
//! [`ExecResult`].
//!
//! Stdout, stderr and the exit wait are always driven concurrently so a
//! process that fills one pipe before exiting cannot stall the caller.

pub mod streams;

use async_trait::async_trait;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::config::ShellConfig;
use crate::env::EnvMap;
use crate::error::{Error, Result};
use crate::models::ExecResult;

pub use streams::{ChunkSink, NullSink, OutputChunk, StreamDecoder, StreamType};

/// Size of each pipe read in streaming mode
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Runs command strings and captures their output
///
/// This is the seam between block lifecycle logic and real processes;
/// tests substitute scripted implementations.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion and return the captured output
    ///
    /// `env` is overlaid on the inherited process environment; its values
    /// win on conflicts.
    async fn run(&self, command: &str, cwd: &Path, env: &EnvMap) -> Result<ExecResult>;

    /// Run to completion, delivering output chunks to `sink` as they are read
    async fn run_streaming(
        &self,
        command: &str,
        cwd: &Path,
        env: &EnvMap,
        sink: &dyn ChunkSink,
    ) -> Result<ExecResult>;
}

/// Executes commands through a shell interpreter (`sh -c` by default)
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    /// Interpreter executable
    program: String,
    /// Arguments placed before the command string
    args: Vec<String>,
    /// Optional limit on how long a command may run
    timeout: Option<Duration>,
}

impl ShellExecutor {
    /// Create an executor for `sh -c` without a timeout
    pub fn new() -> Self {
        Self::from_config(&ShellConfig::default())
    }

    /// Create an executor from the shell configuration
    pub fn from_config(config: &ShellConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            timeout: None,
        }
    }

    /// Kill commands that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Interpreter executable
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Configured timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Spawn the interpreter with piped output
    fn spawn(&self, command: &str, cwd: &Path, env: &EnvMap) -> Result<Child> {
        debug!("Spawning {} in {}", self.program, cwd.display());

        Command::new(&self.program)
            .args(&self.args)
            .arg(command)
            .current_dir(cwd)
            .envs(env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                warn!("Failed to spawn {}: {}", self.program, e);
                Error::CommandSpawnFailed {
                    command: command.to_string(),
                    reason: e.to_string(),
                }
            })
    }

    /// Kill a command whose timeout fired and build the matching error
    async fn timed_out(&self, child: &mut Child, command: &str) -> Error {
        let limit = self.timeout.unwrap_or_default();
        warn!("Command timed out after {:?}, killing it", limit);
        if let Err(e) = child.kill().await {
            debug!("Failed to kill timed out command: {}", e);
        }
        Error::CommandTimeout {
            command: command.to_string(),
            duration: limit,
        }
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ShellExecutor {
    async fn run(&self, command: &str, cwd: &Path, env: &EnvMap) -> Result<ExecResult> {
        let mut child = self.spawn(command, cwd, env)?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (stdout, stderr, status) = {
            let work = async { tokio::join!(read_all(stdout), read_all(stderr), child.wait()) };
            match self.timeout {
                None => work.await,
                Some(limit) => match tokio::time::timeout(limit, work).await {
                    Ok(collected) => collected,
                    Err(_) => return Err(self.timed_out(&mut child, command).await),
                },
            }
        };

        let result = ExecResult::new(
            String::from_utf8_lossy(&stdout?).into_owned(),
            String::from_utf8_lossy(&stderr?).into_owned(),
            exit_code(status?),
        );
        debug!("Command exited with {}", result.exit_code);
        Ok(result)
    }

    async fn run_streaming(
        &self,
        command: &str,
        cwd: &Path,
        env: &EnvMap,
        sink: &dyn ChunkSink,
    ) -> Result<ExecResult> {
        let mut child = self.spawn(command, cwd, env)?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (stdout, stderr, status) = {
            let work = async {
                tokio::join!(
                    pump(stdout, StreamType::Stdout, sink),
                    pump(stderr, StreamType::Stderr, sink),
                    child.wait(),
                )
            };
            match self.timeout {
                None => work.await,
                Some(limit) => match tokio::time::timeout(limit, work).await {
                    Ok(collected) => collected,
                    Err(_) => return Err(self.timed_out(&mut child, command).await),
                },
            }
        };

        let result = ExecResult::new(stdout?, stderr?, exit_code(status?));
        debug!("Streaming command exited with {}", result.exit_code);
        Ok(result)
    }
}

/// Read a pipe to the end
async fn read_all<R>(reader: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut bytes).await?;
    }
    Ok(bytes)
}

/// Read a pipe incrementally, forwarding each decoded chunk to `sink`
async fn pump<R>(reader: Option<R>, stream: StreamType, sink: &dyn ChunkSink) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut collected = String::new();
    let Some(mut reader) = reader else {
        return Ok(collected);
    };

    let mut decoder = StreamDecoder::new();
    let mut buf = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }

        let text = decoder.decode(&buf[..n]);
        if !text.is_empty() {
            collected.push_str(&text);
            sink.send_chunk(OutputChunk::new(stream, text));
        }
    }

    if decoder.has_pending() {
        debug!("{} ended inside a UTF-8 sequence", stream);
        let tail = decoder.finish();
        collected.push_str(&tail);
        sink.send_chunk(OutputChunk::new(stream, tail));
    }

    Ok(collected)
}

/// Exit status as a shell would report it
///
/// A process killed by a signal reports `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
