//! Integration Tests for Shell Execution
//!
//! Buffered and streaming runs against the real `sh`.

use std::path::PathBuf;
use std::sync::Mutex;

use runmd::config::ShellConfig;
use runmd::env::EnvMap;
use runmd::execution::{CommandRunner, OutputChunk, ShellExecutor, StreamType};
use runmd::Error;
use tempfile::TempDir;

fn cwd() -> PathBuf {
    std::env::temp_dir()
}

/// Run both ways and return (buffered, streamed, chunks)
async fn run_both(
    command: &str,
    env: &EnvMap,
) -> (runmd::ExecResult, runmd::ExecResult, Vec<OutputChunk>) {
    let executor = ShellExecutor::new();
    let buffered = executor.run(command, &cwd(), env).await.unwrap();

    let chunks = Mutex::new(Vec::new());
    let sink = |chunk: OutputChunk| chunks.lock().unwrap().push(chunk);
    let streamed = executor
        .run_streaming(command, &cwd(), env, &sink)
        .await
        .unwrap();

    (buffered, streamed, chunks.into_inner().unwrap())
}

#[tokio::test]
async fn test_streaming_matches_buffered() {
    let commands = [
        "echo hello",
        "echo out; echo err >&2; exit 4",
        "printf 'no newline'",
        "true",
        "for i in 1 2 3; do echo line $i; sleep 0.01; done",
        "printf '\\303\\251t\\303\\251 \\342\\202\\254'",
        "printf 'bad \\377 byte'",
    ];

    for command in commands {
        let (buffered, streamed, _) = run_both(command, &EnvMap::new()).await;
        assert_eq!(buffered, streamed, "mismatch for {:?}", command);
    }
}

#[tokio::test]
async fn test_chunks_reassemble_per_stream() {
    let command = "for i in $(seq 1 50); do echo out $i; echo err $i >&2; done";
    let (_, streamed, chunks) = run_both(command, &EnvMap::new()).await;

    let join = |stream: StreamType| {
        chunks
            .iter()
            .filter(|chunk| chunk.stream == stream)
            .map(|chunk| chunk.text.as_str())
            .collect::<String>()
    };
    assert_eq!(join(StreamType::Stdout), streamed.stdout);
    assert_eq!(join(StreamType::Stderr), streamed.stderr);
    assert!(streamed.stdout.starts_with("out 1\nout 2\n"));
}

#[tokio::test]
async fn test_invalid_utf8_is_replaced() {
    let (buffered, _, _) = run_both("printf 'a\\377b'", &EnvMap::new()).await;
    assert_eq!(buffered.stdout, "a\u{FFFD}b");
}

#[tokio::test]
async fn test_working_directory() {
    let dir = TempDir::new().unwrap();
    let result = ShellExecutor::new()
        .run("pwd", dir.path(), &EnvMap::new())
        .await
        .unwrap();

    let reported = PathBuf::from(result.stdout.trim()).canonicalize().unwrap();
    assert_eq!(reported, dir.path().canonicalize().unwrap());
}

#[tokio::test]
async fn test_env_overlay_is_visible_to_both_modes() {
    let env: EnvMap = [("RUNMD_IT_VALUE", "overlay")].into_iter().collect();
    let (buffered, streamed, _) = run_both("echo $RUNMD_IT_VALUE; echo $PATH | head -c 1", &env).await;
    assert!(buffered.stdout.starts_with("overlay\n"));
    // Ambient variables are still inherited
    assert!(buffered.stdout.len() > "overlay\n".len());
    assert_eq!(buffered, streamed);
}

#[tokio::test]
async fn test_full_stderr_pipe_does_not_block() {
    // Far more than a pipe buffer on stderr before anything on stdout
    let command = "head -c 1000000 /dev/zero | tr '\\0' 'e' >&2; echo done";
    let (buffered, streamed, _) = run_both(command, &EnvMap::new()).await;
    assert_eq!(buffered.stderr.len(), 1_000_000);
    assert_eq!(buffered.stdout, "done\n");
    assert_eq!(buffered, streamed);
}

#[tokio::test]
async fn test_stdin_is_closed() {
    let result = ShellExecutor::new()
        .run("cat; echo finished", &cwd(), &EnvMap::new())
        .await
        .unwrap();
    assert_eq!(result.stdout, "finished\n");
}

#[tokio::test]
async fn test_configured_interpreter() {
    let executor = ShellExecutor::from_config(&ShellConfig {
        program: "bash".to_string(),
        args: vec!["-c".to_string()],
    });
    let result = executor
        .run("echo ${BASH_VERSION:+bash}", &cwd(), &EnvMap::new())
        .await
        .unwrap();
    assert_eq!(result.stdout, "bash\n");
}

#[tokio::test]
async fn test_missing_interpreter() {
    let executor = ShellExecutor::from_config(&ShellConfig {
        program: "runmd-no-such-shell".to_string(),
        args: vec!["-c".to_string()],
    });
    let err = executor
        .run_streaming("echo hi", &cwd(), &EnvMap::new(), &runmd::execution::NullSink)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CommandSpawnFailed { .. }));
}
