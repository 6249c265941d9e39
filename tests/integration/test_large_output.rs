//! Integration Tests for Large Output Handling
//!
//! Commands producing a lot of output must be captured completely in both
//! execution modes.

use std::sync::atomic::{AtomicUsize, Ordering};

use runmd::env::EnvMap;
use runmd::execution::{CommandRunner, OutputChunk, ShellExecutor};

#[tokio::test]
async fn test_moderate_output() {
    let result = ShellExecutor::new()
        .run(
            "for i in $(seq 1 100); do echo \"Line $i\"; done",
            &std::env::temp_dir(),
            &EnvMap::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.stdout.lines().count(), 100);
    assert_eq!(result.stdout.lines().last(), Some("Line 100"));
}

#[tokio::test]
async fn test_large_output_is_not_truncated() {
    let result = ShellExecutor::new()
        .run(
            "seq 1 100000",
            &std::env::temp_dir(),
            &EnvMap::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout.lines().count(), 100_000);
}

#[tokio::test]
async fn test_large_output_streams_in_many_chunks() {
    let chunks = AtomicUsize::new(0);
    let bytes = AtomicUsize::new(0);
    let sink = |chunk: OutputChunk| {
        chunks.fetch_add(1, Ordering::Relaxed);
        bytes.fetch_add(chunk.text.len(), Ordering::Relaxed);
    };

    let result = ShellExecutor::new()
        .run_streaming(
            "head -c 2000000 /dev/zero | tr '\\0' 'x'",
            &std::env::temp_dir(),
            &EnvMap::new(),
            &sink,
        )
        .await
        .unwrap();

    assert_eq!(result.stdout.len(), 2_000_000);
    assert_eq!(bytes.load(Ordering::Relaxed), 2_000_000);
    assert!(chunks.load(Ordering::Relaxed) > 1);
}
