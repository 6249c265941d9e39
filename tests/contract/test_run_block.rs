//! Contract Tests for the Block State Machine
//!
//! Contract: Idle -> Running -> Done, re-runnable. A trigger while running
//! is ignored, every transition and chunk is announced, and execution
//! failures end as a failed run rather than an error.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::sync::Arc;
use std::time::Duration;

use runmd::env::EnvMap;
use runmd::events::{self, BlockEvent, EventReceiver};
use runmd::execution::ShellExecutor;
use runmd::models::{BlockState, ExtractedBlock};
use runmd::output::ContentType;
use runmd::run_block::{RunBlock, RunContext};
use test_utils::{MockRunner, Script};

fn drain(receiver: &mut EventReceiver) -> Vec<BlockEvent> {
    let mut events = Vec::new();
    while let Ok(envelope) = receiver.try_recv() {
        events.push(envelope.event);
    }
    events
}

fn chunks(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

#[tokio::test]
async fn test_initial_state_is_idle() {
    let block = RunBlock::new(ExtractedBlock::new(0, "sh", "echo hi"));
    let state = block.state();
    assert_eq!(state.state, BlockState::Idle);
    assert!(state.output.is_empty());
    assert_eq!(state.display_output(), None);
}

#[tokio::test]
async fn test_lifecycle_with_real_shell() {
    let (sender, mut receiver) = events::channel();
    let context = RunContext::new(Arc::new(ShellExecutor::new()), std::env::temp_dir(), EnvMap::new())
        .with_events(sender);
    let block = RunBlock::new(ExtractedBlock::new(0, "sh", "echo hello; exit 2"));

    let handle = block.trigger(&context).unwrap();
    assert!(block.is_running());

    let result = handle.await.unwrap();
    assert_eq!(result.exit_code, 2);

    let state = block.state();
    assert_eq!(state.state, BlockState::Done);
    assert!(state.is_failed());
    assert_eq!(state.output, "hello\n");
    assert!(state.duration.is_some());

    let events = drain(&mut receiver);
    assert!(matches!(
        events.first(),
        Some(BlockEvent::HeaderChanged { state: BlockState::Running, .. })
    ));
    assert!(matches!(
        events.last(),
        Some(BlockEvent::HeaderChanged { state: BlockState::Done, exit_code: Some(2), .. })
    ));
    assert!(events
        .iter()
        .any(|event| matches!(event, BlockEvent::OutputChanged { .. })));
}

#[tokio::test]
async fn test_trigger_while_running_is_ignored() {
    let runner = MockRunner::new().on("slow", Script::Delay(Duration::from_millis(200)));
    let context = RunContext::new(Arc::new(runner), "/tmp", EnvMap::new());
    let block = RunBlock::new(ExtractedBlock::new(0, "sh", "slow"));

    let handle = block.trigger(&context).unwrap();
    assert!(block.trigger(&context).is_none());
    handle.await.unwrap();

    assert_eq!(block.state().state, BlockState::Done);
    // Done accepts a re-run
    assert!(block.trigger(&context).is_some());
}

#[tokio::test]
async fn test_rerun_clears_output_and_exit_code() {
    let runner = Arc::new(
        MockRunner::new().on("step", Script::Output(chunks(&["{\"ok\":", "true}"]), 0)),
    );
    let context = RunContext::new(runner.clone(), "/tmp", EnvMap::new());
    let block = RunBlock::new(ExtractedBlock::new(0, "sh", "step"));

    block.run(&context).await.unwrap();
    block.run(&context).await.unwrap();

    let state = block.state();
    assert_eq!(state.output, "{\"ok\":true}");
    assert_eq!(runner.commands().len(), 2);
}

#[tokio::test]
async fn test_structured_output_is_pretty_printed() {
    let runner = MockRunner::new().on(
        "json",
        Script::Output(chunks(&["\n  [", "{\"id\": 1}", "]\n"]), 0),
    );
    let context = RunContext::new(Arc::new(runner), "/tmp", EnvMap::new());
    let block = RunBlock::new(ExtractedBlock::new(0, "sh", "json"));

    block.run(&context).await.unwrap();
    let state = block.state();
    assert_eq!(state.content_type, Some(ContentType::Json));
    assert_eq!(
        state.display_output().as_deref(),
        Some("[\n  {\n    \"id\": 1\n  }\n]")
    );
}

#[tokio::test]
async fn test_malformed_json_is_shown_raw() {
    let runner = MockRunner::new().on("broken", Script::Output(chunks(&["{not: json}\n"]), 0));
    let context = RunContext::new(Arc::new(runner), "/tmp", EnvMap::new());
    let block = RunBlock::new(ExtractedBlock::new(0, "sh", "broken"));

    block.run(&context).await.unwrap();
    assert_eq!(block.state().display_output().as_deref(), Some("{not: json}"));
}

#[tokio::test]
async fn test_markup_is_sniffed() {
    let runner = MockRunner::new().on("html", Script::Output(chunks(&["<p>hi</p>"]), 0));
    let context = RunContext::new(Arc::new(runner), "/tmp", EnvMap::new());
    let block = RunBlock::new(ExtractedBlock::new(0, "sh", "html"));

    block.run(&context).await.unwrap();
    assert_eq!(block.state().content_type, Some(ContentType::Markup));
}

#[tokio::test]
async fn test_whitespace_output_is_not_presented() {
    let runner = MockRunner::new().on("blank", Script::Output(chunks(&["  \n", "\t\n"]), 0));
    let context = RunContext::new(Arc::new(runner), "/tmp", EnvMap::new());
    let block = RunBlock::new(ExtractedBlock::new(0, "sh", "blank"));

    block.run(&context).await.unwrap();
    let state = block.state();
    assert!(state.is_successful());
    assert_eq!(state.content_type, None);
    assert_eq!(state.display_output(), None);
}

#[tokio::test]
async fn test_stderr_is_part_of_output() {
    let runner = MockRunner::new().on("warn", Script::Stderr("warning: x\n".to_string(), 1));
    let context = RunContext::new(Arc::new(runner), "/tmp", EnvMap::new());
    let block = RunBlock::new(ExtractedBlock::new(0, "sh", "warn"));

    block.run(&context).await.unwrap();
    let state = block.state();
    assert!(state.is_failed());
    assert_eq!(state.display_output().as_deref(), Some("warning: x"));
}

#[tokio::test]
async fn test_spawn_error_becomes_exit_code_one() {
    let runner = MockRunner::new().on("boom", Script::SpawnError("interpreter missing".to_string()));
    let context = RunContext::new(Arc::new(runner), "/tmp", EnvMap::new());
    let block = RunBlock::new(ExtractedBlock::new(0, "sh", "boom"));

    let result = block.run(&context).await.unwrap();
    assert_eq!(result.exit_code, 1);
    let state = block.state();
    assert_eq!(state.exit_code, 1);
    assert!(state.output.contains("interpreter missing"));
}

#[tokio::test]
async fn test_source_is_substituted_before_running() {
    let runner = Arc::new(MockRunner::new());
    let env: EnvMap = [("TARGET", "prod")].into_iter().collect();
    let context = RunContext::new(runner.clone(), "/tmp", env);
    let block = RunBlock::new(ExtractedBlock::new(0, "sh", "deploy ${TARGET}${TARGET} ${OTHER}"));

    block.run(&context).await.unwrap();
    assert_eq!(runner.commands(), vec!["deploy prodprod ${OTHER}"]);
    // The extracted block itself is never rewritten
    assert_eq!(block.block().source, "deploy ${TARGET}${TARGET} ${OTHER}");
}
