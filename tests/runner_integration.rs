//! End-to-end command execution tests.
//!
//! These run real subprocesses (Unix shell utilities) and assert on the
//! returned output, the error text, and the emitted event sequence.

#![cfg(unix)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use cmd_runner::{
    run_command, run_command_ext, CaptureSink, CmdOpts, CommandError, CommandRunner, FieldValue,
    Invocation, LogLevel,
};

fn capturing_runner() -> (CommandRunner, Arc<CaptureSink>) {
    let sink = Arc::new(CaptureSink::new());
    (CommandRunner::with_sink(sink.clone()), sink)
}

// ============================================================================
// Success Path
// ============================================================================

#[tokio::test]
async fn test_echo_returns_trimmed_output() {
    let output = run_command("echo", &CmdOpts::default(), ["hello world"])
        .await
        .unwrap();
    assert_eq!(output, "hello world");
}

#[tokio::test]
async fn test_success_event_sequence() {
    let (runner, sink) = capturing_runner();
    let output = runner
        .run("echo", &CmdOpts::default(), ["hello", "world"])
        .await
        .unwrap();
    assert_eq!(output, "hello world");

    let events = sink.events();
    assert_eq!(events.len(), 2);

    assert_eq!(events[0].level, LogLevel::Info);
    assert_eq!(events[0].message, "echo hello world");
    assert_eq!(
        events[0].field("dir"),
        Some(&FieldValue::Text(String::new()))
    );

    assert_eq!(events[1].level, LogLevel::Debug);
    assert_eq!(events[1].message, "hello world\n");
    assert!(matches!(
        events[1].field("duration"),
        Some(FieldValue::Duration(_))
    ));
}

#[tokio::test]
async fn test_printf_output_without_newline() {
    // printf writes no trailing newline; trimming must not eat content.
    let output = run_command("printf", &CmdOpts::default(), ["hello world"])
        .await
        .unwrap();
    assert_eq!(output, "hello world");
}

// ============================================================================
// Failure Path
// ============================================================================

#[tokio::test]
async fn test_failure_returns_output_and_error() {
    let (runner, sink) = capturing_runner();
    let script = "echo my-output && echo my-error >&2 && exit 1";
    let err = runner
        .run("sh", &CmdOpts::default(), ["-c", script])
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "`sh -c echo my-output && echo my-error >&2 && exit 1` failed: my-error"
    );
    assert_eq!(err.output(), "my-output");

    let events = sink.events();
    assert_eq!(events.len(), 3);

    assert_eq!(events[0].level, LogLevel::Info);
    assert_eq!(events[0].message, format!("sh -c {script}"));
    assert_eq!(
        events[0].field("dir"),
        Some(&FieldValue::Text(String::new()))
    );

    assert_eq!(events[1].level, LogLevel::Debug);
    assert_eq!(events[1].message, "my-output\n");
    assert!(events[1].field("duration").is_some());

    assert_eq!(events[2].level, LogLevel::Error);
    assert_eq!(events[2].message, err.to_string());
}

#[tokio::test]
async fn test_failure_without_stdout_skips_debug_event() {
    let (runner, sink) = capturing_runner();
    let err = runner
        .run(
            "sh",
            &CmdOpts::default(),
            ["-c", "echo only-stderr >&2 && exit 3"],
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "`sh -c echo only-stderr >&2 && exit 3` failed: only-stderr"
    );
    assert_eq!(err.output(), "");

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].level, LogLevel::Info);
    assert_eq!(events[1].level, LogLevel::Error);
}

// ============================================================================
// Timeout
// ============================================================================

#[tokio::test]
async fn test_timeout_error_text() {
    let opts = CmdOpts::with_timeout(Duration::from_nanos(1));
    let err = run_command("sleep", &opts, ["2"]).await.unwrap_err();
    assert_eq!(err.to_string(), "`sleep 2` timeout after 1ns");
    assert!(matches!(err, CommandError::Timeout { .. }));
}

#[tokio::test]
async fn test_timeout_does_not_wait_for_exit() {
    let started = Instant::now();
    let opts = CmdOpts::with_timeout(Duration::from_millis(50));
    let (runner, sink) = capturing_runner();
    let err = runner.run("sleep", &opts, ["5"]).await.unwrap_err();

    assert!(matches!(err, CommandError::Timeout { .. }));
    // Termination overhead, not the subprocess's five seconds.
    assert!(started.elapsed() < Duration::from_secs(2));

    // Only the invocation-start event precedes a timeout.
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, LogLevel::Info);
}

#[tokio::test]
async fn test_fast_command_beats_deadline() {
    let opts = CmdOpts::with_timeout(Duration::from_secs(30));
    let output = run_command("echo", &opts, ["quick"]).await.unwrap();
    assert_eq!(output, "quick");
}

// ============================================================================
// Working Directory
// ============================================================================

#[tokio::test]
async fn test_run_ext_in_dir() {
    let invocation = Invocation::new("pwd").current_dir("/");
    let output = run_command_ext(invocation, &CmdOpts::default())
        .await
        .unwrap();
    assert_eq!(output, "/");
}

#[tokio::test]
async fn test_opts_dir_applied_and_logged() {
    let dir = tempfile::tempdir().unwrap();
    // Resolve symlinks (macOS /tmp) so pwd output matches.
    let resolved = dir.path().canonicalize().unwrap();

    let (runner, sink) = capturing_runner();
    let opts = CmdOpts::with_dir(&resolved);
    let output = runner
        .run("pwd", &opts, Vec::<String>::new())
        .await
        .unwrap();
    assert_eq!(output, resolved.display().to_string());

    let events = sink.events();
    assert_eq!(
        events[0].field("dir"),
        Some(&FieldValue::Text(resolved.display().to_string()))
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_runs_are_independent() {
    let (runner_a, sink_a) = capturing_runner();
    let (runner_b, sink_b) = capturing_runner();

    let opts_a = CmdOpts::default();
    let opts_b = CmdOpts::default();
    let (a, b) = tokio::join!(
        runner_a.run("echo", &opts_a, ["first"]),
        runner_b.run("echo", &opts_b, ["second"]),
    );

    assert_eq!(a.unwrap(), "first");
    assert_eq!(b.unwrap(), "second");
    assert_eq!(sink_a.events().len(), 2);
    assert_eq!(sink_b.events().len(), 2);
    assert_eq!(sink_a.events()[0].message, "echo first");
    assert_eq!(sink_b.events()[0].message, "echo second");
}
