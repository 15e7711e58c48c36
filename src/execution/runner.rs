//! Command execution engine.

use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Instant;

use tokio::io::AsyncReadExt;
use tokio::process::Child;
use tokio::time;

use super::command::{CmdOpts, Invocation};
use crate::error::CommandError;
use crate::events::{EventSink, LogEvent, TracingSink};
use crate::Result;

/// Runs external commands and reports each invocation into an event sink.
///
/// A runner is cheap to clone and safe to share; concurrent runs own
/// their subprocess handles and buffers exclusively.
#[derive(Clone)]
pub struct CommandRunner {
    sink: Arc<dyn EventSink>,
}

impl CommandRunner {
    /// Create a runner that reports through `tracing`.
    pub fn new() -> Self {
        Self {
            sink: Arc::new(TracingSink),
        }
    }

    /// Create a runner that reports into the given sink.
    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Run `program` with `args`, applying `opts.dir` when set.
    ///
    /// Returns the trimmed standard-output. On a non-zero exit the error
    /// carries the trimmed output captured so far.
    pub async fn run<I, S>(&self, program: &str, opts: &CmdOpts, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut invocation = Invocation::new(program).args(args);
        if let Some(dir) = &opts.dir {
            invocation = invocation.current_dir(dir);
        }
        self.run_ext(invocation, opts).await
    }

    /// Run an already-built invocation, enforcing `opts.timeout`.
    pub async fn run_ext(&self, invocation: Invocation, opts: &CmdOpts) -> Result<String> {
        let command_line = invocation.command_line();
        let dir = invocation
            .dir()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        self.sink
            .emit(LogEvent::info(command_line.as_str()).with_field("dir", dir));

        let started = Instant::now();
        let mut child = invocation.to_command().spawn()?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let status = match opts.deadline() {
            Some(limit) => {
                match time::timeout(limit, drain(&mut child, &mut stdout, &mut stderr)).await {
                    Ok(status) => status?,
                    Err(_) => {
                        // Deadline won the race. Kill is best-effort and
                        // the call returns without waiting for the exit;
                        // kill_on_drop covers the handle from here.
                        let _ = child.start_kill();
                        return Err(CommandError::Timeout {
                            command: command_line,
                            timeout: limit,
                        });
                    }
                }
            }
            None => drain(&mut child, &mut stdout, &mut stderr).await?,
        };
        let duration = started.elapsed();

        let stdout = String::from_utf8_lossy(&stdout).into_owned();
        let stderr = String::from_utf8_lossy(&stderr).into_owned();

        if status.success() {
            self.sink
                .emit(LogEvent::debug(stdout.as_str()).with_field("duration", duration));
            return Ok(stdout.trim().to_string());
        }

        if !stdout.is_empty() {
            self.sink
                .emit(LogEvent::debug(stdout.as_str()).with_field("duration", duration));
        }
        let failure = CommandError::Failed {
            command: command_line,
            stderr: stderr.trim().to_string(),
            output: stdout.trim().to_string(),
        };
        self.sink.emit(LogEvent::error(failure.to_string()));
        Err(failure)
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Read both output pipes to EOF, then reap the exit status.
///
/// Pipes must be drained before waiting or a chatty subprocess can block
/// on a full pipe buffer and never exit.
async fn drain(
    child: &mut Child,
    stdout: &mut Vec<u8>,
    stderr: &mut Vec<u8>,
) -> std::io::Result<ExitStatus> {
    let mut out_pipe = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("stdout not piped"))?;
    let mut err_pipe = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("stderr not piped"))?;
    let (out, err) = tokio::join!(out_pipe.read_to_end(stdout), err_pipe.read_to_end(stderr));
    out?;
    err?;
    child.wait().await
}

/// Run a command with a `tracing`-backed runner.
pub async fn run_command<I, S>(program: &str, opts: &CmdOpts, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    CommandRunner::new().run(program, opts, args).await
}

/// Run a prepared invocation with a `tracing`-backed runner.
pub async fn run_command_ext(invocation: Invocation, opts: &CmdOpts) -> Result<String> {
    CommandRunner::new().run_ext(invocation, opts).await
}
