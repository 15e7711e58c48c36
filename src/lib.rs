//! # cmd-runner
//!
//! Lightweight external command runner with timeout enforcement and
//! structured log events.
//!
//! This crate shells out to an external process, captures its output,
//! enforces an optional deadline, and emits leveled events for the
//! invocation, its result, and any failure. Process spawning is handled
//! by `tokio::process`; event delivery goes through an injectable sink
//! so tests can capture the exact sequence without global state.
//!
//! ## Features
//!
//! - **Trimmed output**: returns stdout with surrounding whitespace removed
//! - **Deadline enforcement**: forced termination when a timeout elapses
//! - **Structured events**: info on start, debug with output and duration,
//!   error on failure, all with deterministic message text
//! - **Independent runs**: no shared state, safe from concurrent tasks
//!
//! ## Quick Start
//!
//! ```no_run
//! use cmd_runner::{run_command, CmdOpts};
//!
//! #[tokio::main]
//! async fn main() -> cmd_runner::Result<()> {
//!     // Initialize logging
//!     cmd_runner::logging::try_init().ok();
//!
//!     let output = run_command("echo", &CmdOpts::default(), ["hello", "world"]).await?;
//!     println!("{output}");
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod events;
pub mod execution;
pub mod logging;

// Re-export commonly used types
pub use error::{CommandError, Result};
pub use events::{CaptureSink, EventSink, FieldValue, LogEvent, LogLevel, TracingSink};
pub use execution::{run_command, run_command_ext, CmdOpts, CommandRunner, Invocation};
