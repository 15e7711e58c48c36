//! Command execution engine.
//!
//! This module provides external command execution:
//! - Fluent invocation building
//! - Timeout handling with forced termination
//! - Leveled events for start, output, and failure
//!
//! # Example
//!
//! ```no_run
//! use cmd_runner::{run_command, CmdOpts};
//!
//! # async fn demo() -> cmd_runner::Result<()> {
//! // Simple one-shot execution
//! let output = run_command("echo", &CmdOpts::default(), ["hello"]).await?;
//! assert_eq!(output, "hello");
//!
//! // With a deadline
//! use std::time::Duration;
//! let opts = CmdOpts::with_timeout(Duration::from_secs(60));
//! run_command("cargo", &opts, ["build"]).await?;
//! # Ok(())
//! # }
//! ```

mod command;
mod runner;

pub use command::{CmdOpts, Invocation};
pub use runner::{run_command, run_command_ext, CommandRunner};
