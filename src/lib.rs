// src/lib.rs

//! Run an external program, capture its stdout and stderr, and report how it
//! ended, without going through a shell.
//!
//! ```no_run
//! use pawnexec::{Outcome, execute};
//!
//! match execute("git", &["git", "status", "--short"])? {
//!     Outcome::Exited(out) => println!("{} ({})", out.stdout_str(), out.exit_code),
//!     other => eprintln!("git {other}"),
//! }
//! # Ok::<(), pawnexec::ExecError>(())
//! ```
//!
//! Errors ([`ExecError`]) mean the command could not be run or observed;
//! a child that crashed or was stopped is an [`Outcome`] variant instead.

#[cfg(not(unix))]
compile_error!("pawnexec only supports unix targets");

pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod outcome;
pub mod status;
pub mod types;

use std::io;

pub use crate::config::ExecConfig;
pub use crate::errors::{ConfigError, ExecError, Result};
pub use crate::exec::{Command, Executor, PosixExecutor};
pub use crate::outcome::{Outcome, Output};
pub use crate::status::{Platform, WaitStatus};
pub use crate::types::{DrainStrategy, LogLevel, StderrMode};

/// Run `command` with the full argument vector `arguments` (`arguments[0]`
/// is conventionally the program's base name) and wait for it.
///
/// stdout and stderr are captured separately; the child inherits the
/// environment, working directory and stdin.
pub fn execute<S: AsRef<str>>(command: &str, arguments: &[S]) -> Result<Outcome> {
    let command = Command::with_argv(command, arguments.iter().map(|a| a.as_ref()));
    exec::run(&command, &ExecConfig::default())
}

/// Like [`execute`], with an explicit command and configuration.
pub fn execute_with(command: &Command, config: &ExecConfig) -> Result<Outcome> {
    exec::run(command, config)
}

/// Start `command` with inherited stdio and return without waiting.
///
/// The exit status is never collected; the child may linger as a zombie
/// until the host exits or reaps it some other way.
pub fn execute_detached<S: AsRef<str>>(command: &str, arguments: &[S]) -> Result<()> {
    let command = Command::with_argv(command, arguments.iter().map(|a| a.as_ref()));
    exec::spawn_detached(&command)
}

/// [`execute_with`] on tokio's blocking pool, for async hosts.
///
/// A panic inside the blocking task is resumed here. If the runtime shuts
/// down before the task runs, the result is an [`ExecError::Io`].
pub async fn execute_async(command: Command, config: ExecConfig) -> Result<Outcome> {
    match tokio::task::spawn_blocking(move || exec::run(&command, &config)).await {
        Ok(result) => result,
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(err) => Err(ExecError::Io(io::Error::other(err))),
    }
}
