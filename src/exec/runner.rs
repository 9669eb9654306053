// src/exec/runner.rs

//! Spawn → drain → reap, in that order.

use std::io;
use std::os::fd::OwnedFd;

use tracing::debug;

use crate::config::ExecConfig;
use crate::errors::{ExecError, Result};
use crate::exec::command::Command;
use crate::exec::drainer::{Captured, drain_streams};
use crate::exec::spawner::{SpawnedChild, spawn};
use crate::outcome::Outcome;

/// Run `command` to completion and collect its outcome.
///
/// Output is drained to end-of-stream *before* waiting; waiting first
/// deadlocks as soon as the child writes more than one pipe buffer.
pub fn run(command: &Command, config: &ExecConfig) -> Result<Outcome> {
    let spawned = spawn(command, config.stderr_mode())?;
    let outcome = collect(spawned, |stdout, stderr| drain_streams(stdout, stderr, config))?;
    debug!(program = %command, %outcome, "child finished");
    Ok(outcome)
}

/// Drain the child's pipes with `drain`, then reap it.
///
/// The child is reaped on every path, including a failed drain.
fn collect<F>(spawned: SpawnedChild, drain: F) -> Result<Outcome>
where
    F: FnOnce(OwnedFd, Option<OwnedFd>) -> io::Result<Captured>,
{
    let SpawnedChild {
        child,
        stdout,
        stderr,
    } = spawned;

    let captured = match drain(stdout, stderr) {
        Ok(captured) => captured,
        Err(err) => {
            // Read ends are closed by now; still reap so no zombie is left.
            let pid = child.pid();
            if let Err(wait_err) = child.wait() {
                debug!(pid, error = %wait_err, "reaping after drain failure also failed");
            }
            return Err(ExecError::Io(err));
        }
    };

    let status = child.wait()?;
    Ok(Outcome::from_status(status, captured))
}
