// src/exec/reaper.rs

//! Waiting on a spawned child and decoding its status.

use tracing::trace;

use crate::errors::{ExecError, Result};
use crate::exec::posix;
use crate::status::{WaitStatus, decode_native};

/// A spawned, not yet reaped child process.
///
/// Waiting consumes the handle, so a pid is never waited on twice. Dropping
/// a handle without waiting leaves a zombie until the host exits.
#[derive(Debug)]
#[must_use = "a child that is never waited on becomes a zombie"]
pub struct ChildHandle {
    pid: libc::pid_t,
}

impl ChildHandle {
    pub(crate) fn from_raw(pid: libc::pid_t) -> Self {
        Self { pid }
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }

    /// Block until the child terminates and decode its status.
    pub fn wait(self) -> Result<WaitStatus> {
        let pid = self.pid;
        let raw = posix::waitpid(pid).map_err(|source| ExecError::Wait { pid, source })?;
        let status = decode_native(raw);
        trace!(pid, raw, ?status, "reaped child");
        Ok(status)
    }

    /// Give up ownership without reaping; the child runs on unobserved.
    pub(crate) fn detach(self) -> i32 {
        self.pid
    }
}

/// Blocking wait on `child`, decoded for the host platform.
pub fn wait_and_decode(child: ChildHandle) -> Result<WaitStatus> {
    child.wait()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waiting_on_a_pid_we_do_not_own_is_a_wait_error() {
        let handle = ChildHandle::from_raw(1);
        match handle.wait() {
            Err(ExecError::Wait { pid, source }) => {
                assert_eq!(pid, 1);
                assert_eq!(source.raw_os_error(), Some(libc::ECHILD));
            }
            other => panic!("expected Wait error, got {other:?}"),
        }
    }
}
