// src/exec/spawner.rs

//! Creating the child with `posix_spawnp`.
//!
//! The descriptor plumbing is declared up front as file actions and applied
//! by the OS between fork and exec, so nothing from the (possibly
//! multi-threaded) host runs in the child.

use std::io;
use std::os::fd::{AsRawFd, OwnedFd};

use tracing::debug;

use crate::errors::{ExecError, Result};
use crate::exec::command::Command;
use crate::exec::posix::{self, CStringArray, FileActions, Pipe, SpawnAttr};
use crate::exec::reaper::ChildHandle;
use crate::types::StderrMode;

/// A freshly spawned child and the parent's read ends of its output pipes.
///
/// The write ends are already closed in the parent. `stderr` is `None` when
/// stderr was merged into the stdout pipe.
#[derive(Debug)]
pub struct SpawnedChild {
    pub child: ChildHandle,
    pub stdout: OwnedFd,
    pub stderr: Option<OwnedFd>,
}

/// Spawn `command` with stdout (and, unless merged, stderr) redirected into
/// private pipes.
pub fn spawn(command: &Command, stderr_mode: StderrMode) -> Result<SpawnedChild> {
    let fail = |source: io::Error| ExecError::spawn(command.program(), source);

    let program = command.c_program().map_err(fail)?;
    let argv = CStringArray::new(command.c_argv().map_err(fail)?);
    let envp = posix::current_environ();

    let stdout = Pipe::new().map_err(fail)?;
    let stderr = match stderr_mode {
        StderrMode::Separate => Some(Pipe::new().map_err(fail)?),
        StderrMode::Merge => None,
    };

    let mut actions = FileActions::new().map_err(fail)?;
    redirect_output(&mut actions, &stdout, stderr.as_ref()).map_err(fail)?;
    let attr = SpawnAttr::with_default_signals().map_err(fail)?;

    let pid = posix::spawnp(&program, &actions, &attr, &argv, &envp).map_err(fail)?;

    // The parent's copies of the write ends must go, or the readers never
    // see end-of-stream.
    let Pipe {
        read: stdout_read,
        write: stdout_write,
    } = stdout;
    drop(stdout_write);
    let stderr_read = stderr.map(|Pipe { read, write }| {
        drop(write);
        read
    });

    debug!(pid, program = %command, ?stderr_mode, "spawned child");

    Ok(SpawnedChild {
        child: ChildHandle::from_raw(pid),
        stdout: stdout_read,
        stderr: stderr_read,
    })
}

/// Spawn `command` with inherited stdio and never wait on it.
pub fn spawn_detached(command: &Command) -> Result<()> {
    let fail = |source: io::Error| ExecError::spawn(command.program(), source);

    let program = command.c_program().map_err(fail)?;
    let argv = CStringArray::new(command.c_argv().map_err(fail)?);
    let envp = posix::current_environ();
    let mut actions = FileActions::new().map_err(fail)?;
    for fd in [libc::STDIN_FILENO, libc::STDOUT_FILENO, libc::STDERR_FILENO] {
        actions.add_inherit(fd).map_err(fail)?;
    }
    let attr = SpawnAttr::with_default_signals().map_err(fail)?;

    let pid = posix::spawnp(&program, &actions, &attr, &argv, &envp).map_err(fail)?;
    let pid = ChildHandle::from_raw(pid).detach();

    debug!(pid, program = %command, "spawned detached child");
    Ok(())
}

/// fd 0 inherited, fd 1 ← stdout pipe, fd 2 ← stderr pipe (or the stdout
/// pipe when merged), then close the original pipe descriptors in the child.
fn redirect_output(
    actions: &mut FileActions,
    stdout: &Pipe,
    stderr: Option<&Pipe>,
) -> io::Result<()> {
    let stdout_write = stdout.write.as_raw_fd();
    let stderr_write = stderr.map_or(stdout_write, |p| p.write.as_raw_fd());

    actions.add_inherit(libc::STDIN_FILENO)?;
    actions.add_dup2(stdout_write, libc::STDOUT_FILENO)?;
    actions.add_dup2(stderr_write, libc::STDERR_FILENO)?;

    let originals = [Some(stdout), stderr]
        .into_iter()
        .flatten()
        .flat_map(|p| [p.read.as_raw_fd(), p.write.as_raw_fd()]);
    for fd in originals {
        // A pipe fd can only be <= 2 if the host closed its own stdio; the
        // dup2 above already replaced it in that case.
        if fd > libc::STDERR_FILENO {
            actions.add_close(fd)?;
        }
    }

    Ok(())
}
