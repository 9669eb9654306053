// src/outcome.rs

//! What happened to the child, as seen by the caller.

use std::fmt;

use crate::exec::drainer::Captured;
use crate::status::WaitStatus;

/// Exit code and captured output of a child that exited normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Output {
    #[inline]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    #[inline]
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    #[inline]
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Terminal result of one execution.
///
/// Only `Exited` carries output; a child that was stopped or killed is a
/// failure of the child, not of the executor, and its partial output is not
/// returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Exited(Output),
    /// Suspended by a signal. Job control is not supported, so this is final.
    Stopped { signal: i32 },
    Signaled { signal: i32 },
    Coredumped { signal: i32 },
}

impl Outcome {
    pub(crate) fn from_status(status: WaitStatus, captured: Captured) -> Self {
        match status {
            WaitStatus::Exited(code) => Outcome::Exited(Output {
                exit_code: i32::from(code),
                stdout: captured.stdout,
                stderr: captured.stderr,
            }),
            WaitStatus::Stopped(signal) => Outcome::Stopped { signal },
            WaitStatus::Signaled(signal) => Outcome::Signaled { signal },
            WaitStatus::Coredumped(signal) => Outcome::Coredumped { signal },
        }
    }

    /// Exited with code 0.
    pub fn success(&self) -> bool {
        matches!(self, Outcome::Exited(out) if out.success())
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.output().map(|out| out.exit_code)
    }

    /// The signal that stopped or killed the child, if any.
    pub fn signal(&self) -> Option<i32> {
        match self {
            Outcome::Exited(_) => None,
            Outcome::Stopped { signal }
            | Outcome::Signaled { signal }
            | Outcome::Coredumped { signal } => Some(*signal),
        }
    }

    pub fn output(&self) -> Option<&Output> {
        match self {
            Outcome::Exited(out) => Some(out),
            _ => None,
        }
    }

    pub fn into_output(self) -> Option<Output> {
        match self {
            Outcome::Exited(out) => Some(out),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Exited(out) => write!(f, "exited with code {}", out.exit_code),
            Outcome::Stopped { signal } => write!(f, "stopped by signal {signal}"),
            Outcome::Signaled { signal } => write!(f, "killed by signal {signal}"),
            Outcome::Coredumped { signal } => write!(f, "killed by signal {signal} (core dumped)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured() -> Captured {
        Captured {
            stdout: b"out".to_vec(),
            stderr: b"err".to_vec(),
        }
    }

    #[test]
    fn exited_keeps_output() {
        let outcome = Outcome::from_status(WaitStatus::Exited(3), captured());
        assert_eq!(outcome.exit_code(), Some(3));
        assert!(!outcome.success());
        let out = outcome.into_output().unwrap();
        assert_eq!(out.stdout_str(), "out");
        assert_eq!(out.stderr_str(), "err");
    }

    #[test]
    fn killed_child_has_no_output() {
        let outcome = Outcome::from_status(WaitStatus::Signaled(9), captured());
        assert_eq!(outcome, Outcome::Signaled { signal: 9 });
        assert_eq!(outcome.signal(), Some(9));
        assert!(outcome.output().is_none());
        assert_eq!(outcome.to_string(), "killed by signal 9");
    }

    #[test]
    fn coredump_and_stop_are_distinct() {
        let core = Outcome::from_status(WaitStatus::Coredumped(11), Captured::default());
        let stop = Outcome::from_status(WaitStatus::Stopped(19), Captured::default());
        assert_eq!(core.to_string(), "killed by signal 11 (core dumped)");
        assert_eq!(stop, Outcome::Stopped { signal: 19 });
        assert_eq!(core.exit_code(), None);
    }
}
