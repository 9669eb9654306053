use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pawnexec::errors::Result;
use pawnexec::{Command, Executor, Outcome, Output};
use tracing::debug;

/// A fake executor that:
/// - records every command it was asked to run
/// - replies with scripted outcomes in order, then `Exited(0)` with no output.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    executed: Arc<Mutex<Vec<Command>>>,
    detached: Arc<Mutex<Vec<Command>>>,
    replies: Arc<Mutex<VecDeque<Outcome>>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome returned by the next `execute` call.
    pub fn reply(self, outcome: Outcome) -> Self {
        self.replies.lock().unwrap().push_back(outcome);
        self
    }

    /// Queue a normal exit with the given code and output.
    pub fn reply_exit(self, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.reply(Outcome::Exited(Output {
            exit_code,
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }))
    }

    pub fn executed(&self) -> Vec<Command> {
        self.executed.lock().unwrap().clone()
    }

    pub fn detached(&self) -> Vec<Command> {
        self.detached.lock().unwrap().clone()
    }
}

impl Executor for FakeExecutor {
    fn execute(&self, command: &Command) -> Result<Outcome> {
        debug!(command = %command, "FakeExecutor: execute");
        self.executed.lock().unwrap().push(command.clone());

        let outcome = self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Outcome::Exited(Output {
                exit_code: 0,
                stdout: Vec::new(),
                stderr: Vec::new(),
            })
        });
        Ok(outcome)
    }

    fn execute_detached(&self, command: &Command) -> Result<()> {
        debug!(command = %command, "FakeExecutor: execute_detached");
        self.detached.lock().unwrap().push(command.clone());
        Ok(())
    }
}
