// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! Hosts talk to an [`Executor`] instead of calling the free functions
//! directly, which lets them swap in a fake in their own tests.
//!
//! - [`PosixExecutor`] is the production implementation: `posix_spawnp`,
//!   pipes and `waitpid`, configured by an [`ExecConfig`].
//! - `pawnexec-test-utils` ships a `FakeExecutor` that records commands and
//!   returns scripted outcomes without spawning anything.

use crate::config::ExecConfig;
use crate::errors::Result;
use crate::exec::command::Command;
use crate::exec::runner::run;
use crate::exec::spawner::spawn_detached;
use crate::outcome::Outcome;

/// Trait abstracting how commands are executed.
pub trait Executor: Send + Sync {
    /// Run to completion, capturing output.
    fn execute(&self, command: &Command) -> Result<Outcome>;

    /// Start and forget; stdio is inherited and the status is never observed.
    fn execute_detached(&self, command: &Command) -> Result<()>;
}

/// Real executor used in production.
#[derive(Debug, Clone, Default)]
pub struct PosixExecutor {
    config: ExecConfig,
}

impl PosixExecutor {
    pub fn new(config: ExecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }
}

impl Executor for PosixExecutor {
    fn execute(&self, command: &Command) -> Result<Outcome> {
        run(command, &self.config)
    }

    fn execute_detached(&self, command: &Command) -> Result<()> {
        spawn_detached(command)
    }
}
