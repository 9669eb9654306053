// src/config/mod.rs

//! Execution configuration.
//!
//! [`RawExecConfig`] is the shape deserialized from TOML; it becomes an
//! [`ExecConfig`] only through validation (see [`validate`]), so an
//! `ExecConfig` in hand always has a usable chunk size.
//!
//! ```toml
//! stderr = "merge"      # or "separate" (default)
//! drain = "poll"        # or "threads" (default)
//! chunk_size = 8192     # bytes per read(2), default 4096
//! ```

use serde::Deserialize;

use crate::errors::ConfigResult;
use crate::types::{DrainStrategy, StderrMode};

pub mod loader;
pub mod validate;

pub use loader::{from_toml_str, load_from_path};

/// Bytes requested per `read(2)` unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Upper bound accepted for `chunk_size`.
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Unvalidated configuration as it appears on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawExecConfig {
    pub stderr: StderrMode,
    pub drain: DrainStrategy,
    pub chunk_size: usize,
}

impl Default for RawExecConfig {
    fn default() -> Self {
        Self {
            stderr: StderrMode::default(),
            drain: DrainStrategy::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Validated configuration consumed by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecConfig {
    stderr: StderrMode,
    drain: DrainStrategy,
    chunk_size: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self::new_unchecked(StderrMode::default(), DrainStrategy::default(), DEFAULT_CHUNK_SIZE)
    }
}

impl ExecConfig {
    pub(crate) fn new_unchecked(stderr: StderrMode, drain: DrainStrategy, chunk_size: usize) -> Self {
        Self {
            stderr,
            drain,
            chunk_size,
        }
    }

    pub fn stderr_mode(&self) -> StderrMode {
        self.stderr
    }

    pub fn drain_strategy(&self) -> DrainStrategy {
        self.drain
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn with_stderr_mode(mut self, mode: StderrMode) -> Self {
        self.stderr = mode;
        self
    }

    pub fn with_drain_strategy(mut self, drain: DrainStrategy) -> Self {
        self.drain = drain;
        self
    }

    /// Change the read chunk size; rejects values outside `1..=MAX_CHUNK_SIZE`.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> ConfigResult<Self> {
        validate::check_chunk_size(chunk_size)?;
        self.chunk_size = chunk_size;
        Ok(self)
    }
}
