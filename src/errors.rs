// src/errors.rs

//! Crate-wide error types.
//!
//! [`ExecError`] covers the ways the execution primitive itself can fail.
//! A child that crashes or gets stopped is *not* an error here: that is
//! reported through [`crate::Outcome`], so callers can tell "could not run
//! the command" apart from "the command ran and died".

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    /// The OS refused to create the process (not found, permission denied,
    /// resource limits, interior NUL in the program or an argument).
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Reading one of the output pipes failed for a reason other than
    /// end-of-stream. Any partial output is discarded.
    #[error("reading child output failed: {0}")]
    Io(#[source] io::Error),

    /// `waitpid` failed on a pid that should still have been ours.
    #[error("waiting on child (pid {pid}) failed: {source}")]
    Wait {
        pid: i32,
        #[source]
        source: io::Error,
    },
}

impl ExecError {
    pub(crate) fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        ExecError::Spawn {
            program: program.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ExecError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
