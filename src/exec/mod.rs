// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually launching programs with
//! `posix_spawnp`, capturing their output through pipes and decoding how
//! they ended.
//!
//! - [`command`] holds the program and its argument vector.
//! - [`spawner`] creates the child with its stdout/stderr redirected.
//! - [`drainer`] reads both pipes to end-of-stream concurrently.
//! - [`reaper`] waits on the child and decodes its status.
//! - [`runner`] wires the three together in the only safe order.
//! - [`backend`] provides the `Executor` trait and the concrete
//!   `PosixExecutor`, which hosts can replace with a fake in tests.

pub mod backend;
pub mod command;
pub mod drainer;
pub mod reaper;
pub mod runner;
pub mod spawner;

mod posix;

pub use backend::{Executor, PosixExecutor};
pub use command::Command;
pub use drainer::{Captured, drain_all, drain_streams};
pub use reaper::{ChildHandle, wait_and_decode};
pub use runner::run;
pub use spawner::{SpawnedChild, spawn, spawn_detached};
