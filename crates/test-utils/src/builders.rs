#![allow(dead_code)]

//! Builders for synthetic `waitpid` status words.
//!
//! Both supported layouts agree on where these bits go; they differ only in
//! how the decoder extracts them, which is exactly what tests want to probe.

/// Low 7 bits marking a stopped child.
pub const STOPPED_MARK: i32 = 0o177;
/// Coredump flag.
pub const CORE_FLAG: i32 = 0o200;

/// Builder for raw status words.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusWord {
    raw: i32,
}

impl StatusWord {
    /// "exited with `code`".
    pub fn exited(code: u8) -> Self {
        Self {
            raw: i32::from(code) << 8,
        }
    }

    /// "terminated by `signal`", no core.
    pub fn signaled(signal: i32) -> Self {
        Self {
            raw: signal & 0o177,
        }
    }

    /// "stopped by `signal`".
    pub fn stopped(signal: i32) -> Self {
        Self {
            raw: (signal << 8) | STOPPED_MARK,
        }
    }

    /// Set the coredump flag.
    pub fn core_dumped(mut self) -> Self {
        self.raw |= CORE_FLAG;
        self
    }

    pub fn raw(self) -> i32 {
        self.raw
    }
}

impl From<StatusWord> for i32 {
    fn from(word: StatusWord) -> Self {
        word.raw
    }
}
