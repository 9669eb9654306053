// src/status.rs

//! Pure decoding of raw `waitpid` status words.
//!
//! The status word packs the termination reason into its low 7 bits, the
//! coredump flag into bit 7, and the exit code (or stop signal) into the
//! second byte. Linux and the BSD family (Darwin) agree on the low byte but
//! differ in how the second byte is extracted and in what counts as
//! "stopped", so the platform is an explicit input rather than a `cfg`.
//!
//! Decode order is fixed: exited, then stopped, then signaled/coredumped.
//! Anything that is neither exited nor stopped is treated as signaled.

/// Low 7 bits: 0 means exited, 0x7f means stopped, otherwise a signal.
const STATUS_MASK: i32 = 0o177;
/// Value of the low 7 bits for a stopped (or continued) child.
const STOPPED_MARK: i32 = 0o177;
/// Bit set when the terminated child dumped core.
const CORE_FLAG: i32 = 0o200;
/// `SIGCONT` on Darwin; a "stopped" word carrying it means continued.
const DARWIN_SIGCONT: i32 = 0x13;

/// Layout of the wait-status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// glibc / musl / bionic layout.
    Linux,
    /// Darwin and the other BSD-derived layouts.
    Darwin,
}

impl Platform {
    /// Layout of the platform this crate was compiled for.
    pub const fn current() -> Self {
        if cfg!(any(target_os = "linux", target_os = "android")) {
            Platform::Linux
        } else {
            Platform::Darwin
        }
    }

    fn exit_code(self, raw: i32) -> u8 {
        let code = match self {
            Platform::Linux => (raw & 0xff00) >> 8,
            Platform::Darwin => (raw >> 8) & 0xff,
        };
        code as u8
    }

    fn stop_signal(self, raw: i32) -> i32 {
        match self {
            Platform::Linux => (raw & 0xff00) >> 8,
            Platform::Darwin => raw >> 8,
        }
    }

    fn is_exited(self, raw: i32) -> bool {
        raw & STATUS_MASK == 0
    }

    fn is_stopped(self, raw: i32) -> bool {
        match self {
            Platform::Linux => raw & 0xff == STOPPED_MARK,
            Platform::Darwin => {
                raw & STATUS_MASK == STOPPED_MARK && self.stop_signal(raw) != DARWIN_SIGCONT
            }
        }
    }
}

/// What a raw wait-status word says happened to the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitStatus {
    /// Exited normally with this 8-bit code.
    Exited(u8),
    /// Suspended by this signal; not terminated.
    Stopped(i32),
    /// Killed by this uncaught signal.
    Signaled(i32),
    /// Killed by this signal and a core image was written.
    Coredumped(i32),
}

impl WaitStatus {
    /// `true` only for `Exited(0)`.
    pub fn success(self) -> bool {
        self == WaitStatus::Exited(0)
    }
}

/// Decode `raw` according to `platform`'s status layout.
///
/// A "continued" word (Darwin `0x137f`, Linux `0xffff`) only appears when
/// `WCONTINUED` is requested, which this crate never does. Such a word falls
/// through to a termination by signal `0x7f`.
pub fn decode(raw: i32, platform: Platform) -> WaitStatus {
    if platform.is_exited(raw) {
        return WaitStatus::Exited(platform.exit_code(raw));
    }
    if platform.is_stopped(raw) {
        return WaitStatus::Stopped(platform.stop_signal(raw));
    }

    let signal = raw & STATUS_MASK;
    if raw & CORE_FLAG != 0 {
        WaitStatus::Coredumped(signal)
    } else {
        WaitStatus::Signaled(signal)
    }
}

/// [`decode`] for the platform this crate was compiled for.
pub fn decode_native(raw: i32) -> WaitStatus {
    decode(raw, Platform::current())
}
