use std::str::FromStr;
use serde::Deserialize;

/// Where the child's stderr goes.
///
/// - `Separate`: stderr gets its own pipe and is captured independently
///   (default behaviour).
/// - `Merge`: the child's fd 2 is duplicated from the stdout pipe, so both
///   streams end up interleaved in `Output::stdout` and `Output::stderr` is
///   always empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StderrMode {
    Separate,
    Merge,
}

impl Default for StderrMode {
    fn default() -> Self {
        StderrMode::Separate
    }
}

impl FromStr for StderrMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "separate" => Ok(StderrMode::Separate),
            "merge" => Ok(StderrMode::Merge),
            other => Err(format!(
                "invalid stderr mode: {other} (expected \"separate\" or \"merge\")"
            )),
        }
    }
}

/// How the two read ends are serviced while the child runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrainStrategy {
    /// stderr on a scoped thread, stdout on the calling thread.
    Threads,
    /// A single `poll(2)` loop servicing whichever descriptor is ready.
    Poll,
}

impl Default for DrainStrategy {
    fn default() -> Self {
        DrainStrategy::Threads
    }
}

impl FromStr for DrainStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "threads" | "thread" => Ok(DrainStrategy::Threads),
            "poll" => Ok(DrainStrategy::Poll),
            other => Err(format!(
                "invalid drain strategy: {other} (expected \"threads\" or \"poll\")"
            )),
        }
    }
}

/// Log verbosity accepted by [`crate::logging::init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("invalid log level: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("MERGE".parse::<StderrMode>(), Ok(StderrMode::Merge));
        assert_eq!(" poll ".parse::<DrainStrategy>(), Ok(DrainStrategy::Poll));
        assert_eq!("Warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
    }

    #[test]
    fn rejects_unknown_values() {
        let err = "both".parse::<StderrMode>().unwrap_err();
        assert!(err.contains("both"));
        assert!("epoll".parse::<DrainStrategy>().is_err());
    }

    #[test]
    fn defaults_keep_streams_apart() {
        assert_eq!(StderrMode::default(), StderrMode::Separate);
        assert_eq!(DrainStrategy::default(), DrainStrategy::Threads);
    }
}
