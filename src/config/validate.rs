// src/config/validate.rs

use crate::config::{ExecConfig, MAX_CHUNK_SIZE, RawExecConfig};
use crate::errors::{ConfigError, ConfigResult};

impl TryFrom<RawExecConfig> for ExecConfig {
    type Error = ConfigError;

    fn try_from(raw: RawExecConfig) -> Result<Self, Self::Error> {
        check_chunk_size(raw.chunk_size)?;
        Ok(ExecConfig::new_unchecked(raw.stderr, raw.drain, raw.chunk_size))
    }
}

/// A zero-sized read buffer would make every read look like end-of-stream.
pub(crate) fn check_chunk_size(chunk_size: usize) -> ConfigResult<()> {
    if chunk_size == 0 {
        return Err(ConfigError::Invalid(
            "chunk_size must be >= 1 (got 0)".to_string(),
        ));
    }
    if chunk_size > MAX_CHUNK_SIZE {
        return Err(ConfigError::Invalid(format!(
            "chunk_size must be <= {MAX_CHUNK_SIZE} (got {chunk_size})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DrainStrategy, StderrMode};

    #[test]
    fn zero_chunk_size_is_rejected() {
        let raw = RawExecConfig {
            chunk_size: 0,
            ..RawExecConfig::default()
        };
        match ExecConfig::try_from(raw) {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("chunk_size")),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn oversized_chunk_size_is_rejected() {
        assert!(check_chunk_size(MAX_CHUNK_SIZE + 1).is_err());
        assert!(check_chunk_size(MAX_CHUNK_SIZE).is_ok());
    }

    #[test]
    fn valid_raw_config_carries_over() {
        let raw = RawExecConfig {
            stderr: StderrMode::Merge,
            drain: DrainStrategy::Poll,
            chunk_size: 512,
        };
        let cfg = ExecConfig::try_from(raw).unwrap();
        assert_eq!(cfg.stderr_mode(), StderrMode::Merge);
        assert_eq!(cfg.drain_strategy(), DrainStrategy::Poll);
        assert_eq!(cfg.chunk_size(), 512);
    }
}
