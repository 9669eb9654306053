// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::{ExecConfig, RawExecConfig};
use crate::errors::ConfigResult;

/// Load and validate an execution config from a TOML file.
///
/// Missing keys fall back to their defaults; an empty file yields
/// `ExecConfig::default()`.
pub fn load_from_path(path: impl AsRef<Path>) -> ConfigResult<ExecConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    from_toml_str(&contents)
}

/// Parse and validate an execution config from TOML text.
///
/// Useful for hosts that embed the `[exec]`-style table in their own config
/// file and hand over just that fragment.
pub fn from_toml_str(contents: &str) -> ConfigResult<ExecConfig> {
    let raw: RawExecConfig = toml::from_str(contents)?;
    ExecConfig::try_from(raw)
}
