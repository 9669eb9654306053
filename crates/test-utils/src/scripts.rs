//! Shell script fixtures written to a temporary directory.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pawnexec::Command;
use tempfile::TempDir;

/// An executable `/bin/sh` script that lives as long as this value.
pub struct Script {
    _dir: TempDir,
    path: PathBuf,
}

impl Script {
    /// Write `body` (without shebang) to an executable file named `name`.
    pub fn new(name: &str, body: &str) -> Result<Self> {
        let dir = tempfile::tempdir().context("creating script dir")?;
        let path = dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n"))
            .with_context(|| format!("writing script {:?}", path))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("chmod script {:?}", path))?;
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `sh <script>`; going through `sh` avoids `ETXTBSY` races with
    /// other tests spawning while the file was still open for writing.
    pub fn command(&self) -> Command {
        Command::new("sh").arg(self.path.to_str().expect("temp paths are UTF-8"))
    }
}

/// Body of a script that writes `lines` numbered lines of `width` bytes to
/// stdout and stderr, alternating, so both pipes fill up together.
pub fn interleaved_body(lines: usize, width: usize) -> String {
    format!(
        r#"pad=$(printf '%{width}s' '' | tr ' ' x)
i=0
while [ $i -lt {lines} ]; do
  echo "out $i $pad"
  echo "err $i $pad" >&2
  i=$((i+1))
done"#
    )
}

/// What [`interleaved_body`] writes to one stream (`tag` is "out" or "err").
pub fn interleaved_expected(tag: &str, lines: usize, width: usize) -> Vec<u8> {
    let pad = "x".repeat(width);
    let mut expected = String::new();
    for i in 0..lines {
        expected.push_str(&format!("{tag} {i} {pad}\n"));
    }
    expected.into_bytes()
}
