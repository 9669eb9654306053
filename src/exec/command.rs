// src/exec/command.rs

//! The program to run and its full argument vector.

use std::ffi::CString;
use std::fmt;
use std::io;

/// An executable plus its complete `argv`, including `argv[0]`.
///
/// `program` is resolved through `PATH` at spawn time. `argv[0]` is
/// conventionally the program's base name; [`Command::new`] fills it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    program: String,
    argv: Vec<String>,
}

impl Command {
    /// Start a command whose `argv[0]` is the base name of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        let argv0 = base_name(&program).to_string();
        Self {
            program,
            argv: vec![argv0],
        }
    }

    /// Build a command from an explicit argument vector.
    ///
    /// `argv` must already contain `argv[0]`. An empty `argv` gets the base
    /// name of `program` so the child never sees `argc == 0`.
    pub fn with_argv<I, S>(program: impl Into<String>, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let program = program.into();
        let mut argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            argv.push(base_name(&program).to_string());
        }
        Self { program, argv }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.argv.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument vector, `argv[0]` included.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub(crate) fn c_program(&self) -> io::Result<CString> {
        to_cstring(&self.program)
    }

    pub(crate) fn c_argv(&self) -> io::Result<Vec<CString>> {
        self.argv.iter().map(|a| to_cstring(a)).collect()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in self.argv.iter().skip(1) {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

fn base_name(program: &str) -> &str {
    program.rsplit('/').next().unwrap_or(program)
}

fn to_cstring(s: &str) -> io::Result<CString> {
    CString::new(s).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("interior NUL byte in {s:?}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_base_name_as_argv0() {
        let cmd = Command::new("/usr/bin/git").arg("status");
        assert_eq!(cmd.program(), "/usr/bin/git");
        assert_eq!(cmd.argv(), ["git", "status"]);
    }

    #[test]
    fn with_argv_keeps_explicit_argv0() {
        let cmd = Command::with_argv("sh", ["login-sh", "-c", "true"]);
        assert_eq!(cmd.argv(), ["login-sh", "-c", "true"]);
    }

    #[test]
    fn empty_argv_gets_base_name() {
        let cmd = Command::with_argv("/bin/true", Vec::<String>::new());
        assert_eq!(cmd.argv(), ["true"]);
    }

    #[test]
    fn interior_nul_is_invalid_input() {
        let cmd = Command::new("echo").arg("a\0b");
        let err = cmd.c_argv().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(Command::new("ec\0ho").c_program().is_err());
    }

    #[test]
    fn display_skips_argv0() {
        let cmd = Command::with_argv("/bin/echo", ["echo", "hello", "world"]);
        assert_eq!(cmd.to_string(), "/bin/echo hello world");
    }
}
