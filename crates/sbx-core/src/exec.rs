//! Synchronous subprocess invocation for `git` and `gh`.
//!
//! Every operation in this crate is a sequential chain of blocking external
//! commands. Two flavors cover all call sites:
//! - [`run`] captures both streams and returns trimmed stdout; a non-zero
//!   exit becomes [`SbxError::CommandFailed`] carrying the rendered command
//!   line, exit code, and both streams.
//! - [`run_streamed`] inherits stdout/stderr so long-running commands
//!   (clone, fetch, push) show progress in the terminal.
//!
//! No command is ever retried; network flakiness is surfaced, not hidden.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use crate::error::{Result, SbxError};

/// Fail fast when a required external tool is missing from PATH.
pub fn ensure_exe(name: &str) -> Result<()> {
    which::which(name)
        .map(|_| ())
        .map_err(|_| SbxError::ExeNotFound(name.to_string()))
}

/// Minimal quoting for readable error messages, not for shell evaluation.
pub fn quote(s: &str) -> String {
    let bare = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "_./:=+-".contains(c));
    if bare {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

fn render(program: &str, args: &[OsString]) -> String {
    let mut parts = vec![quote(program)];
    parts.extend(args.iter().map(|a| quote(&a.to_string_lossy())));
    parts.join(" ")
}

/// Run a command, capture both streams, and return trimmed stdout.
pub fn run<I, S>(program: &str, args: I, cwd: Option<&Path>) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
    let rendered = render(program, &args);
    tracing::debug!(cmd = %rendered, "running");

    let mut cmd = Command::new(program);
    cmd.args(&args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let output = cmd.output().map_err(|e| SbxError::SpawnFailed {
        program: program.to_string(),
        source: e,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !output.status.success() {
        return Err(SbxError::CommandFailed {
            cmd: rendered,
            code: output.status.code().unwrap_or(-1),
            stdout,
            stderr,
        });
    }
    Ok(stdout)
}

/// Run a command with stdout/stderr flowing through to the terminal.
pub fn run_streamed<I, S>(program: &str, args: I, cwd: Option<&Path>) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
    let rendered = render(program, &args);
    tracing::debug!(cmd = %rendered, "running (streamed)");

    let mut cmd = Command::new(program);
    cmd.args(&args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let status = cmd.status().map_err(|e| SbxError::SpawnFailed {
        program: program.to_string(),
        source: e,
    })?;

    if !status.success() {
        return Err(SbxError::CommandFailed {
            cmd: rendered,
            code: status.code().unwrap_or(-1),
            stdout: String::new(),
            stderr: String::new(),
        });
    }
    Ok(())
}
