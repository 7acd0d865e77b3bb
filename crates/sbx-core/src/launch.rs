//! Spawn an external tool with its working directory pinned to a sandbox.

use std::path::Path;
use std::process::Command;

use crate::error::{Result, SbxError};
use crate::exec;

/// Run `program args…` inside `dir` with inherited stdio and return its
/// exit code verbatim. A non-zero exit is not an error here — the caller
/// propagates the code as its own.
pub fn launch(program: &str, args: &[String], dir: &Path) -> Result<i32> {
    exec::ensure_exe(program)?;

    let mut rendered = vec![exec::quote(program)];
    rendered.extend(args.iter().map(|a| exec::quote(a)));
    tracing::info!(cmd = %rendered.join(" "), cwd = %dir.display(), "launching");

    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .map_err(|e| SbxError::SpawnFailed {
            program: program.to_string(),
            source: e,
        })?;

    Ok(status.code().unwrap_or(1))
}
