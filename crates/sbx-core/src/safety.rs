//! Protected-branch gate.
//!
//! The predicate runs in this process; the generated hooks duplicate it
//! inside the sandbox's own git execution environment, so direct git
//! invocations by a human or the launched tool are blocked too.

use std::path::Path;

use crate::error::{Result, SbxError};
use crate::{git, io};

/// Branch names on which commit/push/run are refused. Exact match,
/// case-sensitive, not configurable.
pub const PROTECTED_BRANCHES: [&str; 2] = ["main", "master"];

pub fn is_protected(branch: &str) -> bool {
    PROTECTED_BRANCHES.contains(&branch)
}

/// Error out when the sandbox's current branch is protected and no override
/// was given. The sandbox directory is never rolled back on violation.
pub fn ensure_branch_safe(dir: &Path, allow_protected: bool) -> Result<()> {
    let branch = git::current_branch(dir)?;
    if is_protected(&branch) && !allow_protected {
        return Err(SbxError::ProtectedBranch(branch));
    }
    Ok(())
}

const HOOK_PRE_COMMIT: &str = r#"#!/usr/bin/env bash
set -euo pipefail
b="$(git branch --show-current 2>/dev/null || true)"
if [[ "$b" == "main" || "$b" == "master" ]]; then
  echo "Refusing commit on $b. Create a feature branch." >&2
  exit 1
fi
"#;

const HOOK_PRE_PUSH: &str = r#"#!/usr/bin/env bash
set -euo pipefail
b="$(git branch --show-current 2>/dev/null || true)"
if [[ "$b" == "main" || "$b" == "master" ]]; then
  echo "Refusing push from $b. Use a PR." >&2
  exit 1
fi
"#;

/// Write pre-commit and pre-push hooks into `dir/.git/hooks`, mode 0755.
/// Overwrites any existing hook of the same name.
pub fn install_safety_hooks(dir: &Path) -> Result<()> {
    let hooks_dir = dir.join(".git").join("hooks");
    io::ensure_dir(&hooks_dir)?;

    for (name, content) in [("pre-commit", HOOK_PRE_COMMIT), ("pre-push", HOOK_PRE_PUSH)] {
        let path = hooks_dir.join(name);
        io::atomic_write(&path, content.as_bytes())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        }
    }
    Ok(())
}
