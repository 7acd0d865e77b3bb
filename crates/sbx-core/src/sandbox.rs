//! Sandbox lifecycle: create, locate, list, status, remove.
//!
//! A sandbox moves through `absent → cloned → branched → hooked → ready`;
//! `removed` is reached only by an explicit [`remove`]. Every operation
//! takes its inputs explicitly (base dir, mirror path, URL) — nothing here
//! reads the environment or the current working directory.

use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, SbxError};
use crate::meta::{self, SandboxMetadata};
use crate::naming::{sandbox_dir, sanitize_token};
use crate::{git, io, mirror, safety};

/// Inputs for [`create`]. All paths and URLs are resolved by the caller.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub base_dir: PathBuf,
    /// Bare-mirror path for this repository (usually
    /// `{cache_root}/sbx-mirrors/{slug}.git`).
    pub mirror_dir: PathBuf,
    pub remote_url: String,
    pub repo_slug: String,
    pub task: String,
    /// Target branch; defaults to the sanitized task token.
    pub branch: Option<String>,
    pub base_branch: String,
    /// Copy `.env.example` to `.env` when the latter is absent.
    pub env_copy: bool,
    /// Reuse an existing sandbox directory in place instead of failing.
    pub force: bool,
    /// Permit ending up on a protected branch.
    pub allow_protected: bool,
}

/// Create (or with `force`, reuse) the sandbox and return its path.
///
/// On a safety-gate violation the directory is left on disk for inspection;
/// only the error is returned.
pub fn create(opts: &CreateOptions) -> Result<PathBuf> {
    mirror::ensure_bare_mirror(&opts.mirror_dir, &opts.remote_url)?;

    let dir = sandbox_dir(&opts.base_dir, &opts.repo_slug, &opts.task);
    if dir.exists() {
        if !opts.force {
            return Err(SbxError::SandboxExists(dir));
        }
        tracing::info!(dir = %dir.display(), "reusing existing sandbox");
    } else {
        io::ensure_dir(&opts.base_dir)?;
        git::clone_local(&opts.mirror_dir, &dir)?;
    }

    // Pushes must go to the real repository, not the mirror.
    git::remote_set_url(&dir, "origin", &opts.remote_url)?;
    git::fetch_prune(&dir, "origin")?;

    let start_ref = {
        let remote_ref = format!("origin/{}", opts.base_branch);
        if git::rev_parse_ok(&dir, &remote_ref) {
            remote_ref
        } else {
            opts.base_branch.clone()
        }
    };

    let branch = opts
        .branch
        .clone()
        .unwrap_or_else(|| sanitize_token(&opts.task));

    if git::ref_exists(&dir, &format!("refs/heads/{branch}")) {
        git::switch(&dir, &branch)?;
    } else {
        git::switch_create(&dir, &branch, &start_ref)?;
    }

    ensure_branch_upstream(&dir, &branch)?;

    safety::install_safety_hooks(&dir)?;

    if opts.env_copy {
        io::copy_if_missing(&dir.join(".env.example"), &dir.join(".env"))?;
    }

    meta::exclude_from_status(&dir)?;
    meta::write_meta(
        &dir,
        &SandboxMetadata {
            base_branch: opts.base_branch.clone(),
            branch: branch.clone(),
            created_at: Utc::now(),
            remote_url: opts.remote_url.clone(),
            repo_slug: opts.repo_slug.clone(),
            task: opts.task.clone(),
        },
    )?;

    safety::ensure_branch_safe(&dir, opts.allow_protected)?;

    Ok(dir)
}

/// Make `branch` track `origin/{branch}`: no-op when already tracking,
/// set-upstream when the remote branch exists, otherwise push it upstream.
fn ensure_branch_upstream(dir: &Path, branch: &str) -> Result<()> {
    let upstream = format!("origin/{branch}");
    if git::upstream_ref(dir).as_deref() == Some(upstream.as_str()) {
        return Ok(());
    }
    if git::ref_exists(dir, &format!("refs/remotes/origin/{branch}")) {
        git::set_upstream(dir, branch)
    } else {
        git::push_upstream(dir, "origin", branch)
    }
}

/// Pure path computation; no existence check, no I/O.
pub fn locate(base_dir: &Path, repo_slug: &str, task: &str) -> PathBuf {
    sandbox_dir(base_dir, repo_slug, task)
}

/// One row of [`list`] output. `None` in `branch`/`dirty` means the lookup
/// failed and is reported as unknown rather than aborting the listing.
#[derive(Debug, Clone, Serialize)]
pub struct SandboxEntry {
    pub dir: PathBuf,
    pub branch: Option<String>,
    pub dirty: Option<bool>,
    pub meta: Option<SandboxMetadata>,
}

/// Enumerate sandboxes of `repo_slug` under `base_dir`: immediate
/// subdirectories named `{slug}-*` that contain a `.git` entry.
pub fn list(base_dir: &Path, repo_slug: &str) -> Result<Vec<SandboxEntry>> {
    if !base_dir.exists() {
        return Ok(Vec::new());
    }

    let prefix = format!("{repo_slug}-");
    let mut dirs: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(base_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(&prefix) {
            continue;
        }
        if !path.join(".git").exists() {
            continue;
        }
        dirs.push(path);
    }
    dirs.sort();

    Ok(dirs
        .into_iter()
        .map(|dir| {
            let branch = git::current_branch(&dir).ok();
            let dirty = git::is_dirty(&dir).ok();
            let meta = meta::read_meta(&dir);
            SandboxEntry {
                dir,
                branch,
                dirty,
                meta,
            }
        })
        .collect())
}

#[derive(Debug, Clone, Serialize)]
pub struct SandboxStatus {
    pub dir: PathBuf,
    pub branch: String,
    pub dirty: bool,
    pub meta: Option<SandboxMetadata>,
}

/// Inspect an existing sandbox. Fails when absent; enforces the safety
/// gate before reporting.
pub fn status(dir: &Path, allow_protected: bool) -> Result<SandboxStatus> {
    if !dir.exists() {
        return Err(SbxError::SandboxNotFound(dir.to_path_buf()));
    }
    safety::ensure_branch_safe(dir, allow_protected)?;
    Ok(SandboxStatus {
        dir: dir.to_path_buf(),
        branch: git::current_branch(dir)?,
        dirty: git::is_dirty(dir)?,
        meta: meta::read_meta(dir),
    })
}

/// Delete the sandbox directory tree. Returns `false` when the sandbox did
/// not exist (a successful no-op). A dirty working tree is refused unless
/// `force`; a failed dirty-check is treated as unknown and does not block.
pub fn remove(dir: &Path, force: bool) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    if !force {
        if let Ok(true) = git::is_dirty(dir) {
            return Err(SbxError::DirtySandbox(dir.to_path_buf()));
        }
    }
    std::fs::remove_dir_all(dir)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{git as run_git, temp_repo};
    use tempfile::TempDir;

    struct Fixture {
        _remote: TempDir,
        _cache: TempDir,
        base: TempDir,
        opts: CreateOptions,
    }

    fn fixture(task: &str) -> Fixture {
        let remote = temp_repo();
        let cache = TempDir::new().unwrap();
        let base = TempDir::new().unwrap();
        let opts = CreateOptions {
            base_dir: base.path().to_path_buf(),
            mirror_dir: cache.path().join("repo.git"),
            remote_url: remote.path().to_string_lossy().into_owned(),
            repo_slug: "repo".to_string(),
            task: task.to_string(),
            branch: None,
            base_branch: "main".to_string(),
            env_copy: false,
            force: false,
            allow_protected: false,
        };
        Fixture {
            _remote: remote,
            _cache: cache,
            base,
            opts,
        }
    }

    #[test]
    fn create_builds_ready_sandbox_on_task_branch() {
        let fx = fixture("fix bug #1");
        let dir = create(&fx.opts).unwrap();

        assert_eq!(dir, fx.base.path().join("repo-fix-bug-1"));
        assert_eq!(git::current_branch(&dir).unwrap(), "fix-bug-1");
        assert_eq!(
            git::upstream_ref(&dir).as_deref(),
            Some("origin/fix-bug-1"),
            "new branch should track origin"
        );
        assert_eq!(
            git::remote_get_url(&dir, "origin").unwrap(),
            fx.opts.remote_url,
            "origin must point at the real remote, not the mirror"
        );
        assert!(dir.join(".git/hooks/pre-commit").exists());
        assert!(dir.join(".git/hooks/pre-push").exists());

        let meta = meta::read_meta(&dir).unwrap();
        assert_eq!(meta.task, "fix bug #1");
        assert_eq!(meta.branch, "fix-bug-1");
        assert_eq!(meta.base_branch, "main");
    }

    #[test]
    fn fresh_sandbox_is_clean_and_removable_without_force() {
        let fx = fixture("t1");
        let dir = create(&fx.opts).unwrap();

        // The metadata snapshot must not register as an untracked file.
        assert!(!git::is_dirty(&dir).unwrap(), "fresh sandbox reports dirty");
        assert!(remove(&dir, false).unwrap());
        assert!(!dir.exists());
    }

    #[test]
    fn duplicate_create_without_force_fails() {
        let fx = fixture("t1");
        create(&fx.opts).unwrap();
        let err = create(&fx.opts).unwrap_err();
        assert!(matches!(err, SbxError::SandboxExists(_)));
    }

    #[test]
    fn duplicate_create_with_force_reuses_in_place() {
        let fx = fixture("t1");
        let dir = create(&fx.opts).unwrap();
        std::fs::write(dir.join("scratch.txt"), "keep me").unwrap();

        let mut opts = fx.opts.clone();
        opts.force = true;
        let again = create(&opts).unwrap();
        assert_eq!(again, dir);
        assert!(dir.join("scratch.txt").exists(), "no re-clone on force");
    }

    #[test]
    fn explicit_branch_overrides_task_token() {
        let fx = fixture("some task");
        let mut opts = fx.opts.clone();
        opts.branch = Some("custom-branch".to_string());
        let dir = create(&opts).unwrap();
        assert_eq!(git::current_branch(&dir).unwrap(), "custom-branch");
    }

    #[test]
    fn create_on_protected_branch_fails_but_keeps_directory() {
        let fx = fixture("whatever");
        let mut opts = fx.opts.clone();
        opts.branch = Some("main".to_string());
        let err = create(&opts).unwrap_err();
        assert!(matches!(err, SbxError::ProtectedBranch(_)));

        let dir = locate(&opts.base_dir, &opts.repo_slug, &opts.task);
        assert!(dir.exists(), "sandbox is not rolled back");
    }

    #[test]
    fn create_on_protected_branch_allowed_with_override() {
        let fx = fixture("whatever");
        let mut opts = fx.opts.clone();
        opts.branch = Some("main".to_string());
        opts.allow_protected = true;
        create(&opts).unwrap();
    }

    #[test]
    fn env_copy_is_opt_in_and_never_overwrites() {
        let fx = fixture("env task");
        // Seed the remote with an .env.example so clones carry it.
        std::fs::write(fx._remote.path().join(".env.example"), "KEY=1").unwrap();
        run_git(fx._remote.path(), &["add", "."]);
        run_git(fx._remote.path(), &["commit", "-m", "add env example"]);

        let mut opts = fx.opts.clone();
        opts.env_copy = true;
        let dir = create(&opts).unwrap();
        assert_eq!(std::fs::read_to_string(dir.join(".env")).unwrap(), "KEY=1");
    }

    #[test]
    fn locate_is_pure() {
        let base = Path::new("/nonexistent/base");
        assert_eq!(
            locate(base, "repo", "some task"),
            PathBuf::from("/nonexistent/base/repo-some-task")
        );
    }

    #[test]
    fn list_matches_only_prefixed_git_dirs() {
        let fx = fixture("t1");
        create(&fx.opts).unwrap();
        // Unrelated directory and a prefixed-but-not-git directory.
        std::fs::create_dir(fx.base.path().join("other-project")).unwrap();
        std::fs::create_dir(fx.base.path().join("repo-not-a-clone")).unwrap();

        let entries = list(fx.base.path(), "repo").unwrap();
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.branch.as_deref(), Some("t1"));
        assert_eq!(e.dirty, Some(false));
        assert_eq!(e.meta.as_ref().unwrap().task, "t1");
    }

    #[test]
    fn list_on_missing_base_dir_is_empty() {
        let entries = list(Path::new("/nonexistent/base"), "repo").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn status_reports_branch_dirty_and_meta() {
        let fx = fixture("t1");
        let dir = create(&fx.opts).unwrap();

        let st = status(&dir, false).unwrap();
        assert_eq!(st.branch, "t1");
        assert!(!st.dirty);
        assert_eq!(st.meta.unwrap().task, "t1");

        std::fs::write(dir.join("wip.txt"), "x").unwrap();
        assert!(status(&dir, false).unwrap().dirty);
    }

    #[test]
    fn status_on_missing_sandbox_fails() {
        let err = status(Path::new("/nonexistent/sb"), false).unwrap_err();
        assert!(matches!(err, SbxError::SandboxNotFound(_)));
    }

    #[test]
    fn remove_clean_deletes_dirty_refuses_absent_noop() {
        let fx = fixture("t1");
        let dir = create(&fx.opts).unwrap();

        std::fs::write(dir.join("wip.txt"), "x").unwrap();
        let err = remove(&dir, false).unwrap_err();
        assert!(matches!(err, SbxError::DirtySandbox(_)));
        assert!(dir.exists());

        std::fs::remove_file(dir.join("wip.txt")).unwrap();
        assert!(remove(&dir, false).unwrap());
        assert!(!dir.exists());

        assert!(!remove(&dir, false).unwrap(), "absent remove is a no-op");
    }

    #[test]
    fn remove_force_deletes_dirty_sandbox() {
        let fx = fixture("t1");
        let dir = create(&fx.opts).unwrap();
        std::fs::write(dir.join("wip.txt"), "x").unwrap();
        assert!(remove(&dir, true).unwrap());
        assert!(!dir.exists());
    }

    #[test]
    fn recreate_after_push_switches_to_existing_remote_branch() {
        // First create pushes the task branch to the remote; a forced second
        // create must reuse it (set-upstream path, no second push needed).
        let fx = fixture("t1");
        create(&fx.opts).unwrap();

        let mut opts = fx.opts.clone();
        opts.force = true;
        let dir = create(&opts).unwrap();
        assert_eq!(git::upstream_ref(&dir).as_deref(), Some("origin/t1"));
    }
}
