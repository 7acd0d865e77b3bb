//! Thin typed wrappers over the git subcommands the lifecycle needs.
//!
//! Probe functions (`ref_exists`, `rev_parse_ok`, `upstream_ref`,
//! `detect_*`) swallow command failures and answer with `bool`/`Option`;
//! everything else propagates [`crate::error::SbxError::CommandFailed`].

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::exec;

pub fn detect_repo_root(cwd: &Path) -> Option<PathBuf> {
    exec::run("git", ["rev-parse", "--show-toplevel"], Some(cwd))
        .ok()
        .map(PathBuf::from)
}

pub fn detect_remote_url(dir: &Path, remote: &str) -> Option<String> {
    exec::run("git", ["remote", "get-url", remote], Some(dir)).ok()
}

pub fn remote_get_url(dir: &Path, remote: &str) -> Result<String> {
    exec::run("git", ["remote", "get-url", remote], Some(dir))
}

pub fn remote_set_url(dir: &Path, remote: &str, url: &str) -> Result<()> {
    exec::run("git", ["remote", "set-url", remote, url], Some(dir)).map(|_| ())
}

pub fn current_branch(dir: &Path) -> Result<String> {
    exec::run("git", ["branch", "--show-current"], Some(dir))
}

pub fn is_dirty(dir: &Path) -> Result<bool> {
    let out = exec::run("git", ["status", "--porcelain"], Some(dir))?;
    Ok(!out.is_empty())
}

pub fn clone_bare(url: &str, dest: &Path) -> Result<()> {
    let args: Vec<&OsStr> = vec![
        OsStr::new("clone"),
        OsStr::new("--bare"),
        OsStr::new(url),
        dest.as_os_str(),
    ];
    exec::run_streamed("git", args, None)
}

/// Clone a working copy from a local path (the bare mirror).
pub fn clone_local(src: &Path, dest: &Path) -> Result<()> {
    let args: Vec<&OsStr> = vec![OsStr::new("clone"), src.as_os_str(), dest.as_os_str()];
    exec::run_streamed("git", args, None)
}

pub fn fetch_prune(dir: &Path, remote: &str) -> Result<()> {
    exec::run_streamed("git", ["fetch", "--prune", remote], Some(dir))
}

/// True when `refname` (a full ref, e.g. `refs/heads/x`) exists.
pub fn ref_exists(dir: &Path, refname: &str) -> bool {
    exec::run("git", ["show-ref", "--verify", refname], Some(dir)).is_ok()
}

/// True when `rev` resolves (e.g. `origin/main`).
pub fn rev_parse_ok(dir: &Path, rev: &str) -> bool {
    exec::run("git", ["rev-parse", "--verify", rev], Some(dir)).is_ok()
}

/// The upstream tracking ref of the current branch, if configured.
pub fn upstream_ref(dir: &Path) -> Option<String> {
    exec::run(
        "git",
        ["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{upstream}"],
        Some(dir),
    )
    .ok()
}

pub fn switch(dir: &Path, branch: &str) -> Result<()> {
    exec::run_streamed("git", ["switch", branch], Some(dir))
}

pub fn switch_create(dir: &Path, branch: &str, start_ref: &str) -> Result<()> {
    exec::run_streamed("git", ["switch", "-c", branch, start_ref], Some(dir))
}

pub fn set_upstream(dir: &Path, branch: &str) -> Result<()> {
    exec::run_streamed(
        "git",
        ["branch", "--set-upstream-to", &format!("origin/{branch}"), branch],
        Some(dir),
    )
}

pub fn push_upstream(dir: &Path, remote: &str, branch: &str) -> Result<()> {
    exec::run_streamed("git", ["push", "-u", remote, branch], Some(dir))
}

// --- bare-repository variants (operate via --git-dir, no working tree) ----

pub fn bare_remote_url(bare_dir: &Path, remote: &str) -> Option<String> {
    exec::run(
        "git",
        bare_args(bare_dir, &["remote", "get-url", remote]),
        None,
    )
    .ok()
}

pub fn bare_remote_set_url(bare_dir: &Path, remote: &str, url: &str) -> Result<()> {
    exec::run(
        "git",
        bare_args(bare_dir, &["remote", "set-url", remote, url]),
        None,
    )
    .map(|_| ())
}

pub fn bare_remote_add(bare_dir: &Path, remote: &str, url: &str) -> Result<()> {
    exec::run(
        "git",
        bare_args(bare_dir, &["remote", "add", remote, url]),
        None,
    )
    .map(|_| ())
}

pub fn bare_fetch_prune(bare_dir: &Path, remote: &str) -> Result<()> {
    exec::run_streamed("git", bare_args(bare_dir, &["fetch", "--prune", remote]), None)
}

fn bare_args<'a>(bare_dir: &'a Path, rest: &'a [&'a str]) -> Vec<&'a OsStr> {
    let mut args: Vec<&OsStr> = vec![OsStr::new("--git-dir"), bare_dir.as_os_str()];
    args.extend(rest.iter().map(OsStr::new));
    args
}

// --- bootstrap helpers -----------------------------------------------------

pub fn init(dir: &Path) -> Result<()> {
    exec::run("git", ["init"], Some(dir)).map(|_| ())
}

pub fn add_all(dir: &Path) -> Result<()> {
    exec::run("git", ["add", "-A"], Some(dir)).map(|_| ())
}

pub fn commit(dir: &Path, message: &str) -> Result<()> {
    exec::run("git", ["commit", "-m", message], Some(dir)).map(|_| ())
}

pub fn head_exists(dir: &Path) -> bool {
    rev_parse_ok(dir, "HEAD")
}

pub fn head_branch(dir: &Path) -> Result<String> {
    exec::run("git", ["rev-parse", "--abbrev-ref", "HEAD"], Some(dir))
}

/// Read a config value, falling back to the global scope.
pub fn config_value(dir: &Path, key: &str) -> Option<String> {
    exec::run("git", ["config", "--get", key], Some(dir))
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| {
            exec::run("git", ["config", "--global", "--get", key], Some(dir))
                .ok()
                .filter(|v| !v.is_empty())
        })
}
