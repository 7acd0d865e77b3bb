//! Resolution of ambient inputs (cwd, HOME, cache root) into the explicit
//! paths and URLs the core operations take. This is the only layer that
//! reads the environment.

use clap::Args;
use std::path::PathBuf;

use sbx_core::error::{Result, SbxError};
use sbx_core::{git, naming};

/// Flags shared by every `sbx` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CommonOpts {
    /// Where to put sandboxes
    #[arg(long, default_value = "~/wip")]
    pub base_dir: String,

    /// Remote name used for URL discovery
    #[arg(long, default_value = "origin")]
    pub remote: String,

    /// Override the remote URL (skips discovery)
    #[arg(long)]
    pub remote_url: Option<String>,

    /// Override the repo slug derived from the remote URL
    #[arg(long)]
    pub repo_slug: Option<String>,
}

/// The repository this invocation operates on.
#[derive(Debug, Clone)]
pub struct RepoContext {
    pub remote_url: String,
    pub repo_slug: String,
    pub base_dir: PathBuf,
}

/// Resolve the remote URL (explicit flag, else discovery from the enclosing
/// git repo), the repo slug, and the sandbox base directory.
pub fn resolve(common: &CommonOpts) -> Result<RepoContext> {
    let remote_url = match &common.remote_url {
        Some(url) => url.clone(),
        None => {
            let cwd = std::env::current_dir()?;
            let root = git::detect_repo_root(&cwd).ok_or(SbxError::NotInGitRepo)?;
            git::detect_remote_url(&root, &common.remote).ok_or_else(|| {
                SbxError::RemoteNotDetected {
                    remote: common.remote.clone(),
                }
            })?
        }
    };

    let repo_slug = common
        .repo_slug
        .clone()
        .unwrap_or_else(|| naming::slug_from_url(&remote_url));

    Ok(RepoContext {
        remote_url,
        repo_slug,
        base_dir: expand_path(&common.base_dir)?,
    })
}

/// Expand a leading `~` to the home directory. No canonicalization — the
/// path may not exist yet.
pub fn expand_path(p: &str) -> Result<PathBuf> {
    if p == "~" {
        return Ok(home_dir()?);
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }
    Ok(PathBuf::from(p))
}

/// `$XDG_CACHE_HOME`, else `~/.cache`.
pub fn default_cache_root() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        if !xdg.is_empty() {
            return Ok(PathBuf::from(xdg));
        }
    }
    Ok(home_dir()?.join(".cache"))
}

fn home_dir() -> Result<PathBuf> {
    home::home_dir().ok_or(SbxError::HomeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_remote_url_wins_over_discovery() {
        let common = CommonOpts {
            base_dir: "/tmp/wip".into(),
            remote: "origin".into(),
            remote_url: Some("git@github.com:org/repo.git".into()),
            repo_slug: None,
        };
        let ctx = resolve(&common).unwrap();
        assert_eq!(ctx.remote_url, "git@github.com:org/repo.git");
        assert_eq!(ctx.repo_slug, "repo");
        assert_eq!(ctx.base_dir, PathBuf::from("/tmp/wip"));
    }

    #[test]
    fn explicit_slug_overrides_derived() {
        let common = CommonOpts {
            base_dir: "/tmp/wip".into(),
            remote: "origin".into(),
            remote_url: Some("https://github.com/org/repo".into()),
            repo_slug: Some("custom".into()),
        };
        assert_eq!(resolve(&common).unwrap().repo_slug, "custom");
    }

    #[test]
    fn expand_path_handles_tilde() {
        let home = home::home_dir().unwrap();
        assert_eq!(expand_path("~").unwrap(), home);
        assert_eq!(expand_path("~/wip").unwrap(), home.join("wip"));
        assert_eq!(expand_path("/abs/path").unwrap(), PathBuf::from("/abs/path"));
        assert_eq!(expand_path("rel/path").unwrap(), PathBuf::from("rel/path"));
    }
}
