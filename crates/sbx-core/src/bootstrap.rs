//! GitHub repository bootstrap: create a repo via `gh` and a matching local
//! project directory with optional README/.gitignore/LICENSE content.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{Result, SbxError};
use crate::{exec, git, io};

static REPO_NAME_RE: OnceLock<Regex> = OnceLock::new();
static OWNER_RE: OnceLock<Regex> = OnceLock::new();
static REMOTE_RE: OnceLock<Regex> = OnceLock::new();

fn repo_name_re() -> &'static Regex {
    REPO_NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,99}$").unwrap())
}

fn owner_re() -> &'static Regex {
    OWNER_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,37}[A-Za-z0-9])?$").unwrap())
}

fn remote_re() -> &'static Regex {
    REMOTE_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap())
}

pub fn validate_repo_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.contains('/')
        || trimmed.contains('\\')
        || !repo_name_re().is_match(trimmed)
    {
        return Err(SbxError::InvalidRepoName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn validate_owner(owner: &str) -> Result<String> {
    let trimmed = owner.trim();
    if trimmed.is_empty() || !owner_re().is_match(trimmed) {
        return Err(SbxError::InvalidOwner(owner.to_string()));
    }
    Ok(trimmed.to_string())
}

pub fn validate_remote(remote: &str) -> Result<String> {
    let trimmed = remote.trim();
    if trimmed.is_empty() || !remote_re().is_match(trimmed) {
        return Err(SbxError::InvalidRemoteName(remote.to_string()));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    fn as_flag(self) -> &'static str {
        match self {
            Visibility::Public => "--public",
            Visibility::Private => "--private",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    pub name: String,
    pub visibility: Visibility,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub projects_dir: PathBuf,
    pub remote: String,
    pub gitignore: Option<String>,
    pub license: Option<String>,
    pub readme: bool,
    pub commit_message: String,
    pub overwrite_files: bool,
}

#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub dir: PathBuf,
    pub remote_url: String,
    pub branch: String,
}

/// End-to-end bootstrap. Validates inputs, provisions the local directory,
/// writes templated files, makes the initial commit, creates the GitHub
/// repository, and pushes.
pub fn run(opts: &BootstrapOptions) -> Result<BootstrapReport> {
    let name = validate_repo_name(&opts.name)?;
    let remote = validate_remote(&opts.remote)?;
    let owner = opts.owner.as_deref().map(validate_owner).transpose()?;

    exec::ensure_exe("git")?;
    exec::ensure_exe("gh")?;
    ensure_gh_auth()?;

    let repo_dir = provision_repo_dir(&opts.projects_dir, &name)?;

    let repo_ref = match &owner {
        Some(o) => format!("{o}/{name}"),
        None => name.clone(),
    };
    if exec::run("gh", ["repo", "view", &repo_ref], None).is_ok() {
        return Err(SbxError::RepoAlreadyExists(repo_ref));
    }

    if !repo_dir.join(".git").exists() {
        git::init(&repo_dir)?;
    }

    if opts.readme {
        write_file(
            &repo_dir.join("README.md"),
            &format!("# {name}\n"),
            opts.overwrite_files,
        )?;
    }
    if let Some(template) = &opts.gitignore {
        let content = fetch_gitignore(template)?;
        write_file(&repo_dir.join(".gitignore"), &content, opts.overwrite_files)?;
    }
    if let Some(key) = &opts.license {
        let content = fetch_license(key)?;
        write_file(&repo_dir.join("LICENSE"), &content, opts.overwrite_files)?;
    }

    ensure_git_identity(&repo_dir)?;

    if git::is_dirty(&repo_dir)? {
        git::add_all(&repo_dir)?;
        git::commit(&repo_dir, &opts.commit_message)?;
    } else if !git::head_exists(&repo_dir) {
        return Err(SbxError::NothingToCommit);
    }

    if git::detect_remote_url(&repo_dir, &remote).is_some() {
        return Err(SbxError::RemoteAlreadyExists(remote));
    }

    let mut gh_args: Vec<String> = vec![
        "repo".into(),
        "create".into(),
        repo_ref,
        opts.visibility.as_flag().into(),
        "--source".into(),
        repo_dir.to_string_lossy().into_owned(),
        "--remote".into(),
        remote.clone(),
        "--push".into(),
    ];
    if let Some(desc) = &opts.description {
        gh_args.push("--description".into());
        gh_args.push(desc.clone());
    }
    exec::run_streamed("gh", gh_args, None)?;

    if git::upstream_ref(&repo_dir).is_none() {
        git::push_upstream(&repo_dir, &remote, "HEAD")?;
    }

    Ok(BootstrapReport {
        remote_url: git::remote_get_url(&repo_dir, &remote)?,
        branch: git::head_branch(&repo_dir)?,
        dir: repo_dir,
    })
}

fn ensure_gh_auth() -> Result<()> {
    match exec::run("gh", ["auth", "status", "-h", "github.com"], None) {
        Ok(_) => Ok(()),
        Err(SbxError::CommandFailed { stdout, stderr, .. }) => {
            let detail = if stderr.is_empty() { stdout } else { stderr };
            Err(SbxError::GhNotAuthenticated(detail))
        }
        Err(e) => Err(e),
    }
}

/// Resolve and create `projects_dir/name`, refusing a non-empty or
/// non-directory target and any path escaping the projects directory.
pub fn provision_repo_dir(projects_dir: &Path, name: &str) -> Result<PathBuf> {
    io::ensure_dir(projects_dir)?;
    if !projects_dir.is_dir() {
        return Err(SbxError::NotADirectory(projects_dir.to_path_buf()));
    }
    let projects_dir = projects_dir.canonicalize()?;
    let repo_dir = projects_dir.join(name);

    if repo_dir.parent() != Some(projects_dir.as_path()) {
        return Err(SbxError::PathEscape {
            parent: projects_dir,
            path: repo_dir,
        });
    }

    if repo_dir.exists() {
        if !repo_dir.is_dir() {
            return Err(SbxError::NotADirectory(repo_dir));
        }
        if std::fs::read_dir(&repo_dir)?.next().is_some() {
            return Err(SbxError::TargetNotEmpty(repo_dir));
        }
    } else {
        std::fs::create_dir(&repo_dir)?;
    }
    Ok(repo_dir)
}

fn ensure_git_identity(repo_dir: &Path) -> Result<()> {
    let name = git::config_value(repo_dir, "user.name");
    let email = git::config_value(repo_dir, "user.email");
    if name.is_none() || email.is_none() {
        return Err(SbxError::MissingGitIdentity);
    }
    Ok(())
}

fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        return Err(SbxError::FileExists(path.to_path_buf()));
    }
    io::atomic_write(path, content.as_bytes())
}

fn fetch_gitignore(template: &str) -> Result<String> {
    let out = exec::run("gh", ["api", &format!("/gitignore/templates/{template}")], None)?;
    let data: serde_json::Value = serde_json::from_str(&out)?;
    let source = data
        .get("source")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or(SbxError::TemplateFieldMissing {
            kind: "gitignore",
            field: "source",
        })?;
    Ok(format!("{}\n", source.trim()))
}

fn fetch_license(key: &str) -> Result<String> {
    let out = exec::run("gh", ["api", &format!("/licenses/{key}")], None)?;
    let data: serde_json::Value = serde_json::from_str(&out)?;
    let body = data
        .get("body")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or(SbxError::TemplateFieldMissing {
            kind: "license",
            field: "body",
        })?;
    Ok(format!("{}\n", body.trim()))
}
