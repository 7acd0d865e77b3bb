use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SbxError {
    #[error("required executable not found in PATH: {0}")]
    ExeNotFound(String),

    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("resolved path {path} is outside {parent}")]
    PathEscape { parent: PathBuf, path: PathBuf },

    #[error("failed to detect remote URL for remote '{remote}'; pass --remote-url")]
    RemoteNotDetected { remote: String },

    #[error("not inside a git repo; pass --remote-url")]
    NotInGitRepo,

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("sandbox already exists: {0} (use --force to reuse)")]
    SandboxExists(PathBuf),

    #[error("sandbox not found: {0}")]
    SandboxNotFound(PathBuf),

    #[error("sandbox has uncommitted changes: {0} (use --force to remove)")]
    DirtySandbox(PathBuf),

    #[error(
        "sandbox is on {0}; refusing to proceed. \
         Create or switch to a feature branch, or pass --allow-main"
    )]
    ProtectedBranch(String),

    #[error("command failed ({code}): {cmd}{}", render_streams(.stdout, .stderr))]
    CommandFailed {
        cmd: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        source: std::io::Error,
    },

    #[error("invalid repository name '{0}': must match [A-Za-z0-9][A-Za-z0-9._-]{{0,99}} with no slashes")]
    InvalidRepoName(String),

    #[error("invalid owner '{0}': must follow GitHub login rules")]
    InvalidOwner(String),

    #[error("invalid remote name '{0}': must match [A-Za-z0-9._-]+")]
    InvalidRemoteName(String),

    #[error("gh is not authenticated; run 'gh auth login'{}", render_detail(.0))]
    GhNotAuthenticated(String),

    #[error("repository already exists on GitHub: {0}")]
    RepoAlreadyExists(String),

    #[error("remote already exists: {0}")]
    RemoteAlreadyExists(String),

    #[error("target directory is not empty: {0}")]
    TargetNotEmpty(PathBuf),

    #[error("git user.name and user.email must be configured before committing")]
    MissingGitIdentity,

    #[error("no files to commit; create files or enable --readme")]
    NothingToCommit,

    #[error("file already exists: {0} (use --overwrite-files to replace)")]
    FileExists(PathBuf),

    #[error("{kind} template response missing '{field}' field")]
    TemplateFieldMissing {
        kind: &'static str,
        field: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Attach captured output streams below the one-line summary so the CLI can
/// print them verbatim.
fn render_streams(stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    if !stderr.is_empty() {
        out.push('\n');
        out.push_str(stderr);
    }
    if !stdout.is_empty() {
        out.push('\n');
        out.push_str(stdout);
    }
    out
}

fn render_detail(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(" ({detail})")
    }
}

pub type Result<T> = std::result::Result<T, SbxError>;
