use anyhow::Context;
use clap::Args;
use sbx_core::sandbox::{self, CreateOptions};
use sbx_core::{exec, launch, mirror};

use crate::context::{self, CommonOpts};

#[derive(Args)]
pub struct NewArgs {
    /// Task name (also the folder suffix and the default branch)
    pub task: String,

    #[command(flatten)]
    pub common: CommonOpts,

    /// Branch name (defaults to the sanitized task)
    #[arg(long)]
    pub branch: Option<String>,

    /// Base branch to branch from
    #[arg(long, default_value = "main")]
    pub base_branch: String,

    /// Where to keep the bare mirror (defaults to the user cache dir)
    #[arg(long)]
    pub mirror_dir: Option<String>,

    /// Copy .env.example to .env when the latter is absent
    #[arg(long)]
    pub env_copy: bool,

    /// Reuse an existing sandbox directory
    #[arg(long)]
    pub force: bool,

    /// Allow ending up on main/master
    #[arg(long)]
    pub allow_main: bool,

    /// Launch PROGRAM inside the new sandbox and propagate its exit code
    #[arg(long, value_name = "PROGRAM")]
    pub launch: Option<String>,

    /// Arguments passed through to the launched program (after `--`)
    #[arg(last = true)]
    pub launch_args: Vec<String>,
}

/// Typed non-zero exit carried through anyhow so main can propagate the
/// launched tool's code verbatim instead of the generic failure code.
#[derive(Debug)]
pub struct LaunchExit(pub i32);

impl std::fmt::Display for LaunchExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "launched tool exited with code {}", self.0)
    }
}

impl std::error::Error for LaunchExit {}

pub fn run(args: NewArgs) -> anyhow::Result<()> {
    exec::ensure_exe("git")?;
    let ctx = context::resolve(&args.common)?;

    let mirror_dir = match &args.mirror_dir {
        Some(p) => context::expand_path(p)?,
        None => context::default_cache_root()
            .context("resolving the default mirror cache root")?
            .join(mirror::MIRROR_NAMESPACE)
            .join(format!("{}.git", ctx.repo_slug)),
    };

    let opts = CreateOptions {
        base_dir: ctx.base_dir,
        mirror_dir,
        remote_url: ctx.remote_url,
        repo_slug: ctx.repo_slug,
        task: args.task,
        branch: args.branch,
        base_branch: args.base_branch,
        env_copy: args.env_copy,
        force: args.force,
        allow_protected: args.allow_main,
    };

    let dir = sandbox::create(&opts)?;
    println!("{}", dir.display());

    if let Some(program) = &args.launch {
        let code = launch::launch(program, &args.launch_args, &dir)?;
        if code != 0 {
            return Err(LaunchExit(code).into());
        }
    }
    Ok(())
}
