use anyhow::bail;
use clap::Args;
use sbx_core::{exec, sandbox};
use std::path::PathBuf;

use crate::context::{self, CommonOpts};
use crate::output::print_json;

#[derive(Args)]
pub struct StatusArgs {
    /// Task name (omit when --path is given)
    pub task: Option<String>,

    #[command(flatten)]
    pub common: CommonOpts,

    /// Explicit sandbox path instead of deriving it from the task
    #[arg(long)]
    pub path: Option<String>,

    /// Output as JSON
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Allow inspecting a sandbox sitting on main/master
    #[arg(long)]
    pub allow_main: bool,
}

pub fn run(args: StatusArgs) -> anyhow::Result<()> {
    exec::ensure_exe("git")?;

    let dir: PathBuf = match (&args.path, &args.task) {
        (Some(p), _) => {
            // Canonicalize so relative paths and symlinks report the real
            // location; a nonexistent path falls through to SandboxNotFound.
            let expanded = context::expand_path(p)?;
            expanded.canonicalize().unwrap_or(expanded)
        }
        (None, Some(task)) => {
            let ctx = context::resolve(&args.common)?;
            sandbox::locate(&ctx.base_dir, &ctx.repo_slug, task)
        }
        (None, None) => bail!("provide a task or --path"),
    };

    let status = sandbox::status(&dir, args.allow_main)?;

    if args.json {
        print_json(&status)?;
    } else {
        println!("dir: {}", status.dir.display());
        println!("branch: {}", status.branch);
        println!("dirty: {}", status.dirty);
        if let Some(meta) = &status.meta {
            println!("task: {}", meta.task);
            println!("remote_url: {}", meta.remote_url);
            println!("created_at: {}", meta.created_at.to_rfc3339());
        }
    }
    Ok(())
}
