use clap::Args;
use sbx_core::{exec, sandbox};

use crate::context::{self, CommonOpts};

#[derive(Args)]
pub struct RmArgs {
    /// Task name
    pub task: String,

    #[command(flatten)]
    pub common: CommonOpts,

    /// Remove even when the working tree is dirty
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: RmArgs) -> anyhow::Result<()> {
    exec::ensure_exe("git")?;
    let ctx = context::resolve(&args.common)?;
    let dir = sandbox::locate(&ctx.base_dir, &ctx.repo_slug, &args.task);

    if sandbox::remove(&dir, args.force)? {
        println!("{}", dir.display());
    }
    Ok(())
}
