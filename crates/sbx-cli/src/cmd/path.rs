use clap::Args;
use sbx_core::sandbox;

use crate::context::{self, CommonOpts};

#[derive(Args)]
pub struct PathArgs {
    /// Task name
    pub task: String,

    #[command(flatten)]
    pub common: CommonOpts,
}

pub fn run(args: PathArgs) -> anyhow::Result<()> {
    let ctx = context::resolve(&args.common)?;
    let dir = sandbox::locate(&ctx.base_dir, &ctx.repo_slug, &args.task);
    println!("{}", dir.display());
    Ok(())
}
