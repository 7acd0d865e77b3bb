use clap::Args;
use sbx_core::{exec, sandbox};

use crate::context::{self, CommonOpts};
use crate::output::{print_json, print_table};

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub common: CommonOpts,

    /// Output as JSON
    #[arg(long, short = 'j')]
    pub json: bool,
}

pub fn run(args: ListArgs) -> anyhow::Result<()> {
    exec::ensure_exe("git")?;
    let ctx = context::resolve(&args.common)?;
    let entries = sandbox::list(&ctx.base_dir, &ctx.repo_slug)?;

    if args.json {
        print_json(&entries)?;
    } else {
        let rows = entries
            .iter()
            .map(|e| {
                let branch = e.branch.clone().unwrap_or_else(|| "?".to_string());
                let state = match e.dirty {
                    Some(true) => "dirty",
                    Some(false) => "clean",
                    None => "?",
                };
                vec![e.dir.display().to_string(), branch, state.to_string()]
            })
            .collect();
        print_table(&["DIR", "BRANCH", "STATE"], rows);
    }
    Ok(())
}
