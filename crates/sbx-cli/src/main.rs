use clap::{Parser, Subcommand};
use sbx_cli::cmd::{
    self,
    list::ListArgs,
    new::{LaunchExit, NewArgs},
    path::PathArgs,
    rm::RmArgs,
    status::StatusArgs,
};

#[derive(Parser)]
#[command(
    name = "sbx",
    about = "Branch-safe per-task sandbox clones for running coding agents",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a sandbox
    New(NewArgs),

    /// Print the sandbox path for a task
    Path(PathArgs),

    /// List sandboxes for the current repository
    List(ListArgs),

    /// Show sandbox status
    Status(StatusArgs),

    /// Remove a sandbox directory
    Rm(RmArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::New(args) => cmd::new::run(args),
        Commands::Path(args) => cmd::path::run(args),
        Commands::List(args) => cmd::list::run(args),
        Commands::Status(args) => cmd::status::run(args),
        Commands::Rm(args) => cmd::rm::run(args),
    };

    if let Err(e) = result {
        // The launched tool's exit code passes through verbatim.
        if let Some(exit) = e.downcast_ref::<LaunchExit>() {
            std::process::exit(exit.0);
        }
        eprintln!("Error: {e:#}");
        std::process::exit(2);
    }
}
