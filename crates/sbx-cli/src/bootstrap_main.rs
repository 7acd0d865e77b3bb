use clap::{Parser, ValueEnum};
use sbx_cli::context;
use sbx_core::bootstrap::{self, BootstrapOptions, Visibility};

#[derive(Parser)]
#[command(
    name = "sbx-bootstrap",
    about = "Create a GitHub repository with gh and bootstrap a local project",
    version
)]
struct Cli {
    /// Repository name (no slashes)
    name: String,

    /// Repository visibility
    #[arg(long, value_enum)]
    visibility: VisibilityArg,

    /// GitHub owner/org (defaults to the authenticated user)
    #[arg(long)]
    owner: Option<String>,

    /// Repository description
    #[arg(long)]
    description: Option<String>,

    /// Projects root directory
    #[arg(long, default_value = "~/projects")]
    projects_dir: String,

    /// Remote name
    #[arg(long, default_value = "origin")]
    remote: String,

    /// GitHub gitignore template name
    #[arg(long)]
    gitignore: Option<String>,

    /// License key (e.g. mit)
    #[arg(long)]
    license: Option<String>,

    /// Skip creating README.md
    #[arg(long)]
    no_readme: bool,

    /// Initial commit message
    #[arg(long, default_value = "Initial commit")]
    commit_message: String,

    /// Allow overwriting README/.gitignore/LICENSE if they already exist
    #[arg(long)]
    overwrite_files: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VisibilityArg {
    Public,
    Private,
}

impl From<VisibilityArg> for Visibility {
    fn from(v: VisibilityArg) -> Self {
        match v {
            VisibilityArg::Public => Visibility::Public,
            VisibilityArg::Private => Visibility::Private,
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let opts = BootstrapOptions {
        name: cli.name,
        visibility: cli.visibility.into(),
        owner: cli.owner,
        description: cli.description,
        projects_dir: context::expand_path(&cli.projects_dir)?,
        remote: cli.remote,
        gitignore: cli.gitignore,
        license: cli.license,
        readme: !cli.no_readme,
        commit_message: cli.commit_message,
        overwrite_files: cli.overwrite_files,
    };

    let report = bootstrap::run(&opts)?;
    println!("Created repository and local project:");
    println!("- local: {}", report.dir.display());
    println!("- remote: {}", report.remote_url);
    println!("- branch: {}", report.branch);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(2);
    }
}
