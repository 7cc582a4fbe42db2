use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

use run_ci::cli::{run_check, run_deploy, DeployArgs, Project};
use run_ci::config::{self, TBUMP_FILE};
use run_ci::process::SystemRunner;
use run_ci::{ui, CiError};

#[derive(Parser)]
#[command(
    name = "run-ci",
    about = "Install, check, build and publish the package from CI"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom pipeline settings file")]
    config: Option<PathBuf>,

    #[arg(long, global = true, default_value = TBUMP_FILE, help = "Version bump configuration")]
    tbump: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bump, build and publish the version named by a git tag
    Deploy {
        #[arg(long, help = "Release tag, e.g. v1.2.3")]
        git_tag: String,

        #[arg(long, help = "Build environment passed to the build script")]
        env: Option<String>,

        #[arg(long, help = "Preview what would happen without running anything")]
        dry_run: bool,
    },
    /// Install dependencies, run linters and the test suite
    Check,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // Usage errors exit 1 here, not clap's 2
        let _ = Cli::command().print_help();
        process::exit(1);
    };

    if let Err(e) = run(command, cli.config, cli.tbump) {
        let ci_error = e.downcast_ref::<CiError>();
        match ci_error {
            Some(CiError::TestsFailed) => ui::display_error("Tests failed"),
            _ => ui::display_error(&format!("{:#}", e)),
        }
        process::exit(ci_error.map(CiError::exit_code).unwrap_or(1));
    }
}

fn run(command: Commands, config_path: Option<PathBuf>, tbump_path: PathBuf) -> Result<()> {
    let settings = config::load_settings(config_path.as_deref())?;
    log::debug!("settings: {:?}", settings);

    match command {
        Commands::Deploy {
            git_tag,
            env,
            dry_run,
        } => {
            let tbump = config::load_tbump(&tbump_path)?;
            let project = Project::new(tbump_path, settings);
            let args = DeployArgs {
                git_tag,
                env,
                dry_run,
            };
            run_deploy(&SystemRunner, &project, &tbump, &args)
                .with_context(|| format!("deploy of {} failed", args.git_tag))?;
        }
        Commands::Check => {
            let project = Project::new(tbump_path, settings);
            run_check(&SystemRunner, &project)?;
        }
    }

    Ok(())
}
