mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use notepad_config::AppConfig;
use notepad_core::{
    CommandCenter, CommandOutcome, NoteManager, Scope, ShowOptions, command_for_scope,
};
use notepad_host::terminal_services;

#[derive(Debug, Parser)]
#[command(
    name = "dev-notepad",
    version,
    about = "Scratch notes scoped to you, your workspace, your repository or your branch"
)]
struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Workspace folder; repeat for a multi-root workspace.
    #[arg(long = "folder", global = true, value_name = "DIR")]
    folders: Vec<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open the note shared by every workspace.
    Global {
        #[arg(long)]
        focus: bool,
    },
    /// Open the note private to the current workspace.
    Workspace {
        #[arg(long)]
        focus: bool,
    },
    /// Open the note for a repository.
    Repo {
        #[arg(long)]
        focus: bool,
    },
    /// Open the note for a repository's current branch.
    Branch {
        #[arg(long)]
        focus: bool,
    },
    /// Run a command from the command table by id.
    Run {
        #[arg(value_name = "COMMAND_ID")]
        id: String,
        #[arg(long)]
        focus: bool,
    },
    /// Print where a note lives without creating it.
    Path {
        #[arg(value_name = "SCOPE")]
        scope: Scope,
    },
    /// List the command table.
    Commands {
        #[arg(long)]
        json: bool,
    },
    /// Show storage roots, folders and repositories.
    Doctor,
    /// Print the effective configuration.
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Write the default configuration file.
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(AppConfig::default_path);
    let config = AppConfig::load(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("load config {}", path.display()),
        None => "load config".to_string(),
    })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.telemetry.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    debug!(config = ?config_path, "configuration loaded");

    match cli.command {
        Commands::Global { focus } => {
            exit_code(run_scope(&config, &cli.folders, Scope::Global, focus).await)
        }
        Commands::Workspace { focus } => {
            exit_code(run_scope(&config, &cli.folders, Scope::Workspace, focus).await)
        }
        Commands::Repo { focus } => {
            exit_code(run_scope(&config, &cli.folders, Scope::Repository, focus).await)
        }
        Commands::Branch { focus } => {
            exit_code(run_scope(&config, &cli.folders, Scope::Branch, focus).await)
        }
        Commands::Run { id, focus } => {
            exit_code(run_command(&config, &cli.folders, &id, focus).await)
        }
        Commands::Path { scope } => {
            let notes = NoteManager::new(terminal_services(&config, &cli.folders)?);
            match notes.resolve_target(scope).await {
                Ok(target) => {
                    println!("{}", target.path().display());
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) if err.is_recoverable() => {
                    eprintln!("{err}");
                    Ok(ExitCode::FAILURE)
                }
                Err(err) => Err(err.into()),
            }
        }
        Commands::Commands { json } => {
            println!("{}", report::command_listing(json)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Doctor => {
            let services = terminal_services(&config, &cli.folders)?;
            print!("{}", report::doctor(&config, config_path.as_deref(), &services));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { command: None } => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config {
            command: Some(ConfigCommands::Init { force }),
        } => {
            let Some(path) = config_path else {
                bail!("no config directory on this platform; pass --config PATH");
            };
            init_config(&path, force)?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_scope(
    config: &AppConfig,
    folders: &[PathBuf],
    scope: Scope,
    focus: bool,
) -> Result<CommandOutcome> {
    let command = command_for_scope(scope)
        .with_context(|| format!("no command opens {scope} notes"))?;
    run_command(config, folders, command.id, focus).await
}

async fn run_command(
    config: &AppConfig,
    folders: &[PathBuf],
    id: &str,
    focus: bool,
) -> Result<CommandOutcome> {
    let services = terminal_services(config, folders)?;
    let options = ShowOptions {
        preserve_focus: config.editor.preserve_focus && !focus,
    };
    let center = CommandCenter::new(NoteManager::new(services), options);
    let outcome = center.execute(id).await;
    debug!(command = id, ?outcome, "command finished");
    Ok(outcome)
}

/// 0 when a note was opened, 1 for every other outcome.
fn exit_code(outcome: Result<CommandOutcome>) -> Result<ExitCode> {
    Ok(if outcome?.is_opened() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    AppConfig::default()
        .save_to(path)
        .with_context(|| format!("write config {}", path.display()))
}
