use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{add, commit, config, log};

#[derive(Parser)]
#[command(name = "svcs")]
#[command(version, about = "A minimal snapshot version control system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Store directory (defaults to <workdir>/vcs)
    #[arg(short, long, global = true, env = "SVCS_STORE")]
    store: Option<PathBuf>,

    /// Working directory holding the tracked files (defaults to current directory)
    #[arg(short, long, global = true)]
    workdir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Get and set a username
    Config {
        /// New username (prints the current one when omitted)
        name: Option<String>,
    },

    /// Add a file to the index
    Add {
        /// File to track (lists tracked files when omitted)
        file: Option<String>,
    },

    /// Save changes
    Commit {
        /// Commit message
        message: Option<String>,
    },

    /// Show commit logs
    Log {
        /// Number of commits to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(core) = err.downcast_ref::<svcs_core::Error>() {
                if core.is_usage() {
                    eprintln!("{}", core.to_string().yellow());
                    return ExitCode::from(2);
                }
            }
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let store_config = commands::get_store_config(cli.store, cli.workdir)?;
    tracing::debug!(
        store = %store_config.store_root.display(),
        workdir = %store_config.work_dir.display(),
        "resolved store"
    );

    match cli.command {
        Commands::Config { name } => {
            config::run(name, store_config)?;
        }
        Commands::Add { file } => {
            add::run(file, store_config)?;
        }
        Commands::Commit { message } => {
            commit::run(message, store_config)?;
        }
        Commands::Log { limit, json } => {
            log::run(limit, json, store_config)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
