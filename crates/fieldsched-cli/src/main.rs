//! Fieldsched CLI - Command-line interface for the conflict engine
//!
//! Provides commands for:
//! - Detecting conflicts in a local jobs snapshot (`check`)
//! - Detecting conflicts against the live backend (`fetch-check`)
//! - Resolving a detected conflict (`resolve`)
//! - Inspecting configuration (`config`)

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod snapshot;

use commands::{
    check::CheckCommand, config::ConfigCommand, fetch_check::FetchCheckCommand,
    resolve::ResolveCommand,
};
use fieldsched_core::config::Config;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "fieldsched",
    version,
    about = "Scheduling conflict engine for field-service dispatch"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect conflicts in a jobs snapshot file
    Check(CheckCommand),
    /// Fetch jobs from the backend and detect conflicts
    FetchCheck(FetchCheckCommand),
    /// Resolve a conflict by key
    Resolve(ResolveCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup tracing
    let filter = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    match cli.command {
        Commands::Check(cmd) => cmd.execute(&config, format).await,
        Commands::FetchCheck(cmd) => cmd.execute(&config, format).await,
        Commands::Resolve(cmd) => cmd.execute(&config, format).await,
        Commands::Config(cmd) => cmd.execute(&config_path, format).await,
    }
}
