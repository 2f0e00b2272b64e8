// ABOUTME: CLI entry point for field-sync
// ABOUTME: Parses commands and routes to appropriate handlers

use clap::{Parser, Subcommand};
use field_sync::commands;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "field-sync")]
#[command(about = "Offline-first field data synchronization", long_about = None)]
#[command(version)]
struct Cli {
    /// Set the log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log: String,
    /// Path to the configuration file (defaults to ~/.field-sync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Path to the app state file (defaults to ~/.field-sync/state.json)
    #[arg(long, global = true)]
    state: Option<PathBuf>,
    /// Override the sync endpoint URL (falls back to FIELD_SYNC_ENDPOINT env)
    #[arg(long, env = "FIELD_SYNC_ENDPOINT", global = true)]
    endpoint: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push accumulated local changes to the sync endpoint
    Sync,
    /// Show unsynced record counts and the last successful sync time
    Status,
    /// Manage the selected school context
    School {
        #[command(flatten)]
        args: commands::school::SchoolArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // 1. RUST_LOG environment variable has highest precedence
    // 2. --log flag is used if RUST_LOG is not set
    // 3. Default to "info" if neither are provided
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log.clone()));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut config = field_sync::config::Config::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    let state_path = match cli.state {
        Some(path) => path,
        None => field_sync::state::default_path()?,
    };

    match cli.command {
        Commands::Sync => commands::sync(&config, &state_path).await,
        Commands::Status => commands::status(&config, &state_path).await,
        Commands::School { args } => commands::school(args, &state_path).await,
    }
}
