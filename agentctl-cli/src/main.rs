//! agentctl CLI - company/agent/task management backend
//!
//! Entry point for the agentctl command-line tool, which provides:
//! - HTTP API server (`serve` subcommand)
//! - Schema administration (`db init`, `db drop`, `db reset`)

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::CliConfig;

#[derive(Parser, Debug)]
#[command(
    name = "agentctl",
    author,
    version,
    about = "CRUD backend for the company/agent/task management hierarchy"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Path to a config file (default: ./agentctl.toml if present)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Schema administration (init, drop, reset)
    Db(commands::db::DbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up DATABASE_URL and friends from a local .env, if any.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(cli.debug)?;

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args, config).await,
        Commands::Db(args) => commands::db::run_db(args, config).await,
    }
}
