//! HTTP server command.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use agentctl_core::Db;
use agentctl_server::{run_server, ServerConfig};

use crate::config::CliConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Run the HTTP server until shutdown.
pub async fn run_serve(args: ServeArgs, config: CliConfig) -> Result<()> {
    let mut database = config.database;
    if let Some(url) = args.database_url {
        database.url = url;
    }

    let db = Db::connect(&database)
        .await
        .context("failed to connect to database")?;

    // Make sure the schema exists before taking traffic.
    agentctl_core::db::schema::init(&db)
        .await
        .context("failed to initialize schema")?;

    let server_config = ServerConfig {
        bind_addr: args.bind.unwrap_or(config.server.bind),
        cors_permissive: args.cors_permissive || config.server.cors_permissive,
    };

    tracing::info!("starting agentctl server on {}", server_config.bind_addr);
    run_server(db, server_config).await.context("server error")?;

    Ok(())
}
