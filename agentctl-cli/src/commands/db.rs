//! Schema administration commands: init, drop, reset.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use agentctl_core::db::schema;
use agentctl_core::Db;

use crate::config::CliConfig;

/// Arguments for the db command
#[derive(Parser, Debug)]
pub struct DbArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Create all tables that do not exist yet (idempotent)
    Init,
    /// Drop every table - destroys all data
    Drop {
        /// Confirm the destructive operation
        #[arg(long)]
        yes: bool,
    },
    /// Drop and recreate every table - destroys all data
    Reset {
        /// Confirm the destructive operation
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run_db(args: DbArgs, config: CliConfig) -> Result<()> {
    let mut database = config.database;
    if let Some(url) = args.database_url {
        database.url = url;
    }

    let db = Db::connect(&database)
        .await
        .context("failed to connect to database")?;

    match args.command {
        DbCommand::Init => {
            schema::init(&db).await.context("schema init failed")?;
            println!("schema initialized ({} backend)", db.backend());
        }
        DbCommand::Drop { yes } => {
            confirm(yes, "drop")?;
            schema::drop_all(&db).await.context("drop-all failed")?;
            println!("all tables dropped");
        }
        DbCommand::Reset { yes } => {
            confirm(yes, "reset")?;
            schema::reset(&db).await.context("reset failed")?;
            println!("schema reset ({} backend)", db.backend());
        }
    }

    db.close().await;
    Ok(())
}

fn confirm(yes: bool, operation: &str) -> Result<()> {
    if !yes {
        anyhow::bail!("`db {operation}` deletes all data; re-run with --yes to confirm");
    }
    Ok(())
}
