//! HTTP server command
//!
//! Opens (or creates) the SQLite database, applies migrations and runs
//! the registrar HTTP server until shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use registrar_server::db::{create_pool, migrations};
use registrar_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3030)
    #[arg(long, short = 'b', default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Path to the SQLite database file (default: ~/.registrar/registrar.db)
    #[arg(long, env = "REGISTRAR_DB")]
    pub db_path: Option<PathBuf>,
}

/// Default database location under the user's home directory.
fn default_db_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".registrar").join("registrar.db"))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_path = match args.db_path {
        Some(path) => path,
        None => default_db_path()?,
    };

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tracing::info!("Starting registrar server on {}", args.bind);
    tracing::info!("Database: {}", db_path.display());

    let pool = create_pool(&db_path)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let config = ServerConfig {
        bind_addr: args.bind,
    };

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
