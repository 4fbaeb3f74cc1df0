//! registrar CLI - student registry HTTP service
//!
//! Entry point for the registrar command-line tool. The only subcommand
//! today is `serve`, which runs the HTTP API backed by a local SQLite
//! database.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "registrar",
    author,
    version,
    about = "Task, user and enrollment registry over HTTP",
    long_about = "Runs the registrar HTTP API: tasks, users with profiles, authors with \
                  their books, and student course enrollments, backed by a local SQLite file."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up REGISTRAR_* settings from a local .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
    }
    Ok(())
}
