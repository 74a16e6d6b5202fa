//! hubauth - OAuth 2.0 authorization-code demo against HubSpot
//!
//! Main entry point for the hubauth CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod browser;
mod commands;
mod config;

use commands::{authorize_url, start};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// hubauth - OAuth 2.0 authorization-code demo against HubSpot
#[derive(Parser)]
#[command(name = "hubauth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write JSON logs to a daily rotating file in this directory
    #[arg(long, global = true, env = "HUBAUTH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the OAuth demo server
    Start(start::StartArgs),

    /// Print the provider consent URL
    AuthorizeUrl(authorize_url::AuthorizeUrlArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up CLIENT_ID / CLIENT_SECRET / SCOPE from .env before clap reads the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        "hubauth=debug,hubauth_server=debug,hubauth_oauth=debug,tower_http=debug,info"
    } else {
        "hubauth=info,hubauth_server=info,hubauth_oauth=info,warn"
    };

    use tracing_subscriber::prelude::*;
    let console = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        );

    // The guard must outlive main so buffered file logs are flushed on exit
    let (file, _guard) = match cli.log_dir.as_ref() {
        Some(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, "hubauth.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "hubauth=trace,hubauth_server=trace,hubauth_oauth=trace,info",
                ));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    let ctx = commands::Context {
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Start(args) => start::run(args, &ctx).await,
        Commands::AuthorizeUrl(args) => authorize_url::run(args, &ctx).await,
    }
}
