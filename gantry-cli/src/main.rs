//! Gantry CLI
//!
//! Command-line interface for submitting and tracking jobs on the cluster
//! scheduler.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "Submit and track jobs on a cluster scheduler", long_about = None)]
struct Cli {
    /// Scheduler gateway URL
    #[arg(
        long,
        env = "GANTRY_SCHEDULER_URL",
        default_value = "http://localhost:8088"
    )]
    scheduler_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gantry_cli=info,gantry_backend=info,gantry_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        scheduler_url: cli.scheduler_url,
    };

    handle_command(cli.command, &config).await
}
