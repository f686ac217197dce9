//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod app;
mod run;

pub use run::RunArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a job to the scheduler
    Run(RunArgs),
    /// Show the current status of an application
    Status {
        /// Scheduler-assigned application id
        app_id: String,
    },
    /// Fetch aggregated application logs
    Logs {
        /// Scheduler-assigned application id
        app_id: String,

        /// Keep retrying until this many log files are available
        #[arg(long)]
        expect: Option<usize>,
    },
    /// Kill a running application
    Kill {
        /// Scheduler-assigned application id
        app_id: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run(args) => run::handle_run(args, config).await,
        Commands::Status { app_id } => app::handle_status(&app_id, config).await,
        Commands::Logs { app_id, expect } => app::handle_logs(&app_id, expect, config).await,
        Commands::Kill { app_id } => app::handle_kill(&app_id, config).await,
    }
}
