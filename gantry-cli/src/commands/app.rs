//! Application command handlers
//!
//! Attach to an already-submitted application to inspect its status, fetch
//! its logs, or kill it.

use std::sync::Arc;

use anyhow::Result;
use colored::*;
use uuid::Uuid;

use gantry_backend::{RunStatus, SubmittedApp};
use gantry_client::HttpConnector;

use crate::config::Config;

fn attach(app_id: &str, config: &Config) -> SubmittedApp {
    let connector = Arc::new(HttpConnector::new(config.scheduler_url.clone()));
    SubmittedApp::new(app_id.to_string(), Uuid::new_v4(), connector)
}

/// Show the current status of an application
pub async fn handle_status(app_id: &str, config: &Config) -> Result<()> {
    let status = attach(app_id, config).status().await?;

    let rendered = match status {
        RunStatus::Finished => status.to_string().green(),
        RunStatus::Failed | RunStatus::Killed => status.to_string().red(),
        RunStatus::Running | RunStatus::Scheduled => status.to_string().yellow(),
    };
    println!("{}: {}", app_id.bold(), rendered);

    Ok(())
}

/// Fetch and print aggregated application logs
pub async fn handle_logs(app_id: &str, expect: Option<usize>, config: &Config) -> Result<()> {
    match attach(app_id, config).logs(expect).await {
        Some(logs) => {
            let mut containers: Vec<_> = logs.into_iter().collect();
            containers.sort_by(|(a, _), (b, _)| a.cmp(b));

            for (container, text) in containers {
                println!("{}", format!("=== {} ===", container).bold());
                println!("{}", text);
            }
        }
        None => println!("{}", "Logs unavailable.".yellow()),
    }

    Ok(())
}

/// Kill a running application
pub async fn handle_kill(app_id: &str, config: &Config) -> Result<()> {
    attach(app_id, config).cancel().await?;
    println!("Kill requested for {}", app_id.bold());

    Ok(())
}
