//! Run command handler
//!
//! Submits a resolved entry-point command as a cluster job and optionally
//! blocks until it reaches a terminal state.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::*;
use uuid::Uuid;

use gantry_backend::{JobRequest, run_job};
use gantry_client::HttpConnector;
use gantry_core::domain::config::ConfigDefaults;

use crate::config::{Config, load_backend_config};

/// Arguments for `gantry run`
#[derive(Args)]
pub struct RunArgs {
    /// Resolved entry-point command (e.g. "python mypkg.train --epochs 10")
    command: String,

    /// Working-directory URI module references are resolved against
    #[arg(long, default_value = "")]
    base_uri: String,

    /// Backend configuration file (JSON)
    #[arg(long)]
    backend_config: PathBuf,

    /// Runtime bundle archive shipped alongside the job
    #[arg(long)]
    runtime_bundle: String,

    /// Experiment the run is labelled with
    #[arg(long, default_value = "0")]
    experiment_id: String,

    /// Extra key=value parameters; `env` and `additional_files` are
    /// recognized, the rest override backend configuration keys
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Submit the application as this user
    #[arg(long)]
    user: Option<String>,

    /// Constrain containers to nodes carrying this label
    #[arg(long)]
    node_label: Option<String>,

    /// Block until the application reaches a terminal state
    #[arg(long)]
    wait: bool,
}

/// Handle the run command
pub async fn handle_run(args: RunArgs, config: &Config) -> Result<()> {
    let backend_config = load_backend_config(&args.backend_config)?;
    let params = parse_params(&args.params)?;

    let request = JobRequest {
        run_id: Uuid::new_v4(),
        experiment_id: args.experiment_id,
        command: args.command,
        base_uri: args.base_uri,
        runtime_bundle: args.runtime_bundle,
        backend_config: Some(backend_config),
        params,
        user: args.user,
        node_label: args.node_label,
    };

    let connector = Arc::new(HttpConnector::new(config.scheduler_url.clone()));
    let app = run_job(connector, &ConfigDefaults::default(), request)
        .await
        .context("Failed to submit job")?;

    println!(
        "{} {} (run {})",
        "Submitted application".bold(),
        app.application_id(),
        app.run_id()
    );

    if args.wait {
        let succeeded = app.wait().await.context("Failed while waiting for job")?;
        if succeeded {
            println!("{}", "Run finished successfully.".green());
        } else {
            bail!("Run did not finish successfully");
        }
    }

    Ok(())
}

/// Parses repeated `-P key=value` flags into a parameter map
fn parse_params(params: &[String]) -> Result<HashMap<String, String>> {
    params
        .iter()
        .map(|entry| {
            let (key, value) = entry
                .split_once('=')
                .with_context(|| format!("Invalid parameter '{}': expected KEY=VALUE", entry))?;
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_params() {
        let params = parse_params(&[
            "env=A=1,B=2".to_string(),
            "num_cores=4".to_string(),
        ])
        .unwrap();
        // only the first '=' separates key from value
        assert_eq!(params["env"], "A=1,B=2");
        assert_eq!(params["num_cores"], "4");
    }

    #[test]
    fn test_parse_params_rejects_bare_words() {
        assert!(parse_params(&["not-an-assignment".to_string()]).is_err());
    }
}
