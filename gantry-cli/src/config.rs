//! Configuration module
//!
//! Handles CLI configuration and loading of backend configuration files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the scheduler gateway
    pub scheduler_url: String,
}

/// Loads a backend configuration file into a JSON mapping
pub fn load_backend_config(path: &Path) -> Result<HashMap<String, Value>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read backend config {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse backend config {}", path.display()))
}
