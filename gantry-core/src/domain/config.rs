//! Execution configuration domain types
//!
//! A resolved execution configuration is always fully populated: every field
//! carries either a user-supplied value or the documented default. Defaults
//! live in an explicit value object rather than module-level globals so tests
//! can resolve against alternate defaults.

use std::collections::HashMap;

/// Fully-resolved execution configuration for a submitted application
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    /// Cores requested per container
    pub num_cores: u32,

    /// Memory quantity per container (e.g. "1 GiB")
    pub memory: String,

    /// Scheduler queue to submit into
    pub queue: String,

    /// Filesystem URIs the application needs delegation tokens for
    pub filesystems: Vec<String>,

    /// Cluster configuration directory exported to the remote shell
    pub conf_dir: String,

    /// Environment variables for the remote container
    pub env: HashMap<String, String>,

    /// Local files uploaded alongside the application
    pub additional_files: Vec<String>,
}

/// Default values used by the resolver for absent configuration keys
#[derive(Debug, Clone)]
pub struct ConfigDefaults {
    pub num_cores: u32,
    pub memory: String,
    pub queue: String,
    pub filesystems: Vec<String>,
    pub conf_dir: String,
    pub env: HashMap<String, String>,
    pub additional_files: Vec<String>,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            num_cores: 1,
            memory: "1 GiB".to_string(),
            queue: "default".to_string(),
            filesystems: Vec::new(),
            conf_dir: String::new(),
            env: HashMap::new(),
            additional_files: Vec::new(),
        }
    }
}
