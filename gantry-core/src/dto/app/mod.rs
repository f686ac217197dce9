//! Application DTOs
//!
//! Wire types for submitting applications to the cluster scheduler.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resource shape requested for each container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    /// Memory quantity (e.g. "1 GiB")
    pub memory: String,

    /// Number of virtual cores
    pub cores: u32,
}

/// Access-control flags for the submitted application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acls {
    pub enable: bool,
    pub ui_users: Vec<String>,
    pub view_users: Vec<String>,
}

impl Default for Acls {
    fn default() -> Self {
        Self {
            enable: true,
            ui_users: vec!["*".to_string()],
            view_users: vec!["*".to_string()],
        }
    }
}

/// Request to submit an application to the scheduler
///
/// `files` maps upload basenames to local absolute paths. Keys are basenames
/// only, so two source paths with the same basename collide and the last one
/// registered wins. Known limitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// Display name of the application
    pub name: String,

    /// Shell script executed in the remote container
    pub script: String,

    pub resources: Resources,

    /// Number of container instances to launch
    pub instances: u32,

    /// Upload basename -> local absolute path
    pub files: HashMap<String, String>,

    /// Environment variables for the remote container
    pub env: HashMap<String, String>,

    /// Filesystem URIs to obtain delegation tokens for
    pub file_systems: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_label: Option<String>,

    pub acls: Acls,
}

/// Response returned by the scheduler on a successful submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedApplication {
    /// Opaque application id assigned by the scheduler
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acls_default_open() {
        let acls = Acls::default();
        assert!(acls.enable);
        assert_eq!(acls.ui_users, vec!["*"]);
        assert_eq!(acls.view_users, vec!["*"]);
    }

    #[test]
    fn test_optional_fields_omitted_from_wire() {
        let req = SubmissionRequest {
            name: "test".to_string(),
            script: "true".to_string(),
            resources: Resources {
                memory: "1 GiB".to_string(),
                cores: 1,
            },
            instances: 1,
            files: HashMap::new(),
            env: HashMap::new(),
            file_systems: Vec::new(),
            queue: None,
            user: None,
            node_label: None,
            acls: Acls::default(),
        };

        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("queue"));
        assert!(!json.contains("node_label"));
    }
}
