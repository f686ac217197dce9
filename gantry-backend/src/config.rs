//! Backend configuration resolution
//!
//! Merges the backend configuration mapping with per-run overrides and
//! explicit defaults, producing a fully-populated [`ExecutionConfig`].
//! Resolution is a pure function of its inputs: for every recognized key the
//! override wins, then the backend configuration value, then the default.

use std::collections::HashMap;

use serde_json::Value;

use gantry_core::domain::config::{ConfigDefaults, ExecutionConfig};

use crate::error::{BackendError, Result};

/// Recognized backend configuration keys
pub const NUM_CORES: &str = "num_cores";
pub const MEMORY: &str = "memory";
pub const QUEUE: &str = "queue";
pub const FILESYSTEMS: &str = "hadoop_filesystems";
pub const CONF_DIR: &str = "hadoop_conf_dir";
pub const ENV: &str = "env";
pub const ADDITIONAL_FILES: &str = "additional_files";

/// Resolves the execution configuration for a run
///
/// # Arguments
/// * `defaults` - Default values for absent keys
/// * `backend_config` - The backend configuration mapping (mandatory)
/// * `overrides` - Per-run string overrides (e.g. CLI parameters)
///
/// # Errors
/// `Configuration` if the backend configuration is absent or empty, or if a
/// value cannot be interpreted for its key.
pub fn resolve(
    defaults: &ConfigDefaults,
    backend_config: Option<&HashMap<String, Value>>,
    overrides: &HashMap<String, String>,
) -> Result<ExecutionConfig> {
    let backend_config = match backend_config {
        Some(cfg) if !cfg.is_empty() => cfg,
        _ => {
            return Err(BackendError::Configuration(
                "backend configuration is missing or empty".to_string(),
            ));
        }
    };

    let num_cores = match pick(overrides, backend_config, NUM_CORES) {
        Picked::Override(s) => s
            .parse::<u32>()
            .map_err(|_| invalid(NUM_CORES, &s))?,
        Picked::Backend(v) => cores_from_value(v)?,
        Picked::Absent => defaults.num_cores,
    };
    if num_cores == 0 {
        return Err(invalid(NUM_CORES, "0"));
    }

    let memory = match pick(overrides, backend_config, MEMORY) {
        Picked::Override(s) => s,
        Picked::Backend(v) => quantity_from_value(MEMORY, v)?,
        Picked::Absent => defaults.memory.clone(),
    };

    let queue = match pick(overrides, backend_config, QUEUE) {
        Picked::Override(s) => s,
        Picked::Backend(v) => string_from_value(QUEUE, v)?,
        Picked::Absent => defaults.queue.clone(),
    };

    let filesystems = match pick(overrides, backend_config, FILESYSTEMS) {
        Picked::Override(s) => split_list(&s),
        Picked::Backend(v) => list_from_value(FILESYSTEMS, v)?,
        Picked::Absent => defaults.filesystems.clone(),
    };

    let conf_dir = match pick(overrides, backend_config, CONF_DIR) {
        Picked::Override(s) => s,
        Picked::Backend(v) => string_from_value(CONF_DIR, v)?,
        Picked::Absent => defaults.conf_dir.clone(),
    };

    let env = match pick(overrides, backend_config, ENV) {
        Picked::Override(s) => parse_env_entries(split_list(&s))?,
        Picked::Backend(v) => env_from_value(v)?,
        Picked::Absent => defaults.env.clone(),
    };

    let additional_files = match pick(overrides, backend_config, ADDITIONAL_FILES) {
        Picked::Override(s) => split_list(&s),
        Picked::Backend(v) => list_from_value(ADDITIONAL_FILES, v)?,
        Picked::Absent => defaults.additional_files.clone(),
    };

    Ok(ExecutionConfig {
        num_cores,
        memory,
        queue,
        filesystems,
        conf_dir,
        env,
        additional_files,
    })
}

enum Picked<'a> {
    Override(String),
    Backend(&'a Value),
    Absent,
}

fn pick<'a>(
    overrides: &HashMap<String, String>,
    backend_config: &'a HashMap<String, Value>,
    key: &str,
) -> Picked<'a> {
    if let Some(s) = overrides.get(key) {
        Picked::Override(s.clone())
    } else if let Some(v) = backend_config.get(key) {
        Picked::Backend(v)
    } else {
        Picked::Absent
    }
}

/// Splits a comma-joined parameter into its entries, treating "" as empty
pub fn split_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::to_string).collect()
}

/// Parses `KEY=VALUE` entries into an environment mapping
pub fn parse_env_entries(entries: Vec<String>) -> Result<HashMap<String, String>> {
    let mut env = HashMap::new();
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| invalid(ENV, &entry))?;
        env.insert(key.to_string(), value.to_string());
    }
    Ok(env)
}

fn invalid(key: &str, value: &str) -> BackendError {
    BackendError::Configuration(format!("invalid value for '{}': {}", key, value))
}

fn cores_from_value(value: &Value) -> Result<u32> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| invalid(NUM_CORES, &value.to_string()))
}

fn string_from_value(key: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(key, &value.to_string()))
}

/// Memory quantities may arrive as strings ("1 GiB") or raw MiB numbers
fn quantity_from_value(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(invalid(key, &value.to_string())),
    }
}

/// Lists may arrive as JSON arrays of strings or comma-joined strings
fn list_from_value(key: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::String(s) => Ok(split_list(s)),
        Value::Array(items) => items
            .iter()
            .map(|item| string_from_value(key, item))
            .collect(),
        _ => Err(invalid(key, &value.to_string())),
    }
}

/// Environment may arrive as a `KEY=VALUE` list or an object mapping
fn env_from_value(value: &Value) -> Result<HashMap<String, String>> {
    match value {
        Value::Array(items) => {
            let entries = items
                .iter()
                .map(|item| string_from_value(ENV, item))
                .collect::<Result<Vec<_>>>()?;
            parse_env_entries(entries)
        }
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), string_from_value(ENV, v)?)))
            .collect(),
        _ => Err(invalid(ENV, &value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend_config() -> HashMap<String, Value> {
        let mut cfg = HashMap::new();
        cfg.insert(NUM_CORES.to_string(), json!(12));
        cfg.insert(MEMORY.to_string(), json!(2048));
        cfg.insert(QUEUE.to_string(), json!("ml"));
        cfg.insert(FILESYSTEMS.to_string(), json!("viewfs://fs1,viewfs://fs2"));
        cfg.insert(CONF_DIR.to_string(), json!("/etc/hadoop/conf"));
        cfg
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let defaults = ConfigDefaults::default();
        let overrides = HashMap::new();

        let err = resolve(&defaults, None, &overrides).unwrap_err();
        assert!(matches!(err, BackendError::Configuration(_)));

        let empty = HashMap::new();
        let err = resolve(&defaults, Some(&empty), &overrides).unwrap_err();
        assert!(matches!(err, BackendError::Configuration(_)));
    }

    #[test]
    fn test_present_keys_kept_absent_keys_defaulted() {
        let defaults = ConfigDefaults::default();
        let cfg = backend_config();

        let resolved = resolve(&defaults, Some(&cfg), &HashMap::new()).unwrap();
        assert_eq!(resolved.num_cores, 12);
        assert_eq!(resolved.memory, "2048");
        assert_eq!(resolved.queue, "ml");
        assert_eq!(resolved.filesystems, vec!["viewfs://fs1", "viewfs://fs2"]);
        assert_eq!(resolved.conf_dir, "/etc/hadoop/conf");
        // env and additional_files were absent: exactly the defaults
        assert!(resolved.env.is_empty());
        assert!(resolved.additional_files.is_empty());
    }

    #[test]
    fn test_overrides_win_over_backend_values() {
        let defaults = ConfigDefaults::default();
        let cfg = backend_config();
        let mut overrides = HashMap::new();
        overrides.insert(NUM_CORES.to_string(), "4".to_string());
        overrides.insert(QUEUE.to_string(), "urgent".to_string());

        let resolved = resolve(&defaults, Some(&cfg), &overrides).unwrap();
        assert_eq!(resolved.num_cores, 4);
        assert_eq!(resolved.queue, "urgent");
        // untouched keys still come from the backend config
        assert_eq!(resolved.memory, "2048");
    }

    #[test]
    fn test_alternate_defaults() {
        let defaults = ConfigDefaults {
            queue: "batch".to_string(),
            ..ConfigDefaults::default()
        };
        let mut cfg = HashMap::new();
        cfg.insert(MEMORY.to_string(), json!("4 GiB"));

        let resolved = resolve(&defaults, Some(&cfg), &HashMap::new()).unwrap();
        assert_eq!(resolved.queue, "batch");
        assert_eq!(resolved.memory, "4 GiB");
        assert_eq!(resolved.num_cores, 1);
    }

    #[test]
    fn test_env_as_list_and_object() {
        let defaults = ConfigDefaults::default();
        let mut cfg = backend_config();
        cfg.insert(ENV.to_string(), json!(["A=1", "B=2"]));

        let resolved = resolve(&defaults, Some(&cfg), &HashMap::new()).unwrap();
        assert_eq!(resolved.env.get("A"), Some(&"1".to_string()));
        assert_eq!(resolved.env.get("B"), Some(&"2".to_string()));

        cfg.insert(ENV.to_string(), json!({"C": "3"}));
        let resolved = resolve(&defaults, Some(&cfg), &HashMap::new()).unwrap();
        assert_eq!(resolved.env.get("C"), Some(&"3".to_string()));
    }

    #[test]
    fn test_env_override_is_comma_joined() {
        let defaults = ConfigDefaults::default();
        let cfg = backend_config();
        let mut overrides = HashMap::new();
        overrides.insert(ENV.to_string(), "ENV1=ENV1,ENV2=ENV2".to_string());

        let resolved = resolve(&defaults, Some(&cfg), &overrides).unwrap();
        assert_eq!(resolved.env.len(), 2);
        assert_eq!(resolved.env.get("ENV1"), Some(&"ENV1".to_string()));
    }

    #[test]
    fn test_invalid_values_are_configuration_errors() {
        let defaults = ConfigDefaults::default();
        let mut cfg = backend_config();
        cfg.insert(NUM_CORES.to_string(), json!("a lot"));

        let err = resolve(&defaults, Some(&cfg), &HashMap::new()).unwrap_err();
        assert!(matches!(err, BackendError::Configuration(_)));

        let cfg = backend_config();
        let mut overrides = HashMap::new();
        overrides.insert(NUM_CORES.to_string(), "0".to_string());
        let err = resolve(&defaults, Some(&cfg), &overrides).unwrap_err();
        assert!(matches!(err, BackendError::Configuration(_)));

        let mut overrides = HashMap::new();
        overrides.insert(ENV.to_string(), "NOT_AN_ASSIGNMENT".to_string());
        let err = resolve(&defaults, Some(&cfg), &overrides).unwrap_err();
        assert!(matches!(err, BackendError::Configuration(_)));
    }

    #[test]
    fn test_split_list_empty_string() {
        assert!(split_list("").is_empty());
        assert_eq!(split_list("a,b"), vec!["a", "b"]);
    }
}
