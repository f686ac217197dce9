//! Job submission
//!
//! Assembles the submission request for a translated command and sends it to
//! the scheduler through a scoped client connection. On success the caller
//! receives a [`SubmittedApp`] handle; on failure no handle exists, though
//! the scheduler may still have accepted the job before the error surfaced.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use gantry_client::SchedulerConnector;
use gantry_core::domain::config::{ConfigDefaults, ExecutionConfig};
use gantry_core::dto::app::{Acls, Resources, SubmissionRequest};

use crate::command::{self, LaunchCommand};
use crate::config;
use crate::error::{BackendError, Result};
use crate::run::SubmittedApp;

/// Environment required by the runtime bundle and the submission tooling,
/// overlaid on whatever the caller configured
const INFRASTRUCTURE_ENV: [(&str, &str); 3] = [
    ("GANTRY_CONFIG", "./.gantry"),
    ("PEX_ROOT", "./.pex"),
    ("PYTHONPATH", "."),
];

/// A run to submit, as handed over by the project-resolution collaborator
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// Internal run identifier the application is correlated with
    pub run_id: Uuid,

    /// Experiment the run is labelled with
    pub experiment_id: String,

    /// Resolved entry-point command (post parameter-substitution)
    pub command: String,

    /// Working-directory URI module references are resolved against
    pub base_uri: String,

    /// Portable interpreter archive shipped alongside the job
    pub runtime_bundle: String,

    /// Backend configuration mapping (mandatory)
    pub backend_config: Option<HashMap<String, Value>>,

    /// Extra per-run parameters; `env` and `additional_files` are recognized
    /// and consumed, the rest act as configuration overrides
    pub params: HashMap<String, String>,

    /// Submit the application as this user
    pub user: Option<String>,

    /// Constrain containers to nodes carrying this label
    pub node_label: Option<String>,
}

/// Submits assembled requests through scoped scheduler connections
pub struct JobSubmitter {
    connector: Arc<dyn SchedulerConnector>,
}

impl JobSubmitter {
    pub fn new(connector: Arc<dyn SchedulerConnector>) -> Self {
        Self { connector }
    }

    /// Sends a submission request to the scheduler
    ///
    /// # Returns
    /// The opaque application id assigned by the scheduler
    pub async fn submit(&self, req: &SubmissionRequest) -> Result<String> {
        let client = self
            .connector
            .connect()
            .await
            .map_err(BackendError::Submission)?;

        let app_id = client.submit(req).await.map_err(BackendError::Submission)?;
        Ok(app_id)
    }
}

/// Runs a job on the cluster scheduler
///
/// Resolves the configuration, translates the command, assembles and submits
/// the request, and returns the handle the caller polls.
pub async fn run_job(
    connector: Arc<dyn SchedulerConnector>,
    defaults: &ConfigDefaults,
    req: JobRequest,
) -> Result<SubmittedApp> {
    let mut params = req.params;
    let env_entries = take_list_param(&mut params, config::ENV);
    let mut additional_files = take_list_param(&mut params, config::ADDITIONAL_FILES);
    additional_files.push(req.runtime_bundle.clone());

    let launch = command::translate(&req.command, &req.base_uri)?;
    let resolved = config::resolve(defaults, req.backend_config.as_ref(), &params)?;

    // Per-run env entries first, backend configuration env overlays them
    let mut env = config::parse_env_entries(env_entries)?;
    env.extend(resolved.env.clone());

    additional_files.extend(resolved.additional_files.iter().cloned());

    info!(
        "run = {}, uri = {}, command = {}, experiment_id = {}",
        req.run_id, req.base_uri, req.command, req.experiment_id
    );

    let name = format!("Gantry run for experiment {}", req.experiment_id);
    let mut submission = build_submission(
        &name,
        &launch,
        &resolved,
        &env,
        &additional_files,
        &req.runtime_bundle,
    )?;
    submission.user = req.user;
    submission.node_label = req.node_label;

    let submitter = JobSubmitter::new(Arc::clone(&connector));
    let app_id = submitter.submit(&submission).await?;

    info!("Backend launched application {}", app_id);
    Ok(SubmittedApp::new(app_id, req.run_id, connector))
}

/// Assembles the full submission request for a translated command
pub fn build_submission(
    name: &str,
    launch: &LaunchCommand,
    config: &ExecutionConfig,
    env: &HashMap<String, String>,
    additional_files: &[String],
    runtime_bundle: &str,
) -> Result<SubmissionRequest> {
    let env = merge_env(env);
    let files = upload_map(additional_files)?;
    let interpreter_bin = interpreter_binary(runtime_bundle)?;
    let script = launch_script(&config.conf_dir, &interpreter_bin, launch);

    debug!("env = {:?}", env);
    debug!("files to upload = {:?}", files);
    info!("Launch script:\n{}", script);

    Ok(SubmissionRequest {
        name: name.to_string(),
        script,
        resources: Resources {
            memory: config.memory.clone(),
            cores: config.num_cores,
        },
        instances: 1,
        files,
        env,
        file_systems: config.filesystems.clone(),
        queue: (!config.queue.is_empty()).then(|| config.queue.clone()),
        user: None,
        node_label: None,
        acls: Acls::default(),
    })
}

/// Overlays the fixed infrastructure variables on the caller's environment
fn merge_env(user_env: &HashMap<String, String>) -> HashMap<String, String> {
    let mut env = user_env.clone();
    for (key, value) in INFRASTRUCTURE_ENV {
        env.insert(key.to_string(), value.to_string());
    }
    env
}

/// Registers files for upload by basename
///
/// Two paths with the same basename collide: the last one registered wins.
/// Known limitation.
fn upload_map(paths: &[String]) -> Result<HashMap<String, String>> {
    let mut files = HashMap::new();
    for path in paths {
        files.insert(basename(path)?, absolute(path)?);
    }
    Ok(files)
}

/// Interpreter invocation for the runtime bundle: a `.pex` archive is
/// executable itself, anything else is an unpacked environment directory
fn interpreter_binary(runtime_bundle: &str) -> Result<String> {
    let base = basename(runtime_bundle)?;
    if runtime_bundle.ends_with(".pex") {
        Ok(format!("./{}", base))
    } else {
        Ok(format!("./{}/bin/python", base))
    }
}

/// Shell script executed in the remote container
fn launch_script(conf_dir: &str, interpreter_bin: &str, launch: &LaunchCommand) -> String {
    let mut invocation = vec![interpreter_bin.to_string()];
    if !launch.is_script() {
        invocation.push("-m".to_string());
    }
    invocation.push(launch.module_path.clone());
    if !launch.args.is_empty() {
        invocation.push(launch.args.clone());
    }

    format!(
        "set -x\nenv\nexport HADOOP_CONF_DIR={}\n{}\n",
        conf_dir,
        invocation.join(" ")
    )
}

fn basename(path: &str) -> Result<String> {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            BackendError::Configuration(format!("cannot determine basename of '{}'", path))
        })
}

fn absolute(path: &str) -> Result<String> {
    std::path::absolute(path)
        .map(|p| p.to_string_lossy().into_owned())
        .map_err(|e| BackendError::Configuration(format!("cannot resolve path '{}': {}", path, e)))
}

fn take_list_param(params: &mut HashMap<String, String>, key: &str) -> Vec<String> {
    match params.remove(key) {
        Some(value) => config::split_list(&value),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Interpreter;
    use async_trait::async_trait;
    use gantry_client::error::Result as ClientResult;
    use gantry_client::{ClientError, SchedulerApi};
    use gantry_core::domain::report::ApplicationReport;
    use serde_json::json;
    use std::sync::Mutex;

    const APP_ID: &str = "application_1623435249209_0016";

    #[derive(Default)]
    struct RecordingScheduler {
        submitted: Mutex<Vec<SubmissionRequest>>,
        fail: bool,
    }

    struct Handle(Arc<RecordingScheduler>);

    #[async_trait]
    impl SchedulerApi for Handle {
        async fn submit(&self, req: &SubmissionRequest) -> ClientResult<String> {
            if self.0.fail {
                return Err(ClientError::api_error(503, "queue full"));
            }
            self.0.submitted.lock().unwrap().push(req.clone());
            Ok(APP_ID.to_string())
        }

        async fn application_report(&self, _app_id: &str) -> ClientResult<ApplicationReport> {
            Err(ClientError::api_error(404, "not under test"))
        }

        async fn application_logs(
            &self,
            _app_id: &str,
        ) -> ClientResult<HashMap<String, String>> {
            Err(ClientError::api_error(404, "not under test"))
        }

        async fn kill_application(&self, _app_id: &str) -> ClientResult<()> {
            Err(ClientError::api_error(404, "not under test"))
        }
    }

    struct Connector(Arc<RecordingScheduler>);

    #[async_trait]
    impl SchedulerConnector for Connector {
        async fn connect(&self) -> ClientResult<Box<dyn SchedulerApi>> {
            Ok(Box::new(Handle(Arc::clone(&self.0))))
        }
    }

    fn module_launch() -> LaunchCommand {
        LaunchCommand {
            interpreter: Interpreter::Python,
            module_path: "s3://bucket/proj/mypkg.mod".to_string(),
            args: "arg1 arg2".to_string(),
        }
    }

    #[test]
    fn test_upload_map_collision_last_wins() {
        let files =
            upload_map(&["a.txt".to_string(), "sub/a.txt".to_string()]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files["a.txt"].ends_with("sub/a.txt"));
    }

    #[test]
    fn test_interpreter_binary() {
        assert_eq!(interpreter_binary("env.pex").unwrap(), "./env.pex");
        assert_eq!(
            interpreter_binary("/user/conda_env.zip").unwrap(),
            "./conda_env.zip/bin/python"
        );
    }

    #[test]
    fn test_launch_script_module_mode() {
        let script = launch_script("/etc/hadoop/conf", "./env.pex", &module_launch());
        assert!(script.starts_with("set -x\nenv\n"));
        assert!(script.contains("export HADOOP_CONF_DIR=/etc/hadoop/conf"));
        assert!(script.contains("./env.pex -m s3://bucket/proj/mypkg.mod arg1 arg2"));
    }

    #[test]
    fn test_launch_script_script_mode() {
        let launch = LaunchCommand {
            interpreter: Interpreter::Python,
            module_path: "s3://bucket/proj/train.py".to_string(),
            args: String::new(),
        };
        let script = launch_script("", "./env/bin/python", &launch);
        assert!(script.contains("./env/bin/python s3://bucket/proj/train.py"));
        assert!(!script.contains(" -m "));
    }

    #[test]
    fn test_merge_env_infrastructure_wins() {
        let mut user_env = HashMap::new();
        user_env.insert("PYTHONPATH".to_string(), "/custom".to_string());
        user_env.insert("MY_VAR".to_string(), "1".to_string());

        let env = merge_env(&user_env);
        assert_eq!(env["PYTHONPATH"], ".");
        assert_eq!(env["PEX_ROOT"], "./.pex");
        assert_eq!(env["GANTRY_CONFIG"], "./.gantry");
        assert_eq!(env["MY_VAR"], "1");
    }

    fn job_request() -> JobRequest {
        let mut backend_config = HashMap::new();
        backend_config.insert("queue".to_string(), json!("ml"));
        backend_config.insert("env".to_string(), json!(["SHARED=config"]));

        let mut params = HashMap::new();
        params.insert("env".to_string(), "SHARED=param,ONLY_PARAM=1".to_string());
        params.insert(
            "additional_files".to_string(),
            "a.txt,sub/a.txt".to_string(),
        );

        JobRequest {
            run_id: Uuid::new_v4(),
            experiment_id: "7".to_string(),
            command: "python mypkg.mod arg1 arg2".to_string(),
            base_uri: "s3://bucket/proj".to_string(),
            runtime_bundle: "/user/env.pex".to_string(),
            backend_config: Some(backend_config),
            params,
            user: None,
            node_label: None,
        }
    }

    #[tokio::test]
    async fn test_run_job_submits_assembled_request() {
        let scheduler = Arc::new(RecordingScheduler::default());
        let connector = Arc::new(Connector(Arc::clone(&scheduler)));
        let req = job_request();
        let run_id = req.run_id;

        let app = run_job(connector, &ConfigDefaults::default(), req)
            .await
            .unwrap();
        assert_eq!(app.application_id(), APP_ID);
        assert_eq!(app.run_id(), run_id);

        let submitted = scheduler.submitted.lock().unwrap();
        let request = &submitted[0];
        assert_eq!(request.name, "Gantry run for experiment 7");
        assert_eq!(request.queue.as_deref(), Some("ml"));
        assert_eq!(request.instances, 1);

        // backend config env overlays the per-run entry
        assert_eq!(request.env["SHARED"], "config");
        assert_eq!(request.env["ONLY_PARAM"], "1");
        assert_eq!(request.env["PYTHONPATH"], ".");

        // colliding basenames: the later registration wins
        assert!(request.files["a.txt"].ends_with("sub/a.txt"));
        assert!(request.files.contains_key("env.pex"));

        assert!(request.script.contains("./env.pex -m s3://bucket/proj/mypkg.mod arg1 arg2"));
    }

    #[tokio::test]
    async fn test_rejected_submission_is_a_submission_error() {
        let scheduler = Arc::new(RecordingScheduler {
            fail: true,
            ..Default::default()
        });
        let connector = Arc::new(Connector(scheduler));

        let err = run_job(connector, &ConfigDefaults::default(), job_request())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Submission(_)));
    }

    #[tokio::test]
    async fn test_missing_backend_config_fails_before_submission() {
        let scheduler = Arc::new(RecordingScheduler::default());
        let connector = Arc::new(Connector(Arc::clone(&scheduler)));
        let req = JobRequest {
            backend_config: None,
            ..job_request()
        };

        let err = run_job(connector, &ConfigDefaults::default(), req)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Configuration(_)));
        assert!(scheduler.submitted.lock().unwrap().is_empty());
    }
}
