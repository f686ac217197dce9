//! Error types for the execution backend

use gantry_client::ClientError;
use thiserror::Error;

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur while submitting or tracking a job
///
/// All variants are fatal to the operation that raised them; transient
/// log-fetch failures are retried inside [`crate::run::SubmittedApp::logs`]
/// and degrade to a "logs unavailable" result instead of surfacing here.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend configuration is missing, empty, or carries an invalid value
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The command's interpreter is not in the supported set
    #[error("this backend supports only python jobs, got '{0}'")]
    UnsupportedInterpreter(String),

    /// The command cannot be split into an interpreter and a module
    #[error("malformed command: '{0}'")]
    MalformedCommand(String),

    /// The scheduler rejected the submission request
    ///
    /// The scheduler may still have accepted the job before the failure
    /// surfaced; no reconciliation is attempted.
    #[error("failed to submit application to the scheduler: {0}")]
    Submission(#[source] ClientError),

    /// The scheduler reported a terminal state outside the known set
    #[error("application {app_id} has invalid status: {state}")]
    UnknownState { app_id: String, state: String },

    /// Transport failure while polling or cancelling
    #[error("scheduler request failed: {0}")]
    Scheduler(#[from] ClientError),
}
