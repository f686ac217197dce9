//! Gantry Backend
//!
//! Submits a resolved entry-point command as a containerized job on a cluster
//! scheduler and tracks it through an asynchronous handle.
//!
//! Architecture:
//! - Config: merge a backend configuration mapping with explicit defaults
//! - Command: split a shell command into interpreter, module, and arguments
//! - Submit: assemble and send the submission request, returning a handle
//! - Run: the handle itself with its blocking wait loop, cancellation,
//!   status polls, and log retrieval with retry
//! - Status: translate scheduler-native terminal states into [`RunStatus`]
//!
//! The backend talks to the scheduler exclusively through the
//! `SchedulerConnector`/`SchedulerApi` seams from `gantry-client`, so other
//! scheduler kinds (or test fakes) plug in without touching the state
//! machine.

pub mod command;
pub mod config;
pub mod error;
pub mod run;
pub mod status;
pub mod submit;

pub use error::{BackendError, Result};
pub use run::SubmittedApp;
pub use submit::{JobRequest, JobSubmitter, run_job};

pub use gantry_core::domain::run::RunStatus;
