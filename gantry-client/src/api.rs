//! Scheduler trait seams
//!
//! `SchedulerApi` is the capability the backend state machine polls against;
//! `SchedulerConnector` models scoped connections: a client is acquired for
//! one discrete operation (submit, poll-once, wait-loop, cancel, log fetch)
//! and released afterwards, never held for the handle's lifetime. Other
//! scheduler kinds and test fakes implement these traits to plug into the
//! backend without touching the state machine.

use async_trait::async_trait;
use std::collections::HashMap;

use gantry_core::domain::report::ApplicationReport;
use gantry_core::dto::app::SubmissionRequest;

use crate::error::Result;
use crate::SchedulerClient;

/// Operations the backend needs from a cluster scheduler
#[async_trait]
pub trait SchedulerApi: Send + Sync {
    /// Submit an application, returning its opaque id
    async fn submit(&self, req: &SubmissionRequest) -> Result<String>;

    /// Fetch the current report for an application
    async fn application_report(&self, app_id: &str) -> Result<ApplicationReport>;

    /// Fetch aggregated logs, keyed by container id
    async fn application_logs(&self, app_id: &str) -> Result<HashMap<String, String>>;

    /// Request that the scheduler kill an application
    async fn kill_application(&self, app_id: &str) -> Result<()>;
}

/// Acquires a scheduler client for the duration of one operation
#[async_trait]
pub trait SchedulerConnector: Send + Sync {
    /// Acquire a fresh client
    async fn connect(&self) -> Result<Box<dyn SchedulerApi>>;
}

/// Connector producing `SchedulerClient`s against a fixed gateway URL
#[derive(Debug, Clone)]
pub struct HttpConnector {
    base_url: String,
}

impl HttpConnector {
    /// Create a connector for the given scheduler gateway
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SchedulerConnector for HttpConnector {
    async fn connect(&self) -> Result<Box<dyn SchedulerApi>> {
        Ok(Box::new(SchedulerClient::new(self.base_url.clone())))
    }
}
