//! Submitted application handle
//!
//! [`SubmittedApp`] correlates an internal run with an externally scheduled
//! application and owns its lifecycle from the caller's side: a blocking
//! wait loop, single status polls, cancellation, and log retrieval with
//! retry. Each discrete operation acquires its own scoped scheduler
//! connection; nothing is held across the handle's lifetime, so multiple
//! handles can be polled concurrently with no shared state between them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

use gantry_client::SchedulerConnector;
use gantry_core::domain::report::FinalStatus;
use gantry_core::domain::run::RunStatus;

use crate::error::Result;
use crate::status;

/// Interval between polls inside [`SubmittedApp::wait`]
const POLL_STATUS_INTERVAL: Duration = Duration::from_secs(30);

/// Attempt budget for log retrieval
const LOG_FETCH_ATTEMPTS: u32 = 15;

/// Pause between log-retrieval attempts
const LOG_FETCH_INTERVAL: Duration = Duration::from_secs(3);

/// Caller-held handle to an application running on the cluster scheduler
pub struct SubmittedApp {
    app_id: String,
    run_id: Uuid,
    connector: Arc<dyn SchedulerConnector>,
    poll_interval: Duration,
    log_attempts: u32,
    log_interval: Duration,
}

impl std::fmt::Debug for SubmittedApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmittedApp")
            .field("app_id", &self.app_id)
            .field("run_id", &self.run_id)
            .field("poll_interval", &self.poll_interval)
            .field("log_attempts", &self.log_attempts)
            .field("log_interval", &self.log_interval)
            .finish_non_exhaustive()
    }
}

impl SubmittedApp {
    /// Creates a handle for an already-submitted application
    pub fn new(app_id: String, run_id: Uuid, connector: Arc<dyn SchedulerConnector>) -> Self {
        Self {
            app_id,
            run_id,
            connector,
            poll_interval: POLL_STATUS_INTERVAL,
            log_attempts: LOG_FETCH_ATTEMPTS,
            log_interval: LOG_FETCH_INTERVAL,
        }
    }

    /// Overrides the wait-loop poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Overrides the log-retrieval retry policy
    pub fn with_log_retry(mut self, attempts: u32, interval: Duration) -> Self {
        self.log_attempts = attempts;
        self.log_interval = interval;
        self
    }

    /// The scheduler-assigned application id
    pub fn application_id(&self) -> &str {
        &self.app_id
    }

    /// The internal run id this application is correlated with
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Blocks until the application reaches a terminal state
    ///
    /// Polls the application report at a fixed interval over a single scoped
    /// connection, logging the report summary whenever the native state
    /// changes. There is no overall timeout and no cancellation token;
    /// callers needing bounded waiting wrap this with their own deadline
    /// (e.g. `tokio::time::timeout`).
    ///
    /// # Returns
    /// `true` iff the terminal status translates to [`RunStatus::Finished`]
    pub async fn wait(&self) -> Result<bool> {
        let client = self.connector.connect().await?;
        let mut last_state: Option<String> = None;

        loop {
            let report = client.application_report(&self.app_id).await?;

            if last_state.as_deref() != Some(report.state.as_str()) {
                info!("{}", report.summary());
            }

            if report.final_status == FinalStatus::Failed {
                info!("Application {} has failed", self.app_id);
            }

            if report.final_status.is_terminal() {
                let outcome = status::translate(&self.app_id, &report.final_status)?;
                return Ok(outcome == RunStatus::Finished);
            }

            last_state = Some(report.state);
            sleep(self.poll_interval).await;
        }
    }

    /// Requests that the scheduler kill the application
    ///
    /// Fire-and-forget: no confirmation polling is performed.
    pub async fn cancel(&self) -> Result<()> {
        let client = self.connector.connect().await?;
        client.kill_application(&self.app_id).await?;
        Ok(())
    }

    /// Polls the application once and translates its status
    pub async fn status(&self) -> Result<RunStatus> {
        let client = self.connector.connect().await?;
        let report = client.application_report(&self.app_id).await?;
        status::translate(&self.app_id, &report.final_status)
    }

    /// Retrieves aggregated application logs, retrying transient failures
    ///
    /// Succeeds immediately when `expected` is unset or the number of log
    /// entries collected matches it. Exhausting the attempt budget degrades
    /// to `None` ("logs unavailable"), not an error.
    pub async fn logs(&self, expected: Option<usize>) -> Option<HashMap<String, String>> {
        for attempt in 1..=self.log_attempts {
            match self.fetch_logs_once().await {
                Ok(logs) => {
                    match expected {
                        Some(n) => info!("Got {}/{} log files", logs.len(), n),
                        None => info!("Got {} log files", logs.len()),
                    }
                    if expected.is_none() || expected == Some(logs.len()) {
                        return Some(logs);
                    }
                }
                Err(e) => {
                    warn!(
                        "Cannot collect logs (attempt {}/{}): {}",
                        attempt, self.log_attempts, e
                    );
                }
            }
            sleep(self.log_interval).await;
        }
        None
    }

    async fn fetch_logs_once(&self) -> gantry_client::Result<HashMap<String, String>> {
        let client = self.connector.connect().await?;
        client.application_logs(&self.app_id).await
    }
}
