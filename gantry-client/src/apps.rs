//! Application-related API endpoints

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use gantry_core::domain::report::ApplicationReport;
use gantry_core::dto::app::{SubmissionRequest, SubmittedApplication};

use crate::api::SchedulerApi;
use crate::error::Result;
use crate::SchedulerClient;

impl SchedulerClient {
    /// Submit an application to the scheduler
    ///
    /// # Arguments
    /// * `req` - The assembled submission request
    ///
    /// # Returns
    /// The application id assigned by the scheduler
    pub async fn submit(&self, req: &SubmissionRequest) -> Result<String> {
        let url = format!("{}/api/apps", self.base_url);
        debug!("Submitting application '{}' to {}", req.name, url);

        let response = self.client.post(&url).json(req).send().await?;

        let submitted: SubmittedApplication = self.handle_response(response).await?;
        Ok(submitted.id)
    }

    /// Fetch the current report for an application
    ///
    /// # Arguments
    /// * `app_id` - The scheduler-assigned application id
    pub async fn application_report(&self, app_id: &str) -> Result<ApplicationReport> {
        let url = format!("{}/api/apps/{}/report", self.base_url, app_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Fetch aggregated logs for an application
    ///
    /// # Arguments
    /// * `app_id` - The scheduler-assigned application id
    ///
    /// # Returns
    /// A mapping of container id to log text
    pub async fn application_logs(&self, app_id: &str) -> Result<HashMap<String, String>> {
        let url = format!("{}/api/apps/{}/logs", self.base_url, app_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Request that the scheduler kill an application
    ///
    /// # Arguments
    /// * `app_id` - The scheduler-assigned application id
    pub async fn kill_application(&self, app_id: &str) -> Result<()> {
        let url = format!("{}/api/apps/{}/kill", self.base_url, app_id);
        let response = self.client.post(&url).send().await?;

        self.handle_empty_response(response).await
    }
}

#[async_trait]
impl SchedulerApi for SchedulerClient {
    async fn submit(&self, req: &SubmissionRequest) -> Result<String> {
        SchedulerClient::submit(self, req).await
    }

    async fn application_report(&self, app_id: &str) -> Result<ApplicationReport> {
        SchedulerClient::application_report(self, app_id).await
    }

    async fn application_logs(&self, app_id: &str) -> Result<HashMap<String, String>> {
        SchedulerClient::application_logs(self, app_id).await
    }

    async fn kill_application(&self, app_id: &str) -> Result<()> {
        SchedulerClient::kill_application(self, app_id).await
    }
}
