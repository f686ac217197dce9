//! Gantry Scheduler Client
//!
//! A simple, type-safe HTTP client for the cluster scheduler's REST gateway.
//!
//! This crate provides the single interface Gantry uses to submit, inspect,
//! and kill applications, plus the trait seams (`SchedulerApi`,
//! `SchedulerConnector`) that let the backend state machine run against other
//! schedulers or test fakes without modification.
//!
//! # Example
//!
//! ```no_run
//! use gantry_client::SchedulerClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gantry_client::ClientError> {
//!     let client = SchedulerClient::new("http://localhost:8088");
//!
//!     let report = client.application_report("application_1623435249209_0016").await?;
//!     println!("final status: {}", report.final_status);
//!     Ok(())
//! }
//! ```

pub mod error;

mod api;
mod apps;

pub use api::{HttpConnector, SchedulerApi, SchedulerConnector};
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the cluster scheduler REST gateway
///
/// Covers the four operations the backend needs:
/// - Application submission
/// - Application reports (single poll)
/// - Aggregated application logs
/// - Kill requests
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    /// Base URL of the scheduler gateway (e.g. "http://localhost:8088")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl SchedulerClient {
    /// Create a new scheduler client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the scheduler gateway
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new scheduler client with a custom HTTP client
    ///
    /// This allows configuring timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the scheduler gateway
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the request
    /// failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g. kill requests)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SchedulerClient::new("http://localhost:8088");
        assert_eq!(client.base_url(), "http://localhost:8088");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = SchedulerClient::new("http://localhost:8088/");
        assert_eq!(client.base_url(), "http://localhost:8088");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = SchedulerClient::with_client("http://localhost:8088", http_client);
        assert_eq!(client.base_url(), "http://localhost:8088");
    }
}
