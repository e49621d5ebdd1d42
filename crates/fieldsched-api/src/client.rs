//! Dispatch backend API client
//!
//! Provides a typed HTTP client for the dispatch backend's REST API.
//! Handles endpoint construction, JSON (de)serialization, and non-2xx
//! status mapping.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fieldsched_api::client::DispatchClient;
//! use fieldsched_core::ports::job_source::DateWindow;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DispatchClient::new("https://dispatch.example.com/api/v1", 30)?;
//! let window = DateWindow::single_day("2024-01-15".parse()?);
//! let document = client.get_jobs(&window).await?;
//! println!("{} jobs in window", document.jobs.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use fieldsched_core::{
    domain::{
        conflict::{ResolutionMethod, ResolutionSource},
        newtypes::ConflictKey,
    },
    ports::job_source::DateWindow,
};

use crate::payload::{JobsDocument, ReceiptPayload};

/// HTTP client for dispatch backend API calls
///
/// Wraps `reqwest::Client` with base URL construction. The base URL is
/// configurable so integration tests can point at a mock server.
pub struct DispatchClient {
    client: Client,
    base_url: String,
}

impl DispatchClient {
    /// Creates a new client for the given base URL
    ///
    /// # Arguments
    /// * `base_url` - Backend API root, e.g. `https://host/api/v1`
    /// * `timeout_secs` - Per-request timeout
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches all jobs scheduled inside the window
    ///
    /// `GET {base}/jobs?from=YYYY-MM-DD&to=YYYY-MM-DD`
    pub async fn get_jobs(&self, window: &DateWindow) -> Result<JobsDocument> {
        let url = format!("{}/jobs", self.base_url);
        debug!(url = %url, from = %window.from(), to = %window.to(), "Fetching jobs");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("from", window.from().to_string()),
                ("to", window.to().to_string()),
            ])
            .send()
            .await
            .context("Job query request failed")?;

        let response = check_status(response, "job query").await?;
        response
            .json::<JobsDocument>()
            .await
            .context("Failed to parse job query response")
    }

    /// Submits a conflict resolution
    ///
    /// `POST {base}/conflicts/{key}/resolution`
    pub async fn post_resolution(
        &self,
        key: &ConflictKey,
        method: ResolutionMethod,
        source: ResolutionSource,
    ) -> Result<ReceiptPayload> {
        let url = format!("{}/conflicts/{}/resolution", self.base_url, key);
        debug!(url = %url, method = %method, "Submitting resolution");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "resolution": method.to_string(),
                "source": source.to_string(),
            }))
            .send()
            .await
            .context("Resolution submission request failed")?;

        let response = check_status(response, "resolution submission").await?;
        response
            .json::<ReceiptPayload>()
            .await
            .context("Failed to parse resolution receipt")
    }

    /// Reports an ignored conflict
    ///
    /// `POST {base}/conflicts/{key}/ignore`
    pub async fn post_ignore(&self, key: &ConflictKey) -> Result<()> {
        let url = format!("{}/conflicts/{}/ignore", self.base_url, key);
        debug!(url = %url, "Reporting ignored conflict");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .context("Ignore submission request failed")?;

        check_status(response, "ignore submission").await?;
        Ok(())
    }
}

/// Maps non-success statuses to errors carrying the backend's body text
async fn check_status(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => anyhow::bail!("{what} failed: not found: {body}"),
        StatusCode::CONFLICT => anyhow::bail!("{what} failed: conflict state changed: {body}"),
        _ => anyhow::bail!("{what} failed with status {status}: {body}"),
    }
}
