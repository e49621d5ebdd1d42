//! RestDispatchProvider - port implementations over the REST client
//!
//! Wraps the [`DispatchClient`] and fulfils the [`JobSource`] and
//! [`DispatchGateway`] port contracts, converting wire payloads into
//! domain types at the boundary.

use anyhow::{Context, Result};
use async_trait::async_trait;

use fieldsched_core::{
    domain::{
        conflict::{ResolutionMethod, ResolutionSource},
        job::Job,
        newtypes::ConflictKey,
        technician::TechnicianDirectory,
    },
    ports::{
        dispatch_gateway::{DispatchGateway, ResolutionReceipt},
        job_source::{DateWindow, JobSource},
    },
};

use crate::client::DispatchClient;
use crate::payload::ReceiptPayload;

/// REST-backed implementation of the core ports
pub struct RestDispatchProvider {
    client: DispatchClient,
}

impl RestDispatchProvider {
    pub fn new(client: DispatchClient) -> Self {
        Self { client }
    }

    /// Fetches jobs together with the technician directory
    ///
    /// The `JobSource` port only carries jobs; callers that also want
    /// display names for descriptions use this instead.
    pub async fn fetch_snapshot(
        &self,
        window: &DateWindow,
    ) -> Result<(Vec<Job>, TechnicianDirectory)> {
        let document = self.client.get_jobs(window).await?;
        let directory = document.technician_directory();
        Ok((document.into_jobs(), directory))
    }
}

fn receipt_to_domain(receipt: ReceiptPayload) -> Result<ResolutionReceipt> {
    Ok(ResolutionReceipt {
        key: ConflictKey::new(receipt.key).context("Backend returned malformed conflict key")?,
        resolution: receipt
            .resolution
            .parse::<ResolutionMethod>()
            .context("Backend returned unknown resolution method")?,
        acknowledged_at: receipt.acknowledged_at,
    })
}

#[async_trait]
impl JobSource for RestDispatchProvider {
    async fn fetch_jobs(&self, window: &DateWindow) -> Result<Vec<Job>> {
        let document = self.client.get_jobs(window).await?;
        Ok(document.into_jobs())
    }
}

#[async_trait]
impl DispatchGateway for RestDispatchProvider {
    async fn submit_resolution(
        &self,
        key: &ConflictKey,
        method: ResolutionMethod,
        source: ResolutionSource,
    ) -> Result<ResolutionReceipt> {
        let receipt = self.client.post_resolution(key, method, source).await?;
        receipt_to_domain(receipt)
    }

    async fn submit_ignore(&self, key: &ConflictKey) -> Result<()> {
        self.client.post_ignore(key).await
    }
}
