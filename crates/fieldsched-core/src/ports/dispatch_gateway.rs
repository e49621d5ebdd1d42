//! Dispatch gateway port (driven/secondary port)
//!
//! Interface for reporting conflict outcomes back to the dispatch backend.
//! The engine records which resolution a dispatcher selected; the backend
//! owns the actual job mutation (reschedule, reassign). If a submission
//! fails, the caller must leave the conflict open so the dispatcher can
//! retry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    conflict::{ResolutionMethod, ResolutionSource},
    newtypes::ConflictKey,
};

/// Backend acknowledgement of a submitted resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReceipt {
    /// The conflict the resolution applies to
    pub key: ConflictKey,
    /// The method the backend recorded
    pub resolution: ResolutionMethod,
    /// When the backend acknowledged the submission
    pub acknowledged_at: DateTime<Utc>,
}

/// Outcome-reporting boundary with the dispatch backend
#[async_trait]
pub trait DispatchGateway: Send + Sync {
    /// Submits a resolution for a conflict
    ///
    /// Returns the backend's receipt on success. On error the conflict
    /// must remain open at the caller.
    async fn submit_resolution(
        &self,
        key: &ConflictKey,
        method: ResolutionMethod,
        source: ResolutionSource,
    ) -> anyhow::Result<ResolutionReceipt>;

    /// Reports that a dispatcher dismissed a conflict without action
    async fn submit_ignore(&self, key: &ConflictKey) -> anyhow::Result<()>;
}
