//! Conflict resolution executor
//!
//! Applies dispatcher- or policy-selected resolutions by submitting them
//! through the dispatch gateway. The engine never mutates jobs itself; the
//! backend owns the actual reschedule/reassign. A conflict is only stamped
//! resolved after the gateway acknowledges the submission - on failure it
//! stays open so the dispatcher can retry.

use std::sync::Arc;

use tracing::{debug, info, warn};

use fieldsched_core::{
    domain::conflict::{Conflict, ResolutionMethod, ResolutionSource},
    ports::dispatch_gateway::DispatchGateway,
};

use crate::error::ConflictError;

/// Result of a batch resolution operation
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub resolved: u32,
    pub failed: u32,
    pub errors: Vec<String>,
}

/// Applies conflict resolutions through the dispatch gateway
pub struct ConflictResolver {
    gateway: Arc<dyn DispatchGateway>,
}

impl ConflictResolver {
    pub fn new(gateway: Arc<dyn DispatchGateway>) -> Self {
        Self { gateway }
    }

    /// Apply a resolution to a conflict
    ///
    /// Submits to the gateway first and only marks the conflict resolved
    /// on acknowledgement.
    pub async fn apply_resolution(
        &self,
        conflict: Conflict,
        method: ResolutionMethod,
        source: ResolutionSource,
    ) -> Result<Conflict, ConflictError> {
        info!(
            key = %conflict.key(),
            method = %method,
            source = %source,
            "Applying conflict resolution"
        );

        if conflict.is_resolved() {
            return Err(ConflictError::AlreadyResolved(conflict.key().to_string()));
        }

        let receipt = self
            .gateway
            .submit_resolution(conflict.key(), method, source)
            .await?;

        debug!(
            key = %receipt.key,
            acknowledged_at = %receipt.acknowledged_at,
            "Dispatch backend acknowledged resolution"
        );

        Ok(conflict.resolve(method, source))
    }

    /// Report a dispatcher's ignore to the backend
    ///
    /// The active-list removal itself is the caller's concern (see the
    /// resolution module); this only notifies the backend.
    pub async fn apply_ignore(&self, conflict: &Conflict) -> Result<(), ConflictError> {
        debug!(key = %conflict.key(), "Reporting ignored conflict");
        self.gateway.submit_ignore(conflict.key()).await?;
        Ok(())
    }

    /// Resolve multiple conflicts with the same method
    pub async fn resolve_batch(
        &self,
        conflicts: Vec<Conflict>,
        method: ResolutionMethod,
        source: ResolutionSource,
    ) -> BatchResult {
        let mut result = BatchResult {
            resolved: 0,
            failed: 0,
            errors: Vec::new(),
        };

        for conflict in conflicts {
            match self.apply_resolution(conflict, method, source).await {
                Ok(_) => result.resolved += 1,
                Err(e) => {
                    warn!(error = %e, "Batch resolution failed for conflict");
                    result.failed += 1;
                    result.errors.push(e.to_string());
                }
            }
        }

        result
    }
}
