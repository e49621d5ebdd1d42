//! Conflict use cases - orchestrate detection, policy, and resolution
//!
//! These use cases tie the detection engine, policy engine, and resolver
//! into the workflows the CLI (and any other host) drives.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use fieldsched_core::domain::{
    conflict::{Conflict, ResolutionMethod, ResolutionSource},
    job::Job,
    newtypes::RunId,
    technician::TechnicianDirectory,
};

use crate::{
    engine::{ConflictEngine, SeverityCounts},
    error::ConflictError,
    policy::{PolicyAction, PolicyEngine},
    resolver::ConflictResolver,
};

/// Outcome of a detection pass after policy application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionOutcome {
    /// Identifier of the underlying detection pass
    pub run_id: RunId,
    /// When the pass ran
    pub detected_at: DateTime<Utc>,
    /// Jobs in the input snapshot
    pub jobs_scanned: usize,
    /// Jobs with a usable time window
    pub eligible_jobs: usize,
    /// Conflicts awaiting dispatcher action
    pub open: Vec<Conflict>,
    /// Conflicts auto-resolved by policy (gateway-acknowledged)
    pub auto_resolved: Vec<Conflict>,
    /// Conflicts dropped from the active list by an ignore rule
    pub auto_ignored: Vec<Conflict>,
}

impl DetectionOutcome {
    /// Per-severity tally of the open conflicts
    #[must_use]
    pub fn open_severity_counts(&self) -> SeverityCounts {
        SeverityCounts::tally(&self.open)
    }

    /// Total conflicts the detectors emitted, including policy-handled ones
    #[must_use]
    pub fn total_detected(&self) -> usize {
        self.open.len() + self.auto_resolved.len() + self.auto_ignored.len()
    }
}

/// Orchestrates detection + policy evaluation + auto-resolution
pub struct DetectConflictsUseCase {
    policy_engine: PolicyEngine,
    resolver: Option<Arc<ConflictResolver>>,
}

impl DetectConflictsUseCase {
    pub fn new(policy_engine: PolicyEngine, resolver: Option<Arc<ConflictResolver>>) -> Self {
        Self {
            policy_engine,
            resolver,
        }
    }

    /// Detection with no policy and no gateway: everything stays open
    #[must_use]
    pub fn offline() -> Self {
        Self {
            policy_engine: PolicyEngine::manual_only(),
            resolver: None,
        }
    }

    /// Run a detection pass and apply the auto-action policy
    ///
    /// Policy `ignore` drops the conflict locally; `resolve:<method>` is
    /// routed through the resolver when one is configured and falls back
    /// to leaving the conflict open when the submission fails (or no
    /// resolver is available).
    pub async fn run(&self, jobs: &[Job], directory: &TechnicianDirectory) -> DetectionOutcome {
        let report = ConflictEngine::detect(jobs, directory);

        let mut open = Vec::new();
        let mut auto_resolved = Vec::new();
        let mut auto_ignored = Vec::new();

        for conflict in report.conflicts {
            match self.policy_engine.evaluate(&conflict) {
                PolicyAction::Manual => open.push(conflict),
                PolicyAction::Ignore => {
                    debug!(key = %conflict.key(), "Conflict suppressed by policy");
                    auto_ignored.push(conflict);
                }
                PolicyAction::Resolve(method) => match &self.resolver {
                    Some(resolver) => {
                        match resolver
                            .apply_resolution(conflict.clone(), method, ResolutionSource::Policy)
                            .await
                        {
                            Ok(resolved) => {
                                info!(
                                    key = %resolved.key(),
                                    method = %method,
                                    "Conflict auto-resolved by policy"
                                );
                                auto_resolved.push(resolved);
                            }
                            Err(e) => {
                                warn!(
                                    key = %conflict.key(),
                                    error = %e,
                                    "Auto-resolution failed, leaving conflict open"
                                );
                                open.push(conflict);
                            }
                        }
                    }
                    None => {
                        warn!(
                            key = %conflict.key(),
                            "Policy wants auto-resolution but no gateway is configured"
                        );
                        open.push(conflict);
                    }
                },
            }
        }

        DetectionOutcome {
            run_id: report.run_id,
            detected_at: report.detected_at,
            jobs_scanned: report.jobs_scanned,
            eligible_jobs: report.eligible_jobs,
            open,
            auto_resolved,
            auto_ignored,
        }
    }
}

/// Orchestrates dispatcher-initiated conflict resolution
pub struct ResolveConflictUseCase {
    resolver: Arc<ConflictResolver>,
}

impl ResolveConflictUseCase {
    pub fn new(resolver: Arc<ConflictResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve a conflict on behalf of a dispatcher
    pub async fn resolve(
        &self,
        conflict: Conflict,
        method: ResolutionMethod,
    ) -> Result<Conflict, ConflictError> {
        self.resolver
            .apply_resolution(conflict, method, ResolutionSource::User)
            .await
    }

    /// Report a dispatcher's ignore to the backend
    pub async fn ignore(&self, conflict: &Conflict) -> Result<(), ConflictError> {
        self.resolver.apply_ignore(conflict).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use fieldsched_core::{
        config::PolicyRule,
        domain::newtypes::{ConflictKey, JobId, LocationId, TechnicianId, TimeOfDay},
        domain::job::LocationRef,
        ports::dispatch_gateway::{DispatchGateway, ResolutionReceipt},
    };

    struct StubGateway {
        fail: bool,
    }

    #[async_trait]
    impl DispatchGateway for StubGateway {
        async fn submit_resolution(
            &self,
            key: &ConflictKey,
            method: ResolutionMethod,
            _source: ResolutionSource,
        ) -> anyhow::Result<ResolutionReceipt> {
            if self.fail {
                anyhow::bail!("backend unavailable");
            }
            Ok(ResolutionReceipt {
                key: key.clone(),
                resolution: method,
                acknowledged_at: Utc::now(),
            })
        }

        async fn submit_ignore(&self, _key: &ConflictKey) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("backend unavailable");
            }
            Ok(())
        }
    }

    fn snapshot() -> Vec<Job> {
        // Same technician, same location, overlapping: emits one conflict
        // of each kind.
        let date: NaiveDate = "2024-01-15".parse().unwrap();
        let base = |id: &str, start: &str, end: &str| {
            Job::new(JobId::new(id).unwrap(), date)
                .with_times(
                    TimeOfDay::parse(start).unwrap(),
                    TimeOfDay::parse(end).unwrap(),
                )
                .with_technician(TechnicianId::new("tech-a").unwrap())
                .with_location(LocationRef {
                    id: LocationId::new("loc-x").unwrap(),
                    name: None,
                })
        };
        vec![
            base("job-1", "09:00", "10:00"),
            base("job-2", "09:30", "10:30"),
        ]
    }

    #[tokio::test]
    async fn test_offline_keeps_everything_open() {
        let use_case = DetectConflictsUseCase::offline();
        let outcome = use_case
            .run(&snapshot(), &TechnicianDirectory::new())
            .await;

        assert_eq!(outcome.open.len(), 3);
        assert!(outcome.auto_resolved.is_empty());
        assert!(outcome.auto_ignored.is_empty());
        assert_eq!(outcome.total_detected(), 3);
    }

    #[tokio::test]
    async fn test_ignore_rule_suppresses_locally() {
        let rules = vec![PolicyRule {
            kind: "location_conflict".to_string(),
            min_severity: None,
            action: "ignore".to_string(),
        }];
        let use_case = DetectConflictsUseCase::new(PolicyEngine::new("manual", &rules), None);

        let outcome = use_case
            .run(&snapshot(), &TechnicianDirectory::new())
            .await;

        assert_eq!(outcome.open.len(), 2);
        assert_eq!(outcome.auto_ignored.len(), 1);
        assert_eq!(outcome.open_severity_counts().medium, 0);
    }

    #[tokio::test]
    async fn test_resolve_rule_routes_through_gateway() {
        let rules = vec![PolicyRule {
            kind: "technician_double_booking".to_string(),
            min_severity: None,
            action: "resolve:reassign_technician".to_string(),
        }];
        let resolver = Arc::new(ConflictResolver::new(Arc::new(StubGateway {
            fail: false,
        })));
        let use_case =
            DetectConflictsUseCase::new(PolicyEngine::new("manual", &rules), Some(resolver));

        let outcome = use_case
            .run(&snapshot(), &TechnicianDirectory::new())
            .await;

        assert_eq!(outcome.open.len(), 2);
        assert_eq!(outcome.auto_resolved.len(), 1);
        let resolved = &outcome.auto_resolved[0];
        assert_eq!(
            resolved.resolution(),
            Some(ResolutionMethod::ReassignTechnician)
        );
        assert_eq!(resolved.resolved_by(), Some(ResolutionSource::Policy));
    }

    #[tokio::test]
    async fn test_failed_auto_resolution_leaves_conflict_open() {
        let rules = vec![PolicyRule {
            kind: "technician_double_booking".to_string(),
            min_severity: None,
            action: "resolve:reassign_technician".to_string(),
        }];
        let resolver = Arc::new(ConflictResolver::new(Arc::new(StubGateway { fail: true })));
        let use_case =
            DetectConflictsUseCase::new(PolicyEngine::new("manual", &rules), Some(resolver));

        let outcome = use_case
            .run(&snapshot(), &TechnicianDirectory::new())
            .await;

        assert_eq!(outcome.open.len(), 3);
        assert!(outcome.auto_resolved.is_empty());
        assert!(outcome.open.iter().all(|c| !c.is_resolved()));
    }

    #[tokio::test]
    async fn test_resolve_rule_without_gateway_stays_open() {
        let rules = vec![PolicyRule {
            kind: "time_overlap".to_string(),
            min_severity: None,
            action: "resolve:reschedule_job".to_string(),
        }];
        let use_case = DetectConflictsUseCase::new(PolicyEngine::new("manual", &rules), None);

        let outcome = use_case
            .run(&snapshot(), &TechnicianDirectory::new())
            .await;

        assert_eq!(outcome.open.len(), 3);
        assert!(outcome.auto_resolved.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_use_case_stamps_user_source() {
        let resolver = Arc::new(ConflictResolver::new(Arc::new(StubGateway {
            fail: false,
        })));
        let use_case = ResolveConflictUseCase::new(resolver);

        let conflict = ConflictEngine::detect(&snapshot(), &TechnicianDirectory::new())
            .conflicts
            .remove(0);

        let resolved = use_case
            .resolve(conflict, ResolutionMethod::RescheduleJob)
            .await
            .unwrap();

        assert_eq!(resolved.resolved_by(), Some(ResolutionSource::User));
    }
}
