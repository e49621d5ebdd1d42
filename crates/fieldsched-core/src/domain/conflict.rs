//! Conflict domain entities
//!
//! This module defines types for representing, classifying, and resolving
//! scheduling conflicts between pairs of jobs. A conflict is derived data:
//! each detection pass rebuilds the full list from the current job snapshot,
//! and resolve/ignore actions are applied on top of that fresh list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{ConflictKey, JobId, RunId};

// ============================================================================
// ConflictKind and Severity
// ============================================================================

/// The dimension along which two jobs collide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Two jobs on the same date with intersecting time windows
    TimeOverlap,
    /// One technician assigned to two intersecting jobs
    TechnicianDoubleBooking,
    /// Two intersecting jobs at the same physical location
    LocationConflict,
    /// Reserved for equipment/vehicle contention; not emitted by the
    /// current detectors
    ResourceConflict,
}

impl ConflictKind {
    /// Severity is a pure function of the kind; there is no per-instance
    /// override.
    ///
    /// A double-booking is the only kind describing a physical
    /// impossibility, so it alone is critical. Location contention is
    /// advisory: several technicians can legitimately work one site.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            ConflictKind::TimeOverlap => Severity::High,
            ConflictKind::TechnicianDoubleBooking => Severity::Critical,
            ConflictKind::LocationConflict => Severity::Medium,
            ConflictKind::ResourceConflict => Severity::Low,
        }
    }

    /// Wire/key label for this kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ConflictKind::TimeOverlap => "time_overlap",
            ConflictKind::TechnicianDoubleBooking => "technician_double_booking",
            ConflictKind::LocationConflict => "location_conflict",
            ConflictKind::ResourceConflict => "resource_conflict",
        }
    }
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConflictKind {
    type Err = super::errors::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time_overlap" => Ok(ConflictKind::TimeOverlap),
            "technician_double_booking" => Ok(ConflictKind::TechnicianDoubleBooking),
            "location_conflict" => Ok(ConflictKind::LocationConflict),
            "resource_conflict" => Ok(ConflictKind::ResourceConflict),
            other => Err(super::errors::DomainError::ValidationFailed(format!(
                "unknown conflict kind: {other}"
            ))),
        }
    }
}

/// How urgently a conflict needs dispatcher attention
///
/// Ordered so that `Critical` compares greatest; policy rules use the
/// ordering for minimum-severity matching.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Wire label for this severity
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = super::errors::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(super::errors::DomainError::ValidationFailed(format!(
                "unknown severity: {other}"
            ))),
        }
    }
}

// ============================================================================
// Resolution metadata
// ============================================================================

/// The action a dispatcher selected to address a conflict
///
/// The engine only records the selection; actually rescheduling or
/// reassigning the job is delegated to the dispatch backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    /// Move one of the jobs to a different slot
    RescheduleJob,
    /// Assign one of the jobs to a different technician
    ReassignTechnician,
    /// Split one job into multiple visits
    SplitJob,
    /// Handled outside the system; no automated follow-up
    ManualResolution,
}

impl std::fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResolutionMethod::RescheduleJob => "reschedule_job",
            ResolutionMethod::ReassignTechnician => "reassign_technician",
            ResolutionMethod::SplitJob => "split_job",
            ResolutionMethod::ManualResolution => "manual_resolution",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ResolutionMethod {
    type Err = super::errors::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reschedule_job" => Ok(ResolutionMethod::RescheduleJob),
            "reassign_technician" => Ok(ResolutionMethod::ReassignTechnician),
            "split_job" => Ok(ResolutionMethod::SplitJob),
            "manual_resolution" => Ok(ResolutionMethod::ManualResolution),
            other => Err(super::errors::DomainError::ValidationFailed(format!(
                "unknown resolution method: {other}"
            ))),
        }
    }
}

/// Who or what initiated a conflict resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// A dispatcher chose the resolution
    User,
    /// Automatic resolution from a configured policy rule
    Policy,
    /// System-initiated resolution
    System,
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResolutionSource::User => "user",
            ResolutionSource::Policy => "policy",
            ResolutionSource::System => "system",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Conflict
// ============================================================================

/// A detected scheduling conflict between exactly two jobs
///
/// The key is deterministic over `(kind, sorted job pair)`, so the same
/// pair re-detected in a later pass carries the same identity and can be
/// diffed across passes. `detected_at` and `run_id` describe the pass that
/// produced this instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    key: ConflictKey,
    kind: ConflictKind,
    severity: Severity,
    description: String,
    jobs: [JobId; 2],
    run_id: RunId,
    detected_at: DateTime<Utc>,
    resolution: Option<ResolutionMethod>,
    resolved_at: Option<DateTime<Utc>>,
    resolved_by: Option<ResolutionSource>,
}

impl Conflict {
    /// Creates a new open conflict for a job pair
    ///
    /// The pair is stored sorted so that `(a, b)` and `(b, a)` produce
    /// identical conflicts; severity is derived from the kind.
    #[must_use]
    pub fn new(
        kind: ConflictKind,
        a: JobId,
        b: JobId,
        description: impl Into<String>,
        run_id: RunId,
        detected_at: DateTime<Utc>,
    ) -> Self {
        let key = ConflictKey::compose(kind.as_str(), &a, &b);
        let jobs = if a <= b { [a, b] } else { [b, a] };
        Self {
            key,
            kind,
            severity: kind.severity(),
            description: description.into(),
            jobs,
            run_id,
            detected_at,
            resolution: None,
            resolved_at: None,
            resolved_by: None,
        }
    }

    /// Returns the deterministic conflict key
    pub fn key(&self) -> &ConflictKey {
        &self.key
    }

    /// Returns the conflict kind
    pub fn kind(&self) -> ConflictKind {
        self.kind
    }

    /// Returns the severity (fixed per kind)
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the human-readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the two participating job ids, sorted
    pub fn jobs(&self) -> &[JobId; 2] {
        &self.jobs
    }

    /// Returns true when the given job participates in this conflict
    pub fn involves(&self, job_id: &JobId) -> bool {
        self.jobs.iter().any(|j| j == job_id)
    }

    /// Returns the detection pass that produced this instance
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns when this conflict was detected
    pub fn detected_at(&self) -> DateTime<Utc> {
        self.detected_at
    }

    /// Returns the recorded resolution method, if resolved
    pub fn resolution(&self) -> Option<ResolutionMethod> {
        self.resolution
    }

    /// Returns when the conflict was resolved
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Returns who or what resolved the conflict
    pub fn resolved_by(&self) -> Option<ResolutionSource> {
        self.resolved_by
    }

    /// Returns true if the conflict has been resolved
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// Resolves the conflict with the given method and source
    ///
    /// If the conflict is already resolved this is a no-op and returns the
    /// conflict unchanged; the first resolution wins.
    #[must_use]
    pub fn resolve(mut self, method: ResolutionMethod, source: ResolutionSource) -> Self {
        if self.is_resolved() {
            return self;
        }

        self.resolution = Some(method);
        self.resolved_at = Some(Utc::now());
        self.resolved_by = Some(source);
        self
    }
}
