//! Job domain entity
//!
//! A `Job` is a read-only record of a scheduled service visit as fetched
//! from the dispatch backend. The conflict engine never mutates jobs; it
//! only derives time windows from them and reports on pairs.
//!
//! A job is *eligible* for conflict checks when it carries a scheduled date
//! plus both time bounds forming a non-degenerate half-open window. Jobs
//! missing either bound (or whose end does not come after their start) are
//! silently excluded from overlap math rather than treated as errors.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::newtypes::{JobId, LocationId, TechnicianId, TimeOfDay};

// ============================================================================
// TimeWindow
// ============================================================================

/// Half-open time interval `[start, end)` on the schedule
///
/// Overlap uses the standard strict intersection test, so windows that
/// merely touch at an endpoint do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a window; returns `None` unless `start < end`
    #[must_use]
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Returns the window start instant
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Returns the window end instant
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Strict interval intersection: `start1 < end2 && start2 < end1`
    ///
    /// Touching endpoints (one window ending exactly when the other starts)
    /// are NOT an overlap.
    #[must_use]
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// ============================================================================
// LocationRef
// ============================================================================

/// Nested location reference as delivered by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    /// Location identifier
    pub id: LocationId,
    /// Optional display name (street address or site label)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ============================================================================
// Job
// ============================================================================

/// A scheduled service visit
///
/// Jobs carry either a nested `location` reference or a flat `location_id`
/// (or neither); [`Job::resolved_location_id`] prefers the nested form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    scheduled_date: NaiveDate,
    scheduled_start_time: Option<TimeOfDay>,
    scheduled_end_time: Option<TimeOfDay>,
    technician_id: Option<TechnicianId>,
    location: Option<LocationRef>,
    location_id: Option<LocationId>,
    customer_name: Option<String>,
    service_type: Option<String>,
}

impl Job {
    /// Creates a job with only the required fields set
    #[must_use]
    pub fn new(id: JobId, scheduled_date: NaiveDate) -> Self {
        Self {
            id,
            scheduled_date,
            scheduled_start_time: None,
            scheduled_end_time: None,
            technician_id: None,
            location: None,
            location_id: None,
            customer_name: None,
            service_type: None,
        }
    }

    /// Sets both time bounds
    #[must_use]
    pub fn with_times(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.scheduled_start_time = Some(start);
        self.scheduled_end_time = Some(end);
        self
    }

    /// Sets the start bound only
    #[must_use]
    pub fn with_start_time(mut self, start: TimeOfDay) -> Self {
        self.scheduled_start_time = Some(start);
        self
    }

    /// Sets the end bound only
    #[must_use]
    pub fn with_end_time(mut self, end: TimeOfDay) -> Self {
        self.scheduled_end_time = Some(end);
        self
    }

    /// Sets the assigned technician
    #[must_use]
    pub fn with_technician(mut self, technician_id: TechnicianId) -> Self {
        self.technician_id = Some(technician_id);
        self
    }

    /// Sets the nested location reference
    #[must_use]
    pub fn with_location(mut self, location: LocationRef) -> Self {
        self.location = Some(location);
        self
    }

    /// Sets the flat location id
    #[must_use]
    pub fn with_location_id(mut self, location_id: LocationId) -> Self {
        self.location_id = Some(location_id);
        self
    }

    /// Sets the customer display name
    #[must_use]
    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    /// Sets the service type label
    #[must_use]
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }

    /// Returns the job id
    pub fn id(&self) -> &JobId {
        &self.id
    }

    /// Returns the scheduled calendar date
    pub fn scheduled_date(&self) -> NaiveDate {
        self.scheduled_date
    }

    /// Returns the scheduled start bound if present
    pub fn scheduled_start_time(&self) -> Option<TimeOfDay> {
        self.scheduled_start_time
    }

    /// Returns the scheduled end bound if present
    pub fn scheduled_end_time(&self) -> Option<TimeOfDay> {
        self.scheduled_end_time
    }

    /// Returns the assigned technician if any
    pub fn technician_id(&self) -> Option<&TechnicianId> {
        self.technician_id.as_ref()
    }

    /// Returns the nested location reference if any
    pub fn location(&self) -> Option<&LocationRef> {
        self.location.as_ref()
    }

    /// Returns the customer display name if any
    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    /// Returns the service type label if any
    pub fn service_type(&self) -> Option<&str> {
        self.service_type.as_deref()
    }

    /// Resolves the effective location id
    ///
    /// Prefers the nested `location.id`; falls back to the flat
    /// `location_id`. Returns `None` when the job carries neither.
    pub fn resolved_location_id(&self) -> Option<&LocationId> {
        self.location
            .as_ref()
            .map(|l| &l.id)
            .or(self.location_id.as_ref())
    }

    /// Returns the location display name when the nested reference has one
    pub fn location_name(&self) -> Option<&str> {
        self.location.as_ref().and_then(|l| l.name.as_deref())
    }

    /// Name used when rendering this job in conflict descriptions
    ///
    /// Customer name when present, otherwise the job id.
    pub fn display_name(&self) -> &str {
        self.customer_name.as_deref().unwrap_or(self.id.as_str())
    }

    /// Derives the job's time window, if it is eligible for conflict checks
    ///
    /// Returns `None` when either bound is missing or the bounds do not
    /// form a non-degenerate window.
    pub fn time_window(&self) -> Option<TimeWindow> {
        let start = self.scheduled_start_time?;
        let end = self.scheduled_end_time?;
        TimeWindow::new(
            self.scheduled_date.and_time(start.as_naive()),
            self.scheduled_date.and_time(end.as_naive()),
        )
    }

    /// Returns true when [`Job::time_window`] would yield a window
    pub fn is_eligible(&self) -> bool {
        self.time_window().is_some()
    }
}
