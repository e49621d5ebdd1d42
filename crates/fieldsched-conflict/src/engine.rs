//! Conflict detection logic
//!
//! Runs three independent passes over one job snapshot and concatenates
//! their results: time overlaps first, then technician double-bookings,
//! then location contention. A pair that trips more than one detector is
//! reported once per detector - each answers a different operational
//! question, so no cross-kind de-duplication is performed.
//!
//! Detection is wholesale: every pass rebuilds the full list from scratch.
//! The pairwise scan is O(n²) over the window, which is fine for the
//! day-sized inputs this runs on (tens of jobs, not thousands).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fieldsched_core::domain::{
    conflict::{Conflict, ConflictKind, Severity},
    job::Job,
    newtypes::RunId,
    technician::TechnicianDirectory,
};

/// Per-severity tally of a conflict list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SeverityCounts {
    /// Tallies the given conflicts
    #[must_use]
    pub fn tally(conflicts: &[Conflict]) -> Self {
        let mut counts = Self::default();
        for conflict in conflicts {
            match conflict.severity() {
                Severity::Low => counts.low += 1,
                Severity::Medium => counts.medium += 1,
                Severity::High => counts.high += 1,
                Severity::Critical => counts.critical += 1,
            }
        }
        counts
    }

    /// Total across all severities
    #[must_use]
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }
}

/// Result of one detection pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Identifier of this pass
    pub run_id: RunId,
    /// When the pass ran
    pub detected_at: DateTime<Utc>,
    /// Jobs in the input snapshot
    pub jobs_scanned: usize,
    /// Jobs with a usable time window
    pub eligible_jobs: usize,
    /// Detected conflicts, in emission order
    pub conflicts: Vec<Conflict>,
}

impl DetectionReport {
    /// Per-severity tally of the detected conflicts
    #[must_use]
    pub fn severity_counts(&self) -> SeverityCounts {
        SeverityCounts::tally(&self.conflicts)
    }
}

/// Detects scheduling conflicts in a job snapshot
pub struct ConflictEngine;

impl ConflictEngine {
    /// Runs all three detection passes over the snapshot
    ///
    /// The technician directory is only consulted for description text;
    /// an unknown technician id falls back to the raw identifier.
    #[must_use]
    pub fn detect(jobs: &[Job], directory: &TechnicianDirectory) -> DetectionReport {
        let run_id = RunId::new();
        let detected_at = Utc::now();
        let eligible_jobs = jobs.iter().filter(|j| j.is_eligible()).count();

        let mut conflicts = Vec::new();
        Self::scan_time_overlaps(jobs, run_id, detected_at, &mut conflicts);
        Self::scan_double_bookings(jobs, directory, run_id, detected_at, &mut conflicts);
        Self::scan_location_contention(jobs, run_id, detected_at, &mut conflicts);

        info!(
            run_id = %run_id,
            jobs_scanned = jobs.len(),
            eligible_jobs,
            conflicts = conflicts.len(),
            "Detection pass complete"
        );

        DetectionReport {
            run_id,
            detected_at,
            jobs_scanned: jobs.len(),
            eligible_jobs,
            conflicts,
        }
    }

    /// Pass 1: any two jobs on the same date with intersecting windows
    fn scan_time_overlaps(
        jobs: &[Job],
        run_id: RunId,
        detected_at: DateTime<Utc>,
        out: &mut Vec<Conflict>,
    ) {
        for (a, b) in overlapping_pairs(&jobs.iter().collect::<Vec<_>>()) {
            debug!(
                job_a = %a.id(),
                job_b = %b.id(),
                "Time overlap detected"
            );
            out.push(Conflict::new(
                ConflictKind::TimeOverlap,
                a.id().clone(),
                b.id().clone(),
                format!(
                    "Time overlap between {} and {}",
                    a.display_name(),
                    b.display_name()
                ),
                run_id,
                detected_at,
            ));
        }
    }

    /// Pass 2: intersecting jobs assigned to the same technician
    ///
    /// Jobs without a technician never participate here, even when their
    /// windows overlap another job's.
    fn scan_double_bookings(
        jobs: &[Job],
        directory: &TechnicianDirectory,
        run_id: RunId,
        detected_at: DateTime<Utc>,
        out: &mut Vec<Conflict>,
    ) {
        for (technician_id, members) in partition_by(jobs, |j| j.technician_id().cloned()) {
            let name = directory.display_name_or_id(&technician_id);
            for (a, b) in overlapping_pairs(&members) {
                debug!(
                    technician = %technician_id,
                    job_a = %a.id(),
                    job_b = %b.id(),
                    "Technician double-booking detected"
                );
                out.push(Conflict::new(
                    ConflictKind::TechnicianDoubleBooking,
                    a.id().clone(),
                    b.id().clone(),
                    format!(
                        "{} is double-booked: {} and {}",
                        name,
                        a.display_name(),
                        b.display_name()
                    ),
                    run_id,
                    detected_at,
                ));
            }
        }
    }

    /// Pass 3: intersecting jobs at the same location (advisory)
    ///
    /// Partitions on the resolved location id (nested reference preferred
    /// over the flat field); jobs with neither are excluded.
    fn scan_location_contention(
        jobs: &[Job],
        run_id: RunId,
        detected_at: DateTime<Utc>,
        out: &mut Vec<Conflict>,
    ) {
        for (location_id, members) in partition_by(jobs, |j| j.resolved_location_id().cloned()) {
            if members.len() < 2 {
                continue;
            }
            for (a, b) in overlapping_pairs(&members) {
                let place = a
                    .location_name()
                    .or_else(|| b.location_name())
                    .unwrap_or(location_id.as_str());
                debug!(
                    location = %location_id,
                    job_a = %a.id(),
                    job_b = %b.id(),
                    "Location contention detected"
                );
                out.push(Conflict::new(
                    ConflictKind::LocationConflict,
                    a.id().clone(),
                    b.id().clone(),
                    format!(
                        "Location contention at {}: {} and {} overlap",
                        place,
                        a.display_name(),
                        b.display_name()
                    ),
                    run_id,
                    detected_at,
                ));
            }
        }
    }
}

/// Yields every unordered pair `(i, j)`, `i < j`, whose windows intersect
///
/// Pairs are skipped when either job is ineligible or the dates differ.
fn overlapping_pairs<'a>(jobs: &[&'a Job]) -> Vec<(&'a Job, &'a Job)> {
    let mut pairs = Vec::new();
    for (i, a) in jobs.iter().enumerate() {
        let Some(window_a) = a.time_window() else {
            continue;
        };
        for b in &jobs[i + 1..] {
            if a.scheduled_date() != b.scheduled_date() {
                continue;
            }
            let Some(window_b) = b.time_window() else {
                continue;
            };
            if window_a.overlaps(&window_b) {
                pairs.push((*a, *b));
            }
        }
    }
    pairs
}

/// Partitions jobs by key, preserving first-seen key order
///
/// Jobs for which the key function returns `None` are excluded. Ordering
/// matters: deterministic partition iteration keeps repeated detection
/// passes over the same snapshot identically ordered.
fn partition_by<K, F>(jobs: &[Job], key: F) -> Vec<(K, Vec<&Job>)>
where
    K: PartialEq,
    F: Fn(&Job) -> Option<K>,
{
    let mut partitions: Vec<(K, Vec<&Job>)> = Vec::new();
    for job in jobs {
        let Some(k) = key(job) else {
            continue;
        };
        match partitions.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(job),
            None => partitions.push((k, vec![job])),
        }
    }
    partitions
}
