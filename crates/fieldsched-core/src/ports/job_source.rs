//! Job source port (driven/secondary port)
//!
//! Interface for fetching the job snapshot a detection pass runs over.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because fetch errors are adapter-specific
//!   (HTTP, file, fixture) and don't need domain-level classification.
//! - The window is inclusive on both ends; the common case is a single
//!   calendar day.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{errors::DomainError, job::Job};

/// Inclusive calendar-date window for a job query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateWindow {
    /// Creates a window spanning `from..=to`
    ///
    /// # Errors
    /// Returns error if `from` is after `to`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, DomainError> {
        if from > to {
            return Err(DomainError::InvalidDateWindow(format!(
                "{from} is after {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// Window covering a single calendar day
    #[must_use]
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
        }
    }

    /// First day of the window
    #[must_use]
    pub fn from(&self) -> NaiveDate {
        self.from
    }

    /// Last day of the window
    #[must_use]
    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Returns true when the date falls inside the window
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of calendar days covered
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// Source of job snapshots for detection passes
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetches all jobs scheduled inside the window
    async fn fetch_jobs(&self, window: &DateWindow) -> anyhow::Result<Vec<Job>>;
}
