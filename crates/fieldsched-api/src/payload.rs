//! Wire types for the dispatch backend API
//!
//! The backend's job payload is looser than the domain model: identifiers
//! are plain strings and time bounds arrive as raw `HH:MM` text. Conversion
//! is lenient about time bounds - a malformed time is logged and dropped,
//! which makes the job ineligible for overlap checks instead of poisoning
//! the whole snapshot - but strict about identifiers, since a job without
//! a valid id cannot be reported on at all.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use fieldsched_core::domain::{
    errors::DomainError,
    job::{Job, LocationRef},
    newtypes::{JobId, LocationId, TechnicianId, TimeOfDay},
    technician::TechnicianDirectory,
};

/// Nested location object in a job payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationPayload {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One job as delivered by `GET /jobs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPayload {
    pub id: String,
    pub scheduled_date: NaiveDate,
    #[serde(default)]
    pub scheduled_start_time: Option<String>,
    #[serde(default)]
    pub scheduled_end_time: Option<String>,
    #[serde(default)]
    pub technician_id: Option<String>,
    #[serde(default)]
    pub location: Option<LocationPayload>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
}

impl JobPayload {
    /// Converts the payload into a domain job
    ///
    /// # Errors
    /// Returns error when the job id (or a present technician/location id)
    /// is malformed. Malformed time bounds are logged and treated as
    /// absent.
    pub fn into_job(self) -> Result<Job, DomainError> {
        let id = JobId::new(self.id)?;

        let mut job = Job::new(id.clone(), self.scheduled_date);

        if let Some(start) = self.scheduled_start_time {
            match TimeOfDay::parse(&start) {
                Ok(t) => job = job.with_start_time(t),
                Err(_) => warn!(
                    job = %id,
                    value = %start,
                    "Dropping malformed scheduled_start_time"
                ),
            }
        }
        if let Some(end) = self.scheduled_end_time {
            match TimeOfDay::parse(&end) {
                Ok(t) => job = job.with_end_time(t),
                Err(_) => warn!(
                    job = %id,
                    value = %end,
                    "Dropping malformed scheduled_end_time"
                ),
            }
        }

        if let Some(technician_id) = self.technician_id {
            job = job.with_technician(TechnicianId::new(technician_id)?);
        }
        if let Some(location) = self.location {
            job = job.with_location(LocationRef {
                id: LocationId::new(location.id)?,
                name: location.name,
            });
        }
        if let Some(location_id) = self.location_id {
            job = job.with_location_id(LocationId::new(location_id)?);
        }
        if let Some(customer_name) = self.customer_name {
            job = job.with_customer_name(customer_name);
        }
        if let Some(service_type) = self.service_type {
            job = job.with_service_type(service_type);
        }

        Ok(job)
    }
}

/// Response body of `GET /jobs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobsDocument {
    pub jobs: Vec<JobPayload>,
    /// Technician id to display name, for description text
    #[serde(default)]
    pub technicians: HashMap<String, String>,
}

impl JobsDocument {
    /// Converts every payload, skipping (and logging) records whose ids
    /// fail validation
    pub fn into_jobs(self) -> Vec<Job> {
        self.jobs
            .into_iter()
            .filter_map(|payload| {
                let raw_id = payload.id.clone();
                match payload.into_job() {
                    Ok(job) => Some(job),
                    Err(e) => {
                        warn!(job = %raw_id, error = %e, "Skipping malformed job payload");
                        None
                    }
                }
            })
            .collect()
    }

    /// Builds the technician directory, skipping malformed ids
    pub fn technician_directory(&self) -> TechnicianDirectory {
        let mut directory = TechnicianDirectory::new();
        for (raw_id, name) in &self.technicians {
            match TechnicianId::new(raw_id.clone()) {
                Ok(id) => directory.insert(id, name.clone()),
                Err(e) => warn!(technician = %raw_id, error = %e, "Skipping technician entry"),
            }
        }
        directory
    }
}

/// Response body of `POST /conflicts/{key}/resolution`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptPayload {
    pub key: String,
    pub resolution: String,
    pub acknowledged_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: serde_json::Value) -> JobPayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_full_payload_converts() {
        let job = payload(serde_json::json!({
            "id": "job-1",
            "scheduled_date": "2024-01-15",
            "scheduled_start_time": "09:00",
            "scheduled_end_time": "10:00",
            "technician_id": "tech-a",
            "location": {"id": "loc-x", "name": "14 Elm St"},
            "customer_name": "Smith Residence",
            "service_type": "quarterly-treatment"
        }))
        .into_job()
        .unwrap();

        assert_eq!(job.id().as_str(), "job-1");
        assert!(job.is_eligible());
        assert_eq!(job.technician_id().unwrap().as_str(), "tech-a");
        assert_eq!(job.resolved_location_id().unwrap().as_str(), "loc-x");
        assert_eq!(job.location_name(), Some("14 Elm St"));
        assert_eq!(job.display_name(), "Smith Residence");
    }

    #[test]
    fn test_malformed_time_dropped_makes_job_ineligible() {
        let job = payload(serde_json::json!({
            "id": "job-1",
            "scheduled_date": "2024-01-15",
            "scheduled_start_time": "25:00",
            "scheduled_end_time": "10:00"
        }))
        .into_job()
        .unwrap();

        assert_eq!(job.scheduled_start_time(), None);
        assert!(job.scheduled_end_time().is_some());
        assert!(!job.is_eligible());
    }

    #[test]
    fn test_invalid_job_id_is_an_error() {
        let result = payload(serde_json::json!({
            "id": "job 1",
            "scheduled_date": "2024-01-15"
        }))
        .into_job();

        assert!(result.is_err());
    }

    #[test]
    fn test_document_skips_malformed_records() {
        let document: JobsDocument = serde_json::from_value(serde_json::json!({
            "jobs": [
                {"id": "job-1", "scheduled_date": "2024-01-15"},
                {"id": "job 2", "scheduled_date": "2024-01-15"},
                {"id": "job-3", "scheduled_date": "2024-01-15"}
            ],
            "technicians": {"tech-a": "Dana Mills", "bad id": "Nobody"}
        }))
        .unwrap();

        let directory = document.technician_directory();
        assert_eq!(directory.len(), 1);

        let jobs = document.into_jobs();
        let ids: Vec<&str> = jobs.iter().map(|j| j.id().as_str()).collect();
        assert_eq!(ids, vec!["job-1", "job-3"]);
    }

    #[test]
    fn test_document_defaults_technicians_to_empty() {
        let document: JobsDocument =
            serde_json::from_value(serde_json::json!({"jobs": []})).unwrap();
        assert!(document.technician_directory().is_empty());
    }
}
