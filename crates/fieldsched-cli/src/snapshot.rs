//! Job snapshot loading for offline commands
//!
//! `check` and `resolve` can run against a local JSON snapshot instead of
//! the live backend. The file uses the backend's wire format: either a
//! bare array of job payloads, or a document with `jobs` and an optional
//! `technicians` directory.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use fieldsched_api::payload::{JobPayload, JobsDocument};
use fieldsched_core::domain::{job::Job, technician::TechnicianDirectory};

/// Accepted snapshot file shapes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Document(JobsDocument),
    List(Vec<JobPayload>),
}

/// Loads a snapshot file into domain jobs plus the technician directory
///
/// Malformed records inside the file are skipped with a warning, the same
/// as the live adapter does.
pub fn load_snapshot(path: &Path) -> Result<(Vec<Job>, TechnicianDirectory)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;

    let snapshot: SnapshotFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))?;

    let document = match snapshot {
        SnapshotFile::Document(document) => document,
        SnapshotFile::List(jobs) => JobsDocument {
            jobs,
            ..JobsDocument::default()
        },
    };

    let directory = document.technician_directory();
    Ok((document.into_jobs(), directory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(content.as_bytes()).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    #[test]
    fn test_loads_document_form() {
        let tmp = write_file(
            r#"{
                "jobs": [
                    {"id": "job-1", "scheduled_date": "2024-01-15",
                     "scheduled_start_time": "09:00", "scheduled_end_time": "10:00"}
                ],
                "technicians": {"tech-a": "Dana Mills"}
            }"#,
        );

        let (jobs, directory) = load_snapshot(tmp.path()).unwrap();
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].is_eligible());
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_loads_bare_list_form() {
        let tmp = write_file(
            r#"[
                {"id": "job-1", "scheduled_date": "2024-01-15"},
                {"id": "job-2", "scheduled_date": "2024-01-15"}
            ]"#,
        );

        let (jobs, directory) = load_snapshot(tmp.path()).unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(directory.is_empty());
    }

    #[test]
    fn test_missing_file_fails_with_path() {
        let err = load_snapshot(Path::new("/nonexistent/jobs.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/jobs.json"));
    }

    #[test]
    fn test_invalid_json_fails() {
        let tmp = write_file("{not json");
        assert!(load_snapshot(tmp.path()).is_err());
    }

    #[test]
    fn test_malformed_records_skipped() {
        let tmp = write_file(
            r#"[
                {"id": "job-1", "scheduled_date": "2024-01-15"},
                {"id": "bad id", "scheduled_date": "2024-01-15"}
            ]"#,
        );

        let (jobs, _) = load_snapshot(tmp.path()).unwrap();
        assert_eq!(jobs.len(), 1);
    }
}
