//! Integration tests for the jobs query
//!
//! Verifies end-to-end behavior of the job fetch against a wiremock
//! mock server:
//! - Query parameter construction for the date window
//! - Payload-to-domain conversion (nested location precedence)
//! - Lenient handling of malformed records
//! - Error mapping for backend failures

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fieldsched_api::provider::RestDispatchProvider;
use fieldsched_core::ports::job_source::{DateWindow, JobSource};

use crate::common;

fn window(day: &str) -> DateWindow {
    DateWindow::single_day(day.parse().unwrap())
}

#[tokio::test]
async fn test_fetch_jobs_sends_window_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("from", "2024-01-15"))
        .and(query_param("to", "2024-01-17"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"jobs": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = fieldsched_api::client::DispatchClient::new(server.uri(), 5).unwrap();
    let provider = RestDispatchProvider::new(client);

    let range = DateWindow::new(
        "2024-01-15".parse().unwrap(),
        "2024-01-17".parse().unwrap(),
    )
    .unwrap();
    let jobs = provider.fetch_jobs(&range).await.expect("fetch jobs");
    assert!(jobs.is_empty());
}

#[tokio::test]
async fn test_fetch_snapshot_converts_payloads() {
    let (server, client) = common::setup_dispatch_mock().await;
    common::mount_jobs(&server, common::sample_day_document()).await;

    let provider = RestDispatchProvider::new(client);
    let (jobs, directory) = provider
        .fetch_snapshot(&window("2024-01-15"))
        .await
        .expect("fetch snapshot");

    assert_eq!(jobs.len(), 3);
    assert_eq!(directory.len(), 2);

    // job-3 uses the flat location_id form; job-1 the nested one. Both
    // resolve to loc-x.
    assert_eq!(jobs[0].resolved_location_id().unwrap().as_str(), "loc-x");
    assert_eq!(jobs[2].resolved_location_id().unwrap().as_str(), "loc-x");
    assert_eq!(jobs[0].location_name(), Some("14 Elm St"));
    assert_eq!(jobs[2].location_name(), None);

    let tech = jobs[0].technician_id().unwrap();
    assert_eq!(directory.display_name(tech), Some("Dana Mills"));
}

#[tokio::test]
async fn test_fetch_jobs_drops_malformed_records() {
    let (server, client) = common::setup_dispatch_mock().await;
    common::mount_jobs(
        &server,
        serde_json::json!({
            "jobs": [
                {
                    "id": "job-1",
                    "scheduled_date": "2024-01-15",
                    "scheduled_start_time": "25:00",
                    "scheduled_end_time": "10:00"
                },
                {"id": "has spaces", "scheduled_date": "2024-01-15"}
            ]
        }),
    )
    .await;

    let provider = RestDispatchProvider::new(client);
    let jobs = provider
        .fetch_jobs(&window("2024-01-15"))
        .await
        .expect("fetch jobs");

    // The bad id is dropped entirely; the bad time only costs that bound.
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id().as_str(), "job-1");
    assert!(jobs[0].scheduled_start_time().is_none());
    assert!(!jobs[0].is_eligible());
}

#[tokio::test]
async fn test_fetch_jobs_maps_server_error() {
    let (server, client) = common::setup_dispatch_mock().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let provider = RestDispatchProvider::new(client);
    let result = provider.fetch_jobs(&window("2024-01-15")).await;

    let err = result.expect_err("500 should fail");
    assert!(err.to_string().contains("job query"));
}
