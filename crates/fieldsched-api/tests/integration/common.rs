//! Shared test helpers for dispatch backend integration tests
//!
//! Provides wiremock-based mock server setup for the backend's endpoints.
//! Each helper mounts the necessary mocks and returns a configured
//! DispatchClient pointing at the mock server.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fieldsched_api::client::DispatchClient;

/// Starts a mock server and returns it with a client pointed at it.
pub async fn setup_dispatch_mock() -> (MockServer, DispatchClient) {
    let server = MockServer::start().await;
    let client = DispatchClient::new(server.uri(), 5).expect("build client");
    (server, client)
}

/// Mounts a jobs endpoint returning the given document body.
pub async fn mount_jobs(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// A realistic one-day jobs document with three jobs and two technicians.
#[allow(dead_code)]
pub fn sample_day_document() -> serde_json::Value {
    serde_json::json!({
        "jobs": [
            {
                "id": "job-1",
                "scheduled_date": "2024-01-15",
                "scheduled_start_time": "09:00",
                "scheduled_end_time": "10:00",
                "technician_id": "tech-a",
                "location": {"id": "loc-x", "name": "14 Elm St"},
                "customer_name": "Smith Residence",
                "service_type": "quarterly-treatment"
            },
            {
                "id": "job-2",
                "scheduled_date": "2024-01-15",
                "scheduled_start_time": "09:30",
                "scheduled_end_time": "10:30",
                "technician_id": "tech-a",
                "location": {"id": "loc-y", "name": "7 Oak Ave"},
                "customer_name": "Jones Bakery",
                "service_type": "rodent-inspection"
            },
            {
                "id": "job-3",
                "scheduled_date": "2024-01-15",
                "scheduled_start_time": "09:45",
                "scheduled_end_time": "10:15",
                "technician_id": "tech-b",
                "location_id": "loc-x",
                "customer_name": "Elm St Annex"
            }
        ],
        "technicians": {
            "tech-a": "Dana Mills",
            "tech-b": "Lee Ortega"
        }
    })
}
