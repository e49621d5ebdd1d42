//! Integration tests for conflict outcome submission
//!
//! Verifies the resolution and ignore endpoints against a wiremock mock
//! server, including the request body shape and receipt parsing.

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fieldsched_api::provider::RestDispatchProvider;
use fieldsched_core::domain::conflict::{ResolutionMethod, ResolutionSource};
use fieldsched_core::domain::newtypes::ConflictKey;
use fieldsched_core::ports::dispatch_gateway::DispatchGateway;

use crate::common;

fn key() -> ConflictKey {
    ConflictKey::new("technician_double_booking-job-1-job-2").unwrap()
}

#[tokio::test]
async fn test_submit_resolution_posts_body_and_parses_receipt() {
    let (server, client) = common::setup_dispatch_mock().await;

    Mock::given(method("POST"))
        .and(path(
            "/conflicts/technician_double_booking-job-1-job-2/resolution",
        ))
        .and(body_partial_json(serde_json::json!({
            "resolution": "reassign_technician",
            "source": "user"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "key": "technician_double_booking-job-1-job-2",
            "resolution": "reassign_technician",
            "acknowledged_at": "2024-01-15T10:05:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RestDispatchProvider::new(client);
    let receipt = provider
        .submit_resolution(
            &key(),
            ResolutionMethod::ReassignTechnician,
            ResolutionSource::User,
        )
        .await
        .expect("submit resolution");

    assert_eq!(receipt.key, key());
    assert_eq!(receipt.resolution, ResolutionMethod::ReassignTechnician);
    assert_eq!(
        receipt.acknowledged_at.to_rfc3339(),
        "2024-01-15T10:05:00+00:00"
    );
}

#[tokio::test]
async fn test_submit_resolution_not_found_fails() {
    let (server, client) = common::setup_dispatch_mock().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such conflict"))
        .mount(&server)
        .await;

    let provider = RestDispatchProvider::new(client);
    let result = provider
        .submit_resolution(
            &key(),
            ResolutionMethod::RescheduleJob,
            ResolutionSource::User,
        )
        .await;

    let err = result.expect_err("404 should fail");
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_submit_resolution_rejects_malformed_receipt() {
    let (server, client) = common::setup_dispatch_mock().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "key": "technician_double_booking-job-1-job-2",
            "resolution": "wave_hands",
            "acknowledged_at": "2024-01-15T10:05:00Z"
        })))
        .mount(&server)
        .await;

    let provider = RestDispatchProvider::new(client);
    let result = provider
        .submit_resolution(
            &key(),
            ResolutionMethod::RescheduleJob,
            ResolutionSource::User,
        )
        .await;

    let err = result.expect_err("unknown method should fail");
    assert!(err.to_string().contains("resolution method"));
}

#[tokio::test]
async fn test_submit_ignore_posts() {
    let (server, client) = common::setup_dispatch_mock().await;

    Mock::given(method("POST"))
        .and(path(
            "/conflicts/technician_double_booking-job-1-job-2/ignore",
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let provider = RestDispatchProvider::new(client);
    provider.submit_ignore(&key()).await.expect("submit ignore");
}

#[tokio::test]
async fn test_submit_ignore_maps_error() {
    let (server, client) = common::setup_dispatch_mock().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let provider = RestDispatchProvider::new(client);
    let result = provider.submit_ignore(&key()).await;

    assert!(result.is_err());
}
