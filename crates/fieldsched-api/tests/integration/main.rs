//! Integration test entry point for the dispatch backend adapter
//!
//! Tests run against a wiremock mock server; no live backend is required.

mod common;
mod test_fetch_jobs;
mod test_resolution;
