//! Fieldsched API - Dispatch backend REST adapter
//!
//! Implements the core port traits over the dispatch backend's REST API:
//! - [`client::DispatchClient`] - typed HTTP client (jobs query, conflict
//!   outcome submission)
//! - [`payload`] - wire types and lenient payload-to-domain conversion
//! - [`provider::RestDispatchProvider`] - `JobSource` + `DispatchGateway`
//!   implementation wrapping the client

pub mod client;
pub mod payload;
pub mod provider;

pub use client::DispatchClient;
pub use provider::RestDispatchProvider;
