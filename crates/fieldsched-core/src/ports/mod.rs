//! Port definitions (trait interfaces for adapters)
//!
//! Driven ports the adapter crates implement:
//! - [`JobSource`] - fetches job snapshots from the dispatch backend
//! - [`DispatchGateway`] - submits resolution/ignore outcomes back to it

pub mod dispatch_gateway;
pub mod job_source;

pub use dispatch_gateway::{DispatchGateway, ResolutionReceipt};
pub use job_source::{DateWindow, JobSource};
