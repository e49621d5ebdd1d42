//! Fieldsched Conflict - Scheduling conflict detection and resolution
//!
//! Provides:
//! - Pairwise detection across three dimensions: time overlap, technician
//!   double-booking, location contention
//! - Pure resolve/ignore transformations over the detected list
//! - Configurable auto-action policy rules
//! - Gateway-backed resolution execution

pub mod engine;
pub mod error;
pub mod policy;
pub mod resolution;
pub mod resolver;
pub mod use_cases;

pub use engine::{ConflictEngine, DetectionReport, SeverityCounts};
pub use error::ConflictError;
pub use policy::{PolicyAction, PolicyEngine};
pub use resolver::{BatchResult, ConflictResolver};
pub use use_cases::{DetectConflictsUseCase, DetectionOutcome, ResolveConflictUseCase};
