//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including identifier validation failures, time-of-day parsing
//! errors, and invalid date windows.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid identifier format or content
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Time-of-day string did not match HH:MM or HH:MM:SS
    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    /// Invalid conflict key format
    #[error("Invalid conflict key: {0}")]
    InvalidKey(String),

    /// Date window where `from` is after `to`
    #[error("Invalid date window: {0}")]
    InvalidDateWindow(String),

    /// Attempted transition on a conflict that is already terminal
    #[error("Invalid state transition from {from} to {to}")]
    InvalidState {
        /// The current state
        from: String,
        /// The attempted target state
        to: String,
    },

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
