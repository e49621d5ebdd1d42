//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers and
//! values. Each newtype ensures data validity at construction time: an
//! identifier that exists can be assumed well-formed everywhere else.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// Opaque string identifiers
// ============================================================================

/// Validates an opaque backend identifier: non-empty, alphanumeric plus
/// `-` and `_` (the character set the dispatch backend emits).
fn validate_opaque_id(id: &str, what: &str) -> Result<(), DomainError> {
    if id.is_empty() {
        return Err(DomainError::InvalidId(format!("{what} cannot be empty")));
    }
    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::InvalidId(format!(
            "{what} contains invalid characters: {id}"
        )));
    }
    Ok(())
}

/// Opaque stable identifier of a scheduled job
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Create a new JobId
    ///
    /// # Errors
    /// Returns error if the identifier is empty or contains characters
    /// outside the backend's identifier alphabet.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        validate_opaque_id(&id, "Job ID")?;
        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for JobId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

/// Identifier of a technician
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TechnicianId(String);

impl TechnicianId {
    /// Create a new TechnicianId
    ///
    /// # Errors
    /// Returns error if the identifier format is invalid.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        validate_opaque_id(&id, "Technician ID")?;
        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TechnicianId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TechnicianId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TechnicianId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TechnicianId> for String {
    fn from(id: TechnicianId) -> Self {
        id.0
    }
}

/// Identifier of a physical service location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationId(String);

impl LocationId {
    /// Create a new LocationId
    ///
    /// # Errors
    /// Returns error if the identifier format is invalid.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        validate_opaque_id(&id, "Location ID")?;
        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LocationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocationId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LocationId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<LocationId> for String {
    fn from(id: LocationId) -> Self {
        id.0
    }
}

// ============================================================================
// Conflict key
// ============================================================================

/// Deterministic composite identity of a conflict
///
/// Formed as `{kind}-{jobA}-{jobB}` with the job pair sorted
/// lexicographically, so repeated detection passes over the same snapshot
/// produce stable, comparable keys for the same pair of jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConflictKey(String);

impl ConflictKey {
    /// Compose a key from a conflict kind label and a job pair
    ///
    /// The pair is sorted before composition; `compose(k, a, b)` and
    /// `compose(k, b, a)` yield the same key.
    #[must_use]
    pub fn compose(kind: &str, a: &JobId, b: &JobId) -> Self {
        let (first, second) = if a.as_str() <= b.as_str() {
            (a, b)
        } else {
            (b, a)
        };
        Self(format!("{kind}-{first}-{second}"))
    }

    /// Create a ConflictKey from an existing string
    ///
    /// # Errors
    /// Returns error if the key is empty or lacks the `kind-a-b` shape.
    pub fn new(key: impl Into<String>) -> Result<Self, DomainError> {
        let key = key.into();
        if key.is_empty() {
            return Err(DomainError::InvalidKey("key cannot be empty".to_string()));
        }
        if key.matches('-').count() < 2 {
            return Err(DomainError::InvalidKey(format!(
                "key must have the form <kind>-<job>-<job>: {key}"
            )));
        }
        Ok(Self(key))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ConflictKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConflictKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ConflictKey {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ConflictKey> for String {
    fn from(key: ConflictKey) -> Self {
        key.0
    }
}

// ============================================================================
// Detection run id
// ============================================================================

/// Identifier for a single detection pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random RunId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a RunId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RunId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid RunId: {e}")))
    }
}

// ============================================================================
// Time of day
// ============================================================================

/// Validated wall-clock time of day
///
/// Parses strictly from `HH:MM` or `HH:MM:SS`. Anything else - `25:00`,
/// `9am`, an empty string - is rejected at construction, so the scheduling
/// math downstream never sees an invalid instant. A job whose raw payload
/// carried a malformed time simply loses that bound at the boundary and
/// becomes ineligible for overlap checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Parse a time-of-day string
    ///
    /// # Errors
    /// Returns error unless the string matches `HH:MM` or `HH:MM:SS`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map(Self)
            .map_err(|_| DomainError::InvalidTimeOfDay(s.to_string()))
    }

    /// Wrap an already-validated NaiveTime
    #[must_use]
    pub const fn from_naive(time: NaiveTime) -> Self {
        Self(time)
    }

    /// Get the inner NaiveTime value
    #[must_use]
    pub const fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

impl FromStr for TimeOfDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
