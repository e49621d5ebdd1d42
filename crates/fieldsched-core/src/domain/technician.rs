//! Technician directory
//!
//! Maps technician ids to display names. The engine only needs this for
//! description text; an id missing from the directory falls back to the
//! raw identifier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::newtypes::TechnicianId;

/// Lookup of technician display names by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechnicianDirectory {
    names: HashMap<TechnicianId, String>,
}

impl TechnicianDirectory {
    /// Creates an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry
    pub fn insert(&mut self, id: TechnicianId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    /// Returns the display name for a technician id, if known
    pub fn display_name(&self, id: &TechnicianId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Display name with the raw id as fallback
    pub fn display_name_or_id<'a>(&'a self, id: &'a TechnicianId) -> &'a str {
        self.display_name(id).unwrap_or(id.as_str())
    }

    /// Number of known technicians
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true when the directory has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(TechnicianId, String)> for TechnicianDirectory {
    fn from_iter<I: IntoIterator<Item = (TechnicianId, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
