//! Pure resolve/ignore transformations over a conflict list
//!
//! Detection returns a fresh list every pass; these functions apply
//! dispatcher actions on top of it as explicit value transformations,
//! independent of any UI or storage mechanism. `resolve` keeps the
//! conflict and annotates it; `ignore` removes it from the active list
//! (the pair reappears on the next pass unless the jobs change or a
//! policy rule suppresses it).

use fieldsched_core::domain::{
    conflict::{Conflict, ResolutionMethod, ResolutionSource},
    newtypes::ConflictKey,
};

use crate::error::ConflictError;

/// Resolves the conflict with the given key, keeping it in the list
///
/// # Errors
/// `NotFound` when no conflict has the key; `AlreadyResolved` when the
/// conflict is already terminal.
pub fn resolve(
    mut conflicts: Vec<Conflict>,
    key: &ConflictKey,
    method: ResolutionMethod,
    source: ResolutionSource,
) -> Result<Vec<Conflict>, ConflictError> {
    let index = conflicts
        .iter()
        .position(|c| c.key() == key)
        .ok_or_else(|| ConflictError::NotFound(key.to_string()))?;

    if conflicts[index].is_resolved() {
        return Err(ConflictError::AlreadyResolved(key.to_string()));
    }

    let resolved = conflicts.remove(index).resolve(method, source);
    conflicts.insert(index, resolved);
    Ok(conflicts)
}

/// Removes the conflict with the given key from the active list
///
/// # Errors
/// `NotFound` when no conflict has the key.
pub fn ignore(
    mut conflicts: Vec<Conflict>,
    key: &ConflictKey,
) -> Result<Vec<Conflict>, ConflictError> {
    let index = conflicts
        .iter()
        .position(|c| c.key() == key)
        .ok_or_else(|| ConflictError::NotFound(key.to_string()))?;

    conflicts.remove(index);
    Ok(conflicts)
}

/// Iterates the conflicts still awaiting dispatcher action
pub fn open(conflicts: &[Conflict]) -> impl Iterator<Item = &Conflict> {
    conflicts.iter().filter(|c| !c.is_resolved())
}

/// Finds a conflict by full key or unambiguous key prefix
///
/// Returns `None` when nothing matches or the prefix matches more than
/// one conflict.
pub fn find_by_key<'a>(conflicts: &'a [Conflict], needle: &str) -> Option<&'a Conflict> {
    if let Some(exact) = conflicts.iter().find(|c| c.key().as_str() == needle) {
        return Some(exact);
    }

    let mut matches = conflicts
        .iter()
        .filter(|c| c.key().as_str().starts_with(needle));
    let first = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(first)
}
