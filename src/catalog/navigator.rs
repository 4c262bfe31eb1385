//! Drill-down lookups over a [`NotesCatalog`].
//!
//! Semesters are matched by their canonical id. Branches and subjects accept
//! either their id or their display name: an exact id match wins, otherwise
//! id and name are compared case-insensitively.

use thiserror::Error;
use tracing::debug;

use super::dedup::{dedupe, Deduped};
use super::store::NotesCatalog;
use crate::core::hierarchy::{Branch, Semester, Subject};
use crate::core::types::Level;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("{level} '{key}' not found")]
    NotFound { level: Level, key: String },

    #[error("Duplicate file \"{title}\" detected in subject '{subject}'")]
    DuplicateMaterial { title: String, subject: String },
}

impl NavigationError {
    pub(crate) fn not_found(level: Level, key: &str) -> Self {
        Self::NotFound {
            level,
            key: key.to_string(),
        }
    }
}

/// All semesters in stored order
#[must_use]
pub fn list_semesters(catalog: &NotesCatalog) -> &[Semester] {
    &catalog.semesters
}

/// Branches of a semester
///
/// # Errors
///
/// Returns [`NavigationError::NotFound`] if the semester does not exist.
pub fn list_branches<'a>(
    catalog: &'a NotesCatalog,
    semester_id: &str,
) -> Result<&'a [Branch], NavigationError> {
    Ok(&find_semester(catalog, semester_id)?.branches)
}

/// Subjects of a branch
///
/// # Errors
///
/// Returns [`NavigationError::NotFound`] naming the first level that failed to resolve.
pub fn list_subjects<'a>(
    catalog: &'a NotesCatalog,
    semester_id: &str,
    branch_key: &str,
) -> Result<&'a [Subject], NavigationError> {
    Ok(&find_branch(catalog, semester_id, branch_key)?.subjects)
}

/// Materials of a subject with duplicate listings removed
///
/// # Errors
///
/// Returns [`NavigationError::NotFound`] naming the first level that failed to resolve.
pub fn list_materials<'a>(
    catalog: &'a NotesCatalog,
    semester_id: &str,
    branch_key: &str,
    subject_key: &str,
) -> Result<Deduped<'a>, NavigationError> {
    let subject = find_subject(catalog, semester_id, branch_key, subject_key)?;
    let result = dedupe(&subject.materials);
    if result.has_duplicates() {
        debug!(
            "{} duplicate file(s) hidden in subject '{}'",
            result.removed, subject.id
        );
    }
    Ok(result)
}

/// Resolve a semester by id
///
/// # Errors
///
/// Returns [`NavigationError::NotFound`] if no semester has this id.
pub fn find_semester<'a>(
    catalog: &'a NotesCatalog,
    semester_id: &str,
) -> Result<&'a Semester, NavigationError> {
    semester_index(catalog, semester_id)
        .map(|i| &catalog.semesters[i])
        .ok_or_else(|| NavigationError::not_found(Level::Semester, semester_id))
}

/// Resolve a branch within a semester
///
/// # Errors
///
/// Returns [`NavigationError::NotFound`] for the semester or the branch.
pub fn find_branch<'a>(
    catalog: &'a NotesCatalog,
    semester_id: &str,
    branch_key: &str,
) -> Result<&'a Branch, NavigationError> {
    let semester = find_semester(catalog, semester_id)?;
    branch_index(semester, branch_key)
        .map(|i| &semester.branches[i])
        .ok_or_else(|| NavigationError::not_found(Level::Branch, branch_key))
}

/// Resolve a subject within a branch
///
/// # Errors
///
/// Returns [`NavigationError::NotFound`] for the semester, branch or subject.
pub fn find_subject<'a>(
    catalog: &'a NotesCatalog,
    semester_id: &str,
    branch_key: &str,
    subject_key: &str,
) -> Result<&'a Subject, NavigationError> {
    let branch = find_branch(catalog, semester_id, branch_key)?;
    subject_index(branch, subject_key)
        .map(|i| &branch.subjects[i])
        .ok_or_else(|| NavigationError::not_found(Level::Subject, subject_key))
}

/// Mutable counterpart of [`find_subject`], used by registration
pub(crate) fn find_subject_mut<'a>(
    catalog: &'a mut NotesCatalog,
    semester_id: &str,
    branch_key: &str,
    subject_key: &str,
) -> Result<&'a mut Subject, NavigationError> {
    let s = semester_index(catalog, semester_id)
        .ok_or_else(|| NavigationError::not_found(Level::Semester, semester_id))?;
    let semester = &mut catalog.semesters[s];

    let b = branch_index(semester, branch_key)
        .ok_or_else(|| NavigationError::not_found(Level::Branch, branch_key))?;
    let branch = &mut semester.branches[b];

    let j = subject_index(branch, subject_key)
        .ok_or_else(|| NavigationError::not_found(Level::Subject, subject_key))?;
    Ok(&mut branch.subjects[j])
}

fn semester_index(catalog: &NotesCatalog, semester_id: &str) -> Option<usize> {
    catalog
        .semesters
        .iter()
        .position(|s| s.id.to_string() == semester_id)
        .or_else(|| catalog.semesters.iter().position(|s| s.id.matches(semester_id)))
}

fn branch_index(semester: &Semester, key: &str) -> Option<usize> {
    semester
        .branches
        .iter()
        .position(|b| b.id == key)
        .or_else(|| semester.branches.iter().position(|b| b.matches_key(key)))
}

fn subject_index(branch: &Branch, key: &str) -> Option<usize> {
    branch
        .subjects
        .iter()
        .position(|s| s.id == key)
        .or_else(|| branch.subjects.iter().position(|s| s.matches_key(key)))
}
