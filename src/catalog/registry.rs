//! Adding and removing materials.
//!
//! Both operations only touch the in-memory catalog. Writing the result back
//! to disk is up to the caller (see [`NotesCatalog::save`]).

use tracing::{info, warn};

use super::navigator::{find_subject_mut, NavigationError};
use super::store::NotesCatalog;
use crate::core::material::Material;
use crate::core::types::Level;

/// Append `material` to a subject unless its title or path is already present.
///
/// Resolution order is semester (by id), then branch and subject (by name or
/// id, ignoring case). The catalog is left untouched on any error.
///
/// # Errors
///
/// Returns [`NavigationError::NotFound`] naming the first unresolved level, or
/// [`NavigationError::DuplicateMaterial`] if the subject already lists a
/// material with the same trimmed, case-folded title or path.
pub fn add_material(
    catalog: &mut NotesCatalog,
    semester_id: &str,
    branch_key: &str,
    subject_key: &str,
    material: Material,
) -> Result<(), NavigationError> {
    let subject = find_subject_mut(catalog, semester_id, branch_key, subject_key)?;

    if subject.materials.iter().any(|m| m.conflicts_with(&material)) {
        warn!(
            "Duplicate file \"{}\" detected in subject '{}'. Upload skipped.",
            material.title, subject.id
        );
        return Err(NavigationError::DuplicateMaterial {
            title: material.title,
            subject: subject.id.clone(),
        });
    }

    info!(
        "Added material \"{}\" to subject '{}'",
        material.title, subject.id
    );
    subject.materials.push(material);
    Ok(())
}

/// Remove every material in a subject whose path equals `path`.
///
/// # Errors
///
/// Returns [`NavigationError::NotFound`] if a level does not resolve or no
/// material has this path (level [`Level::Material`]).
pub fn remove_material(
    catalog: &mut NotesCatalog,
    semester_id: &str,
    branch_key: &str,
    subject_key: &str,
    path: &str,
) -> Result<Vec<Material>, NavigationError> {
    let subject = find_subject_mut(catalog, semester_id, branch_key, subject_key)?;

    let (removed, kept): (Vec<Material>, Vec<Material>) = std::mem::take(&mut subject.materials)
        .into_iter()
        .partition(|m| m.path == path);
    subject.materials = kept;

    if removed.is_empty() {
        return Err(NavigationError::not_found(Level::Material, path));
    }

    info!(
        "Removed {} material(s) with path '{path}' from subject '{}'",
        removed.len(),
        subject.id
    );
    Ok(removed)
}
