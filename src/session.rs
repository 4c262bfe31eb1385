//! Browsing session: the loaded catalog plus the current navigation state.
//!
//! A [`Session`] is the context object a presentation layer holds for one
//! user. Each drill-down call resolves the next level through the navigator
//! and records the selection so a breadcrumb can be rendered.

use serde::Serialize;
use tracing::debug;

use crate::catalog::dedup::Deduped;
use crate::catalog::navigator::{self, NavigationError};
use crate::catalog::store::NotesCatalog;
use crate::core::hierarchy::{Branch, Semester, Subject};
use crate::core::types::SemesterId;

/// Currently selected semester, branch and subject
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub semester: Option<SemesterId>,
    pub branch: Option<String>,
    pub subject: Option<String>,
}

impl NavigationState {
    /// Clear every selection (back to the semester list)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.semester.is_none()
    }
}

/// One breadcrumb segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    /// Path segments that navigate back to this level
    pub path: Vec<String>,
}

/// A browsing session over one catalog
#[derive(Debug, Clone)]
pub struct Session {
    catalog: NotesCatalog,
    state: NavigationState,
}

impl Session {
    #[must_use]
    pub fn new(catalog: NotesCatalog) -> Self {
        Self {
            catalog,
            state: NavigationState::default(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &NotesCatalog {
        &self.catalog
    }

    /// Mutable access for registration; navigation state is left as is
    pub fn catalog_mut(&mut self) -> &mut NotesCatalog {
        &mut self.catalog
    }

    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Return to the root and list all semesters
    pub fn semesters(&mut self) -> &[Semester] {
        self.state.reset();
        navigator::list_semesters(&self.catalog)
    }

    /// Select a semester and list its branches
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NotFound`]; the state is unchanged on error.
    pub fn open_semester(&mut self, semester_id: &str) -> Result<&[Branch], NavigationError> {
        let semester = navigator::find_semester(&self.catalog, semester_id)?;
        debug!("Navigate: semester {}", semester.id);
        self.state = NavigationState {
            semester: Some(semester.id.clone()),
            branch: None,
            subject: None,
        };
        Ok(&semester.branches)
    }

    /// Select a branch and list its subjects
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NotFound`]; the state is unchanged on error.
    pub fn open_branch(
        &mut self,
        semester_id: &str,
        branch_key: &str,
    ) -> Result<&[Subject], NavigationError> {
        let semester = navigator::find_semester(&self.catalog, semester_id)?;
        let branch = navigator::find_branch(&self.catalog, semester_id, branch_key)?;
        debug!("Navigate: semester {} / branch {}", semester.id, branch.id);
        self.state = NavigationState {
            semester: Some(semester.id.clone()),
            branch: Some(branch.id.clone()),
            subject: None,
        };
        Ok(&branch.subjects)
    }

    /// Select a subject and list its (deduplicated) materials
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::NotFound`]; the state is unchanged on error.
    pub fn open_subject(
        &mut self,
        semester_id: &str,
        branch_key: &str,
        subject_key: &str,
    ) -> Result<Deduped<'_>, NavigationError> {
        let semester = navigator::find_semester(&self.catalog, semester_id)?;
        let branch = navigator::find_branch(&self.catalog, semester_id, branch_key)?;
        let subject = navigator::find_subject(&self.catalog, semester_id, branch_key, subject_key)?;
        debug!(
            "Navigate: semester {} / branch {} / subject {}",
            semester.id, branch.id, subject.id
        );
        self.state = NavigationState {
            semester: Some(semester.id.clone()),
            branch: Some(branch.id.clone()),
            subject: Some(subject.id.clone()),
        };
        navigator::list_materials(&self.catalog, semester_id, branch_key, subject_key)
    }

    /// Clear the navigation state
    pub fn back_to_root(&mut self) {
        self.state.reset();
    }

    /// Breadcrumb for the current state, starting with "Home"
    #[must_use]
    pub fn breadcrumb(&self) -> Vec<Crumb> {
        let mut crumbs = vec![Crumb {
            label: "Home".to_string(),
            path: Vec::new(),
        }];

        let Some(semester_id) = &self.state.semester else {
            return crumbs;
        };
        let semester_key = semester_id.to_string();
        let Ok(semester) = navigator::find_semester(&self.catalog, &semester_key) else {
            return crumbs;
        };
        crumbs.push(Crumb {
            label: semester.label(),
            path: vec![semester_key.clone()],
        });

        let Some(branch_id) = &self.state.branch else {
            return crumbs;
        };
        let Ok(branch) = navigator::find_branch(&self.catalog, &semester_key, branch_id) else {
            return crumbs;
        };
        crumbs.push(Crumb {
            label: branch.name.clone(),
            path: vec![semester_key.clone(), branch.id.clone()],
        });

        let Some(subject_id) = &self.state.subject else {
            return crumbs;
        };
        if let Ok(subject) =
            navigator::find_subject(&self.catalog, &semester_key, branch_id, subject_id)
        {
            crumbs.push(Crumb {
                label: subject.name.clone(),
                path: vec![semester_key, branch.id.clone(), subject.id.clone()],
            });
        }

        crumbs
    }

    /// Breadcrumb rendered as "Home > Semester 1 > Computer Science"
    #[must_use]
    pub fn breadcrumb_text(&self) -> String {
        self.breadcrumb()
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join(" > ")
    }
}
