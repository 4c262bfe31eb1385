//! Navigable levels of the catalog: `Semester` → `Branch` → `Subject`.

use serde::{Deserialize, Serialize};

use crate::core::material::Material;
use crate::core::types::SemesterId;

/// A semester and the branches taught in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    pub id: SemesterId,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

impl Semester {
    #[must_use]
    pub fn new(id: impl Into<SemesterId>) -> Self {
        Self {
            id: id.into(),
            branches: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.branches.push(branch);
        self
    }

    /// Card/breadcrumb label, e.g. "Semester 3"
    #[must_use]
    pub fn label(&self) -> String {
        format!("Semester {}", self.id)
    }
}

/// A branch (department) within a semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Short identifier (e.g. "cse")
    pub id: String,
    /// Display name (e.g. "Computer Science")
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl Branch {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subjects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Whether `key` names this branch by id or display name, ignoring case
    #[must_use]
    pub fn matches_key(&self, key: &str) -> bool {
        eq_ignore_case(&self.id, key) || eq_ignore_case(&self.name, key)
    }
}

/// A subject within a branch, holding the downloadable materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Short identifier (e.g. "data-structures")
    pub id: String,
    /// Display name (e.g. "Data Structures")
    pub name: String,
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl Subject {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            materials: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.push(material);
        self
    }

    /// Whether `key` names this subject by id or display name, ignoring case
    #[must_use]
    pub fn matches_key(&self, key: &str) -> bool {
        eq_ignore_case(&self.id, key) || eq_ignore_case(&self.name, key)
    }

    /// Directory name used for uploaded files ("Data Structures" → "data-structures")
    #[must_use]
    pub fn slug(&self) -> String {
        self.name.replace(' ', "-").to_lowercase()
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
