use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::hierarchy::Semester;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to fetch catalog: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Catalog request to {url} failed with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),

    #[error("Failed to write catalog to {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where a catalog document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The catalog compiled into the binary
    Embedded,
    /// A JSON file on disk
    File(PathBuf),
    /// A JSON document served over HTTP(S)
    Url(String),
}

impl CatalogSource {
    /// Interpret a `--catalog` argument: URLs are fetched, anything else is a path.
    /// No argument means the embedded catalog.
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => Self::Embedded,
            Some(s) if s.starts_with("http://") || s.starts_with("https://") => {
                Self::Url(s.to_string())
            }
            Some(s) => Self::File(PathBuf::from(s)),
        }
    }

    /// Local file backing this source, if the catalog can be written back
    #[must_use]
    pub fn writable_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Embedded | Self::Url(_) => None,
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "<embedded>"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// The notes catalog: semesters → branches → subjects → materials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotesCatalog {
    #[serde(default)]
    pub semesters: Vec<Semester>,
}

impl NotesCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from any source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is unreachable, the document does not
    /// match the catalog schema, or sibling identifiers collide.
    pub async fn load(source: &CatalogSource) -> Result<Self, CatalogError> {
        let catalog = match source {
            CatalogSource::Embedded => Self::load_embedded()?,
            CatalogSource::File(path) => {
                let content = tokio::fs::read_to_string(path).await?;
                Self::from_json(&content)?
            }
            CatalogSource::Url(url) => {
                let response = reqwest::get(url).await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::HttpStatus {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                Self::from_json(&response.text().await?)?
            }
        };

        info!(
            "Loaded catalog from {source}: {} semesters, {} materials",
            catalog.len(),
            catalog.material_count()
        );
        Ok(catalog)
    }

    /// Load the embedded default catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded document is invalid.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Embedded at compile time; shape checked by build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/notes-data.json");
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or sibling identifiers collide.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check that identifiers are unique among siblings at every level
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] naming the first repeated identifier.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut semester_ids = HashSet::new();
        for semester in &self.semesters {
            if !semester_ids.insert(semester.id.to_string()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate semester id '{}'",
                    semester.id
                )));
            }

            let mut branch_ids = HashSet::new();
            for branch in &semester.branches {
                if !branch_ids.insert(branch.id.as_str()) {
                    return Err(CatalogError::Invalid(format!(
                        "duplicate branch id '{}' in semester '{}'",
                        branch.id, semester.id
                    )));
                }

                let mut subject_ids = HashSet::new();
                for subject in &branch.subjects {
                    if !subject_ids.insert(subject.id.as_str()) {
                        return Err(CatalogError::Invalid(format!(
                            "duplicate subject id '{}' in branch '{}' of semester '{}'",
                            subject.id, branch.id, semester.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Add a semester to the catalog
    pub fn add_semester(&mut self, semester: Semester) {
        self.semesters.push(semester);
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the catalog to `path`, replacing the file atomically
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::WriteError`] if the temporary file cannot be
    /// created, written, or moved into place.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let write_error = |source: std::io::Error| CatalogError::WriteError {
            path: path.to_path_buf(),
            source,
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
        serde_json::to_writer_pretty(&mut file, self)
            .map_err(|e| write_error(std::io::Error::from(e)))?;
        file.write_all(b"\n").map_err(write_error)?;
        file.persist(path).map_err(|e| write_error(e.error))?;

        debug!("Saved catalog to {}", path.display());
        Ok(())
    }

    /// Number of semesters in catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.semesters.len()
    }

    /// Check if catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty()
    }

    /// Total number of materials across all subjects
    #[must_use]
    pub fn material_count(&self) -> usize {
        self.semesters
            .iter()
            .flat_map(|s| &s.branches)
            .flat_map(|b| &b.subjects)
            .map(|s| s.materials.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hierarchy::{Branch, Subject};
    use crate::core::material::Material;
    use crate::core::types::SemesterId;

    #[test]
    fn test_load_embedded_catalog() {
        let catalog = NotesCatalog::load_embedded().unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.semesters[0].id, SemesterId::Number(1));
        assert!(catalog.material_count() > 0);
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            NotesCatalog::from_json("{\"semesters\": [{\"branches\": []}]}"),
            Err(CatalogError::ParseError(_))
        ));
        assert!(matches!(
            NotesCatalog::from_json("not json"),
            Err(CatalogError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_duplicate_sibling_ids() {
        let json = r#"{"semesters": [
            {"id": 1, "branches": [
                {"id": "cse", "name": "A", "subjects": []},
                {"id": "cse", "name": "B", "subjects": []}
            ]}
        ]}"#;
        let err = NotesCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
        assert!(err.to_string().contains("duplicate branch id 'cse'"));
    }

    #[test]
    fn test_numeric_and_text_semester_ids_collide() {
        let json = r#"{"semesters": [{"id": 1}, {"id": "1"}]}"#;
        assert!(matches!(
            NotesCatalog::from_json(json),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn test_same_branch_id_in_different_semesters_is_allowed() {
        let catalog = NotesCatalog::load_embedded().unwrap();
        let cse_count = catalog
            .semesters
            .iter()
            .filter(|s| s.branches.iter().any(|b| b.id == "cse"))
            .count();
        assert!(cse_count >= 2);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes-data.json");

        let mut catalog = NotesCatalog::new();
        catalog.add_semester(
            Semester::new(5u64).with_branch(
                Branch::new("me", "Mechanical")
                    .with_subject(Subject::new("thermo", "Thermodynamics").with_material(
                        Material::new("Cycles", "Otto and Diesel", "/data/cycles.pdf"),
                    )),
            ),
        );
        catalog.save(&path).unwrap();

        let reloaded = NotesCatalog::load_from_file(&path).unwrap();
        assert_eq!(reloaded, catalog);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with('\n'));
        assert!(raw.contains("  \"semesters\""));
    }

    #[test]
    fn test_load_missing_file() {
        let result = NotesCatalog::load_from_file(Path::new("/nonexistent/notes.json"));
        assert!(matches!(result, Err(CatalogError::ReadError(_))));
    }

    #[tokio::test]
    async fn test_async_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"{"semesters": [{"id": "summer", "branches": []}]}"#).unwrap();

        let catalog = NotesCatalog::load(&CatalogSource::File(path)).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.semesters[0].id.to_string(), "summer");
    }

    #[test]
    fn test_source_from_arg() {
        assert_eq!(CatalogSource::from_arg(None), CatalogSource::Embedded);
        assert_eq!(
            CatalogSource::from_arg(Some("https://host/data/notes-data.json")),
            CatalogSource::Url("https://host/data/notes-data.json".to_string())
        );
        let file = CatalogSource::from_arg(Some("data/notes-data.json"));
        assert_eq!(
            file.writable_path(),
            Some(Path::new("data/notes-data.json"))
        );
        assert!(CatalogSource::Embedded.writable_path().is_none());
    }
}
