//! Centralized validation and helper functions.

use std::path::{Component, Path, PathBuf};

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const MIN_FILE_CONTENT_SIZE: usize = 1;

/// Magic bytes every PDF starts with
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Security validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("File content appears malformed or invalid")]
    InvalidFileContent,
}

/// Secure filename validation to prevent directory traversal and other attacks
///
/// Validates and sanitizes filenames by:
/// - Checking length limits
/// - Preventing directory traversal (../, ..\\)
/// - Removing potentially dangerous characters
/// - Ensuring filename is not empty after sanitization
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if filename.contains('\0') || filename.chars().any(|c| ('\x01'..='\x1F').contains(&c)) {
        return Err(ValidationError::InvalidFilename);
    }

    // Keep only safe characters; spaces become dashes so stored paths need no escaping
    let sanitized = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' '))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect::<String>();

    if sanitized.trim_matches('-').is_empty() || sanitized.starts_with('.') {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}

/// Validate an uploaded document: safe filename, `.pdf` extension, PDF magic bytes.
///
/// Returns the sanitized filename to store the document under.
///
/// # Errors
///
/// Returns the first validation rule the upload breaks.
pub fn validate_pdf_upload(filename: &str, content: &[u8]) -> Result<String, ValidationError> {
    let sanitized = validate_filename(filename)?;

    let extension = Path::new(&sanitized)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if extension != "pdf" {
        return Err(ValidationError::UnsupportedFormat(format!(".{extension}")));
    }

    if content.len() < MIN_FILE_CONTENT_SIZE || !content.starts_with(PDF_MAGIC) {
        return Err(ValidationError::InvalidFileContent);
    }

    Ok(sanitized)
}

/// Map a material locator onto a file under `root`.
///
/// Origin-relative (`/data/...`) and page-relative (`../data/...`) forms are
/// both accepted. Returns `None` for absolute URLs and for anything that
/// would escape `root` after the leading prefix is stripped.
///
/// ```
/// use notes_browser::utils::validation::resolve_under_root;
/// use std::path::Path;
///
/// let root = Path::new("/srv/site");
/// assert_eq!(
///     resolve_under_root(root, "/data/notes/a.pdf"),
///     Some(root.join("data/notes/a.pdf"))
/// );
/// assert_eq!(resolve_under_root(root, "/data/../../etc/passwd"), None);
/// ```
#[must_use]
pub fn resolve_under_root(root: &Path, locator: &str) -> Option<PathBuf> {
    if locator.contains("://") || locator.contains('\0') {
        return None;
    }

    let mut relative = locator.trim_start_matches('/');
    while let Some(rest) = relative
        .strip_prefix("../")
        .or_else(|| relative.strip_prefix("./"))
    {
        relative = rest;
    }

    let relative = Path::new(relative);
    let mut has_normal = false;
    for component in relative.components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    has_normal.then(|| root.join(relative))
}

/// Map a locator onto a file inside `root/subdir`.
///
/// Same rules as [`resolve_under_root`], and the result must lie strictly
/// below `subdir`, so files elsewhere under `root` are never reached.
#[must_use]
pub fn resolve_stored_file(root: &Path, subdir: &str, locator: &str) -> Option<PathBuf> {
    let stored_root = root.join(subdir);
    resolve_under_root(root, locator).filter(|p| p.starts_with(&stored_root) && *p != stored_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename() {
        assert_eq!(validate_filename("unit-1.pdf").unwrap(), "unit-1.pdf");
        assert_eq!(validate_filename("Unit 1 (v2).pdf").unwrap(), "Unit-1-v2.pdf");
        assert!(matches!(
            validate_filename("../secret.pdf"),
            Err(ValidationError::InvalidFilename)
        ));
        assert!(matches!(
            validate_filename("   "),
            Err(ValidationError::EmptyFilename)
        ));
        assert!(matches!(
            validate_filename(".hidden"),
            Err(ValidationError::InvalidFilename)
        ));
        assert!(matches!(
            validate_filename(&"a".repeat(300)),
            Err(ValidationError::FilenameTooLong)
        ));
    }

    #[test]
    fn test_validate_pdf_upload() {
        assert_eq!(
            validate_pdf_upload("notes.PDF", b"%PDF-1.7\n...").unwrap(),
            "notes.PDF"
        );
        assert!(matches!(
            validate_pdf_upload("notes.docx", b"PK\x03\x04"),
            Err(ValidationError::UnsupportedFormat(ext)) if ext == ".docx"
        ));
        assert!(matches!(
            validate_pdf_upload("notes.pdf", b"<html>"),
            Err(ValidationError::InvalidFileContent)
        ));
        assert!(matches!(
            validate_pdf_upload("notes.pdf", b""),
            Err(ValidationError::InvalidFileContent)
        ));
    }

    #[test]
    fn test_resolve_under_root() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_under_root(root, "../data/notes/x.pdf"),
            Some(root.join("data/notes/x.pdf"))
        );
        assert_eq!(
            resolve_under_root(root, "data/notes/x.pdf"),
            Some(root.join("data/notes/x.pdf"))
        );
        assert_eq!(resolve_under_root(root, "/data/notes/../../x.pdf"), None);
        assert_eq!(resolve_under_root(root, "https://cdn.example/x.pdf"), None);
        assert_eq!(resolve_under_root(root, "/"), None);
        assert_eq!(resolve_under_root(root, ""), None);
    }

    #[test]
    fn test_resolve_stored_file() {
        let root = Path::new("/srv/site");
        assert_eq!(
            resolve_stored_file(root, "data/notes", "/data/notes/semester-1/x.pdf"),
            Some(root.join("data/notes/semester-1/x.pdf"))
        );
        assert_eq!(resolve_stored_file(root, "data/notes", "/notes-data.json"), None);
        assert_eq!(resolve_stored_file(root, "data/notes", "/data/notes-data.json"), None);
        assert_eq!(resolve_stored_file(root, "data/notes", "/data/notes"), None);
        assert_eq!(resolve_stored_file(root, "data/notes", "/data/notesx/a.pdf"), None);
    }
}
