use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single downloadable document entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub title: String,
    pub description: String,
    /// Resource locator, either origin-relative ("/data/...") or used verbatim
    pub path: String,
    /// Human-readable size (e.g. "412KB")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Upload date as stored in the catalog (normally `YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    /// Document type (e.g. "pdf")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl Material {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            path: path.into(),
            size: None,
            upload_date: None,
            kind: None,
            download_url: None,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    #[must_use]
    pub fn with_upload_date(mut self, date: impl Into<String>) -> Self {
        self.upload_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    /// Key used to detect duplicate listings: lowercase `title|path`
    #[must_use]
    pub fn dedup_key(&self) -> String {
        format!("{}|{}", self.title, self.path).to_lowercase()
    }

    /// Whether `other` would collide with this material on registration.
    ///
    /// Unlike [`Material::dedup_key`], a match on title alone or path alone is
    /// enough, after trimming and case folding.
    #[must_use]
    pub fn conflicts_with(&self, other: &Material) -> bool {
        normalize(&self.title) == normalize(&other.title)
            || normalize(&self.path) == normalize(&other.path)
    }

    /// Locator to open or download this material from the given origin
    #[must_use]
    pub fn locator(&self, origin: &str) -> String {
        resolve_locator(&self.path, origin)
    }

    /// Filename offered when downloading this material
    #[must_use]
    pub fn download_filename(&self) -> String {
        download_filename(&self.title)
    }

    /// Upload date formatted for display, or "Unknown"
    #[must_use]
    pub fn upload_date_display(&self) -> String {
        match self.upload_date.as_deref() {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_or_else(|_| raw.to_string(), |d| d.format("%d %b %Y").to_string()),
            None => "Unknown".to_string(),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Resolve a material path against an origin.
///
/// Paths beginning with `/` are origin-relative and get the origin prefixed;
/// anything else (relative paths, full URLs) is returned verbatim.
///
/// ```
/// use notes_browser::core::material::resolve_locator;
///
/// assert_eq!(
///     resolve_locator("/data/a.pdf", "https://notes.example"),
///     "https://notes.example/data/a.pdf"
/// );
/// assert_eq!(resolve_locator("../data/a.pdf", "https://notes.example"), "../data/a.pdf");
/// ```
#[must_use]
pub fn resolve_locator(path: &str, origin: &str) -> String {
    if path.starts_with('/') {
        format!("{}{path}", origin.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

/// Derive a safe download filename from a material title.
///
/// Every character outside `[a-zA-Z0-9]` becomes `_`, the result is
/// lowercased and `.pdf` appended.
#[must_use]
pub fn download_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.pdf")
}

/// Link that downloads a stored material through the HTTP API
///
/// ```
/// use notes_browser::core::material::download_url;
///
/// assert_eq!(
///     download_url("/data/notes/signals-&-systems/a.pdf"),
///     "/api/download?path=%2Fdata%2Fnotes%2Fsignals-%26-systems%2Fa.pdf"
/// );
/// ```
#[must_use]
pub fn download_url(path: &str) -> String {
    format!("/api/download?path={}", urlencoding::encode(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_key_is_case_insensitive() {
        let a = Material::new("X", "", "/a");
        let b = Material::new("x", "", "/A");
        assert_eq!(a.dedup_key(), "x|/a");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_dedup_key_does_not_trim() {
        let a = Material::new("X ", "", "/a");
        let b = Material::new("X", "", "/a");
        assert_ne!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_conflicts_on_title_or_path() {
        let existing = Material::new("Unit 1", "", "/notes/u1.pdf");
        assert!(existing.conflicts_with(&Material::new("  unit 1 ", "", "/other.pdf")));
        assert!(existing.conflicts_with(&Material::new("Other", "", " /NOTES/U1.PDF")));
        assert!(!existing.conflicts_with(&Material::new("Unit 2", "", "/notes/u2.pdf")));
    }

    #[test]
    fn test_download_filename_sanitizes() {
        assert_eq!(download_filename("Trees & Graphs"), "trees___graphs.pdf");
        assert_eq!(download_filename("Unit-1 Notes"), "unit_1_notes.pdf");
        assert_eq!(download_filename("Über"), "_ber.pdf");
    }

    #[test]
    fn test_resolve_locator_trims_origin_slash() {
        assert_eq!(
            resolve_locator("/data/a.pdf", "http://localhost:8080/"),
            "http://localhost:8080/data/a.pdf"
        );
        assert_eq!(
            resolve_locator("https://cdn.example/a.pdf", "http://localhost"),
            "https://cdn.example/a.pdf"
        );
    }

    #[test]
    fn test_camel_case_fields_round_trip_names() {
        let json = r#"{"title":"T","description":"D","path":"/p","uploadDate":"2024-08-12","type":"pdf","downloadUrl":"/api/download?path=/p"}"#;
        let m: Material = serde_json::from_str(json).unwrap();
        assert_eq!(m.upload_date.as_deref(), Some("2024-08-12"));
        assert_eq!(m.kind.as_deref(), Some("pdf"));
        assert_eq!(m.download_url.as_deref(), Some("/api/download?path=/p"));

        let out = serde_json::to_string(&m).unwrap();
        assert!(out.contains("\"uploadDate\""));
        assert!(out.contains("\"type\""));
        assert!(!out.contains("\"size\""));
    }

    #[test]
    fn test_upload_date_display() {
        let m = Material::new("T", "D", "/p").with_upload_date("2024-08-12");
        assert_eq!(m.upload_date_display(), "12 Aug 2024");
        assert_eq!(Material::new("T", "D", "/p").upload_date_display(), "Unknown");
        let odd = Material::new("T", "D", "/p").with_upload_date("last week");
        assert_eq!(odd.upload_date_display(), "last week");
    }

    #[test]
    fn test_download_url_escapes_query_characters() {
        let url = download_url("/data/notes/c#-programming/a&b.pdf");
        assert_eq!(
            url,
            "/api/download?path=%2Fdata%2Fnotes%2Fc%23-programming%2Fa%26b.pdf"
        );
        assert!(!url.contains('#'));
    }
}
