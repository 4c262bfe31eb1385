use serde::{Deserialize, Serialize};

/// Identifier of a semester.
///
/// Catalog files use both numeric (`"id": 1`) and textual (`"id": "summer"`)
/// keys. Lookups compare the canonical string form, so `1` and `"1"` name
/// the same semester.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SemesterId {
    Number(u64),
    Text(String),
}

impl SemesterId {
    /// Parse a key typed by a user or taken from a URL segment.
    ///
    /// Purely numeric keys become [`SemesterId::Number`] so they serialize
    /// the same way the catalog stores them.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        match key.parse::<u64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(key.to_string()),
        }
    }

    /// Whether this id names the given key
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Number(n) => key.parse::<u64>().is_ok_and(|k| k == *n),
            Self::Text(s) => s == key,
        }
    }
}

impl std::fmt::Display for SemesterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for SemesterId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for SemesterId {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

/// Level of the catalog hierarchy, used to name the step a lookup failed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Semester,
    Branch,
    Subject,
    Material,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Semester => write!(f, "Semester"),
            Self::Branch => write!(f, "Branch"),
            Self::Subject => write!(f, "Subject"),
            Self::Material => write!(f, "Material"),
        }
    }
}
