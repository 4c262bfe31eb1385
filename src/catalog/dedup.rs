use std::collections::HashSet;
use tracing::warn;

use crate::core::material::Material;

/// Result of removing duplicate listings from a material list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduped<'a> {
    /// First occurrence of every dedup key, in original order
    pub unique: Vec<&'a Material>,
    /// Number of entries dropped as duplicates
    pub removed: usize,
}

impl Deduped<'_> {
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.removed > 0
    }
}

/// Keep the first material for each dedup key (lowercase `title|path`).
///
/// Single streaming pass; the relative order of kept materials is unchanged.
pub fn dedupe<'a, I>(materials: I) -> Deduped<'a>
where
    I: IntoIterator<Item = &'a Material>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();
    let mut removed = 0;

    for material in materials {
        if seen.insert(material.dedup_key()) {
            unique.push(material);
        } else {
            warn!("Duplicate detected: {}", material.title);
            removed += 1;
        }
    }

    Deduped { unique, removed }
}
