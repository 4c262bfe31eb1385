//! # notes-browser
//!
//! A library for browsing a catalog of academic notes organised as
//! Semester → Branch → Subject → Material.
//!
//! The catalog is a single JSON document. `notes-browser` loads it from the
//! embedded copy, a file, or a URL, then lets callers drill down through the
//! hierarchy, list a subject's materials with duplicate listings hidden, and
//! register or remove materials while rejecting duplicates.
//!
//! ## Features
//!
//! - **Hierarchical navigation**: ids or case-insensitive names at every level
//! - **Duplicate hiding**: listings collapse entries sharing a `title|path` key
//! - **Safe registration**: a material conflicting on title or path is refused
//! - **Breadcrumbs**: a [`Session`] tracks the current drill-down position
//! - **HTTP API**: the [`web`] module serves the catalog, downloads and uploads
//!
//! ## Example
//!
//! ```rust,no_run
//! use notes_browser::{NotesCatalog, Session};
//!
//! let catalog = NotesCatalog::load_embedded().unwrap();
//! let mut session = Session::new(catalog);
//!
//! session.open_semester("1").unwrap();
//! let listing = session.open_subject("1", "cse", "maths-1").unwrap();
//! for material in &listing.unique {
//!     println!("{} ({})", material.title, material.download_filename());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Catalog loading, navigation, deduplication and registration
//! - [`core`]: Data types for semesters, branches, subjects and materials
//! - [`session`]: Drill-down state and breadcrumbs
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: HTTP API server

pub mod catalog;
pub mod cli;
pub mod core;
pub mod session;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use crate::catalog::dedup::{dedupe, Deduped};
pub use crate::catalog::navigator::NavigationError;
pub use crate::catalog::store::{CatalogError, CatalogSource, NotesCatalog};
pub use crate::core::hierarchy::{Branch, Semester, Subject};
pub use crate::core::material::Material;
pub use crate::core::types::*;
pub use crate::session::{NavigationState, Session};
