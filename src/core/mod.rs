//! Core data types for the notes catalog.
//!
//! The catalog is a four-level hierarchy:
//!
//! | Level    | Key                        | Children    |
//! |----------|----------------------------|-------------|
//! | Semester | opaque id (number or text) | branches    |
//! | Branch   | id + display name          | subjects    |
//! | Subject  | id + display name          | materials   |
//! | Material | title + path               | -           |
//!
//! - [`Semester`], [`Branch`], [`Subject`]: the navigable levels
//! - [`Material`]: a single downloadable document (commonly a PDF)
//! - [`SemesterId`], [`Level`]: identifier and level metadata types

pub mod hierarchy;
pub mod material;
pub mod types;

pub use hierarchy::{Branch, Semester, Subject};
pub use material::Material;
pub use types::{Level, SemesterId};
