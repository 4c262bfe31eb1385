//! Notes catalog storage, navigation, and registration.
//!
//! The catalog is a JSON document of semesters, branches, subjects and
//! materials. A default catalog is compiled into the binary; custom catalogs
//! can be loaded from a file or fetched over HTTP.
//!
//! ## Example
//!
//! ```rust,no_run
//! use notes_browser::catalog::navigator::{list_branches, list_materials};
//! use notes_browser::NotesCatalog;
//!
//! let catalog = NotesCatalog::load_embedded().unwrap();
//!
//! for branch in list_branches(&catalog, "1").unwrap() {
//!     println!("{} ({})", branch.name, branch.id);
//! }
//!
//! let listing = list_materials(&catalog, "1", "cse", "maths-1").unwrap();
//! println!("{} materials, {} duplicates hidden", listing.unique.len(), listing.removed);
//! ```
//!
//! ## Registering materials
//!
//! ```rust,no_run
//! use notes_browser::catalog::registry::add_material;
//! use notes_browser::{Material, NotesCatalog};
//! use std::path::Path;
//!
//! let path = Path::new("data/notes-data.json");
//! let mut catalog = NotesCatalog::load_from_file(path).unwrap();
//! add_material(
//!     &mut catalog,
//!     "2",
//!     "Computer Science",
//!     "Data Structures",
//!     Material::new("Heaps", "Binary heaps", "/data/notes/heaps.pdf"),
//! )
//! .unwrap();
//! catalog.save(path).unwrap();
//! ```

pub mod dedup;
pub mod navigator;
pub mod registry;
pub mod store;
