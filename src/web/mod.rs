//! HTTP API over the notes catalog.
//!
//! The server keeps one catalog in memory behind an async `RwLock`. Reads
//! share the lock; admin changes take it exclusively, save the catalog file
//! (when one was given) and only then publish the new state.
//!
//! ## Starting the Server
//!
//! ```text
//! # Serve the embedded catalog on port 8080
//! notes-browser serve
//!
//! # Persist admin changes to a catalog file and store uploads under ./site
//! notes-browser --catalog site/data/notes-data.json serve --data-root site --site-dir site
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /api/catalog` - The full catalog document (also `/data/notes-data.json`)
//! - `GET /api/semesters` - Semesters with branch counts
//! - `GET /api/semesters/{semester}/branches` - Branches of a semester
//! - `GET /api/semesters/{semester}/branches/{branch}/subjects` - Subjects of a branch
//! - `GET .../subjects/{subject}/materials` - Materials with duplicates hidden
//! - `POST /api/admin/materials` - Register a material (JSON)
//! - `POST /api/admin/upload` - Upload a PDF and register it (multipart form)
//! - `POST /api/admin/delete-material` - Remove a material and its stored file
//! - `GET /api/download?path=...` - Download a stored file

pub mod server;
