//! Command-line interface for notes-browser.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **browse**: Drill down Semester → Branch → Subject → Materials
//! - **add**: Register a material in a subject and save the catalog
//! - **remove**: Remove a material from a subject and save the catalog
//! - **catalog**: Check a catalog for duplicates, or export it
//! - **serve**: Start the HTTP API
//!
//! ## Usage
//!
//! ```text
//! # List semesters, then the branches of semester 1
//! notes-browser browse
//! notes-browser browse 1
//!
//! # Branches and subjects accept ids or display names
//! notes-browser browse 1 "computer science" maths-1
//!
//! # JSON output for scripting, against a catalog on disk
//! notes-browser --catalog data/notes-data.json --format json browse 2 cse
//!
//! # Start the API and open a browser
//! notes-browser serve --port 8080 --open
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::store::{CatalogSource, NotesCatalog};

pub mod browse;
pub mod catalog;
pub mod edit;

#[derive(Parser)]
#[command(name = "notes-browser")]
#[command(version)]
#[command(about = "Browse academic notes by semester, branch and subject")]
#[command(
    long_about = "notes-browser reads a notes catalog (semesters → branches → subjects → materials) and lets you:\n- Drill down through the hierarchy and list materials with duplicates hidden\n- Register or remove materials, rejecting duplicates\n- Serve the catalog, downloads and admin uploads over HTTP"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Catalog file or URL (defaults to the embedded catalog)
    #[arg(long, global = true, env = "NOTES_CATALOG")]
    pub catalog: Option<String>,
}

impl Cli {
    /// Where the catalog should be loaded from
    #[must_use]
    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::from_arg(self.catalog.as_deref())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List semesters, or the children of a semester, branch or subject
    Browse(browse::BrowseArgs),

    /// Add a material to a subject
    Add(edit::AddArgs),

    /// Remove a material from a subject
    Remove(edit::RemoveArgs),

    /// Inspect or export the catalog
    Catalog(catalog::CatalogArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Directory that uploads are stored under and downloads are served from
    #[arg(long, env = "NOTES_DATA_ROOT", default_value = ".")]
    pub data_root: PathBuf,

    /// Static site directory served for paths outside the API
    #[arg(long)]
    pub site_dir: Option<PathBuf>,

    /// Public origin used to build material URLs (defaults to http://ADDRESS:PORT)
    #[arg(long)]
    pub origin: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load a catalog for a one-shot command
///
/// # Errors
///
/// Returns an error if the runtime cannot be created or the catalog fails to load.
pub fn load_catalog(source: &CatalogSource) -> anyhow::Result<NotesCatalog> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(rt.block_on(NotesCatalog::load(source))?)
}
