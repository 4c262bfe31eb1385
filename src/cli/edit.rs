use std::path::Path;

use anyhow::Context;
use clap::Args;

use crate::catalog::registry::{add_material, remove_material};
use crate::catalog::store::{CatalogSource, NotesCatalog};
use crate::cli::{load_catalog, OutputFormat};
use crate::core::material::{download_url, Material};

#[derive(Args)]
pub struct AddArgs {
    /// Semester id
    #[arg(long, required = true)]
    pub semester: String,

    /// Branch id or name (case-insensitive)
    #[arg(long, required = true)]
    pub branch: String,

    /// Subject id or name (case-insensitive)
    #[arg(long, required = true)]
    pub subject: String,

    /// Material title
    #[arg(long, required = true)]
    pub title: String,

    /// Material description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Material path or URL (e.g. "/data/notes/semester-1/cse/maths/unit-3.pdf")
    #[arg(long, required = true)]
    pub path: String,

    /// Human-readable size (e.g. "512KB")
    #[arg(long)]
    pub size: Option<String>,

    /// Upload date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Document type
    #[arg(long = "type", default_value = "pdf")]
    pub kind: String,

    /// Validate and report without writing the catalog
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Semester id
    #[arg(long, required = true)]
    pub semester: String,

    /// Branch id or name (case-insensitive)
    #[arg(long, required = true)]
    pub branch: String,

    /// Subject id or name (case-insensitive)
    #[arg(long, required = true)]
    pub subject: String,

    /// Exact path of the material to remove
    #[arg(long, required = true)]
    pub path: String,

    /// Validate and report without writing the catalog
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run_add(args: AddArgs, source: &CatalogSource, format: OutputFormat) -> anyhow::Result<()> {
    let target = writable_target(source, args.dry_run)?;
    let mut catalog = load_catalog(source)?;

    if let Some(date) = &args.date {
        chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid --date '{date}', expected YYYY-MM-DD"))?;
    }
    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());

    let mut material = Material::new(&args.title, &args.description, &args.path)
        .with_upload_date(date)
        .with_kind(&args.kind)
        .with_download_url(download_url(&args.path));
    if let Some(size) = &args.size {
        material = material.with_size(size);
    }

    add_material(
        &mut catalog,
        &args.semester,
        &args.branch,
        &args.subject,
        material.clone(),
    )?;

    save(&catalog, target)?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "success": true,
                "saved": target.is_some(),
                "material": material,
            }))?
        ),
        OutputFormat::Text | OutputFormat::Tsv => {
            println!("Added \"{}\" to subject '{}'", material.title, args.subject);
            if target.is_none() {
                println!("Dry run: catalog not written");
            }
        }
    }

    Ok(())
}

pub fn run_remove(
    args: RemoveArgs,
    source: &CatalogSource,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let target = writable_target(source, args.dry_run)?;
    let mut catalog = load_catalog(source)?;

    let removed = remove_material(
        &mut catalog,
        &args.semester,
        &args.branch,
        &args.subject,
        &args.path,
    )?;

    save(&catalog, target)?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "success": true,
                "saved": target.is_some(),
                "removed": removed,
            }))?
        ),
        OutputFormat::Text | OutputFormat::Tsv => {
            for material in &removed {
                println!("Removed \"{}\" ({})", material.title, material.path);
            }
            if target.is_none() {
                println!("Dry run: catalog not written");
            }
        }
    }

    Ok(())
}

/// File the edited catalog will be written to, or `None` for a dry run
fn writable_target(source: &CatalogSource, dry_run: bool) -> anyhow::Result<Option<&Path>> {
    if dry_run {
        return Ok(None);
    }
    match source.writable_path() {
        Some(path) => Ok(Some(path)),
        None => anyhow::bail!(
            "Cannot save changes to {source}; pass --catalog <FILE> or use --dry-run"
        ),
    }
}

fn save(catalog: &NotesCatalog, target: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = target {
        catalog.save(path)?;
        tracing::info!("Saved catalog to {}", path.display());
    }
    Ok(())
}
