use clap::Args;

use crate::catalog::navigator;
use crate::catalog::store::CatalogSource;
use crate::cli::{load_catalog, OutputFormat};
use crate::core::hierarchy::{Branch, Semester, Subject};
use crate::core::material::Material;
use crate::session::Session;

#[derive(Args)]
pub struct BrowseArgs {
    /// Semester id
    pub semester: Option<String>,

    /// Branch id or name (case-insensitive)
    #[arg(requires = "semester")]
    pub branch: Option<String>,

    /// Subject id or name (case-insensitive)
    #[arg(requires = "branch")]
    pub subject: Option<String>,

    /// Origin to resolve "/"-prefixed material paths against
    #[arg(long)]
    pub origin: Option<String>,
}

enum Listing<'a> {
    Semesters(&'a [Semester]),
    Branches(&'a [Branch]),
    Subjects(&'a [Subject]),
    Materials { unique: Vec<Material>, removed: usize },
}

pub fn run(
    args: BrowseArgs,
    source: &CatalogSource,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(source)?;
    if verbose {
        eprintln!(
            "Loaded catalog with {} semesters and {} materials",
            catalog.len(),
            catalog.material_count()
        );
    }

    let mut session = Session::new(catalog);

    // Drill-down borrows the session mutably; list again through a shared borrow
    let listing = match (&args.semester, &args.branch, &args.subject) {
        (Some(sem), Some(branch), Some(subject)) => {
            let deduped = session.open_subject(sem, branch, subject)?;
            Listing::Materials {
                removed: deduped.removed,
                unique: deduped.unique.into_iter().cloned().collect(),
            }
        }
        (Some(sem), Some(branch), None) => {
            session.open_branch(sem, branch)?;
            Listing::Subjects(navigator::list_subjects(session.catalog(), sem, branch)?)
        }
        (Some(sem), None, _) => {
            session.open_semester(sem)?;
            Listing::Branches(navigator::list_branches(session.catalog(), sem)?)
        }
        (None, _, _) => Listing::Semesters(navigator::list_semesters(session.catalog())),
    };

    match format {
        OutputFormat::Text => print_text(&session, &listing, args.origin.as_deref()),
        OutputFormat::Json => print_json(&session, &listing, args.origin.as_deref())?,
        OutputFormat::Tsv => print_tsv(&listing),
    }

    Ok(())
}

fn print_text(session: &Session, listing: &Listing<'_>, origin: Option<&str>) {
    println!("{}\n", session.breadcrumb_text());

    match listing {
        Listing::Semesters(semesters) => {
            println!("Semesters ({})\n", semesters.len());
            for semester in *semesters {
                println!(
                    "  {:<20} {:>3} branches",
                    semester.label(),
                    semester.branches.len()
                );
            }
        }
        Listing::Branches(branches) => {
            let id_width = branches.iter().map(|b| b.id.len()).max().unwrap_or(2).max(2);
            println!("{:<id_w$}  {:<40} {:>8}", "ID", "Name", "Subjects", id_w = id_width);
            println!("{}", "-".repeat(id_width + 51));
            for branch in *branches {
                println!(
                    "{:<id_w$}  {:<40} {:>8}",
                    branch.id,
                    truncate(&branch.name, 40),
                    branch.subjects.len(),
                    id_w = id_width
                );
            }
        }
        Listing::Subjects(subjects) => {
            let id_width = subjects.iter().map(|s| s.id.len()).max().unwrap_or(2).max(2);
            println!("{:<id_w$}  {:<40} {:>9}", "ID", "Name", "Materials", id_w = id_width);
            println!("{}", "-".repeat(id_width + 52));
            for subject in *subjects {
                println!(
                    "{:<id_w$}  {:<40} {:>9}",
                    subject.id,
                    truncate(&subject.name, 40),
                    subject.materials.len(),
                    id_w = id_width
                );
            }
        }
        Listing::Materials { unique, removed } => {
            if *removed > 0 {
                eprintln!("Warning: {removed} duplicate file(s) detected and hidden.");
            }
            if unique.is_empty() {
                println!("No materials available for this subject yet.");
            }
            for material in unique {
                println!("{}", material.title);
                println!("  {}", material.description);
                println!("  Size:     {}", material.size.as_deref().unwrap_or("Unknown"));
                println!("  Uploaded: {}", material.upload_date_display());
                match origin {
                    Some(origin) => println!("  View:     {}", material.locator(origin)),
                    None => println!("  View:     {}", material.path),
                }
                println!("  Save as:  {}\n", material.download_filename());
            }
        }
    }
}

fn print_json(
    session: &Session,
    listing: &Listing<'_>,
    origin: Option<&str>,
) -> anyhow::Result<()> {
    let (level, items, removed) = match listing {
        Listing::Semesters(semesters) => (
            "semesters",
            semesters
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "id": s.id,
                        "label": s.label(),
                        "branch_count": s.branches.len(),
                    })
                })
                .collect::<Vec<_>>(),
            None,
        ),
        Listing::Branches(branches) => (
            "branches",
            branches
                .iter()
                .map(|b| {
                    serde_json::json!({
                        "id": b.id,
                        "name": b.name,
                        "subject_count": b.subjects.len(),
                    })
                })
                .collect(),
            None,
        ),
        Listing::Subjects(subjects) => (
            "subjects",
            subjects
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "id": s.id,
                        "name": s.name,
                        "material_count": s.materials.len(),
                    })
                })
                .collect(),
            None,
        ),
        Listing::Materials { unique, removed } => (
            "materials",
            unique
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "title": m.title,
                        "description": m.description,
                        "path": m.path,
                        "size": m.size,
                        "uploadDate": m.upload_date,
                        "url": origin.map_or_else(|| m.path.clone(), |o| m.locator(o)),
                        "download_name": m.download_filename(),
                    })
                })
                .collect(),
            Some(*removed),
        ),
    };

    let mut output = serde_json::json!({
        "breadcrumb": session.breadcrumb(),
        "state": session.state(),
        "level": level,
        "items": items,
    });
    if let Some(removed) = removed {
        output["duplicates_removed"] = serde_json::json!(removed);
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(listing: &Listing<'_>) {
    match listing {
        Listing::Semesters(semesters) => {
            println!("id\tbranch_count");
            for s in *semesters {
                println!("{}\t{}", s.id, s.branches.len());
            }
        }
        Listing::Branches(branches) => {
            println!("id\tname\tsubject_count");
            for b in *branches {
                println!("{}\t{}\t{}", b.id, b.name, b.subjects.len());
            }
        }
        Listing::Subjects(subjects) => {
            println!("id\tname\tmaterial_count");
            for s in *subjects {
                println!("{}\t{}\t{}", s.id, s.name, s.materials.len());
            }
        }
        Listing::Materials { unique, .. } => {
            println!("title\tpath\tsize\tupload_date\tdownload_name");
            for m in unique {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    m.title,
                    m.path,
                    m.size.as_deref().unwrap_or(""),
                    m.upload_date.as_deref().unwrap_or(""),
                    m.download_filename()
                );
            }
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
