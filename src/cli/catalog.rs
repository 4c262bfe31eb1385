use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::dedup::dedupe;
use crate::catalog::store::CatalogSource;
use crate::cli::{load_catalog, OutputFormat};

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Summarize the catalog and report duplicate material listings
    Check {
        /// Exit with an error if any subject lists duplicates
        #[arg(long)]
        strict: bool,
    },

    /// Export the catalog to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        /// Drop duplicate material listings from the exported copy
        #[arg(long)]
        dedupe: bool,
    },
}

/// Duplicate listings found in one subject
struct DuplicateReport {
    semester: String,
    branch: String,
    subject: String,
    total: usize,
    removed: usize,
}

pub fn run(
    args: CatalogArgs,
    source: &CatalogSource,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::Check { strict } => run_check(source, strict, format, verbose),
        CatalogCommands::Export { output, dedupe } => run_export(source, output, dedupe),
    }
}

fn run_check(
    source: &CatalogSource,
    strict: bool,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(source)?;

    let mut branch_count = 0;
    let mut subject_count = 0;
    let mut reports = Vec::new();

    for semester in &catalog.semesters {
        branch_count += semester.branches.len();
        for branch in &semester.branches {
            subject_count += branch.subjects.len();
            for subject in &branch.subjects {
                let result = dedupe(&subject.materials);
                if result.has_duplicates() || verbose {
                    reports.push(DuplicateReport {
                        semester: semester.id.to_string(),
                        branch: branch.id.clone(),
                        subject: subject.id.clone(),
                        total: subject.materials.len(),
                        removed: result.removed,
                    });
                }
            }
        }
    }

    let duplicate_total: usize = reports.iter().map(|r| r.removed).sum();

    match format {
        OutputFormat::Text => {
            println!("Catalog: {source}\n");
            println!(
                "Summary: {} semesters, {} branches, {} subjects, {} materials\n",
                catalog.len(),
                branch_count,
                subject_count,
                catalog.material_count()
            );
            if reports.is_empty() {
                println!("No duplicate materials found.");
            } else {
                println!(
                    "{:<10} {:<12} {:<28} {:>9} {:>10}",
                    "Semester", "Branch", "Subject", "Materials", "Duplicates"
                );
                println!("{}", "-".repeat(73));
                for r in &reports {
                    println!(
                        "{:<10} {:<12} {:<28} {:>9} {:>10}",
                        r.semester, r.branch, r.subject, r.total, r.removed
                    );
                }
                println!("\n{duplicate_total} duplicate listing(s) in total");
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "semesters": catalog.len(),
                "branches": branch_count,
                "subjects": subject_count,
                "materials": catalog.material_count(),
                "duplicates": duplicate_total,
                "subjects_with_duplicates": reports
                    .iter()
                    .filter(|r| r.removed > 0)
                    .map(|r| serde_json::json!({
                        "semester": r.semester,
                        "branch": r.branch,
                        "subject": r.subject,
                        "materials": r.total,
                        "duplicates": r.removed,
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("semester\tbranch\tsubject\tmaterials\tduplicates");
            for r in &reports {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    r.semester, r.branch, r.subject, r.total, r.removed
                );
            }
        }
    }

    if strict && duplicate_total > 0 {
        anyhow::bail!("{duplicate_total} duplicate material listing(s) found");
    }

    Ok(())
}

fn run_export(source: &CatalogSource, output: PathBuf, dedupe_materials: bool) -> anyhow::Result<()> {
    let mut catalog = load_catalog(source)?;

    if dedupe_materials {
        for subject in catalog
            .semesters
            .iter_mut()
            .flat_map(|s| s.branches.iter_mut())
            .flat_map(|b| b.subjects.iter_mut())
        {
            let unique: Vec<_> = dedupe(&subject.materials)
                .unique
                .into_iter()
                .cloned()
                .collect();
            subject.materials = unique;
        }
    }

    catalog.save(&output)?;

    println!(
        "Exported {} semesters ({} materials) to {}",
        catalog.len(),
        catalog.material_count(),
        output.display()
    );

    Ok(())
}
