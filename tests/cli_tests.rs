//! End-to-end tests of the `notes-browser` binary

use assert_cmd::Command;
use notes_browser::NotesCatalog;
use predicates::prelude::*;
use tempfile::TempDir;

fn notes_browser() -> Command {
    let mut cmd = Command::cargo_bin("notes-browser").unwrap();
    cmd.env_remove("NOTES_CATALOG").env_remove("NOTES_DATA_ROOT");
    cmd
}

/// Export the embedded catalog so a test can edit its own copy
fn exported_catalog(dir: &TempDir) -> String {
    let path = dir.path().join("notes-data.json");
    notes_browser()
        .args(["catalog", "export"])
        .arg(&path)
        .assert()
        .success();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_browse_semesters() {
    notes_browser()
        .arg("browse")
        .assert()
        .success()
        .stdout(predicate::str::contains("Home"))
        .stdout(predicate::str::contains("Semester 1"))
        .stdout(predicate::str::contains("Semester 2"));
}

#[test]
fn test_browse_subject_hides_duplicates() {
    notes_browser()
        .args(["browse", "1", "Computer Science", "maths-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Home > Semester 1 > Computer Science > Engineering Mathematics I",
        ))
        .stdout(predicate::str::contains("Unit 1 Notes"))
        .stdout(predicate::str::contains("unit_1_notes.pdf"))
        .stdout(predicate::str::contains("UNIT 1 NOTES").not())
        .stderr(predicate::str::contains(
            "1 duplicate file(s) detected and hidden.",
        ));
}

#[test]
fn test_browse_subject_warns_once_per_duplicate() {
    let output = notes_browser()
        .args(["browse", "1", "cse", "maths-1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Duplicate detected").count(), 1, "{stderr}");
}

#[test]
fn test_browse_json_output() {
    let output = notes_browser()
        .args(["--format", "json", "browse", "2", "CSE"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["level"], "subjects");
    assert_eq!(json["state"]["semester"], 2);
    assert_eq!(json["state"]["branch"], "cse");
    assert_eq!(json["items"][0]["id"], "data-structures");
}

#[test]
fn test_browse_unknown_semester() {
    notes_browser()
        .args(["browse", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Semester '7' not found"));
}

#[test]
fn test_add_and_remove_material() {
    let dir = TempDir::new().unwrap();
    let catalog = exported_catalog(&dir);
    let path = "/data/notes/semester-2/cse/data-structures/heaps.pdf";

    notes_browser()
        .args(["--catalog", &catalog, "add"])
        .args(["--semester", "2", "--branch", "cse", "--subject", "Data Structures"])
        .args(["--title", "Heaps", "--path", path, "--size", "128KB"])
        .args(["--date", "2025-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added \"Heaps\""));

    let saved = NotesCatalog::load_from_file(dir.path().join("notes-data.json").as_path()).unwrap();
    let materials = &saved.semesters[1].branches[0].subjects[0].materials;
    assert_eq!(materials.len(), 3);
    assert_eq!(materials[2].upload_date.as_deref(), Some("2025-03-01"));
    assert_eq!(materials[2].size.as_deref(), Some("128KB"));

    // Same path again is refused
    notes_browser()
        .args(["--catalog", &catalog, "add"])
        .args(["--semester", "2", "--branch", "cse", "--subject", "data-structures"])
        .args(["--title", "Heaps (copy)", "--path", path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate file"));

    notes_browser()
        .args(["--catalog", &catalog, "remove"])
        .args(["--semester", "2", "--branch", "cse", "--subject", "data-structures"])
        .args(["--path", path])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed \"Heaps\""));

    let saved = NotesCatalog::load_from_file(dir.path().join("notes-data.json").as_path()).unwrap();
    assert_eq!(saved.semesters[1].branches[0].subjects[0].materials.len(), 2);
}

#[test]
fn test_add_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    let catalog = exported_catalog(&dir);

    notes_browser()
        .args(["--catalog", &catalog, "add"])
        .args(["--semester", "1", "--branch", "cse", "--subject", "physics"])
        .args(["--title", "Waves", "--path", "/data/waves.pdf", "--date", "03/01/2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected YYYY-MM-DD"));
}

#[test]
fn test_embedded_catalog_needs_dry_run() {
    let add = |dry_run: bool| {
        let mut cmd = notes_browser();
        cmd.args(["add", "--semester", "1", "--branch", "ece"])
            .args(["--subject", "basic-electrical", "--title", "DC Circuits"])
            .args(["--path", "/data/dc.pdf"]);
        if dry_run {
            cmd.arg("--dry-run");
        }
        cmd.assert()
    };

    add(false)
        .failure()
        .stderr(predicate::str::contains("Cannot save changes"));
    add(true)
        .success()
        .stdout(predicate::str::contains("Dry run: catalog not written"));
}

#[test]
fn test_catalog_check_and_dedupe_export() {
    notes_browser()
        .args(["catalog", "check", "--strict"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("maths-1"))
        .stderr(predicate::str::contains("1 duplicate material listing(s) found"));

    let dir = TempDir::new().unwrap();
    let cleaned = dir.path().join("clean.json");
    notes_browser()
        .args(["catalog", "export", "--dedupe"])
        .arg(&cleaned)
        .assert()
        .success();

    notes_browser()
        .arg("--catalog")
        .arg(&cleaned)
        .args(["catalog", "check", "--strict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No duplicate materials found."));
}
