use std::path::Path;

fn main() {
    let catalog_path = Path::new("catalogs/notes-data.json");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    // Ensure catalog exists at build time
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the catalog file before building.\n",
        catalog_path.display()
    );

    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    let catalog: serde_json::Value = serde_json::from_str(&catalog_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            catalog_path.display()
        );
    });

    validate_catalog_structure(&catalog);
}

fn validate_catalog_structure(catalog: &serde_json::Value) {
    assert!(
        catalog.is_object(),
        "\n\nCATALOG BUILD ERROR: Root must be a JSON object\n\
         Got: {catalog}\n"
    );

    let semesters = catalog.get("semesters").unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Missing 'semesters' field\n\
             The catalog must have a top-level 'semesters' array.\n"
        );
    });

    let semesters = semesters.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: 'semesters' must be an array\n\
             Got: {semesters}\n"
        );
    });

    let total_materials = validate_semesters(semesters);

    println!(
        "cargo:warning=Validated catalog: {} semesters, {total_materials} total materials",
        semesters.len()
    );
}

fn validate_semesters(semesters: &[serde_json::Value]) -> usize {
    let mut total_materials = 0;

    for (i, semester) in semesters.iter().enumerate() {
        assert!(
            semester.get("id").is_some(),
            "\n\nCATALOG BUILD ERROR: Semester at index {i} missing 'id' field\n"
        );

        let branches = semester
            .get("branches")
            .and_then(|b| b.as_array())
            .unwrap_or_else(|| {
                panic!("\n\nCATALOG BUILD ERROR: Semester at index {i} missing 'branches' array\n")
            });

        for branch in branches {
            total_materials += validate_branch(branch, i);
        }
    }

    total_materials
}

fn validate_branch(branch: &serde_json::Value, semester_index: usize) -> usize {
    let branch_id = branch
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or("<unknown>");

    for field in ["id", "name", "subjects"] {
        assert!(
            branch.get(field).is_some(),
            "\n\nCATALOG BUILD ERROR: Branch '{branch_id}' (semester index {semester_index}) missing '{field}' field\n"
        );
    }

    let mut materials = 0;
    if let Some(subjects) = branch.get("subjects").and_then(|s| s.as_array()) {
        for subject in subjects {
            materials += validate_subject(subject, branch_id);
        }
    }
    materials
}

fn validate_subject(subject: &serde_json::Value, branch_id: &str) -> usize {
    let subject_id = subject
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or("<unknown>");

    assert!(
        subject.get("id").is_some() && subject.get("name").is_some(),
        "\n\nCATALOG BUILD ERROR: Subject '{subject_id}' in branch '{branch_id}' missing 'id' or 'name'\n"
    );

    let Some(materials) = subject.get("materials").and_then(|m| m.as_array()) else {
        return 0;
    };

    for (j, material) in materials.iter().enumerate() {
        for field in ["title", "description", "path"] {
            assert!(
                material.get(field).and_then(serde_json::Value::as_str).is_some(),
                "\n\nCATALOG BUILD ERROR: Subject '{subject_id}' material {j} missing string '{field}' field\n"
            );
        }
    }

    materials.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=catalogs/notes-data.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
