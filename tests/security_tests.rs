//! Security Test Suite
//!
//! Validates the input hardening used by the upload and download endpoints:
//! filename sanitization, PDF content checks, locator confinement and error
//! message sanitization.

use std::path::Path;

/// Test filename validation and sanitization
#[test]
fn test_filename_validation_security() {
    use notes_browser::utils::validation::{validate_filename, ValidationError};

    // Test directory traversal prevention
    let traversal_attempts = vec![
        "../etc/passwd",
        "..\\windows\\system32",
        "notes/../../secret.pdf",
        "unit-1/../../../etc/passwd",
    ];

    for attempt in traversal_attempts {
        match validate_filename(attempt) {
            Err(ValidationError::InvalidFilename) => {}
            Ok(_) => panic!("Directory traversal attempt '{attempt}' should have been blocked"),
            Err(e) => panic!("Unexpected error for '{attempt}': {e:?}"),
        }
    }

    // Test null byte and control character injection
    for attempt in ["notes\0.pdf", "notes.pdf\0", "unit\x01.pdf", "unit\x1f.pdf"] {
        assert!(
            validate_filename(attempt).is_err(),
            "Injection attempt '{attempt:?}' should be blocked"
        );
    }

    // Test valid filenames are accepted and properly sanitized
    let valid_tests = vec![
        ("unit-1.pdf", "unit-1.pdf"),
        ("Lab_Manual_2.pdf", "Lab_Manual_2.pdf"),
        ("notes@#$%final.pdf", "notesfinal.pdf"), // Special chars dropped
        ("unit 3 notes.pdf", "unit-3-notes.pdf"), // Spaces become dashes
    ];

    for (input, expected) in valid_tests {
        match validate_filename(input) {
            Ok(sanitized) => assert_eq!(sanitized, expected, "Sanitization failed for '{input}'"),
            Err(e) => panic!("Valid filename '{input}' should be accepted: {e:?}"),
        }
    }
}

/// Test that only real PDFs are accepted for upload
#[test]
fn test_pdf_upload_validation() {
    use notes_browser::utils::validation::{validate_pdf_upload, ValidationError};

    assert_eq!(
        validate_pdf_upload("unit 1.pdf", b"%PDF-1.4\n").unwrap(),
        "unit-1.pdf"
    );

    // Renamed executables and documents are rejected by content
    for content in [&b"MZ\x90\x00"[..], b"<!DOCTYPE html>", b"%PD"] {
        assert!(matches!(
            validate_pdf_upload("notes.pdf", content),
            Err(ValidationError::InvalidFileContent)
        ));
    }

    // Other document types are rejected by extension
    for name in ["notes.docx", "notes.pptx", "notes"] {
        assert!(matches!(
            validate_pdf_upload(name, b"%PDF-1.4"),
            Err(ValidationError::UnsupportedFormat(_))
        ));
    }
}

/// Test that stored-file locators cannot escape the data root
#[test]
fn test_locator_confinement() {
    use notes_browser::utils::validation::resolve_under_root;

    let root = Path::new("/srv/notes");

    let escapes = [
        "/data/../../etc/passwd",
        "../../etc/passwd/..",
        "data/notes/../../../x.pdf",
        "file:///etc/passwd",
        "https://example.com/notes.pdf",
        "/data/notes/x.pdf\0",
    ];
    for locator in escapes {
        assert_eq!(
            resolve_under_root(root, locator),
            None,
            "Locator '{locator:?}' should be rejected"
        );
    }

    // Origin-relative and page-relative forms map to the same file
    let expected = Some(root.join("data/notes/semester-1/cse/unit-1.pdf"));
    assert_eq!(
        resolve_under_root(root, "/data/notes/semester-1/cse/unit-1.pdf"),
        expected
    );
    assert_eq!(
        resolve_under_root(root, "../data/notes/semester-1/cse/unit-1.pdf"),
        expected
    );
}

/// Test error message sanitization
#[test]
fn test_error_sanitization() {
    use notes_browser::web::server::create_safe_error_response;

    // Test that internal error details are not exposed
    let error_response = create_safe_error_response(
        "persist_failed",
        "Failed to save the catalog",
        Some("/srv/notes/notes-data.json: Permission denied (os error 13)"),
    );

    assert_eq!(error_response.error, "Failed to save the catalog");
    assert_eq!(error_response.error_type, "persist_failed");
    assert!(
        error_response.details.is_none(),
        "Internal details should never be exposed"
    );

    let error_response = create_safe_error_response("not_found", "Semester '9' not found", None);
    assert!(error_response.details.is_none());
}

/// Test the multipart limits are set to bounded values
#[test]
fn test_field_limits() {
    use notes_browser::web::server::{
        MAX_FILE_FIELD_SIZE, MAX_MULTIPART_FIELDS, MAX_TEXT_FIELD_SIZE,
    };

    assert_eq!(MAX_MULTIPART_FIELDS, 10);
    assert_eq!(MAX_FILE_FIELD_SIZE, 32 * 1024 * 1024);
    assert_eq!(MAX_TEXT_FIELD_SIZE, 64 * 1024);
}

/// Test validation error handling
#[test]
fn test_validation_error_handling() {
    use notes_browser::utils::validation::{validate_filename, ValidationError};

    let long_filename = "a".repeat(300);
    let test_cases = vec![
        ("", ValidationError::EmptyFilename),
        (long_filename.as_str(), ValidationError::FilenameTooLong),
        ("../etc/passwd", ValidationError::InvalidFilename),
        ("notes\0.pdf", ValidationError::InvalidFilename),
        (".pdf", ValidationError::InvalidFilename),
    ];

    for (input, expected_error_type) in test_cases {
        let result = validate_filename(input);
        assert!(result.is_err(), "Input '{input:?}' should fail validation");

        let error = result.unwrap_err();
        match (&error, &expected_error_type) {
            (ValidationError::EmptyFilename, ValidationError::EmptyFilename)
            | (ValidationError::FilenameTooLong, ValidationError::FilenameTooLong)
            | (ValidationError::InvalidFilename, ValidationError::InvalidFilename) => {}
            _ => panic!(
                "Expected error type {expected_error_type:?} but got {error:?} for input '{input:?}'"
            ),
        }
    }
}
