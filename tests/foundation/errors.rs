//! Integration tests for error reporting
//!
//! Tests error construction, predicates, display, and context.

use polyarray_foundation::{BackendKind, Error, ErrorContext, ErrorKind};

// =============================================================================
// Display
// =============================================================================

#[test]
fn display_names_the_condition() {
    assert_eq!(
        Error::read_only(BackendKind::Implicit).to_string(),
        "implicit storage is read-only"
    );
    assert_eq!(
        Error::invalid_index(7, 3).to_string(),
        "index out of bounds: 7 (length 3)"
    );
    assert_eq!(
        Error::component_mismatch(3, 2).to_string(),
        "component mismatch: expected 3, got 2"
    );
    assert_eq!(
        Error::allocation_failed(1024).to_string(),
        "allocation failed: could not provide 1024 values"
    );
}

// =============================================================================
// Predicates
// =============================================================================

#[test]
fn predicates_match_kind() {
    let err = Error::allocation_failed(1);
    assert!(err.is_allocation_failure());
    assert!(!err.is_read_only());

    let err = Error::read_only(BackendKind::Custom);
    assert!(err.is_read_only());
    assert!(matches!(
        err.kind,
        ErrorKind::ReadOnly {
            backend: BackendKind::Custom
        }
    ));
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_is_attached_and_displayed() {
    let err = Error::new(ErrorKind::InvalidComponentCount(0)).with_context(
        ErrorContext::new()
            .with_operation("set_number_of_components")
            .with_array("soa<f32>"),
    );
    let context = err.context.as_ref().unwrap();
    assert_eq!(
        context.to_string(),
        "in set_number_of_components on soa<f32>"
    );
    assert_eq!(err.to_string(), "invalid component count: 0");
}

#[test]
fn partial_context_display() {
    assert_eq!(ErrorContext::new().with_array("aos<u8>").to_string(), "on aos<u8>");
    assert_eq!(ErrorContext::new().with_operation("resize").to_string(), "in resize");
    assert_eq!(ErrorContext::new().to_string(), "");
}
