use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::E2002)
        .with_message("arithmetic mixed with non-arithmetic")
        .with_label(Span::new(0, 5), "x + \"a\"")
        .with_note("operand types: count, string");

    assert_eq!(diag.code, ErrorCode::E2002);
    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 1);
    assert!(diag.labels[0].is_primary);
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.primary_span(), Some(Span::new(0, 5)));
}

#[test]
fn test_warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::W2001).with_message("dangerous assignment");
    assert!(!diag.is_error());
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn test_display_rendering() {
    let diag = Diagnostic::error(ErrorCode::E2005)
        .with_message("illegal comparison")
        .with_label(Span::new(3, 9), "a < b")
        .with_secondary_label(Span::new(3, 4), "pattern operand")
        .with_note("patterns compare only with strings");
    assert_eq!(
        diag.to_string(),
        "error [E2005]: illegal comparison\n  --> 3..9: a < b\n      3..4: pattern operand\n  = note: patterns compare only with strings"
    );
}
