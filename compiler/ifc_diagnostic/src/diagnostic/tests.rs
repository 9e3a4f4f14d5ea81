use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_collects_parts() {
    let loc = SourceLoc::new("vector.i", 14);
    let diag = Diagnostic::error(ErrorCode::E3003)
        .with_message("template `Vec` expects 1 argument")
        .with_label(loc.clone(), "instantiated here")
        .with_secondary_label(SourceLoc::new("vector.i", 2), "template defined here")
        .with_note("the template has no default for its second parameter")
        .with_suggestion("remove the extra argument");

    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_loc(), Some(&loc));
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
}

#[test]
fn primary_loc_skips_secondary_labels() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_secondary_label(SourceLoc::new("a.i", 1), "previous definition")
        .with_label(SourceLoc::new("a.i", 9), "redefined here");
    assert_eq!(diag.primary_loc().map(|l| l.line), Some(9));
}

#[test]
fn warning_is_not_error() {
    let diag = Diagnostic::warning(ErrorCode::W3001);
    assert!(!diag.is_error());
    assert_eq!(diag.severity, Severity::Warning);
    assert!(diag.primary_loc().is_none());
}

#[test]
fn display_format() {
    let diag = Diagnostic::error(ErrorCode::E1001)
        .with_message("`Handle` is already defined")
        .with_label(SourceLoc::new("io.i", 7), "redefined here")
        .with_secondary_label(SourceLoc::new("io.i", 3), "first defined here")
        .with_note("typedef names are unique per scope");

    let expected = [
        "error [E1001]: `Handle` is already defined",
        "  --> io.i:7: redefined here",
        "      io.i:3: first defined here",
        "  = note: typedef names are unique per scope",
    ]
    .join("\n");
    assert_eq!(diag.to_string(), expected);
}

#[test]
fn severity_display() {
    assert_eq!(Severity::Error.to_string(), "error");
    assert_eq!(Severity::Warning.to_string(), "warning");
    assert_eq!(Severity::Note.to_string(), "note");
    assert_eq!(Severity::Help.to_string(), "help");
}
