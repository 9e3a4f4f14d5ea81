use super::*;

#[test]
fn proof_exists_only_for_reported_errors() {
    assert!(ErrorGuaranteed::from_error_count(0).is_none());
    assert!(ErrorGuaranteed::from_error_count(1).is_some());
    assert!(ErrorGuaranteed::from_error_count(usize::MAX).is_some());
}

#[test]
fn proof_displays_as_summary() {
    let proof = ErrorGuaranteed::from_error_count(3).unwrap();
    assert_eq!(format!("{proof}"), "error(s) emitted");
}

#[test]
fn proofs_compare_equal() {
    let first = ErrorGuaranteed::from_error_count(1).unwrap();
    let copied = first;
    assert_eq!(first, copied);
    assert_eq!(first, ErrorGuaranteed::new());
}
