use super::*;
use pretty_assertions::assert_eq;

#[test]
fn unqualified() {
    assert!(!check("Foo"));
    assert_eq!(prefix("Foo"), None);
    assert_eq!(last("Foo"), "Foo");
    assert_eq!(first("Foo"), None);
    assert_eq!(suffix("Foo"), None);
}

#[test]
fn nested_scopes() {
    let name = "A::B::C";
    assert!(check(name));
    assert_eq!(prefix(name), Some("A::B"));
    assert_eq!(last(name), "C");
    assert_eq!(first(name), Some("A"));
    assert_eq!(suffix(name), Some("B::C"));
    assert_eq!(split(name), (Some("A::B"), "C"));
}

#[test]
fn template_arguments_are_opaque() {
    assert!(!check("Foo<(A::B)>"));
    let name = "Foo<(A::B,C::D)>::Inner";
    assert_eq!(prefix(name), Some("Foo<(A::B,C::D)>"));
    assert_eq!(last(name), "Inner");
}

#[test]
fn global_prefix() {
    assert_eq!(first("::Foo"), Some(""));
    assert_eq!(suffix("::Foo"), Some("Foo"));
}
