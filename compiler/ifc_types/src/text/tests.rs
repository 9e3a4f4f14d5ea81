use super::*;
use pretty_assertions::assert_eq;

#[test]
fn replaces_whole_identifiers_only() {
    assert_eq!(replace_id("p.T", "T", "int"), "p.int");
    assert_eq!(replace_id("p.Tree", "T", "int"), "p.Tree");
    assert_eq!(replace_id("Foo<(T,T)>", "T", "int"), "Foo<(int,int)>");
    assert_eq!(replace_id("my_T", "T", "int"), "my_T");
}

#[test]
fn placeholders_respect_numeric_suffix() {
    assert_eq!(replace_id("p.$1", "$1", "int"), "p.int");
    assert_eq!(replace_id("p.$10", "$1", "int"), "p.$10");
    assert_eq!(replace_id("f($1,$2).", "$2", "double"), "f($1,double).");
}

#[test]
fn first_only() {
    assert_eq!(replace_id_first("T::T", "T", "Foo"), "Foo::T");
}

#[test]
fn empty_pattern_is_identity() {
    assert_eq!(replace_id("abc", "", "x"), "abc");
    assert!(!contains_id("abc", ""));
}

#[test]
fn contains_on_boundary() {
    assert!(contains_id("a(N).int", "N"));
    assert!(!contains_id("a(NN).int", "N"));
}
