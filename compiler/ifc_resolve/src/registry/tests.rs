use pretty_assertions::assert_eq;

use ifc_types::TypeString;

use crate::error::RememberError;
use crate::{Converter, TypeSystem};

fn ts(s: &str) -> TypeString {
    TypeString::from(s)
}

fn remembered(types: &TypeSystem) -> Vec<&str> {
    types.remembered_mangled().collect()
}

/// `class Base; class Derived : Base;` with pointers to both remembered.
fn hierarchy() -> TypeSystem {
    let mut types = TypeSystem::new();
    assert_eq!(types.typedef_class("Base"), Ok(()));
    assert_eq!(types.typedef_class("Derived"), Ok(()));
    assert_eq!(types.remember(&ts("p.Base")), Ok(()));
    assert_eq!(types.remember(&ts("p.Derived")), Ok(()));
    types.inherit("Derived", "Base", None);
    types
}

#[test]
fn remember_records_the_mangled_name() {
    let mut types = TypeSystem::new();
    assert_eq!(types.remember(&ts("p.int")), Ok(()));
    assert_eq!(types.remember(&ts("p.int")), Ok(()));
    assert_eq!(remembered(&types), vec!["_p_int"]);
    assert_eq!(types.equivalent_mangle("_p_int"), vec!["_p_int".to_owned()]);
}

#[test]
fn reference_also_remembers_the_pointer() {
    let mut types = TypeSystem::new();
    assert_eq!(types.remember(&ts("r.q(const).Foo")), Ok(()));
    assert_eq!(remembered(&types), vec!["_p_Foo"]);

    let table = types.emit_type_table();
    assert_eq!(table.entries.len(), 1);
    assert_eq!(table.entries[0].ltype, "Foo *");
}

#[test]
fn typedef_names_share_the_resolved_entry() {
    let mut types = TypeSystem::new();
    assert_eq!(types.typedef(&ts("double"), "Real"), Ok(()));
    assert_eq!(types.remember(&ts("p.double")), Ok(()));
    assert_eq!(types.remember(&ts("p.Real")), Ok(()));
    assert_eq!(remembered(&types), vec!["_p_double"]);

    let table = types.emit_type_table();
    assert_eq!(table.entries[0].ltype, "Real *");
}

#[test]
fn malformed_template_is_rejected() {
    let mut types = TypeSystem::new();
    assert_eq!(
        types.remember(&ts("p.Vec<int>")),
        Err(RememberError::MalformedTemplate {
            ty: ts("p.Vec<int>")
        })
    );
    assert!(remembered(&types).is_empty());
}

#[test]
fn first_clientdata_is_kept() {
    let mut types = TypeSystem::new();
    let foo = ts("p.Foo");
    assert_eq!(types.remember_with_clientdata(&foo, Some("FooData")), Ok(()));
    assert_eq!(types.remember_with_clientdata(&foo, Some("FooData")), Ok(()));
    assert_eq!(
        types.remember_with_clientdata(&foo, Some("Other")),
        Err(RememberError::InconsistentClientData {
            ty: "Foo *".into(),
            given: "Other".into(),
            kept: "FooData".into(),
        })
    );
    assert_eq!(types.clientdata_collect("_p_Foo"), Some("FooData"));
    assert_eq!(types.clientdata_collect("_p_Bar"), None);
}

#[test]
fn clientdata_reaches_the_table() {
    let mut types = TypeSystem::new();
    assert_eq!(
        types.remember_with_clientdata(&ts("p.Foo"), Some("&Foo_clientdata")),
        Ok(())
    );
    assert_eq!(types.remember(&ts("p.int")), Ok(()));
    let table = types.emit_type_table();
    assert_eq!(
        table.entry("_p_Foo").and_then(|e| e.clientdata.as_deref()),
        Some("&Foo_clientdata")
    );
    assert_eq!(table.entry("_p_int").and_then(|e| e.clientdata.as_deref()), None);
}

#[test]
fn subtypes_are_direct_only() {
    let mut types = hierarchy();
    assert_eq!(types.typedef_class("Leaf"), Ok(()));
    types.inherit("Leaf", "Derived", None);

    assert!(types.is_subtype(&ts("Derived"), &ts("Base")));
    assert!(types.is_subtype(&ts("Leaf"), &ts("Derived")));
    assert!(!types.is_subtype(&ts("Base"), &ts("Derived")));
    assert!(!types.is_subtype(&ts("Leaf"), &ts("Base")));
}

#[test]
fn namespaced_subtypes_match_inside_and_outside() {
    let mut types = TypeSystem::new();
    types.new_scope(Some("gfx"));
    assert_eq!(types.typedef_class("Shape"), Ok(()));
    assert_eq!(types.typedef_class("Circle"), Ok(()));
    types.inherit("gfx::Circle", "gfx::Shape", None);
    assert!(types.is_subtype(&ts("p.Circle"), &ts("p.Shape")));
    assert!(types.is_subtype(&ts("q(const).Circle"), &ts("Shape")));

    types.pop_scope();
    assert!(types.is_subtype(&ts("p.gfx::Circle"), &ts("p.gfx::Shape")));
    assert!(!types.is_subtype(&ts("p.Circle"), &ts("p.Shape")));
}

#[test]
fn template_subtypes_are_canonicalised() {
    let mut types = TypeSystem::new();
    assert_eq!(types.typedef(&ts("int"), "Int"), Ok(()));
    types.inherit("Vec<(Int)>", "Container", None);
    assert!(types.is_subtype(&ts("Vec<(int)>"), &ts("Container")));
}

#[test]
fn inheritance_folds_into_equivalence() {
    let mut types = hierarchy();
    let table = types.emit_type_table();

    assert_eq!(
        table.converters,
        vec![Converter {
            name: "_p_DerivedTo_p_Base".into(),
            to: "Base *".into(),
            cast: String::new(),
            from: "Derived *".into(),
        }]
    );

    let base = table.entry("_p_Base");
    let equivalents: Vec<(&str, Option<&str>)> = base
        .map(|entry| {
            entry
                .equivalents
                .iter()
                .map(|e| (e.mangled.as_str(), e.converter.as_deref()))
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(
        equivalents,
        vec![("_p_Base", None), ("_p_Derived", Some("_p_DerivedTo_p_Base"))]
    );

    // The relation is one way: a base pointer is not a derived pointer.
    assert_eq!(types.equivalent_mangle("_p_Derived"), vec!["_p_Derived".to_owned()]);
}

#[test]
fn inherit_equiv_runs_once_per_pair() {
    let mut types = hierarchy();
    let first = types.emit_type_table();
    let second = types.emit_type_table();
    assert_eq!(first, second);
    assert_eq!(second.converters.len(), 1);
}

#[test]
fn first_cast_expression_wins() {
    let mut types = hierarchy();
    types.inherit("Derived", "Base", Some("(Base *)"));
    let table = types.emit_type_table();
    assert_eq!(table.converters.len(), 1);
    assert_eq!(table.converters[0].cast, "");
}

#[test]
fn forward_block_indexes_entries_in_order() {
    let mut types = hierarchy();
    let table = types.emit_type_table();
    assert_eq!(table.index_of("_p_Base"), Some(0));
    assert_eq!(table.index_of("_p_Derived"), Some(1));
    assert_eq!(table.index_of("_p_int"), None);

    let forward = table.render_forward(crate::DESCRIPTOR_PREFIX);
    assert_eq!(
        forward,
        [
            "",
            "/* -------- TYPES TABLE (BEGIN) -------- */",
            "",
            "#define  SWIGTYPE_p_Base swig_types[0] ",
            "#define  SWIGTYPE_p_Derived swig_types[1] ",
            "static swig_type_info *swig_types[3];",
            "",
            "/* -------- TYPES TABLE (END) -------- */",
            "",
            "",
        ]
        .join("\n")
    );
}

#[test]
fn table_renders_converters_and_records() {
    let mut types = hierarchy();
    let rendered = types.emit_type_table().render_table();

    assert!(rendered.contains(
        "static void *_p_DerivedTo_p_Base(void *x) {\n    return (void *)((Base *)  ((Derived *) x));\n}\n"
    ));
    assert!(rendered.contains(
        "static swig_type_info _swigt__p_Base[] = {{\"_p_Base\", 0, \"Base *\", 0},{\"_p_Base\"},{\"_p_Derived\", _p_DerivedTo_p_Base},{0}};\n"
    ));
    assert!(rendered.contains(
        "static swig_type_info _swigt__p_Derived[] = {{\"_p_Derived\", 0, \"Derived *\", 0},{\"_p_Derived\"},{0}};\n"
    ));
    assert!(rendered.contains(
        "static swig_type_info *swig_types_initial[] = {\n_swigt__p_Base, \n_swigt__p_Derived, \n0\n};\n"
    ));
}
