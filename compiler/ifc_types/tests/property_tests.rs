//! Property-based tests for the type algebra.
//!
//! Random constructor chains over a handful of bases check that:
//! 1. push/pop and split/concat are inverses
//! 2. degrading reaches `SWIGTYPE` in one step per element
//! 3. mangled names are identifier-safe

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use ifc_types::{Constructor, NoTypedefs, TypeString};
use proptest::prelude::*;

// -- Strategies --

fn base_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("int"),
        Just("char"),
        Just("double"),
        Just("Foo"),
        Just("Foo::Bar"),
        Just("Pair<(int,double)>"),
        Just("enum Color"),
    ]
}

fn element_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("p."),
        Just("r."),
        Just("a(10)."),
        Just("a()."),
        Just("q(const)."),
        Just("m(Foo)."),
        Just("f(int,p.char)."),
    ]
}

fn type_strategy() -> impl Strategy<Value = TypeString> {
    (prop::collection::vec(element_strategy(), 0..6), base_strategy())
        .prop_map(|(elements, base)| TypeString::new(format!("{}{base}", elements.concat())))
}

fn constructor_strategy() -> impl Strategy<Value = Constructor> {
    prop_oneof![
        Just(Constructor::Pointer),
        Just(Constructor::Reference),
        Just(Constructor::Array("16".to_owned())),
        Just(Constructor::Qualifier("const".to_owned())),
        Just(Constructor::MemberPointer(TypeString::new("Foo"))),
        Just(Constructor::Function(vec![TypeString::new("int")])),
    ]
}

/// Pointer/reference chains, optionally const below a pointer.
fn indirection_chain_strategy() -> impl Strategy<Value = TypeString> {
    prop::collection::vec(prop_oneof![Just("p."), Just("r."), Just("p.q(const).")], 1..6)
        .prop_map(|segments| TypeString::new(format!("{}int", segments.concat())))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn push_then_pop_restores(ty in type_strategy(), c in constructor_strategy()) {
        let pushed = ty.push_constructor(&c);
        prop_assert_eq!(pushed.pop(), Some((c, ty)));
    }

    #[test]
    fn split_concatenates_back(ty in type_strategy()) {
        prop_assert_eq!(ty.split().concat(), ty.as_str());
        prop_assert_eq!(format!("{}{}", ty.prefix(), ty.base()), ty.as_str());
    }

    #[test]
    fn degrade_steps_match_element_count(ty in indirection_chain_strategy()) {
        let elements = ty.split().len();
        let mut steps = 0;
        let mut current = ty.clone();
        while let Some(next) = current.default_type(&NoTypedefs) {
            steps += 1;
            prop_assert!(steps <= elements, "{} degraded past its element count", ty);
            current = next;
        }
        prop_assert_eq!(current.as_str(), "SWIGTYPE");
        prop_assert_eq!(steps, elements);
    }

    #[test]
    fn degrade_always_terminates(ty in type_strategy()) {
        let mut current = ty;
        for _ in 0..64 {
            match current.default_type(&NoTypedefs) {
                Some(next) => current = next,
                None => break,
            }
        }
        prop_assert!(current.default_type(&NoTypedefs).is_none());
    }

    #[test]
    fn mangled_names_are_identifiers(ty in type_strategy()) {
        let mangled = ty.manglestr(&NoTypedefs);
        prop_assert!(mangled.starts_with('_'));
        prop_assert!(mangled.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn rendering_has_no_trailing_space(ty in type_strategy()) {
        let rendered = ty.str(Some("x"));
        prop_assert_eq!(rendered.trim_end(), rendered.as_str());
    }

    #[test]
    fn replacing_absent_name_is_identity(ty in type_strategy()) {
        prop_assert_eq!(ty.typename_replace("Absent", "int"), ty);
    }
}
