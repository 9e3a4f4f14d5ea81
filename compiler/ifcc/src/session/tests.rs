use pretty_assertions::assert_eq;

use ifc_diagnostic::{DiagnosticConfig, ErrorCode, Severity};
use ifc_ir::{DeclKind, Node, NodeId, Parm};
use ifc_template::TemplateArg;
use ifc_types::TypeString;

use super::*;

fn at(line: u32) -> SourceLoc {
    SourceLoc::new("shapes.i", line)
}

fn session() -> Session {
    Session::new(SessionConfig::for_tests())
}

fn resolved(session: &Session, ty: &str) -> String {
    session
        .types()
        .resolve_all(&TypeString::from(ty))
        .into_string()
}

fn codes(session: &Session) -> Vec<ErrorCode> {
    session.diagnostics().map(|d| d.code).collect()
}

/// `template<class T> class <name> : <bases> { T value; }`
fn class_template(session: &mut Session, name: &str, bases: &[&str]) -> NodeId {
    let class = session.declare(
        Node::template(DeclKind::Class)
            .with_name(name)
            .with_template_parms(vec![Parm::new("typename").named("T")])
            .with_baselist(bases.iter().map(|b| (*b).to_owned()).collect()),
    );
    session.declare_in(
        class,
        Node::decl(DeclKind::Cdecl).with_name("value").with_type("T"),
    );
    class
}

#[test]
fn failed_typedef_is_reported_and_the_session_continues() {
    let mut session = session();
    assert_eq!(session.apply(Directive::typedef("int", "Count"), &at(1)), Ok(None));
    assert!(session
        .apply(Directive::typedef("double", "Count"), &at(2))
        .is_err());
    assert_eq!(codes(&session), vec![ErrorCode::E1001]);

    assert_eq!(session.apply(Directive::typedef("double", "Real"), &at(3)), Ok(None));
    assert_eq!(resolved(&session, "Count"), "int");
    assert_eq!(resolved(&session, "Real"), "double");
    assert!(session.has_errors().is_some());
}

#[test]
fn derived_class_scope_sees_base_typedefs() {
    let mut session = session();
    session.apply(Directive::class("Base"), &at(1)).unwrap();
    session.apply(Directive::enter("Base"), &at(2)).unwrap();
    session
        .apply(Directive::typedef("int", "value_type"), &at(3))
        .unwrap();
    session.apply(Directive::LeaveScope, &at(4)).unwrap();
    session
        .apply(Directive::derived_class("Derived", &["Base"]), &at(5))
        .unwrap();

    assert_eq!(resolved(&session, "Derived::value_type"), "int");
    assert!(session.types().is_class(&TypeString::from("Derived")));
}

#[test]
fn namespaced_class_bases_are_subtypes_from_any_scope() {
    let mut session = session();
    session.apply(Directive::enter("gfx"), &at(1)).unwrap();
    session.apply(Directive::class("Shape"), &at(2)).unwrap();
    session
        .apply(Directive::derived_class("Circle", &["Shape"]), &at(3))
        .unwrap();
    let circle = TypeString::from("p.Circle");
    let shape = TypeString::from("p.Shape");
    assert!(session.types().is_subtype(&circle, &shape));

    session.apply(Directive::LeaveScope, &at(4)).unwrap();
    let circle = TypeString::from("p.gfx::Circle");
    let shape = TypeString::from("p.gfx::Shape");
    assert!(session.types().is_subtype(&circle, &shape));
}

#[test]
fn leaving_the_global_scope_is_harmless() {
    let mut session = session();
    assert_eq!(session.apply(Directive::LeaveScope, &at(1)), Ok(None));
    assert!(session.has_errors().is_none());
}

#[test]
fn unknown_namespace_is_ignored() {
    let mut session = session();
    let using = Directive::UsingNamespace {
        name: "missing".into(),
    };
    assert_eq!(session.apply(using, &at(1)), Ok(None));
    let alias = Directive::NamespaceAlias {
        alias: "m".into(),
        target: "missing".into(),
    };
    assert_eq!(session.apply(alias, &at(2)), Ok(None));
    assert_eq!(session.diagnostics().count(), 0);
}

#[test]
fn using_namespace_imports_its_typedefs() {
    let mut session = session();
    session.apply(Directive::enter("std"), &at(1)).unwrap();
    session
        .apply(Directive::typedef("unsigned long", "size_t"), &at(2))
        .unwrap();
    session.apply(Directive::LeaveScope, &at(3)).unwrap();

    let using = Directive::UsingNamespace { name: "std".into() };
    session.apply(using, &at(4)).unwrap();
    assert_eq!(resolved(&session, "p.size_t"), "p.unsigned long");
}

#[test]
fn unqualified_using_declaration_is_an_error() {
    let mut session = session();
    let using = Directive::UsingDecl {
        qualified: "size_t".into(),
    };
    assert!(session.apply(using, &at(7)).is_err());
    assert_eq!(codes(&session), vec![ErrorCode::E1002]);
}

#[test]
fn instantiation_attaches_and_declares_the_instance() {
    let mut session = session();
    let node = class_template(&mut session, "Box", &[]);
    session
        .apply(
            Directive::Template {
                name: "Box".into(),
                node,
            },
            &at(1),
        )
        .unwrap();

    let instance = session
        .apply(
            Directive::instantiate("Box", vec![TemplateArg::ty("int")], "IntBox"),
            &at(2),
        )
        .unwrap()
        .unwrap();

    let tree = session.tree();
    assert_eq!(tree.parent(instance), Some(session.root()));
    assert_eq!(tree[instance].name.as_deref(), Some("Box<(int)>"));
    assert_eq!(tree[instance].sym_name.as_deref(), Some("IntBox"));
    assert!(session.types().is_class(&TypeString::from("Box<(int)>")));
}

#[test]
fn repeated_instantiation_is_an_error() {
    let mut session = session();
    let node = class_template(&mut session, "Box", &[]);
    session
        .apply(
            Directive::Template {
                name: "Box".into(),
                node,
            },
            &at(1),
        )
        .unwrap();
    let box_int = || Directive::instantiate("Box", vec![TemplateArg::ty("int")], "IntBox");
    session.apply(box_int(), &at(2)).unwrap();

    let before = session.tree().children(session.root()).len();
    assert!(session.apply(box_int(), &at(3)).is_err());
    assert_eq!(session.tree().children(session.root()).len(), before);
    assert_eq!(codes(&session), vec![ErrorCode::E1001]);
}

#[test]
fn undefined_template_is_reported() {
    let mut session = session();
    let result = session.apply(
        Directive::instantiate("Missing", vec![TemplateArg::ty("int")], "M"),
        &at(4),
    );
    assert!(result.is_err());
    assert_eq!(codes(&session), vec![ErrorCode::E3001]);
}

#[test]
fn unknown_node_is_an_internal_error() {
    let mut session = session();
    let bogus = NodeId::new(99);
    let result = session.apply(
        Directive::Template {
            name: "Box".into(),
            node: bogus,
        },
        &at(5),
    );
    assert!(result.is_err());
    assert_eq!(codes(&session), vec![ErrorCode::E9001]);
}

#[test]
fn descriptors_use_the_configured_prefix() {
    let mut session = Session::new(SessionConfig::for_tests().with_descriptor_prefix("MODTYPE"));
    let text = session
        .replace_descriptors("$descriptor(Foo *)", &at(1))
        .unwrap();
    assert_eq!(text, "MODTYPE_p_Foo");

    let output = session.finish();
    assert!(output.render_forward().contains("#define  MODTYPE_p_Foo swig_types[0] "));
}

#[test]
fn bad_descriptor_is_reported() {
    let mut session = session();
    assert!(session.replace_descriptors("$descriptor(", &at(2)).is_err());
    assert_eq!(codes(&session), vec![ErrorCode::E4001]);
}

#[test]
fn error_limit_adds_a_closing_diagnostic() {
    let config = SessionConfig::default().with_diagnostics(DiagnosticConfig {
        error_limit: 1,
        deduplicate: true,
    });
    let mut session = Session::new(config);
    let using = |line: u32| {
        (
            Directive::UsingDecl {
                qualified: format!("name{line}"),
            },
            at(line),
        )
    };
    for line in 1..=3 {
        let (directive, loc) = using(line);
        assert!(session.apply(directive, &loc).is_err());
    }

    let output = session.finish();
    let codes: Vec<ErrorCode> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E1002, ErrorCode::E9002]);
    assert_eq!(output.diagnostics[1].primary_loc(), Some(&at(3)));
    assert!(output.has_errors());
}

#[test]
fn clean_session_has_no_errors() {
    let mut session = session();
    session.apply(Directive::remember("p.int"), &at(1)).unwrap();
    let output = session.finish();
    assert!(!output.has_errors());
    assert!(output
        .diagnostics
        .iter()
        .all(|d| d.severity != Severity::Error));
    assert_eq!(output.table.entries.len(), 1);
}
