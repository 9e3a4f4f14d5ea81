use super::*;
use crate::NoTypedefs;
use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

/// Flat typedef table keyed by base name.
struct Typedefs(FxHashMap<&'static str, &'static str>);

impl Typedefs {
    fn new(pairs: &[(&'static str, &'static str)]) -> Self {
        Typedefs(pairs.iter().copied().collect())
    }
}

impl TypedefResolver for Typedefs {
    fn typedef_resolve(&self, ty: &TypeString) -> Option<TypeString> {
        let target = self.0.get(ty.base().as_str())?;
        Some(ty.with_base(target))
    }
}

fn ts(s: &str) -> TypeString {
    TypeString::new(s)
}

fn degrade_chain(start: &str, resolver: &dyn TypedefResolver) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = ts(start);
    while let Some(next) = current.default_type(resolver) {
        chain.push(next.as_str().to_owned());
        current = next;
        assert!(chain.len() < 32, "degrade did not terminate: {chain:?}");
    }
    chain
}

// Structure

#[test]
fn split_skips_nested_groups() {
    assert_eq!(ts("p.a(200).int").split().as_slice(), ["p.", "a(200).", "int"]);
    assert_eq!(
        ts("p.f(int,p.char).double").split().as_slice(),
        ["p.", "f(int,p.char).", "double"]
    );
    assert_eq!(
        ts("p.Foo<(p.int,Bar<(q(const).int)>)>").split().as_slice(),
        ["p.", "Foo<(p.int,Bar<(q(const).int)>)>"]
    );
    assert!(ts("").split().is_empty());
}

#[test]
fn prefix_and_base() {
    let ty = ts("p.a(200).int");
    assert_eq!(ty.prefix().as_str(), "p.a(200).");
    assert_eq!(ty.base().as_str(), "int");
    assert_eq!(ty.with_base("double").as_str(), "p.a(200).double");

    // a bare declarator is its own base
    let decl = ts("p.f(int).");
    assert_eq!(decl.prefix().as_str(), "p.");
    assert_eq!(decl.base().as_str(), "f(int).");
}

#[test]
fn push_and_pop() {
    let ty = ts("int");
    let ptr = ty.push_constructor(&Constructor::Pointer);
    assert_eq!(ptr.as_str(), "p.int");
    assert_eq!(ptr.pop(), Some((Constructor::Pointer, ty.clone())));
    assert_eq!(ty.pop(), None);

    assert_eq!(ts("int").push("q(const)").as_str(), "q(const).int");
    assert_eq!(ts("").push("p.").as_str(), "p.");

    let (constructor, rest) = match ts("a(4).p.int").pop() {
        Some(popped) => popped,
        None => panic!("array should pop"),
    };
    assert_eq!(constructor, Constructor::Array("4".to_owned()));
    assert_eq!(rest.as_str(), "p.int");
}

#[test]
fn constructor_display_matches_encoding() {
    assert_eq!(Constructor::Array(String::new()).to_string(), "a().");
    assert_eq!(
        Constructor::Function(vec![ts("int"), ts("p.char")]).to_string(),
        "f(int,p.char)."
    );
    assert_eq!(Constructor::MemberPointer(ts("Foo")).to_string(), "m(Foo).");
    assert_eq!(Constructor::parse("int"), None);
}

#[test]
fn parm_and_parmlist() {
    assert_eq!(ts("a(N+1).int").parm(), "N+1");
    assert_eq!(ts("q(const).int").parm(), "const");
    assert_eq!(ts("m(Foo).int").parm(), "Foo");
    assert_eq!(
        ts("f(int,p.f(int,int).void,Pair<(int,double)>).").parmlist(),
        vec![ts("int"), ts("p.f(int,int).void"), ts("Pair<(int,double)>")]
    );
    assert!(ts("f().void").parmlist().is_empty());
    assert_eq!(ts("Pair<(int,double)>").parmlist(), vec![ts("int"), ts("double")]);
}

#[test]
#[should_panic(expected = "malformed type string")]
fn parm_of_plain_base_is_fatal() {
    let _ = ts("int").parm();
}

#[test]
#[should_panic(expected = "malformed type string")]
fn unbalanced_parens_are_fatal() {
    let _ = ts("a(10.int").split();
}

#[test]
fn builders() {
    let int = ts("int");
    assert_eq!(int.add_pointer().as_str(), "p.int");
    assert_eq!(int.add_reference().as_str(), "r.int");
    assert_eq!(int.add_array("10").as_str(), "a(10).int");
    assert_eq!(int.add_qualifier("const").as_str(), "q(const).int");
    assert_eq!(int.add_function(&[ts("double")]).as_str(), "f(double).int");
    assert_eq!(int.add_memberpointer("Foo").as_str(), "m(Foo).int");
    assert_eq!(
        ts("Pair").add_template(&[ts("int"), ts("double")]).as_str(),
        "Pair<(int,double)>"
    );
}

#[test]
fn destructors() {
    assert_eq!(ts("p.int").del_pointer().as_str(), "int");
    assert_eq!(ts("q(const).p.int").del_pointer().as_str(), "int");
    assert_eq!(ts("r.int").del_reference().as_str(), "int");
    assert_eq!(ts("a(2).a(3).int").del_array().as_str(), "a(3).int");
    assert_eq!(
        ts("a(2).a(3).p.int").pop_arrays(),
        (ts("a(2).a(3)."), ts("p.int"))
    );
    assert_eq!(
        ts("q(const).f(int).int").pop_function(),
        (ts("f(int).q(const)."), ts("int"))
    );
    assert_eq!(ts("f(int,double).void").function_parms(), vec![ts("int"), ts("double")]);
    assert_eq!(
        ts("q(const).p.q(volatile).int").strip_qualifiers().as_str(),
        "p.int"
    );
}

#[test]
#[should_panic(expected = "non-pointer")]
fn del_pointer_on_value_is_fatal() {
    let _ = ts("int").del_pointer();
}

#[test]
fn arrays() {
    let ty = ts("a(2).a(N).p.int");
    assert_eq!(ty.array_ndim(), 2);
    assert_eq!(ty.array_getdim(0), Some("2"));
    assert_eq!(ty.array_getdim(1), Some("N"));
    assert_eq!(ty.array_getdim(2), None);
    assert_eq!(ty.array_setdim(1, "ANY").as_str(), "a(2).a(ANY).p.int");
    assert_eq!(ty.array_type().as_str(), "p.int");
}

#[test]
fn template_parts() {
    let ty = ts("Foo<(int,Bar<(double)>)>::Inner");
    assert_eq!(ty.templateprefix(), "Foo");
    assert_eq!(ty.templatesuffix(), "::Inner");
    assert_eq!(ty.templateargs(), "<(int,Bar<(double)>)>");
    assert_eq!(ty.template_arglist(), vec![ts("int"), ts("Bar<(double)>")]);

    let plain = ts("Foo");
    assert_eq!(plain.templateprefix(), "Foo");
    assert_eq!(plain.templatesuffix(), "");
}

#[test]
fn classification() {
    assert!(ts("p.int").is_pointer());
    assert!(ts("r.int").is_reference());
    assert!(ts("a(1).int").is_array());
    assert!(ts("f().int").is_function());
    assert!(ts("q(const).int").is_qualifier());
    assert!(ts("m(A).int").is_memberpointer());
    assert!(ts("enum Color").is_enum());
    assert!(ts("v(...)").is_varargs());
    assert!(ts("p.Foo<(int)>").is_template());

    assert!(ts("int").is_simple());
    assert!(ts("Foo<(p.int)>").is_simple());
    assert!(ts("Foo::Bar").is_simple());
    assert!(!ts("p.int").is_simple());
}

#[test]
fn const_through_typedef() {
    let typedefs = Typedefs::new(&[("CInt", "q(const).int"), ("Alias", "CInt")]);
    assert!(ts("q(const).int").is_const(&NoTypedefs));
    assert!(ts("q(const volatile).int").is_const(&NoTypedefs));
    assert!(!ts("q(volatile).int").is_const(&NoTypedefs));
    assert!(!ts("p.q(const).int").is_const(&NoTypedefs));
    assert!(ts("Alias").is_const(&typedefs));
    assert!(!ts("int").is_const(&typedefs));
}

#[test]
fn cyclic_typedef_const_check_terminates() {
    let typedefs = Typedefs::new(&[("A", "B"), ("B", "A")]);
    assert!(!ts("A").is_const(&typedefs));
}

#[test]
fn mutability() {
    let typedefs = Typedefs::new(&[("CInt", "q(const).int")]);
    assert!(ts("int").is_mutable(&NoTypedefs));
    assert!(!ts("q(const).int").is_mutable(&NoTypedefs));
    assert!(!ts("r.q(const).int").is_mutable(&NoTypedefs));
    assert!(!ts("a(4).q(const).int").is_mutable(&NoTypedefs));
    assert!(ts("p.q(const).int").is_mutable(&NoTypedefs));
    assert!(!ts("CInt").is_mutable(&typedefs));
}

#[test]
fn check_decl_sees_through_qualifiers() {
    let typedefs = Typedefs::new(&[("IntPtr", "p.int")]);
    assert!(ts("p.q(const).int").check_decl("p.", &NoTypedefs));
    assert!(ts("IntPtr").check_decl("p.", &typedefs));
    assert!(!ts("int").check_decl("p.", &typedefs));
}

#[test]
fn wraps_compares_base_and_depth() {
    assert!(ts("p.A").wraps(&ts("A")));
    assert!(ts("a(3).p.A").wraps(&ts("p.A")));
    assert!(ts("r.p.A").wraps(&ts("r.A")));
    assert!(!ts("p.BA").wraps(&ts("A")));
    assert!(!ts("p.f(p.A).A").wraps(&ts("p.f(A).A")));
    assert!(!ts("A").wraps(&ts("A")));
    assert!(!ts("A").wraps(&ts("p.A")));
}

#[test]
fn self_wrapping_typedef_stops_resolving() {
    let typedefs = Typedefs::new(&[("A", "p.A")]);
    assert_eq!(typedefs.typedef_resolve_all(&ts("A")), ts("A"));
    assert_eq!(typedefs.typedef_resolve_all(&ts("r.A")), ts("r.A"));
    assert!(ts("p.A").manglestr(&typedefs).starts_with("_p_"));
    assert!(!degrade_chain("p.A", &typedefs).is_empty());
}

// Rendering

#[test]
fn str_declarators() {
    assert_eq!(ts("int").str(None), "int");
    assert_eq!(ts("p.int").str(Some("x")), "int *x");
    assert_eq!(ts("p.a(10).int").str(Some("x")), "int (*x)[10]");
    assert_eq!(ts("a(2).a(4).int").str(Some("x")), "int x[2][4]");
    assert_eq!(ts("p.f(int,double).void").str(None), "void (*)(int,double)");
    assert_eq!(ts("q(const).p.char").str(None), "char *const");
    assert_eq!(ts("p.q(const).char").str(None), "char const *");
    assert_eq!(ts("r.q(const).Foo::Inner").str(None), "Foo::Inner const &");
    assert_eq!(ts("m(Foo).int").str(None), "int Foo::*");
    assert_eq!(ts("v(...)").str(None), "...");
}

#[test]
fn str_templates_use_cxx_syntax() {
    assert_eq!(ts("Pair<(int,double)>").str(None), "Pair<int,double >");
    assert_eq!(ts("p.Pair<(int,p.char)>").str(None), "Pair<int,char * > *");
    assert_eq!(ts("Foo<(int)>::Inner").namestr(), "Foo<int >::Inner");
}

#[test]
fn ltype_local_forms() {
    let typedefs = Typedefs::new(&[("CInt", "q(const).int"), ("Vec3", "a(3).double")]);
    assert_eq!(ts("r.q(const).Foo::Inner").ltype(&NoTypedefs).as_str(), "p.Foo::Inner");
    assert_eq!(ts("a(10).a(4).int").ltype(&NoTypedefs).as_str(), "p.a(4).int");
    assert_eq!(ts("q(const).int").ltype(&NoTypedefs).as_str(), "int");
    assert_eq!(ts("p.q(const).char").ltype(&NoTypedefs).as_str(), "p.char");
    assert_eq!(ts("enum ").ltype(&NoTypedefs).as_str(), "int");
    assert_eq!(ts("enum Color").ltype(&NoTypedefs).as_str(), "enum Color");
    assert_eq!(ts("p.f(r.int).r.int").ltype(&NoTypedefs).as_str(), "p.f(r.int).r.int");
    assert_eq!(ts("CInt").ltype(&typedefs).as_str(), "int");
    assert_eq!(ts("Vec3").ltype(&typedefs).as_str(), "p.double");
    assert_eq!(ts("a(10).int").lstr(Some("x"), &NoTypedefs), "int *x");
}

#[test]
fn rcaststr_casts_back_from_local() {
    assert_eq!(ts("p.char").rcaststr(Some("x"), &NoTypedefs), "x");
    assert_eq!(ts("q(const).p.char").rcaststr(Some("x"), &NoTypedefs), "x");
    assert_eq!(ts("a(10).int").rcaststr(Some("x"), &NoTypedefs), "x");
    assert_eq!(
        ts("a(10).a(4).int").rcaststr(Some("x"), &NoTypedefs),
        "(int (*)[4])x"
    );
    assert_eq!(ts("r.int").rcaststr(Some("x"), &NoTypedefs), "*x");
    assert_eq!(
        ts("r.q(const).Foo::Inner").rcaststr(Some("x"), &NoTypedefs),
        "(Foo::Inner const &)*x"
    );
    assert_eq!(ts("enum Color").rcaststr(Some("x"), &NoTypedefs), "(enum Color )x");
}

#[test]
fn lcaststr_casts_into_local() {
    assert_eq!(
        ts("r.q(const).Foo::Inner").lcaststr(Some("x"), &NoTypedefs),
        "(Foo::Inner const &)x"
    );
    assert_eq!(ts("a(10).int").lcaststr(Some("x"), &NoTypedefs), "(int *)x");
    assert_eq!(ts("q(const).int").lcaststr(Some("x"), &NoTypedefs), "(int)x");
    assert_eq!(ts("p.int").lcaststr(Some("x"), &NoTypedefs), "x");
}

#[test]
fn mangling() {
    let typedefs = Typedefs::new(&[("MyInt", "int")]);
    assert_eq!(ts("p.int").manglestr(&NoTypedefs), "_p_int");
    assert_eq!(ts("p.p.char").manglestr(&NoTypedefs), "_p_p_char");
    assert_eq!(ts("r.q(const).Foo").manglestr(&NoTypedefs), "_p_Foo");
    assert_eq!(ts("a(10).int").manglestr(&NoTypedefs), "_p_int");
    assert_eq!(ts("p.struct Foo").manglestr(&NoTypedefs), "_p_Foo");
    assert_eq!(ts("Foo::Bar").manglestr(&NoTypedefs), "_Foo__Bar");
    assert_eq!(ts("MyInt").manglestr(&typedefs), "_int");
    assert_eq!(ts("Pair<(int,double)>").manglestr(&NoTypedefs), "_PairTint_double_t");
    assert_ne!(
        ts("Pair<(int,double)>").manglestr(&NoTypedefs),
        ts("Pair<(double,int)>").manglestr(&NoTypedefs)
    );
}

// Degrading

#[test]
fn default_pointer_chain() {
    assert_eq!(
        degrade_chain("p.p.int", &NoTypedefs),
        ["p.p.SWIGTYPE", "p.SWIGTYPE", "SWIGTYPE"]
    );
}

#[test]
fn default_const_reference_chain() {
    assert_eq!(
        degrade_chain("r.q(const).int", &NoTypedefs),
        ["r.q(const).SWIGTYPE", "r.SWIGTYPE", "SWIGTYPE"]
    );
    assert_eq!(
        degrade_chain("r.q(const).enum Color", &NoTypedefs),
        ["r.q(const).enum SWIGTYPE", "r.enum SWIGTYPE", "r.SWIGTYPE", "SWIGTYPE"]
    );
}

#[test]
fn default_array_chain() {
    assert_eq!(
        degrade_chain("a(2).a(4).int", &NoTypedefs),
        [
            "a(ANY).a(ANY).SWIGTYPE",
            "a(ANY).a().SWIGTYPE",
            "a(ANY).p.SWIGTYPE",
            "a(ANY).SWIGTYPE",
            "a().SWIGTYPE",
            "p.SWIGTYPE",
            "SWIGTYPE",
        ]
    );
}

#[test]
fn default_other_shapes() {
    assert_eq!(
        degrade_chain("m(Foo).int", &NoTypedefs),
        ["m(CLASS).SWIGTYPE", "p.SWIGTYPE", "SWIGTYPE"]
    );
    assert_eq!(degrade_chain("enum Color", &NoTypedefs), ["enum SWIGTYPE", "SWIGTYPE"]);
    assert_eq!(degrade_chain("q(const).int", &NoTypedefs), ["SWIGTYPE"]);
    assert!(degrade_chain("SWIGTYPE", &NoTypedefs).is_empty());
    assert_eq!(ts("v(...)").default_type(&NoTypedefs), None);
}

#[test]
fn default_resolves_typedefs_first() {
    let typedefs = Typedefs::new(&[("IntPtr", "p.int")]);
    assert_eq!(
        degrade_chain("IntPtr", &typedefs),
        ["p.SWIGTYPE", "SWIGTYPE"]
    );
}

// Renaming

#[test]
fn typename_replace_everywhere() {
    assert_eq!(ts("p.T").typename_replace("T", "int").as_str(), "p.int");
    assert_eq!(ts("p.Tree").typename_replace("T", "int").as_str(), "p.Tree");
    assert_eq!(ts("Foo<(T)>").typename_replace("T", "int").as_str(), "Foo<(int)>");
    assert_eq!(
        ts("p.T<(int)>").typename_replace("T", "Bar<(int)>").as_str(),
        "p.Bar<(int)>"
    );
    assert_eq!(
        ts("f(T,p.T).T").typename_replace("T", "int").as_str(),
        "f(int,p.int).int"
    );
    assert_eq!(ts("a(N).T").typename_replace("N", "10").as_str(), "a(10).T");
    assert_eq!(
        ts("T::value_type").typename_replace("T", "Vec").as_str(),
        "Vec::value_type"
    );
    assert_eq!(ts("T").typename_replace("T", "p.int").as_str(), "p.int");
}

#[test]
fn type_codes() {
    let typedefs = Typedefs::new(&[("Byte", "unsigned char"), ("Loop", "Loop2"), ("Loop2", "Loop")]);
    assert_eq!(ts("int").type_code(&NoTypedefs), TypeCode::Int);
    assert_eq!(ts("unsigned").type_code(&NoTypedefs), TypeCode::UInt);
    assert_eq!(ts("p.char").type_code(&NoTypedefs), TypeCode::String);
    assert_eq!(ts("p.q(const).char").type_code(&NoTypedefs), TypeCode::String);
    assert_eq!(ts("p.int").type_code(&NoTypedefs), TypeCode::Pointer);
    assert_eq!(ts("q(const).double").type_code(&NoTypedefs), TypeCode::Double);
    assert_eq!(ts("enum Color").type_code(&NoTypedefs), TypeCode::Int);
    assert_eq!(ts("v(...)").type_code(&NoTypedefs), TypeCode::Varargs);
    assert_eq!(ts("Byte").type_code(&typedefs), TypeCode::UChar);
    assert_eq!(ts("Loop").type_code(&typedefs), TypeCode::User);
    assert_eq!(ts("Foo").type_code(&NoTypedefs), TypeCode::User);
    assert_eq!(TypeCode::MemberPointer.to_string(), "mpointer");
}
