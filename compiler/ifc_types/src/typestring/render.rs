//! Rendering to C declarator syntax.

use ifc_stack::ensure_sufficient_stack;

use super::{classify, element_parm, parm_list, ElementKind, TypeString};
use crate::TypedefResolver;

/// Render a template name with its arguments in C++ syntax.
///
/// `Pair<(int,p.char)>` becomes `Pair<int,char * >`. Only the first
/// argument block is rewritten; a trailing `::member` is kept verbatim.
pub(crate) fn namestr(name: &str) -> String {
    let ty = TypeString::new(name);
    if !ty.is_template() {
        return name.to_owned();
    }
    let mut out = String::from(ty.templateprefix());
    out.push('<');
    for (i, arg) in ty.template_arglist().iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&arg.str(None));
    }
    out.push_str(" >");
    out.push_str(ty.templatesuffix());
    out
}

fn push_function_parms(out: &mut String, element: &str) {
    out.push('(');
    for (i, parm) in parm_list(element).iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&parm.str(None));
    }
    out.push(')');
}

/// Wrap `out` in parentheses.
fn parenthesize(out: &mut String) {
    out.insert(0, '(');
    out.push(')');
}

fn wraps_next(next: Option<&&str>) -> bool {
    next.is_some_and(|n| matches!(classify(n), ElementKind::Function | ElementKind::Array))
}

impl TypeString {
    /// C declarator text, optionally declaring `id`.
    ///
    /// `p.a(10).int` with id `x` renders as `int (*x)[10]`.
    pub fn str(&self, id: Option<&str>) -> String {
        ensure_sufficient_stack(|| {
            let mut out = id.unwrap_or_default().to_owned();
            let elements = self.split();
            for (i, &element) in elements.iter().enumerate() {
                let wrap = wraps_next(elements.get(i + 1));
                match classify(element) {
                    ElementKind::Qualifier => {
                        out.insert(0, ' ');
                        out.insert_str(0, element_parm(element));
                    }
                    ElementKind::Pointer => {
                        out.insert(0, '*');
                        if wrap {
                            parenthesize(&mut out);
                        }
                    }
                    ElementKind::MemberPointer => {
                        out.insert_str(0, "::*");
                        out.insert_str(0, element_parm(element));
                        if wrap {
                            parenthesize(&mut out);
                        }
                    }
                    ElementKind::Reference => {
                        out.insert(0, '&');
                        if wrap {
                            parenthesize(&mut out);
                        }
                    }
                    ElementKind::Array => {
                        out.push('[');
                        out.push_str(element_parm(element));
                        out.push(']');
                    }
                    ElementKind::Function => push_function_parms(&mut out, element),
                    ElementKind::Base if element == "v(...)" => out.insert_str(0, "..."),
                    ElementKind::Base => {
                        out.insert(0, ' ');
                        out.insert_str(0, &namestr(element));
                    }
                }
            }
            out.truncate(out.trim_end().len());
            out
        })
    }

    /// The base rendered through [`TypeString::str`] template syntax.
    pub fn namestr(&self) -> String {
        namestr(&self.0)
    }

    /// The locally assignable form of this type.
    ///
    /// Leading qualifiers go; a simple type whose typedef hides a const,
    /// array or reference is replaced by that expansion; the first array
    /// and every reference become pointers; remaining qualifiers vanish;
    /// an anonymous `enum ` becomes `int`. After a function element the
    /// rest is kept verbatim.
    pub fn ltype(&self, resolver: &dyn TypedefResolver) -> TypeString {
        let mut current = self.clone();
        while current.is_qualifier() {
            current = TypeString::new(&current.0[current.first_element().len()..]);
        }
        if current.is_simple() {
            if let Some(expanded) = resolver.typedef_resolve(&current) {
                if expanded.is_const(resolver) || expanded.is_array() || expanded.is_reference() {
                    current = expanded;
                }
            }
        }

        let mut out = String::with_capacity(current.0.len());
        let mut first_array = true;
        let mut keep_verbatim = false;
        for element in current.elements() {
            let kind = classify(element);
            if kind == ElementKind::Function {
                keep_verbatim = true;
            }
            match kind {
                ElementKind::Qualifier => {}
                ElementKind::Pointer | ElementKind::MemberPointer => {
                    out.push_str(element);
                    first_array = false;
                }
                ElementKind::Reference => {
                    out.push_str(if keep_verbatim { element } else { "p." });
                    first_array = false;
                }
                ElementKind::Array if first_array => {
                    out.push_str(if keep_verbatim { element } else { "p." });
                    first_array = false;
                }
                ElementKind::Base if element.starts_with("enum ") => {
                    let anonymous = element == "enum ";
                    out.push_str(if keep_verbatim || !anonymous {
                        element
                    } else {
                        "int"
                    });
                }
                _ => out.push_str(element),
            }
        }
        TypeString(out)
    }

    /// [`TypeString::str`] of [`TypeString::ltype`].
    pub fn lstr(&self, id: Option<&str>, resolver: &dyn TypedefResolver) -> String {
        self.ltype(resolver).str(id)
    }

    /// Cast expression turning the local (`ltype`) variable `name` back into
    /// a value of this type.
    ///
    /// Empty cast text when no conversion is needed. For references the
    /// local pointer is dereferenced: `(Foo const &)*x`.
    pub fn rcaststr(&self, name: Option<&str>, resolver: &dyn TypedefResolver) -> String {
        let stripped;
        let rs = if self.is_qualifier() && self.is_const(resolver) {
            stripped = TypeString::new(&self.0[self.first_element().len()..]);
            &stripped
        } else {
            self
        };

        let mut clear = true;
        let expanded = resolver.typedef_resolve(rs);
        let source = match &expanded {
            Some(td) if td.is_const(resolver) || td.is_array() || td.is_reference() => td,
            Some(td) if td.is_enum() => {
                clear = false;
                rs
            }
            _ => rs,
        };

        let mut out = String::new();
        let mut first_array = true;
        let mut is_reference = false;
        let mut is_array = false;
        let elements = source.split();
        for (i, &element) in elements.iter().enumerate() {
            let wrap = wraps_next(elements.get(i + 1));
            match classify(element) {
                ElementKind::Qualifier => {
                    out.insert(0, ' ');
                    out.insert_str(0, element_parm(element));
                    clear = false;
                }
                ElementKind::Pointer => {
                    out.insert(0, '*');
                    if wrap {
                        parenthesize(&mut out);
                    }
                    first_array = false;
                }
                ElementKind::MemberPointer => {
                    out.insert_str(0, "::*");
                    out.insert_str(0, element_parm(element));
                    if wrap {
                        parenthesize(&mut out);
                    }
                    first_array = false;
                }
                ElementKind::Reference => {
                    out.insert(0, '&');
                    if wrap {
                        parenthesize(&mut out);
                    }
                    is_reference = true;
                }
                ElementKind::Array => {
                    if first_array && !is_reference {
                        out.push_str("(*)");
                        first_array = false;
                    } else {
                        out.push('[');
                        out.push_str(element_parm(element));
                        out.push(']');
                        clear = false;
                    }
                    is_array = true;
                }
                ElementKind::Function => push_function_parms(&mut out, element),
                ElementKind::Base => {
                    if element.starts_with("enum ") {
                        clear = false;
                    }
                    out.insert(0, ' ');
                    out.insert_str(0, &namestr(element));
                }
            }
        }

        let mut cast = if clear { String::new() } else { format!("({out})") };
        if let Some(name) = name {
            if is_reference {
                if is_array {
                    cast.clear();
                }
                cast.push('*');
            }
            cast.push_str(name);
        }
        cast
    }

    /// Cast expression turning a value of this type into the local
    /// (`ltype`) variable `name`.
    pub fn lcaststr(&self, name: Option<&str>, resolver: &dyn TypedefResolver) -> String {
        let name = name.unwrap_or_default();
        if self.is_array() || self.is_qualifier() {
            format!("({}){name}", self.lstr(None, resolver))
        } else if self.is_reference() {
            format!("({}){name}", self.str(None))
        } else {
            name.to_owned()
        }
    }
}
