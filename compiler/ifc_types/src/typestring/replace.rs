use ifc_stack::ensure_sufficient_stack;

use super::{classify, join_into, ElementKind, TypeString};
use crate::{scopename, text};

impl TypeString {
    /// Rename the type name `pat` to `rep` wherever it occurs as a type.
    ///
    /// Handles bare bases, template prefixes and arguments, the head and
    /// tail of scoped names, function parameters and array dimensions.
    /// Qualifier and member-pointer elements are left alone.
    pub fn typename_replace(&self, pat: &str, rep: &str) -> TypeString {
        ensure_sufficient_stack(|| {
            if pat.is_empty() || !self.contains(pat) {
                return self.clone();
            }
            if self.as_str() == pat {
                return TypeString::new(rep);
            }
            let mut out = String::with_capacity(self.0.len());
            for element in self.elements() {
                let element_ty = TypeString::new(element);
                if element_ty.is_simple() {
                    if element == pat {
                        out.push_str(rep);
                    } else if element_ty.is_template() {
                        out.push_str(&replace_in_template(element, pat, rep));
                    } else if let (Some(first), Some(rest)) =
                        (scopename::first(element), scopename::suffix(element))
                    {
                        let first = TypeString::new(first).typename_replace(pat, rep);
                        let rest = TypeString::new(rest).typename_replace(pat, rep);
                        out.push_str(first.as_str());
                        out.push_str("::");
                        out.push_str(rest.as_str());
                    } else {
                        out.push_str(element);
                    }
                } else {
                    match classify(element) {
                        ElementKind::Function => {
                            let parms: Vec<TypeString> = element_ty
                                .function_parms()
                                .iter()
                                .map(|p| p.typename_replace(pat, rep))
                                .collect();
                            out.push_str("f(");
                            join_into(&mut out, parms.iter().map(TypeString::as_str));
                            out.push_str(").");
                        }
                        ElementKind::Array => out.push_str(&text::replace_id(element, pat, rep)),
                        _ => out.push_str(element),
                    }
                }
            }
            TypeString(out)
        })
    }
}

/// `pat<(...)>` with `pat` renamed to the template name of `rep`, and `pat`
/// replaced inside every argument.
fn replace_in_template(element: &str, pat: &str, rep: &str) -> String {
    let renamed = if element.starts_with(pat) {
        let rep_base = TypeString::new(rep);
        text::replace_id_first(element, pat, rep_base.templateprefix())
    } else {
        element.to_owned()
    };
    let ty = TypeString::new(renamed);
    let mut out = String::from(ty.templateprefix());
    out.push_str("<(");
    let args: Vec<TypeString> = ty
        .template_arglist()
        .iter()
        .map(|a| a.typename_replace(pat, rep))
        .collect();
    join_into(&mut out, args.iter().map(TypeString::as_str));
    out.push_str(")>");
    out.push_str(ty.templatesuffix());
    out
}
