//! Stepwise generalization towards `SWIGTYPE`.
//!
//! Each step keeps the outer declarator shape and loosens the innermost
//! part, so typemap lookup can try progressively more generic patterns:
//!
//! ```text
//! r.q(const).int          -> r.q(const).SWIGTYPE
//! r.q(const).SWIGTYPE     -> r.SWIGTYPE
//! r.SWIGTYPE              -> SWIGTYPE
//!
//! a(2).a(4).int           -> a(ANY).a(ANY).SWIGTYPE
//! a(ANY).a(ANY).SWIGTYPE  -> a(ANY).a().SWIGTYPE
//! a(ANY).a().SWIGTYPE     -> a(ANY).p.SWIGTYPE
//! a(ANY).p.SWIGTYPE       -> a(ANY).SWIGTYPE
//! a(ANY).SWIGTYPE         -> a().SWIGTYPE
//! a().SWIGTYPE            -> p.SWIGTYPE
//! p.SWIGTYPE              -> SWIGTYPE
//! ```

use ifc_stack::ensure_sufficient_stack;

use super::{TypeString, WILDCARD};
use crate::TypedefResolver;

impl TypeString {
    /// One degrade step, or `None` at the fixed point and for varargs.
    pub fn default_type(&self, resolver: &dyn TypedefResolver) -> Option<TypeString> {
        ensure_sufficient_stack(|| {
            if self.is_varargs() {
                return None;
            }
            let mut r = resolver.typedef_resolve_all(self);
            if r.is_qualifier() {
                r = TypeString::new(&r.0[r.first_element().len()..]);
                if r.contains(WILDCARD) {
                    return Some(r);
                }
            }

            let def = match r.as_str() {
                "p.SWIGTYPE" | "r.SWIGTYPE" => TypeString::wildcard(),
                _ if r.is_pointer() => degrade_inner("p.", &r.del_pointer(), resolver),
                _ if r.is_reference() => degrade_inner("r.", &r.del_reference(), resolver),
                "a().SWIGTYPE" => TypeString::new("p.SWIGTYPE"),
                "a(ANY).SWIGTYPE" => TypeString::new("a().SWIGTYPE"),
                _ if r.is_array() => {
                    let mut empty = false;
                    for dim in 0..r.array_ndim() {
                        if r.array_getdim(dim).is_some_and(str::is_empty) {
                            empty = !r.as_str().starts_with("a(ANY).");
                        }
                    }
                    let head = if empty { "a()." } else { "a(ANY)." };
                    degrade_inner(head, &r.del_array(), resolver)
                }
                "m(CLASS).SWIGTYPE" => TypeString::new("p.SWIGTYPE"),
                _ if r.is_memberpointer() => TypeString::new("m(CLASS).SWIGTYPE"),
                "enum SWIGTYPE" => TypeString::wildcard(),
                _ if r.is_enum() => TypeString::new("enum SWIGTYPE"),
                _ => TypeString::wildcard(),
            };

            (def != *self).then_some(def)
        })
    }
}

/// `head` followed by the degraded form of `inner`.
fn degrade_inner(head: &str, inner: &TypeString, resolver: &dyn TypedefResolver) -> TypeString {
    let mut out = String::from(head);
    if inner.as_str() == WILDCARD {
        out.push_str(WILDCARD);
        return TypeString(out);
    }

    let (qualifier, rest) = if inner.is_qualifier() {
        let q = inner.first_element();
        (Some(q), TypeString::new(&inner.0[q.len()..]))
    } else {
        (None, inner.clone())
    };

    if qualifier.is_some() && rest.contains(WILDCARD) {
        out.push_str(rest.as_str());
        return TypeString(out);
    }

    match rest.default_type(resolver) {
        Some(degraded) => match qualifier {
            Some(q) => {
                let qualified = format!("{q}{degraded}");
                if rest.as_str() == qualified {
                    out.push_str(degraded.as_str());
                } else {
                    out.push_str(&qualified);
                }
            }
            None => out.push_str(degraded.as_str()),
        },
        None => out.push_str(rest.as_str()),
    }
    TypeString(out)
}
