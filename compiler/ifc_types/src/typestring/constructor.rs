use std::fmt;

use super::{classify, element_parm, join_into, parm_list, ElementKind, TypeString};

/// One declarator element of a [`TypeString`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constructor {
    /// `p.`
    Pointer,
    /// `r.`
    Reference,
    /// `a(dim).`; the dimension is kept as source text.
    Array(String),
    /// `f(p1,p2).`
    Function(Vec<TypeString>),
    /// `q(const).`
    Qualifier(String),
    /// `m(Class).`
    MemberPointer(TypeString),
}

impl Constructor {
    /// Decode a single element. Bases yield `None`.
    pub fn parse(element: &str) -> Option<Constructor> {
        Some(match classify(element) {
            ElementKind::Pointer => Constructor::Pointer,
            ElementKind::Reference => Constructor::Reference,
            ElementKind::Array => Constructor::Array(element_parm(element).to_owned()),
            ElementKind::Function => Constructor::Function(parm_list(element)),
            ElementKind::Qualifier => Constructor::Qualifier(element_parm(element).to_owned()),
            ElementKind::MemberPointer => {
                Constructor::MemberPointer(TypeString::new(element_parm(element)))
            }
            ElementKind::Base => return None,
        })
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constructor::Pointer => f.write_str("p."),
            Constructor::Reference => f.write_str("r."),
            Constructor::Array(dim) => write!(f, "a({dim})."),
            Constructor::Function(parms) => {
                let mut s = String::from("f(");
                join_into(&mut s, parms.iter().map(TypeString::as_str));
                s.push_str(").");
                f.write_str(&s)
            }
            Constructor::Qualifier(q) => write!(f, "q({q})."),
            Constructor::MemberPointer(class) => write!(f, "m({class})."),
        }
    }
}
