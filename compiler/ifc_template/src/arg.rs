//! Template arguments.

use std::fmt;

use ifc_types::TypeString;

/// One argument of a template instantiation: a type, or a value such as
/// an integer constant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TemplateArg {
    Type(TypeString),
    Value(String),
}

impl TemplateArg {
    pub fn ty(ty: impl Into<TypeString>) -> Self {
        TemplateArg::Type(ty.into())
    }

    pub fn value(value: impl Into<String>) -> Self {
        TemplateArg::Value(value.into())
    }

    /// Text as it appears inside `<(...)>`.
    pub fn as_str(&self) -> &str {
        match self {
            TemplateArg::Type(ty) => ty.as_str(),
            TemplateArg::Value(value) => value,
        }
    }

    /// C spelling, used when the argument is substituted into code.
    pub fn spelling(&self) -> String {
        match self {
            TemplateArg::Type(ty) => ty.str(None),
            TemplateArg::Value(value) => TypeString::from(value.as_str()).namestr(),
        }
    }

    /// What a `$n` placeholder stands for: the base of a type, or the
    /// value itself.
    pub(crate) fn placeholder_text(&self) -> String {
        match self {
            TemplateArg::Type(ty) => ty.base().into_string(),
            TemplateArg::Value(value) => value.clone(),
        }
    }
}

impl fmt::Display for TemplateArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<(a,b)>` for the given arguments.
pub fn template_args(args: &[TemplateArg]) -> String {
    let mut out = String::from("<(");
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(arg.as_str());
    }
    out.push_str(")>");
    out
}

/// `name<(a,b)>`.
pub fn template_name(name: &str, args: &[TemplateArg]) -> String {
    format!("{name}{}", template_args(args))
}
