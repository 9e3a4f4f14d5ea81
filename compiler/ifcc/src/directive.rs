//! Top-level directives a parser feeds into a session.

use ifc_ir::NodeId;
use ifc_template::TemplateArg;
use ifc_types::TypeString;

/// One declaration-level event, applied in source order.
///
/// Names are as written at the point of the directive; the session
/// qualifies them in the current scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `typedef ty name;`
    Typedef { ty: TypeString, name: String },
    /// A class declaration with its direct base classes.
    Class { name: String, bases: Vec<String> },
    /// Open (or reopen) a named scope, or an unnamed one.
    EnterScope { name: Option<String> },
    LeaveScope,
    /// `using namespace name;`
    UsingNamespace { name: String },
    /// `using A::B;`
    UsingDecl { qualified: String },
    /// `namespace alias = target;`
    NamespaceAlias { alias: String, target: String },
    /// Runtime subtype edge, with an optional cast expression.
    Inherit {
        derived: String,
        base: String,
        cast: Option<String>,
    },
    /// Record a type for the runtime type table.
    Remember {
        ty: TypeString,
        clientdata: Option<String>,
    },
    /// Primary template definition, already in the session's tree.
    Template { name: String, node: NodeId },
    /// `template<> class name<args>`.
    Specialization {
        name: String,
        args: Vec<TemplateArg>,
        node: NodeId,
    },
    /// Partial specialization; `pattern` uses `$n` for argument `n`.
    PartialSpecialization {
        name: String,
        pattern: Vec<TemplateArg>,
        node: NodeId,
    },
    /// `%template(rename) name<args>;`
    Instantiate {
        name: String,
        args: Vec<TemplateArg>,
        rename: String,
    },
}

impl Directive {
    pub fn typedef(ty: impl Into<TypeString>, name: impl Into<String>) -> Self {
        Directive::Typedef {
            ty: ty.into(),
            name: name.into(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Directive::Class {
            name: name.into(),
            bases: Vec::new(),
        }
    }

    pub fn derived_class(name: impl Into<String>, bases: &[&str]) -> Self {
        Directive::Class {
            name: name.into(),
            bases: bases.iter().map(|b| (*b).to_owned()).collect(),
        }
    }

    pub fn enter(name: impl Into<String>) -> Self {
        Directive::EnterScope {
            name: Some(name.into()),
        }
    }

    pub fn remember(ty: impl Into<TypeString>) -> Self {
        Directive::Remember {
            ty: ty.into(),
            clientdata: None,
        }
    }

    pub fn instantiate(
        name: impl Into<String>,
        args: Vec<TemplateArg>,
        rename: impl Into<String>,
    ) -> Self {
        Directive::Instantiate {
            name: name.into(),
            args,
            rename: rename.into(),
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Directive::Typedef { .. } => "typedef",
            Directive::Class { .. } => "class",
            Directive::EnterScope { .. } => "enter scope",
            Directive::LeaveScope => "leave scope",
            Directive::UsingNamespace { .. } => "using namespace",
            Directive::UsingDecl { .. } => "using",
            Directive::NamespaceAlias { .. } => "namespace alias",
            Directive::Inherit { .. } => "inherit",
            Directive::Remember { .. } => "remember",
            Directive::Template { .. } => "template",
            Directive::Specialization { .. } => "specialization",
            Directive::PartialSpecialization { .. } => "partial specialization",
            Directive::Instantiate { .. } => "instantiate",
        }
    }
}
