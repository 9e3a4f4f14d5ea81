//! Resolver errors and their diagnostics.

use ifc_diagnostic::{Diagnostic, ErrorCode};
use ifc_ir::SourceLoc;
use ifc_types::{CdeclError, TypeString};

/// A typedef or using-declaration that cannot be recorded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypedefError {
    #[error("`{name}` is already defined in scope `{scope}`")]
    AlreadyDefined { name: String, scope: String },
    #[error("using-declaration `{name}` is not scope-qualified")]
    NotQualified { name: String },
}

impl TypedefError {
    pub fn to_diagnostic(&self, loc: SourceLoc) -> Diagnostic {
        match self {
            TypedefError::AlreadyDefined { name, .. } => Diagnostic::error(ErrorCode::E1001)
                .with_message(self.to_string())
                .with_label(loc, format!("`{name}` redefined here")),
            TypedefError::NotQualified { .. } => Diagnostic::error(ErrorCode::E1002)
                .with_message(self.to_string())
                .with_label(loc, "expected a name of the form `Scope::name`"),
        }
    }
}

/// A type the runtime type registry refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RememberError {
    /// The first client data is kept.
    #[error("inconsistent client data for type `{ty}`: `{given}` != `{kept}`")]
    InconsistentClientData {
        ty: String,
        given: String,
        kept: String,
    },
    #[error("bad template type `{ty}`: arguments must be written `<(...)>`")]
    MalformedTemplate { ty: TypeString },
}

impl RememberError {
    pub fn to_diagnostic(&self, loc: SourceLoc) -> Diagnostic {
        match self {
            RememberError::InconsistentClientData { kept, .. } => {
                Diagnostic::error(ErrorCode::E2001)
                    .with_message(self.to_string())
                    .with_label(loc, "type remembered here")
                    .with_note(format!("keeping the first client data `{kept}`"))
            }
            RememberError::MalformedTemplate { .. } => Diagnostic::error(ErrorCode::E2002)
                .with_message(self.to_string())
                .with_label(loc, "type remembered here"),
        }
    }
}

/// A `$descriptor(...)` marker that cannot be rewritten.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("bad $descriptor() macro `{text}`: {source}")]
    BadType {
        text: String,
        #[source]
        source: CdeclError,
    },
    #[error("unterminated $descriptor() macro")]
    Unterminated,
    #[error(transparent)]
    Remember(#[from] RememberError),
}

impl DescriptorError {
    pub fn to_diagnostic(&self, loc: SourceLoc) -> Diagnostic {
        match self {
            DescriptorError::Remember(err) => err.to_diagnostic(loc),
            DescriptorError::BadType { .. } | DescriptorError::Unterminated => {
                Diagnostic::error(ErrorCode::E4001)
                    .with_message(self.to_string())
                    .with_label(loc, "in this code block")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn typedef_errors_map_to_codes() {
        let loc = SourceLoc::new("a.i", 4);
        let redefined = TypedefError::AlreadyDefined {
            name: "Handle".into(),
            scope: "io".into(),
        };
        let diag = redefined.to_diagnostic(loc.clone());
        assert_eq!(diag.code, ErrorCode::E1001);
        assert_eq!(diag.message, "`Handle` is already defined in scope `io`");
        assert_eq!(diag.primary_loc(), Some(&loc));

        let unqualified = TypedefError::NotQualified { name: "B".into() };
        assert_eq!(unqualified.to_diagnostic(loc).code, ErrorCode::E1002);
    }

    #[test]
    fn descriptor_wraps_remember_error() {
        let err = DescriptorError::from(RememberError::MalformedTemplate {
            ty: TypeString::from("Vec<int>"),
        });
        let diag = err.to_diagnostic(SourceLoc::synthetic());
        assert_eq!(diag.code, ErrorCode::E2002);
    }
}
