//! Template errors and warnings.

use ifc_diagnostic::{Diagnostic, ErrorCode};
use ifc_ir::{NodeKind, SourceLoc};

/// An instantiation that cannot go ahead. Only the declaration being
/// instantiated is abandoned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template `{name}` undefined")]
    UndefinedTemplate { name: String },
    #[error("`{name}` is not defined as a template ({kind})")]
    NotATemplate { name: String, kind: NodeKind },
    #[error("template `{name}` expects {expected} argument(s), {given} given")]
    ArityMismatch {
        name: String,
        expected: usize,
        given: usize,
    },
}

impl TemplateError {
    pub fn to_diagnostic(&self, loc: SourceLoc) -> Diagnostic {
        let code = match self {
            TemplateError::UndefinedTemplate { .. } => ErrorCode::E3001,
            TemplateError::NotATemplate { .. } => ErrorCode::E3002,
            TemplateError::ArityMismatch { .. } => ErrorCode::E3003,
        };
        Diagnostic::error(code)
            .with_message(self.to_string())
            .with_label(loc, "instantiated here")
    }
}

/// A non-fatal finding made while locating a template.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TemplateWarning {
    /// Several partial specializations match; the first registered is used.
    #[error("instantiation of template `{instance}` is ambiguous, using `{chosen}` at {chosen_loc}")]
    Ambiguous {
        instance: String,
        chosen: String,
        chosen_loc: SourceLoc,
        /// Where the instantiation was requested.
        loc: SourceLoc,
    },
}

impl TemplateWarning {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            TemplateWarning::Ambiguous {
                chosen_loc, loc, ..
            } => Diagnostic::warning(ErrorCode::W3001)
                .with_message(self.to_string())
                .with_label(loc.clone(), "ambiguous instantiation")
                .with_secondary_label(chosen_loc.clone(), "this specialization is used"),
        }
    }
}
