//! Diagnostic system for the interface compiler.
//!
//! Every user-facing problem the type core finds is reported as a
//! [`Diagnostic`] carrying:
//! - an [`ErrorCode`] for searchability
//! - a message (what went wrong)
//! - labels at the [`SourceLoc`](ifc_ir::SourceLoc) of the construct involved
//! - notes (why, or what was chosen instead)
//!
//! Diagnostics from every phase go to one shared [`DiagnosticQueue`], which
//! applies the error limit, drops duplicates and orders output by location.
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is proof that at least one error was emitted:
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic);
//! fn instantiate(..) -> Result<NodeId, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
