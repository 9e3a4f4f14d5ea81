//! Error codes for all interface-compiler diagnostics.
//!
//! Each code is a unique identifier (e.g., `E3001`) whose first digit names
//! the subsystem that reported it.

use std::fmt;

/// Error codes for all interface-compiler diagnostics.
///
/// Format: E#### where first digit indicates subsystem:
/// - E1xxx: typedef and scope errors
/// - E2xxx: remembered-type registry errors
/// - E3xxx: template errors
/// - E4xxx: `$descriptor` rewriting errors
/// - E9xxx: internal errors
/// - W3xxx: template warnings
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Typedef / Scope Errors (E1xxx)
    /// Typedef name already defined in this scope
    E1001,
    /// Using-declaration of a name that is not scope-qualified
    E1002,

    // Remembered-Type Errors (E2xxx)
    /// Same type remembered with different client data
    E2001,
    /// Template type not in `<(...)>` form
    E2002,

    // Template Errors (E3xxx)
    /// Template undefined
    E3001,
    /// Name refers to something other than a template
    E3002,
    /// Wrong number of template arguments
    E3003,

    // Descriptor Errors (E4xxx)
    /// `$descriptor(...)` argument is not a type
    E4001,

    // Internal Errors (E9xxx)
    /// Internal type-core error
    E9001,
    /// Too many errors
    E9002,

    // Template Warnings (W3xxx)
    /// Ambiguous partial specialization; first registered wins
    W3001,
}

impl ErrorCode {
    pub const ALL: &[ErrorCode] = &[
        // Typedef / Scope
        ErrorCode::E1001,
        ErrorCode::E1002,
        // Remembered types
        ErrorCode::E2001,
        ErrorCode::E2002,
        // Template
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        // Descriptor
        ErrorCode::E4001,
        // Internal
        ErrorCode::E9001,
        ErrorCode::E9002,
        // Warnings
        ErrorCode::W3001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::W3001 => "W3001",
        }
    }

    /// Check if this is a typedef or scope error (E1xxx range).
    pub fn is_typedef_error(&self) -> bool {
        matches!(self, ErrorCode::E1001 | ErrorCode::E1002)
    }

    /// Check if this is a remembered-type error (E2xxx range).
    pub fn is_remember_error(&self) -> bool {
        matches!(self, ErrorCode::E2001 | ErrorCode::E2002)
    }

    /// Check if this is a template error (E3xxx range).
    ///
    /// These abort the enclosing declaration.
    pub fn is_template_error(&self) -> bool {
        matches!(self, ErrorCode::E3001 | ErrorCode::E3002 | ErrorCode::E3003)
    }

    /// Check if this is a descriptor error (E4xxx range).
    pub fn is_descriptor_error(&self) -> bool {
        matches!(self, ErrorCode::E4001)
    }

    /// Check if this is an internal error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }

    /// Check if this is a warning code (Wxxx range).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W3001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E3001"` or `"w3001"`.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
