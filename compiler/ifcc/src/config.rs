//! Session configuration.

use ifc_diagnostic::DiagnosticConfig;
use ifc_resolve::DESCRIPTOR_PREFIX;

/// Settings for one [`Session`](crate::Session).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub diagnostics: DiagnosticConfig,
    /// Trace every candidate considered while locating a template.
    pub template_debug: bool,
    /// Prefix of runtime type descriptor names.
    pub descriptor_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            diagnostics: DiagnosticConfig::default(),
            template_debug: false,
            descriptor_prefix: DESCRIPTOR_PREFIX.to_owned(),
        }
    }
}

impl SessionConfig {
    /// Defaults, with no error limit and no deduplication.
    pub fn for_tests() -> Self {
        SessionConfig {
            diagnostics: DiagnosticConfig::unlimited(),
            ..SessionConfig::default()
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub fn with_template_debug(mut self, template_debug: bool) -> Self {
        self.template_debug = template_debug;
        self
    }

    #[must_use]
    pub fn with_descriptor_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.descriptor_prefix = prefix.into();
        self
    }
}
