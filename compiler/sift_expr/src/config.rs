//! Construction settings.

use sift_diagnostic::DiagnosticConfig;

/// Settings for an [`ExprBuilder`](crate::ExprBuilder).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BuilderConfig {
    /// Limits and filtering for the diagnostic queue.
    pub diagnostics: DiagnosticConfig,
    /// Warn on deprecated constructs (vector/scalar mixing, vector `++`).
    pub deprecation_warnings: bool,
    /// Reorder operands of commutative and comparison operators.
    pub canonicalize: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            diagnostics: DiagnosticConfig::default(),
            deprecation_warnings: true,
            canonicalize: true,
        }
    }
}

impl BuilderConfig {
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub fn with_deprecation_warnings(mut self, enabled: bool) -> Self {
        self.deprecation_warnings = enabled;
        self
    }

    #[must_use]
    pub fn with_canonicalize(mut self, enabled: bool) -> Self {
        self.canonicalize = enabled;
        self
    }
}
