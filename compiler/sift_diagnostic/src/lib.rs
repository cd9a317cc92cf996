//! Diagnostic system for the expression engine.
//!
//! Construction-time faults (type clashes, illegal coercions, non-assignable
//! targets) become [`Diagnostic`]s collected in a [`DiagnosticQueue`].
//! Runtime faults live in `sift_values::EvalError` and convert into
//! diagnostics only when they have to be rendered.
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] can only be obtained from a queue that actually
//! recorded an error:
//!
//! ```text
//! let guarantee = queue.has_errors()?;
//! fn check_decl() -> Result<Typed, ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue, DiagnosticSeverity};
