//! Conversion of runtime errors into renderable diagnostics.

use sift_diagnostic::{Diagnostic, ErrorCode};
use sift_ir::Span;

use super::{EvalError, EvalErrorKind};

impl EvalErrorKind {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::DivisionByZero => ErrorCode::E6001,
            Self::ModuloByZero => ErrorCode::E6002,
            Self::VectorSizeMismatch | Self::BoolIndexSizeMismatch => ErrorCode::E6003,
            Self::CountUnderflow => ErrorCode::E6004,
            Self::TypeMismatch { .. } => ErrorCode::E6010,
            Self::InvalidCast { .. } | Self::BadCoercionValue => ErrorCode::E6011,
            Self::FieldValueMissing { .. } => ErrorCode::E6020,
            Self::NoSuchIndex { .. } | Self::NotIndexable { .. } => ErrorCode::E6021,
            Self::ValueNotSet { .. } => ErrorCode::E6030,
            Self::RecursionLimit { .. } => ErrorCode::E6031,
            Self::BudgetExceeded => ErrorCode::E6032,
            Self::Suspended | Self::Custom { .. } => ErrorCode::E6099,
        }
    }
}

impl EvalError {
    /// Render as a diagnostic labelled at the failing expression.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = self.expr.as_deref().unwrap_or("evaluated here");
        let mut diag = Diagnostic::error(self.kind.error_code())
            .with_message(&self.message)
            .with_label(self.span.unwrap_or(Span::DUMMY), label);
        for note in &self.notes {
            diag = match note.span {
                Some(span) => diag.with_secondary_label(span, &note.message),
                None => diag.with_note(&note.message),
            };
        }
        if let Some(bt) = self.backtrace.as_ref().filter(|bt| !bt.is_empty()) {
            diag = diag.with_note(format!("call stack: {bt}"));
        }
        diag
    }
}
