//! Runtime evaluation errors.
//!
//! A runtime error aborts the current expression chain up to the next
//! statement boundary. The statement executor decides what happens next;
//! nothing here terminates the process.
//!
//! Factory functions (e.g. `division_by_zero()`) are the public API; they
//! populate both `kind` and `message`.

use std::fmt;

use sift_ir::Span;

use crate::runtime::SuspendToken;
use crate::value::{ContainerError, Value};

mod diagnostics;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Arithmetic
    DivisionByZero,
    ModuloByZero,
    CountUnderflow,

    // Aggregates
    VectorSizeMismatch,
    BoolIndexSizeMismatch,
    FieldValueMissing { field: String },
    NoSuchIndex { index: String },
    NotIndexable { type_name: String },

    // Types
    TypeMismatch { context: String },
    InvalidCast { from: String, to: String },
    BadCoercionValue,

    // Bindings and calls
    ValueNotSet { name: String },
    RecursionLimit { depth: usize },
    BudgetExceeded,

    /// A callee deferred its result; the frame's trigger cache will hold it
    /// when the same node is walked again.
    Suspended,

    Custom { message: String },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::ModuloByZero => write!(f, "modulo by zero"),
            Self::CountUnderflow => write!(f, "count underflow"),
            Self::VectorSizeMismatch => write!(f, "vector operands are of different sizes"),
            Self::BoolIndexSizeMismatch => write!(f, "size mismatch, boolean index and vector"),
            Self::FieldValueMissing { field } => write!(f, "field value missing: ${field}"),
            Self::NoSuchIndex { index } => write!(f, "no such index: {index}"),
            Self::NotIndexable { type_name } => {
                write!(f, "type cannot be indexed: {type_name}")
            }
            Self::TypeMismatch { context } => write!(f, "bad type in {context}"),
            Self::InvalidCast { from, to } => {
                write!(f, "invalid cast of value with type '{from}' to type '{to}'")
            }
            Self::BadCoercionValue => write!(f, "bad coercion value"),
            Self::ValueNotSet { name } => write!(f, "value used but not set: {name}"),
            Self::RecursionLimit { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }
            Self::BudgetExceeded => write!(f, "evaluation budget exceeded"),
            Self::Suspended => write!(f, "evaluation suspended"),
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// Additional context note attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
    pub span: Option<Span>,
}

impl EvalNote {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    pub name: String,
    pub span: Option<Span>,
}

/// Snapshot of the call stack at an error site.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                write!(f, " <- ")?;
            }
            write!(f, "{}", frame.name)?;
            if let Some(span) = frame.span {
                write!(f, " at {span}")?;
            }
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory errors.
    pub message: String,
    /// Source location of the node that failed.
    pub span: Option<Span>,
    /// Description of the failing expression.
    pub expr: Option<String>,
    /// Call stack at the error site, for errors raised "with call stack".
    pub backtrace: Option<EvalBacktrace>,
    pub notes: Vec<EvalNote>,
    /// Present when this is a suspension signal rather than a failure.
    pub suspension: Option<SuspendToken>,
}

impl EvalError {
    /// Error with a free-form message (`Custom` kind).
    #[cold]
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            span: None,
            expr: None,
            backtrace: None,
            notes: Vec::new(),
            suspension: None,
        }
    }

    /// Signal that a callee suspended at `token`.
    pub fn suspended(token: SuspendToken) -> Self {
        let mut err = Self::from_kind(EvalErrorKind::Suspended);
        err.suspension = Some(token);
        err
    }

    /// Attach the source span, keeping an innermost span already set.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }

    /// Attach the failing expression, keeping an innermost one already set.
    #[must_use]
    pub fn with_expr(mut self, expr: impl Into<String>) -> Self {
        if self.expr.is_none() {
            self.expr = Some(expr.into());
        }
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }

    /// True for suspension signals, which callers must propagate untouched.
    #[inline]
    pub fn is_suspension(&self) -> bool {
        self.suspension.is_some()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(expr) = &self.expr {
            write!(f, ", expression: {expr}")?;
        }
        if let Some(bt) = self.backtrace.as_ref().filter(|bt| !bt.is_empty()) {
            write!(f, ", call stack: {bt}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

impl From<ContainerError> for EvalError {
    fn from(err: ContainerError) -> Self {
        EvalError::new(err.to_string())
    }
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ModuloByZero)
}

#[cold]
pub fn count_underflow() -> EvalError {
    EvalError::from_kind(EvalErrorKind::CountUnderflow)
}

#[cold]
pub fn vector_size_mismatch() -> EvalError {
    EvalError::from_kind(EvalErrorKind::VectorSizeMismatch)
}

#[cold]
pub fn bool_index_size_mismatch() -> EvalError {
    EvalError::from_kind(EvalErrorKind::BoolIndexSizeMismatch)
}

#[cold]
pub fn field_value_missing(field: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::FieldValueMissing {
        field: field.to_string(),
    })
}

#[cold]
pub fn no_such_index(index: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchIndex {
        index: index.to_string(),
    })
}

#[cold]
pub fn not_indexable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIndexable {
        type_name: type_name.to_string(),
    })
}

/// Operand of an unexpected runtime type; `context` names the operation.
#[cold]
pub fn type_mismatch(context: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        context: context.to_string(),
    })
}

#[cold]
pub fn invalid_cast(from: &str, to: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidCast {
        from: from.to_string(),
        to: to.to_string(),
    })
}

#[cold]
pub fn bad_coercion_value() -> EvalError {
    EvalError::from_kind(EvalErrorKind::BadCoercionValue)
}

#[cold]
pub fn value_not_set(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ValueNotSet {
        name: name.to_string(),
    })
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { depth })
}

#[cold]
pub fn budget_exceeded() -> EvalError {
    EvalError::from_kind(EvalErrorKind::BudgetExceeded)
}
