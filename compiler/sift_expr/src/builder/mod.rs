//! Typed construction of expression nodes.
//!
//! Every constructor takes ownership of its operands, types them, inserts
//! any implicit coercion and returns the finished node. Rejections are
//! reported to the builder's diagnostic queue exactly once, on the node that
//! failed; a node whose operand is already in error is marked as an error
//! without a second report.

mod aggregate;
mod arith;
mod assign;
mod call;
mod canon;
mod coerce;
mod compare;
mod unary;

use std::sync::Arc;

use sift_diagnostic::{
    Diagnostic, DiagnosticQueue, DiagnosticSeverity, ErrorCode, ErrorGuaranteed,
};
use sift_ir::Span;
use sift_values::{EventRegistry, Id, Type, TypeKind, Value};

use crate::config::BuilderConfig;
use crate::node::{Expr, ExprKind};

/// Why a node could not be typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Rejection {
    /// An operand is already in error; nothing new to report.
    Silent,
    Report { code: ErrorCode, message: String },
}

/// Result type of a node, or the reason it has none.
pub(crate) type Typed = Result<Type, Rejection>;

#[cold]
pub(crate) fn reject(code: ErrorCode, message: impl Into<String>) -> Rejection {
    Rejection::Report {
        code,
        message: message.into(),
    }
}

/// Reject silently if any operand is in error.
pub(crate) fn operands_ok(operands: &[&Expr]) -> Result<(), Rejection> {
    if operands.iter().any(|e| e.is_error()) {
        Err(Rejection::Silent)
    } else {
        Ok(())
    }
}

/// `t`, or `vector of t` when the operation broadcasts.
pub(crate) fn maybe_vector(t: Type, vector: bool) -> Type {
    if vector {
        Type::vector(t)
    } else {
        t
    }
}

/// Builds and types expression nodes, collecting diagnostics.
pub struct ExprBuilder {
    config: BuilderConfig,
    diagnostics: DiagnosticQueue,
    events: Arc<EventRegistry>,
}

impl Default for ExprBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprBuilder {
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        let diagnostics = DiagnosticQueue::with_config(config.diagnostics.clone());
        ExprBuilder {
            config,
            diagnostics,
            events: Arc::new(EventRegistry::new()),
        }
    }

    /// Share an event registry with other builders.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventRegistry>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn events(&self) -> &Arc<EventRegistry> {
        &self.events
    }

    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        self.diagnostics.has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.error_count()
    }

    /// Diagnostics reported so far, without draining them.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.peek()
    }

    /// Drain the collected diagnostics.
    pub fn finish(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.flush()
    }

    /// Assemble a node from its kind and typing outcome.
    ///
    /// On rejection the node is built in the error state; a reported
    /// rejection is labelled with the node's own description.
    pub(crate) fn seal(&mut self, kind: ExprKind, span: Span, typed: Typed) -> Expr {
        match typed {
            Ok(ty) => Expr::new(kind, ty, span),
            Err(rejection) => {
                let mut e = Expr::new(kind, Type::error(), span);
                if let Rejection::Report { code, message } = rejection {
                    self.report(&e, code, message);
                }
                e.set_error();
                e
            }
        }
    }

    /// Report an error against `subject` unless it is already in error.
    pub(crate) fn report(&mut self, subject: &Expr, code: ErrorCode, message: impl Into<String>) {
        if subject.is_error() {
            return;
        }
        let message = message.into();
        tracing::debug!(code = %code, %message, expr = %subject, "expression rejected");
        let diag = Diagnostic::error(code)
            .with_message(message)
            .with_label(subject.span(), format!("in `{subject}`"));
        self.diagnostics.add_spanned(diag, DiagnosticSeverity::Hard);
    }

    /// Report `rejection` against `subject` and put it in the error state.
    pub(crate) fn fail(&mut self, subject: &mut Expr, rejection: Rejection) {
        if let Rejection::Report { code, message } = rejection {
            self.report(subject, code, message);
        }
        subject.set_error();
    }

    pub(crate) fn warn(&mut self, span: Span, code: ErrorCode, message: impl Into<String>) {
        let diag = Diagnostic::warning(code)
            .with_message(message)
            .with_label(span, "here");
        self.diagnostics.add_spanned(diag, DiagnosticSeverity::Soft);
    }

    /// Deprecation warning, when enabled.
    pub(crate) fn deprecated(&mut self, span: Span, message: impl Into<String>) {
        if self.config.deprecation_warnings {
            self.warn(span, ErrorCode::W2002, message);
        }
    }

    /// Reference to an identifier.
    ///
    /// A type name evaluates to the type itself. Naming an event handler
    /// marks it used.
    pub fn name(&mut self, id: Id, span: Span) -> Expr {
        self.name_expr(id, false, span)
    }

    /// Identifier inside the initializer of a `const` or option, which may be
    /// assigned to.
    pub fn init_name(&mut self, id: Id, span: Span) -> Expr {
        self.name_expr(id, true, span)
    }

    fn name_expr(&mut self, id: Id, in_const_init: bool, span: Span) -> Expr {
        let ty = if id.is_type() {
            Type::new(TypeKind::TypeOf(id.ty().clone()))
        } else {
            id.ty().clone()
        };
        if let Some(handler) = self.events.lookup(id.name()) {
            handler.mark_used();
        }
        Expr::new(ExprKind::Name { id, in_const_init }, ty, span)
    }

    pub fn constant(&mut self, value: Value, span: Span) -> Expr {
        let ty = value.ty();
        Expr::new(ExprKind::Const(value), ty, span)
    }

    /// Mark `e` as written in parentheses.
    pub fn paren(&mut self, mut e: Expr) -> Expr {
        e.set_paren(true);
        e
    }

    /// Comma-separated list. Its type is the list of element types.
    pub fn list(&mut self, exprs: Vec<Expr>, span: Span) -> Expr {
        let typed = if exprs.iter().any(Expr::is_error) {
            Err(Rejection::Silent)
        } else {
            Ok(Type::list(exprs.iter().map(|e| e.ty().clone()).collect()))
        };
        self.seal(ExprKind::List(exprs), span, typed)
    }
}

/// Recompute the type of a list after its elements were coerced.
pub(crate) fn retype_list(list: &mut Expr) {
    if let Some(exprs) = list.list_exprs() {
        let ty = Type::list(exprs.iter().map(|e| e.ty().clone()).collect());
        list.set_type(ty);
    }
}

#[cfg(test)]
mod tests;
