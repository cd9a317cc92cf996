//! `&default` attributes backed by an expression.

use sift_values::{DefaultValue, EvalMode, EvalResult};

use crate::frame::LocalFrame;
use crate::node::Expr;

/// A field or parameter default given as an expression.
///
/// The expression is evaluated afresh on every use in an empty,
/// event-free frame, so a default like `table()` yields a new table each
/// time.
pub struct ExprDefault {
    expr: Expr,
}

impl ExprDefault {
    pub fn new(expr: Expr) -> Self {
        ExprDefault { expr }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl DefaultValue for ExprDefault {
    fn eval_default(&self) -> EvalResult {
        let mut frame = LocalFrame::new(0).with_mode(EvalMode::const_fold());
        self.expr.eval(&mut frame).map(|v| v.deep_clone())
    }

    fn describe(&self) -> String {
        self.expr.to_string()
    }
}
