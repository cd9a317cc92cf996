//! Expression tree traversal.
//!
//! A [`Traverse`] implementation gets a pre-order and a post-order hook per
//! node. Each hook decides how the walk continues through the returned
//! [`TraversalCode`]: `Prune` skips the children of the node just entered,
//! `Abort` stops the whole walk.
//!
//! # Example
//!
//! ```text
//! struct CountCalls(usize);
//!
//! impl Traverse for CountCalls {
//!     fn pre_expr(&mut self, expr: &Expr) -> TraversalCode {
//!         if expr.tag() == ExprTag::Call {
//!             self.0 += 1;
//!         }
//!         TraversalCode::Continue
//!     }
//! }
//! ```

use crate::node::Expr;

/// How a traversal proceeds after a hook.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TraversalCode {
    Continue,
    /// Skip the children of the current node (meaningful from `pre_expr`).
    Prune,
    Abort,
}

/// Visitor over an expression tree. Both hooks default to `Continue`.
pub trait Traverse {
    fn pre_expr(&mut self, expr: &Expr) -> TraversalCode {
        let _ = expr;
        TraversalCode::Continue
    }

    fn post_expr(&mut self, expr: &Expr) -> TraversalCode {
        let _ = expr;
        TraversalCode::Continue
    }
}

/// Walk `expr` and its operands in evaluation order.
///
/// Returns `Abort` if a hook aborted, `Continue` otherwise.
pub fn walk_expr<T: Traverse + ?Sized>(traverser: &mut T, expr: &Expr) -> TraversalCode {
    match traverser.pre_expr(expr) {
        TraversalCode::Abort => return TraversalCode::Abort,
        TraversalCode::Prune => {}
        TraversalCode::Continue => {
            for child in expr.children() {
                if walk_expr(traverser, child) == TraversalCode::Abort {
                    return TraversalCode::Abort;
                }
            }
        }
    }
    match traverser.post_expr(expr) {
        TraversalCode::Abort => TraversalCode::Abort,
        TraversalCode::Continue | TraversalCode::Prune => TraversalCode::Continue,
    }
}

impl Expr {
    /// Convenience for [`walk_expr`] rooted at this node.
    pub fn traverse<T: Traverse + ?Sized>(&self, traverser: &mut T) -> TraversalCode {
        walk_expr(traverser, self)
    }
}

#[cfg(test)]
mod tests;
