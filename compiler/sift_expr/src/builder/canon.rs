//! Operand ordering for commutative operators and comparisons.
//!
//! Two operands are only exchanged when that cannot change what is observed:
//! one of them is a constant, or neither has a side effect.

use std::mem;

use sift_ir::BinaryOp;
use sift_values::TypeTag;

use crate::node::{Expr, ExprKind};

/// Whether evaluating `e` can change state.
fn has_side_effects(e: &Expr) -> bool {
    matches!(
        e.kind(),
        ExprKind::Assign { .. }
            | ExprKind::Incr { .. }
            | ExprKind::Call { .. }
            | ExprKind::Event { .. }
            | ExprKind::Schedule { .. }
    ) || e.children().iter().any(|c| has_side_effects(c))
}

fn may_swap(lhs: &Expr, rhs: &Expr) -> bool {
    lhs.is_const() || rhs.is_const() || !(has_side_effects(lhs) || has_side_effects(rhs))
}

fn is_scalar_const(e: &Expr) -> bool {
    e.is_const() && !e.is_vector()
}

/// Whether `lhs` and `rhs` should trade places for operator `op`.
fn wants_swap(op: BinaryOp, lhs: &Expr, rhs: &Expr) -> bool {
    match op {
        BinaryOp::Add | BinaryOp::Times => {
            match (is_scalar_const(lhs), is_scalar_const(rhs)) {
                (true, false) => return true,
                (false, true) => return false,
                _ => {}
            }
            let (t1, t2) = (lhs.base_tag(), rhs.base_tag());
            if op == BinaryOp::Add && t1 == TypeTag::Interval && t2 == TypeTag::Time {
                return true;
            }
            if op == BinaryOp::Times && t2 == TypeTag::Interval && t1 != TypeTag::Interval {
                return true;
            }
            if (t1, t2) == (TypeTag::Time, TypeTag::Interval) || t1 == TypeTag::Interval {
                return false;
            }
            lhs.tag() < rhs.tag()
        }
        BinaryOp::Eq | BinaryOp::Ne => {
            let (t1, t2) = (lhs.base_tag(), rhs.base_tag());
            if t1 == TypeTag::Pattern {
                return false;
            }
            if t2 == TypeTag::Pattern {
                return true;
            }
            lhs.tag() < rhs.tag()
        }
        _ => false,
    }
}

/// Put the operands of `op` into canonical order, returning the operator to
/// use afterwards (`>`/`>=` turn into `<`/`<=` when swapped).
pub(crate) fn canonicalize(op: BinaryOp, lhs: &mut Expr, rhs: &mut Expr) -> BinaryOp {
    if !may_swap(lhs, rhs) {
        return op;
    }
    match op {
        BinaryOp::Gt | BinaryOp::Ge => {
            mem::swap(lhs, rhs);
            if op == BinaryOp::Gt {
                BinaryOp::Lt
            } else {
                BinaryOp::Le
            }
        }
        _ => {
            if wants_swap(op, lhs, rhs) {
                tracing::trace!(%op, lhs = %lhs, rhs = %rhs, "swapping operands");
                mem::swap(lhs, rhs);
            }
            op
        }
    }
}
