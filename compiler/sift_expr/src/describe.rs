//! Source-like rendering of expression trees.
//!
//! Used for diagnostics labels and for the expression text attached to
//! runtime errors. Coercion wrappers and l-value wrappers are transparent.

use std::fmt;

use sift_ir::UnaryOp;

use crate::node::{Expr, ExprKind};

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error() {
            return f.write_str("<error>");
        }
        if self.is_paren() {
            f.write_str("(")?;
            describe_kind(self, f)?;
            return f.write_str(")");
        }
        describe_kind(self, f)
    }
}

fn describe_kind(e: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match e.kind() {
        ExprKind::Name { id, .. } => f.write_str(id.name()),
        ExprKind::Const(v) => write!(f, "{v}"),
        ExprKind::Unary { op, operand } => match op {
            UnaryOp::Clone => write!(f, "copy({operand})"),
            UnaryOp::Size => write!(f, "|{operand}|"),
            _ => write!(f, "{}{operand}", op.tag().name()),
        },
        ExprKind::Incr { operand, .. } => write!(f, "{}{operand}", e.tag().name()),
        ExprKind::Binary { op, lhs, rhs } => write!(f, "{lhs} {op} {rhs}"),
        ExprKind::Cond {
            cond,
            then_branch,
            else_branch,
        } => write!(f, "{cond} ? {then_branch} : {else_branch}"),
        ExprKind::Ref(operand)
        | ExprKind::Coerce { operand, .. }
        | ExprKind::RecordCoerce { operand, .. } => write!(f, "{operand}"),
        ExprKind::Assign { target, value, .. } => write!(f, "{target} = {value}"),
        ExprKind::Index {
            base,
            index,
            is_slice,
        } => {
            if *is_slice {
                if let Some([first, last]) = index.list_exprs() {
                    return write!(f, "{base}[{first}:{last}]");
                }
            }
            write!(f, "{base}[{index}]")
        }
        ExprKind::Field { base, name, .. } => write!(f, "{base}${name}"),
        ExprKind::HasField { base, name, .. } => write!(f, "{base}?${name}"),
        ExprKind::RecordConstructor(list) => write!(f, "[{list}]"),
        ExprKind::TableConstructor(list) => write!(f, "table({list})"),
        ExprKind::SetConstructor(list) => write!(f, "set({list})"),
        ExprKind::VectorConstructor(list) => write!(f, "vector({list})"),
        ExprKind::FieldAssign { name, value } => write!(f, "${name}={value}"),
        ExprKind::List(exprs) => {
            for (i, expr) in exprs.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{expr}")?;
            }
            Ok(())
        }
        ExprKind::Call { func, args } => write!(f, "{func}({args})"),
        ExprKind::Lambda(template) => write!(f, "function {}", template.name()),
        ExprKind::Event { handler, args } => write!(f, "{}({args})", handler.name()),
        ExprKind::Schedule { when, event } => write!(f, "schedule {when} {{ {event} }}"),
        ExprKind::Flatten(operand) => write!(f, "flatten({operand})"),
        ExprKind::Cast(operand) => write!(f, "{operand} as {}", e.ty()),
        ExprKind::Is { operand, target } => write!(f, "{operand} is {target}"),
        ExprKind::Default(default) => f.write_str(&default.describe()),
    }
}
