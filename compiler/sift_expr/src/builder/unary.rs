//! Unary operators and `++`/`--`.

use sift_diagnostic::ErrorCode;
use sift_ir::{Span, UnaryOp};
use sift_values::{is_integral, InternalTag, Type, TypeTag};

use super::{maybe_vector, operands_ok, reject, ExprBuilder, Typed};
use crate::node::{Expr, ExprKind};

impl ExprBuilder {
    pub fn not(&mut self, operand: Expr, span: Span) -> Expr {
        self.unary(UnaryOp::Not, operand, span)
    }

    pub fn complement(&mut self, operand: Expr, span: Span) -> Expr {
        self.unary(UnaryOp::Complement, operand, span)
    }

    pub fn positive(&mut self, operand: Expr, span: Span) -> Expr {
        self.unary(UnaryOp::Positive, operand, span)
    }

    pub fn negate(&mut self, operand: Expr, span: Span) -> Expr {
        self.unary(UnaryOp::Negate, operand, span)
    }

    /// `|x|`.
    pub fn size(&mut self, operand: Expr, span: Span) -> Expr {
        self.unary(UnaryOp::Size, operand, span)
    }

    /// `copy(x)`.
    pub fn clone_expr(&mut self, operand: Expr, span: Span) -> Expr {
        self.unary(UnaryOp::Clone, operand, span)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: Expr, span: Span) -> Expr {
        let typed = type_unary(op, &operand);
        let kind = ExprKind::Unary {
            op,
            operand: Box::new(operand),
        };
        self.seal(kind, span, typed)
    }

    pub fn incr(&mut self, operand: Expr, span: Span) -> Expr {
        self.incr_decr(false, operand, span)
    }

    pub fn decr(&mut self, operand: Expr, span: Span) -> Expr {
        self.incr_decr(true, operand, span)
    }

    fn incr_decr(&mut self, decrement: bool, operand: Expr, span: Span) -> Expr {
        let operand = self.make_lvalue(operand);
        let typed = operands_ok(&[&operand]).and_then(|()| {
            let ty = operand.ty();
            if let Some(elem) = ty.vector_yield() {
                if !is_integral(elem.tag()) {
                    return Err(reject(
                        ErrorCode::E2003,
                        "vector elements must be integral for increment operator",
                    ));
                }
                self.deprecated(span, "increment/decrement operations for vectors are deprecated");
                return Ok(ty.clone());
            }
            if is_integral(ty.tag()) {
                Ok(ty.clone())
            } else {
                Err(reject(ErrorCode::E2003, "requires an integral operand"))
            }
        });
        let kind = ExprKind::Incr {
            decrement,
            operand: Box::new(operand),
        };
        self.seal(kind, span, typed)
    }
}

fn type_unary(op: UnaryOp, operand: &Expr) -> Typed {
    operands_ok(&[operand])?;
    let vector = operand.is_vector();
    let bt = operand.base_tag();
    match op {
        UnaryOp::Clone => Ok(operand.ty().clone()),
        UnaryOp::Size => {
            let ty = operand.ty();
            if ty.internal() == InternalTag::Double || ty.tag() == TypeTag::Subnet {
                Ok(Type::base(TypeTag::Double))
            } else {
                Ok(Type::base(TypeTag::Count))
            }
        }
        UnaryOp::Complement => {
            if bt == TypeTag::Count {
                Ok(maybe_vector(Type::base(TypeTag::Count), vector))
            } else {
                Err(reject(ErrorCode::E2003, "requires \"count\" operand"))
            }
        }
        UnaryOp::Not => {
            if is_integral(bt) || bt == TypeTag::Bool {
                Ok(maybe_vector(Type::base(TypeTag::Bool), vector))
            } else {
                Err(reject(
                    ErrorCode::E2004,
                    "requires an integral or boolean operand",
                ))
            }
        }
        UnaryOp::Positive | UnaryOp::Negate => {
            if is_integral(bt) {
                Ok(maybe_vector(Type::base(TypeTag::Int), vector))
            } else if matches!(bt, TypeTag::Double | TypeTag::Interval) {
                Ok(maybe_vector(Type::base(bt), vector))
            } else {
                Err(reject(
                    ErrorCode::E2002,
                    "requires an integral or double operand",
                ))
            }
        }
    }
}
