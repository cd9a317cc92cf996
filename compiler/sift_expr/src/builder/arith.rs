//! Arithmetic, bitwise and boolean connective operators.

use sift_diagnostic::ErrorCode;
use sift_ir::{BinaryOp, Span};
use sift_values::{both_arithmetic, both_integral, is_arithmetic, max_type, same_type, Type, TypeTag};

use super::canon::canonicalize;
use super::{maybe_vector, operands_ok, reject, ExprBuilder, Rejection, Typed};
use crate::node::{Expr, ExprKind};

fn arithmetic_required() -> Rejection {
    reject(ErrorCode::E2002, "requires arithmetic operands")
}

impl ExprBuilder {
    /// Build any binary operator.
    pub fn binary(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr, span: Span) -> Expr {
        match op {
            BinaryOp::Add => self.add(lhs, rhs, span),
            BinaryOp::Sub => self.sub(lhs, rhs, span),
            BinaryOp::AddTo => self.add_to(lhs, rhs, span),
            BinaryOp::RemoveFrom => self.remove_from(lhs, rhs, span),
            BinaryOp::Times => self.times(lhs, rhs, span),
            BinaryOp::Divide => self.divide(lhs, rhs, span),
            BinaryOp::Mod => self.modulo(lhs, rhs, span),
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => self.bit(op, lhs, rhs, span),
            BinaryOp::AndAnd => self.and_and(lhs, rhs, span),
            BinaryOp::OrOr => self.or_or(lhs, rhs, span),
            BinaryOp::Eq | BinaryOp::Ne => self.eq(op, lhs, rhs, span),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Ge | BinaryOp::Gt => {
                self.rel(op, lhs, rhs, span)
            }
            BinaryOp::In => self.in_expr(lhs, rhs, span),
        }
    }

    pub(crate) fn seal_binary(
        &mut self,
        op: BinaryOp,
        lhs: Expr,
        rhs: Expr,
        span: Span,
        typed: Typed,
    ) -> Expr {
        let kind = ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        };
        self.seal(kind, span, typed)
    }

    /// Reorder operands when canonicalization is enabled.
    pub(crate) fn canonical(&self, op: BinaryOp, lhs: &mut Expr, rhs: &mut Expr) -> BinaryOp {
        if self.config.canonicalize && !lhs.is_error() && !rhs.is_error() {
            canonicalize(op, lhs, rhs)
        } else {
            op
        }
    }

    /// Coerce `e` to element tag `t` unless it already has it.
    pub(crate) fn coerce_operand(&mut self, e: &mut Expr, t: TypeTag) {
        if e.base_tag() != t {
            tracing::trace!(target_tag = %t, operand = %e, "inserting arithmetic coercion");
            e.replace_with(|op| self.arith_coerce(op, t));
        }
    }

    /// Bring both operands to tag `t`; the result is `t` or `vector of t`.
    pub(crate) fn promote_operands(&mut self, lhs: &mut Expr, rhs: &mut Expr, t: TypeTag) -> Type {
        let any_vector = self.check_vector_mix(lhs, rhs);
        self.coerce_operand(lhs, t);
        self.coerce_operand(rhs, t);
        maybe_vector(Type::base(t), any_vector)
    }

    /// Whether either operand is a vector, warning when only one is.
    pub(crate) fn check_vector_mix(&mut self, lhs: &Expr, rhs: &Expr) -> bool {
        if lhs.is_vector() != rhs.is_vector() {
            self.deprecated(
                lhs.span().merge(rhs.span()),
                "mixing vector and scalar operands is deprecated",
            );
        }
        lhs.is_vector() || rhs.is_vector()
    }

    fn promote_max(&mut self, lhs: &mut Expr, rhs: &mut Expr) -> Typed {
        let t = max_type(lhs.base_tag(), rhs.base_tag()).ok_or_else(arithmetic_required)?;
        Ok(self.promote_operands(lhs, rhs, t))
    }

    pub fn add(&mut self, mut lhs: Expr, mut rhs: Expr, span: Span) -> Expr {
        let op = self.canonical(BinaryOp::Add, &mut lhs, &mut rhs);
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            let vector = lhs.is_vector() || rhs.is_vector();
            match (lhs.base_tag(), rhs.base_tag()) {
                (TypeTag::Time, TypeTag::Interval) | (TypeTag::Interval, TypeTag::Time) => {
                    Ok(maybe_vector(Type::base(TypeTag::Time), vector))
                }
                (TypeTag::Interval, TypeTag::Interval) => {
                    Ok(maybe_vector(Type::base(TypeTag::Interval), vector))
                }
                (TypeTag::String, TypeTag::String) => {
                    Ok(maybe_vector(Type::base(TypeTag::String), vector))
                }
                (bt1, bt2) if both_arithmetic(bt1, bt2) => self.promote_max(&mut lhs, &mut rhs),
                _ => Err(arithmetic_required()),
            }
        });
        self.seal_binary(op, lhs, rhs, span, typed)
    }

    pub fn sub(&mut self, mut lhs: Expr, mut rhs: Expr, span: Span) -> Expr {
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            let vector = lhs.is_vector() || rhs.is_vector();
            if lhs.ty().is_set() && rhs.ty().is_set() {
                return if same_type(lhs.ty(), rhs.ty()) {
                    Ok(lhs.ty().clone())
                } else {
                    Err(reject(ErrorCode::E2001, "incompatible \"set\" operands"))
                };
            }
            match (lhs.base_tag(), rhs.base_tag()) {
                (TypeTag::Time, TypeTag::Interval) => {
                    Ok(maybe_vector(Type::base(TypeTag::Time), vector))
                }
                (TypeTag::Time, TypeTag::Time) | (TypeTag::Interval, TypeTag::Interval) => {
                    Ok(maybe_vector(Type::base(TypeTag::Interval), vector))
                }
                (bt1, bt2) if both_arithmetic(bt1, bt2) => self.promote_max(&mut lhs, &mut rhs),
                _ => Err(arithmetic_required()),
            }
        });
        self.seal_binary(BinaryOp::Sub, lhs, rhs, span, typed)
    }

    /// `x += y`. Appends to a vector target; otherwise the result keeps the
    /// target's type and the right operand is coerced to it.
    pub fn add_to(&mut self, lhs: Expr, mut rhs: Expr, span: Span) -> Expr {
        let lhs = if lhs.is_vector() {
            lhs
        } else {
            self.make_lvalue(lhs)
        };
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            let (bt1, bt2) = (lhs.ty().tag(), rhs.ty().tag());
            if both_arithmetic(bt1, bt2) {
                self.coerce_operand(&mut rhs, bt1);
                return Ok(lhs.ty().clone());
            }
            if bt1 == bt2 && matches!(bt1, TypeTag::String | TypeTag::Interval) {
                return Ok(lhs.ty().clone());
            }
            if let Some(elem) = lhs.ty().vector_yield() {
                let elem = elem.tag();
                if is_arithmetic(elem) {
                    if !is_arithmetic(bt2) {
                        return Err(reject(
                            ErrorCode::E2002,
                            "appending non-arithmetic to arithmetic vector",
                        ));
                    }
                    self.coerce_operand(&mut rhs, elem);
                } else if elem != bt2 && elem != TypeTag::Any {
                    return Err(reject(
                        ErrorCode::E2001,
                        format!("incompatible vector append: {} and {}", lhs.ty(), rhs.ty()),
                    ));
                }
                return Ok(lhs.ty().clone());
            }
            Err(reject(
                ErrorCode::E2002,
                "requires two arithmetic or two string operands",
            ))
        });
        self.seal_binary(BinaryOp::AddTo, lhs, rhs, span, typed)
    }

    /// `x -= y`.
    pub fn remove_from(&mut self, lhs: Expr, mut rhs: Expr, span: Span) -> Expr {
        let lhs = self.make_lvalue(lhs);
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            let (bt1, bt2) = (lhs.ty().tag(), rhs.ty().tag());
            if both_arithmetic(bt1, bt2) {
                self.coerce_operand(&mut rhs, bt1);
                Ok(lhs.ty().clone())
            } else if bt1 == TypeTag::Interval && bt2 == TypeTag::Interval {
                Ok(lhs.ty().clone())
            } else {
                Err(reject(ErrorCode::E2002, "requires two arithmetic operands"))
            }
        });
        self.seal_binary(BinaryOp::RemoveFrom, lhs, rhs, span, typed)
    }

    pub fn times(&mut self, mut lhs: Expr, mut rhs: Expr, span: Span) -> Expr {
        let op = self.canonical(BinaryOp::Times, &mut lhs, &mut rhs);
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            let (bt1, bt2) = (lhs.base_tag(), rhs.base_tag());
            if bt1 == TypeTag::Interval || bt2 == TypeTag::Interval {
                if is_arithmetic(bt1) || is_arithmetic(bt2) {
                    let vector = self.check_vector_mix(&lhs, &rhs);
                    Ok(maybe_vector(Type::base(TypeTag::Interval), vector))
                } else {
                    Err(reject(
                        ErrorCode::E2002,
                        "multiplication with interval requires arithmetic operand",
                    ))
                }
            } else if both_arithmetic(bt1, bt2) {
                self.promote_max(&mut lhs, &mut rhs)
            } else {
                Err(arithmetic_required())
            }
        });
        self.seal_binary(op, lhs, rhs, span, typed)
    }

    pub fn divide(&mut self, mut lhs: Expr, mut rhs: Expr, span: Span) -> Expr {
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            let (bt1, bt2) = (lhs.base_tag(), rhs.base_tag());
            if bt1 == TypeTag::Interval || bt2 == TypeTag::Interval {
                let vector = self.check_vector_mix(&lhs, &rhs);
                if is_arithmetic(bt1) || is_arithmetic(bt2) {
                    Ok(maybe_vector(Type::base(TypeTag::Interval), vector))
                } else if bt1 == TypeTag::Interval && bt2 == TypeTag::Interval {
                    Ok(maybe_vector(Type::base(TypeTag::Double), vector))
                } else {
                    Err(reject(
                        ErrorCode::E2002,
                        "division of interval requires arithmetic operand",
                    ))
                }
            } else if both_arithmetic(bt1, bt2) {
                self.promote_max(&mut lhs, &mut rhs)
            } else if bt1 == TypeTag::Addr
                && !rhs.is_vector()
                && matches!(bt2, TypeTag::Count | TypeTag::Int)
            {
                Ok(Type::base(TypeTag::Subnet))
            } else {
                Err(arithmetic_required())
            }
        });
        self.seal_binary(BinaryOp::Divide, lhs, rhs, span, typed)
    }

    pub fn modulo(&mut self, mut lhs: Expr, mut rhs: Expr, span: Span) -> Expr {
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            if both_integral(lhs.base_tag(), rhs.base_tag()) {
                self.promote_max(&mut lhs, &mut rhs)
            } else {
                Err(reject(ErrorCode::E2003, "requires integral operands"))
            }
        });
        self.seal_binary(BinaryOp::Mod, lhs, rhs, span, typed)
    }

    /// `&`, `|` and `^` over counts, patterns and sets.
    pub fn bit(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr, span: Span) -> Expr {
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            let (bt1, bt2) = (lhs.base_tag(), rhs.base_tag());
            let unsigned = |t: TypeTag| matches!(t, TypeTag::Count | TypeTag::Counter);
            if unsigned(bt1) && unsigned(bt2) {
                if bt1 == TypeTag::Counter && bt2 == TypeTag::Counter {
                    return Err(reject(
                        ErrorCode::E2003,
                        "cannot apply a bitwise operator to two \"counter\" operands",
                    ));
                }
                let vector = self.check_vector_mix(&lhs, &rhs);
                return Ok(maybe_vector(Type::base(TypeTag::Count), vector));
            }
            if bt1 == TypeTag::Pattern || bt2 == TypeTag::Pattern {
                if bt1 != bt2 {
                    return Err(reject(
                        ErrorCode::E2014,
                        "cannot mix pattern and non-pattern operands",
                    ));
                }
                if op == BinaryOp::BitXor {
                    return Err(reject(
                        ErrorCode::E2014,
                        "'^' operator does not apply to patterns",
                    ));
                }
                return Ok(Type::base(TypeTag::Pattern));
            }
            if lhs.ty().is_set() && rhs.ty().is_set() {
                if op == BinaryOp::BitXor {
                    return Err(reject(ErrorCode::E2014, "'^' operator does not apply to sets"));
                }
                return if same_type(lhs.ty(), rhs.ty()) {
                    Ok(lhs.ty().clone())
                } else {
                    Err(reject(ErrorCode::E2001, "incompatible \"set\" operands"))
                };
            }
            Err(reject(
                ErrorCode::E2003,
                "requires \"count\" or compatible \"set\" operands",
            ))
        });
        self.seal_binary(op, lhs, rhs, span, typed)
    }

    pub fn and_and(&mut self, lhs: Expr, rhs: Expr, span: Span) -> Expr {
        self.connective(BinaryOp::AndAnd, lhs, rhs, span)
    }

    pub fn or_or(&mut self, lhs: Expr, rhs: Expr, span: Span) -> Expr {
        self.connective(BinaryOp::OrOr, lhs, rhs, span)
    }

    fn connective(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr, span: Span) -> Expr {
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            if lhs.base_tag() == TypeTag::Bool && rhs.base_tag() == TypeTag::Bool {
                let vector = self.check_vector_mix(&lhs, &rhs);
                Ok(maybe_vector(Type::base(TypeTag::Bool), vector))
            } else {
                Err(reject(ErrorCode::E2004, "requires boolean operands"))
            }
        });
        self.seal_binary(op, lhs, rhs, span, typed)
    }
}
