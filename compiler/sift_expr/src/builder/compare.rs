//! Comparisons, membership and the conditional operator.

use sift_diagnostic::ErrorCode;
use sift_ir::{BinaryOp, ExprTag, Span};
use sift_values::{both_arithmetic, is_arithmetic, max_type, same_type, Type, TypeTag};

use super::aggregate::IndexMatch;
use super::{maybe_vector, operands_ok, reject, ExprBuilder};
use crate::node::{Expr, ExprKind};

fn bool_result(vector: bool) -> Type {
    maybe_vector(Type::base(TypeTag::Bool), vector)
}

impl ExprBuilder {
    /// `==` and `!=`.
    pub fn eq(&mut self, op: BinaryOp, mut lhs: Expr, mut rhs: Expr, span: Span) -> Expr {
        let op = self.canonical(op, &mut lhs, &mut rhs);
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            let (bt1, bt2) = (lhs.base_tag(), rhs.base_tag());
            let vector = lhs.is_vector() || rhs.is_vector();
            if both_arithmetic(bt1, bt2) {
                if let Some(t) = max_type(bt1, bt2) {
                    self.promote_operands(&mut lhs, &mut rhs, t);
                }
                return Ok(bool_result(vector));
            }
            if (is_arithmetic(bt1) || is_arithmetic(bt2))
                && ((bt1 == TypeTag::Time && rhs.is_zero())
                    || (bt2 == TypeTag::Time && lhs.is_zero()))
            {
                self.promote_operands(&mut lhs, &mut rhs, TypeTag::Time);
                return Ok(bool_result(vector));
            }
            if bt1 == bt2 {
                return match bt1 {
                    TypeTag::Bool
                    | TypeTag::Time
                    | TypeTag::Interval
                    | TypeTag::String
                    | TypeTag::Port
                    | TypeTag::Addr
                    | TypeTag::Subnet => Ok(bool_result(vector)),
                    TypeTag::Enum => {
                        if same_type(lhs.base_type(), rhs.base_type()) {
                            Ok(bool_result(vector))
                        } else {
                            Err(reject(ErrorCode::E2005, "illegal enum comparison"))
                        }
                    }
                    TypeTag::Table if lhs.ty().is_set() && rhs.ty().is_set() => {
                        if same_type(lhs.ty(), rhs.ty()) {
                            Ok(bool_result(vector))
                        } else {
                            Err(reject(ErrorCode::E2005, "incompatible sets in comparison"))
                        }
                    }
                    _ => Err(reject(ErrorCode::E2005, "illegal comparison")),
                };
            }
            if matches!(
                (bt1, bt2),
                (TypeTag::Pattern, TypeTag::String) | (TypeTag::String, TypeTag::Pattern)
            ) {
                return Ok(bool_result(vector));
            }
            Err(reject(ErrorCode::E2005, "type clash in comparison"))
        });
        self.seal_binary(op, lhs, rhs, span, typed)
    }

    /// `<`, `<=`, `>=` and `>`.
    pub fn rel(&mut self, op: BinaryOp, mut lhs: Expr, mut rhs: Expr, span: Span) -> Expr {
        let op = self.canonical(op, &mut lhs, &mut rhs);
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            let (bt1, bt2) = (lhs.base_tag(), rhs.base_tag());
            let vector = lhs.is_vector() || rhs.is_vector();
            if both_arithmetic(bt1, bt2) {
                if let Some(t) = max_type(bt1, bt2) {
                    self.promote_operands(&mut lhs, &mut rhs, t);
                }
                return Ok(bool_result(vector));
            }
            if lhs.ty().is_set() && rhs.ty().is_set() {
                return if same_type(lhs.ty(), rhs.ty()) {
                    Ok(bool_result(false))
                } else {
                    Err(reject(ErrorCode::E2005, "incompatible sets in comparison"))
                };
            }
            if bt1 != bt2 {
                return Err(reject(ErrorCode::E2005, "operands must be of the same type"));
            }
            match bt1 {
                TypeTag::Time
                | TypeTag::Interval
                | TypeTag::Port
                | TypeTag::Addr
                | TypeTag::String => Ok(bool_result(vector)),
                _ => Err(reject(ErrorCode::E2005, "illegal comparison")),
            }
        });
        self.seal_binary(op, lhs, rhs, span, typed)
    }

    /// `x in y`.
    ///
    /// A non-list left operand is wrapped in a one-element list before it is
    /// matched against the right operand's index types.
    pub fn in_expr(&mut self, mut lhs: Expr, rhs: Expr, span: Span) -> Expr {
        let typed = operands_ok(&[&lhs, &rhs]).and_then(|()| {
            let bt1 = lhs.ty().tag();
            let bt2 = rhs.ty().tag();
            if bt1 == TypeTag::Pattern {
                return if bt2 == TypeTag::String {
                    Ok(bool_result(false))
                } else {
                    Err(reject(ErrorCode::E2009, "pattern requires string index"))
                };
            }
            if bt1 == TypeTag::Record {
                let Some(table) = rhs.ty().as_table() else {
                    return Err(reject(ErrorCode::E2009, "table/set required"));
                };
                let fields_match = lhs.ty().as_record().is_some_and(|rt| {
                    rt.num_fields() == table.indices.len()
                        && rt
                            .fields()
                            .iter()
                            .zip(&table.indices)
                            .all(|(f, t)| same_type(&f.ty, t))
                });
                return if fields_match {
                    Ok(bool_result(false))
                } else {
                    Err(reject(ErrorCode::E2009, "indexing mismatch"))
                };
            }
            if bt1 == TypeTag::String && bt2 == TypeTag::String {
                return Ok(bool_result(false));
            }
            if bt1 == TypeTag::Addr {
                if bt2 == TypeTag::Subnet {
                    return Ok(bool_result(false));
                }
                let subnet_indexed = rhs.ty().as_table().is_some_and(|t| {
                    t.indices.len() == 1 && t.indices[0].tag() == TypeTag::Subnet
                });
                if subnet_indexed {
                    return Ok(bool_result(false));
                }
            }
            if lhs.tag() != ExprTag::List {
                let span = lhs.span();
                lhs.replace_with(|single| self.list(vec![single], span));
            }
            let rhs_ty = rhs.ty().clone();
            match self.matches_index(&rhs_ty, &mut lhs) {
                IndexMatch::NoMatch => Err(reject(ErrorCode::E2009, "not an index type")),
                IndexMatch::Scalar | IndexMatch::Vector => Ok(bool_result(false)),
            }
        });
        self.seal_binary(BinaryOp::In, lhs, rhs, span, typed)
    }

    /// `c ? a : b`. Arithmetic alternatives are promoted to a common type.
    pub fn cond(
        &mut self,
        cond: Expr,
        mut then_branch: Expr,
        mut else_branch: Expr,
        span: Span,
    ) -> Expr {
        let typed = operands_ok(&[&cond, &then_branch, &else_branch]).and_then(|()| {
            if cond.base_tag() != TypeTag::Bool {
                return Err(reject(ErrorCode::E2004, "requires boolean conditional"));
            }
            if cond.is_vector() && !(then_branch.is_vector() && else_branch.is_vector()) {
                return Err(reject(
                    ErrorCode::E2001,
                    "vector conditional requires vector alternatives",
                ));
            }
            let (bt2, bt3) = (then_branch.base_tag(), else_branch.base_tag());
            if both_arithmetic(bt2, bt3) {
                let t = max_type(bt2, bt3).unwrap_or(bt2);
                self.coerce_operand(&mut then_branch, t);
                self.coerce_operand(&mut else_branch, t);
                return Ok(maybe_vector(Type::base(t), then_branch.is_vector()));
            }
            if bt2 != bt3 {
                return Err(reject(ErrorCode::E2001, "operands must be of the same type"));
            }
            if bt2 == TypeTag::Record && !same_type(then_branch.ty(), else_branch.ty()) {
                return Err(reject(ErrorCode::E2001, "operands must be of the same type"));
            }
            Ok(then_branch.ty().clone())
        });
        let kind = ExprKind::Cond {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        };
        self.seal(kind, span, typed)
    }
}
