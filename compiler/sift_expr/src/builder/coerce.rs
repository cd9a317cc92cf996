//! Explicit and implicit conversions, `flatten`, `as` and `is`.

use std::sync::Arc;

use sift_diagnostic::ErrorCode;
use sift_ir::Span;
use sift_values::{
    arith_promotable, can_cast, is_arithmetic, record_promotion_compatible, same_type, FieldAttrs,
    Type, TypeTag,
};

use super::{maybe_vector, operands_ok, reject, ExprBuilder, Rejection, Typed};
use crate::node::{CoerceKind, Expr, ExprKind};

impl ExprBuilder {
    /// Numeric conversion of `operand` to tag `t`, element-wise for vectors.
    pub fn arith_coerce(&mut self, operand: Expr, t: TypeTag) -> Expr {
        let span = operand.span();
        let typed = operands_ok(&[&operand]).and_then(|()| {
            let bt = operand.ty().tag();
            let vbt = operand.base_tag();
            if (bt == TypeTag::Enum) != (t == TypeTag::Enum) {
                return Err(reject(
                    ErrorCode::E2007,
                    "can't convert to/from enumerated type",
                ));
            }
            let convertible = |tag: TypeTag| {
                is_arithmetic(tag)
                    || matches!(tag, TypeTag::Bool | TypeTag::Time | TypeTag::Interval)
            };
            if !convertible(t) {
                return Err(reject(ErrorCode::E2007, "bad coercion"));
            }
            let source_ok = |tag: TypeTag| is_arithmetic(tag) || tag == TypeTag::Bool;
            if !source_ok(bt) && !source_ok(vbt) {
                return Err(reject(ErrorCode::E2007, "bad coercion value"));
            }
            Ok(maybe_vector(Type::base(t), operand.is_vector()))
        });
        let kind = ExprKind::Coerce {
            kind: CoerceKind::Arith,
            operand: Box::new(operand),
        };
        self.seal(kind, span, typed)
    }

    /// Convert a record to record type `target`, matching fields by name.
    ///
    /// Every source field must exist in the target with a compatible type.
    /// Target fields with no source must be optional or have a default.
    pub fn record_coerce(&mut self, operand: Expr, target: Type) -> Expr {
        let span = operand.span();
        let (typed, map) = match self.record_field_map(&operand, &target, span) {
            Ok(map) => (Ok(target), map),
            Err(rejection) => (Err(rejection), Arc::from(Vec::new())),
        };
        let kind = ExprKind::RecordCoerce {
            operand: Box::new(operand),
            map,
        };
        self.seal(kind, span, typed)
    }

    fn record_field_map(
        &mut self,
        operand: &Expr,
        target: &Type,
        span: Span,
    ) -> Result<Arc<[Option<usize>]>, Rejection> {
        operands_ok(&[operand])?;
        let Some(target_rt) = target.as_record() else {
            return Err(reject(ErrorCode::E2007, "coercion to non-record"));
        };
        let Some(source_rt) = operand.ty().as_record() else {
            return Err(reject(ErrorCode::E2007, "coercion of non-record to record"));
        };
        let mut map = vec![None; target_rt.num_fields()];
        for (i, source) in source_rt.fields().iter().enumerate() {
            let Some(t_i) = target_rt.field_offset(&source.name) else {
                return Err(reject(
                    ErrorCode::E2008,
                    format!("orphaned field \"{}\" in record coercion", source.name),
                ));
            };
            let Some(field) = target_rt.field(t_i) else {
                continue;
            };
            let compatible = same_type(&field.ty, &source.ty)
                || arith_promotable(source.ty.tag(), field.ty.tag())
                || match (field.ty.as_record(), source.ty.as_record()) {
                    (Some(tr), Some(sr)) => record_promotion_compatible(tr, sr),
                    _ => false,
                };
            if !compatible {
                return Err(reject(
                    ErrorCode::E2008,
                    format!("type clash for field \"{}\"", source.name),
                ));
            }
            if let Some(slot) = map.get_mut(t_i) {
                *slot = Some(i);
            }
        }
        for (field, source) in target_rt.fields().iter().zip(&map) {
            if source.is_some() {
                continue;
            }
            if !(field.is_optional() || field.has_default()) {
                return Err(reject(
                    ErrorCode::E2008,
                    format!("non-optional field \"{}\" missing", field.name),
                ));
            }
            if field.attrs.contains(FieldAttrs::DEPRECATED) {
                self.deprecated(span, format!("deprecated field \"{}\"", field.name));
            }
        }
        Ok(Arc::from(map))
    }

    /// Give an empty untyped `table()` / `set()` a concrete type.
    pub fn table_coerce(&mut self, operand: Expr, target: Type) -> Expr {
        let span = operand.span();
        let typed = operands_ok(&[&operand]).and_then(|()| {
            if target.tag() != TypeTag::Table {
                Err(reject(ErrorCode::E2007, "coercion to non-table"))
            } else if operand.ty().tag() != TypeTag::Table {
                Err(reject(
                    ErrorCode::E2007,
                    "coercion of non-table/set to table/set",
                ))
            } else {
                Ok(target)
            }
        });
        let kind = ExprKind::Coerce {
            kind: CoerceKind::Table,
            operand: Box::new(operand),
        };
        self.seal(kind, span, typed)
    }

    /// Give an empty untyped `vector()` a concrete type.
    pub fn vector_coerce(&mut self, operand: Expr, target: Type) -> Expr {
        let span = operand.span();
        let typed = operands_ok(&[&operand]).and_then(|()| {
            if target.tag() != TypeTag::Vector {
                Err(reject(ErrorCode::E2007, "coercion to non-vector"))
            } else if operand.ty().tag() != TypeTag::Vector {
                Err(reject(ErrorCode::E2007, "coercion of non-vector to vector"))
            } else {
                Ok(target)
            }
        });
        let kind = ExprKind::Coerce {
            kind: CoerceKind::Vector,
            operand: Box::new(operand),
        };
        self.seal(kind, span, typed)
    }

    /// Record fields as a list, for composite table indices.
    pub fn flatten(&mut self, operand: Expr, span: Span) -> Expr {
        let typed = operands_ok(&[&operand]).and_then(|()| match operand.ty().as_record() {
            Some(rt) => Ok(Type::list(rt.fields().iter().map(|f| f.ty.clone()).collect())),
            None => Err(reject(ErrorCode::E2014, "flatten requires a record operand")),
        });
        self.seal(ExprKind::Flatten(Box::new(operand)), span, typed)
    }

    /// `x as T`.
    pub fn cast(&mut self, operand: Expr, target: Type, span: Span) -> Expr {
        let typed: Typed = operands_ok(&[&operand]).and_then(|()| {
            if can_cast(operand.ty(), &target) {
                Ok(target)
            } else {
                Err(reject(
                    ErrorCode::E2013,
                    format!("cast not supported ({} as {})", operand.ty(), target),
                ))
            }
        });
        self.seal(ExprKind::Cast(Box::new(operand)), span, typed)
    }

    /// `x is T`.
    pub fn is(&mut self, operand: Expr, target: Type, span: Span) -> Expr {
        let typed = operands_ok(&[&operand]).map(|()| Type::base(TypeTag::Bool));
        let kind = ExprKind::Is {
            operand: Box::new(operand),
            target,
        };
        self.seal(kind, span, typed)
    }
}
