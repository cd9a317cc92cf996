//! Promotion of expressions against required types.
//!
//! Each check either accepts an expression as it is, accepts it after
//! wrapping it in a coercion node, or rejects it. The `check_and_promote_*`
//! entry points report a rejection to the builder; the crate-internal
//! `promote_*` forms hand it back so callers can phrase their own error.

use std::sync::Arc;

use sift_diagnostic::ErrorCode;
use sift_values::{
    both_arithmetic, is_arithmetic, max_type, record_promotion_compatible, same_attrs, same_type,
    RecordType, Type, TypeTag,
};

use crate::builder::{reject, retype_list, ExprBuilder, Rejection};
use crate::node::{Expr, ExprKind};

fn report(builder: &mut ExprBuilder, e: &Expr, result: Result<(), Rejection>) -> bool {
    match result {
        Ok(()) => true,
        Err(Rejection::Silent) => false,
        Err(Rejection::Report { code, message }) => {
            builder.report(e, code, message);
            false
        }
    }
}

/// Make `e` acceptable where a `t` is required.
pub fn check_and_promote_expr(builder: &mut ExprBuilder, e: &mut Expr, t: &Type) -> bool {
    let result = promote_expr(builder, e, t);
    report(builder, e, result)
}

/// Promote the elements of list `list` pairwise against `types`.
pub fn check_and_promote_exprs(builder: &mut ExprBuilder, list: &mut Expr, types: &[Type]) -> bool {
    let result = promote_exprs(builder, list, types);
    report(builder, list, result)
}

/// Promote every element of list `list` to `t`.
pub fn check_and_promote_exprs_to_type(builder: &mut ExprBuilder, list: &mut Expr, t: &Type) -> bool {
    let result = promote_exprs_to_type(builder, list, t);
    report(builder, list, result)
}

/// Match call arguments against `params`, filling trailing defaults.
pub fn check_and_promote_args(builder: &mut ExprBuilder, args: &mut Expr, params: &RecordType) -> bool {
    let result = promote_args(builder, args, params);
    report(builder, args, result)
}

pub(crate) fn promote_expr(builder: &mut ExprBuilder, e: &mut Expr, t: &Type) -> Result<(), Rejection> {
    if e.is_error() {
        return Err(Rejection::Silent);
    }
    let (et, tt) = (e.ty().tag(), t.tag());
    if tt == TypeTag::Any {
        return Ok(());
    }
    if is_arithmetic(et) || is_arithmetic(tt) {
        if et == tt {
            return Ok(());
        }
        if !both_arithmetic(et, tt) {
            return Err(reject(
                ErrorCode::E2002,
                "arithmetic mixed with non-arithmetic",
            ));
        }
        if max_type(et, tt) != Some(tt) {
            return Err(reject(ErrorCode::E2002, "over-promotion of arithmetic value"));
        }
        e.replace_with(|op| builder.arith_coerce(op, tt));
        return Ok(());
    }
    if let (Some(er), Some(tr)) = (e.ty().as_record(), t.as_record()) {
        if same_type(e.ty(), t) && same_attrs(tr, er) {
            return Ok(());
        }
        if !record_promotion_compatible(tr, er) {
            return Err(reject(ErrorCode::E2001, "incompatible record types"));
        }
        e.replace_with(|op| builder.record_coerce(op, t.clone()));
        return if e.is_error() {
            Err(Rejection::Silent)
        } else {
            Ok(())
        };
    }
    if same_type(e.ty(), t) {
        return Ok(());
    }
    if tt == TypeTag::Table && e.ty().is_unspecified_table() {
        e.replace_with(|op| builder.table_coerce(op, t.clone()));
        return Ok(());
    }
    if tt == TypeTag::Vector && e.ty().is_unspecified_vector() {
        e.replace_with(|op| builder.vector_coerce(op, t.clone()));
        return Ok(());
    }
    Err(reject(
        ErrorCode::E2001,
        format!("type clash: {} is not {t}", e.ty()),
    ))
}

fn mismatch(rejection: Rejection) -> Rejection {
    match rejection {
        Rejection::Silent => Rejection::Silent,
        Rejection::Report { message, .. } => {
            reject(ErrorCode::E2001, format!("type mismatch ({message})"))
        }
    }
}

pub(crate) fn promote_exprs(
    builder: &mut ExprBuilder,
    list: &mut Expr,
    types: &[Type],
) -> Result<(), Rejection> {
    let Some(elems) = list.list_exprs_mut() else {
        return Err(reject(ErrorCode::E2009, "indexing mismatch"));
    };
    if let [only] = types {
        if only.tag() == TypeTag::Any {
            return Ok(());
        }
    }
    if elems.len() != types.len() {
        return Err(reject(ErrorCode::E2009, "indexing mismatch"));
    }
    for (e, t) in elems.iter_mut().zip(types) {
        promote_expr(builder, e, t).map_err(mismatch)?;
    }
    retype_list(list);
    Ok(())
}

pub(crate) fn promote_exprs_to_type(
    builder: &mut ExprBuilder,
    list: &mut Expr,
    t: &Type,
) -> Result<(), Rejection> {
    let Some(elems) = list.list_exprs_mut() else {
        return Err(reject(ErrorCode::E2001, "type mismatch"));
    };
    for e in elems.iter_mut() {
        promote_expr(builder, e, t).map_err(mismatch)?;
    }
    retype_list(list);
    Ok(())
}

pub(crate) fn promote_args(
    builder: &mut ExprBuilder,
    args: &mut Expr,
    params: &RecordType,
) -> Result<(), Rejection> {
    let span = args.span();
    let Some(elems) = args.list_exprs_mut() else {
        return Err(reject(ErrorCode::E2011, "parameter mismatch"));
    };
    if let [only] = params.fields() {
        if only.ty.tag() == TypeTag::Any {
            return Ok(());
        }
    }
    let supplied = elems.len();
    if supplied < params.num_fields() {
        for field in &params.fields()[supplied..] {
            let Some(default) = &field.default else {
                return Err(reject(ErrorCode::E2011, "parameter mismatch"));
            };
            tracing::trace!(param = %field.name, "filling argument from default");
            elems.push(Expr::new(
                ExprKind::Default(Arc::clone(default)),
                field.ty.clone(),
                span,
            ));
        }
    }
    let types: Vec<Type> = params.fields().iter().map(|f| f.ty.clone()).collect();
    promote_exprs(builder, args, &types)
}

#[cfg(test)]
mod tests;
