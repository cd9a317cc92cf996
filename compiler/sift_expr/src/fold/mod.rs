//! Operator implementations over already-evaluated operands.
//!
//! Binary folds dispatch on the left operand's internal representation, not
//! on the expression kind, so one implementation serves every syntactic form
//! that reaches it. Numeric results take the representation of the node's
//! static result type. Vectors never reach this module; broadcasting happens
//! in the evaluator.

use sift_ir::{BinaryOp, UnaryOp};
use sift_values::{type_mismatch, EvalResult, InternalTag, Type, TypeTag, Value};

pub mod addr;
pub mod numeric;
pub mod pattern;
pub mod set;
pub mod string;

/// Fold `v1 op v2` into a value of `result_ty`.
///
/// `result_ty` is the static type of the folding node, flattened to the
/// element type for vector nodes.
pub fn fold_binary(op: BinaryOp, result_ty: &Type, v1: &Value, v2: &Value) -> EvalResult {
    match v1.internal() {
        InternalTag::Int | InternalTag::Unsigned | InternalTag::Double => {
            numeric::fold(op, result_ty, v1, v2)
        }
        InternalTag::String => string::fold(op, v1, v2),
        InternalTag::Addr => addr::fold_addr(op, v1, v2),
        InternalTag::Subnet => addr::fold_subnet(op, v1, v2),
        InternalTag::Void | InternalTag::Other => match v1 {
            Value::Pattern(_) => pattern::fold(op, v1, v2),
            Value::Table(t) if t.is_set() => set::fold(op, v1, v2),
            _ => Err(type_mismatch("binary expression")),
        },
    }
}

/// Fold a unary operator applied to a non-vector operand.
pub fn fold_unary(op: UnaryOp, result_ty: &Type, v: &Value) -> EvalResult {
    match op {
        UnaryOp::Not => v
            .coerce_to_int()
            .map(|i| Value::Bool(i == 0))
            .ok_or_else(|| type_mismatch("negation")),
        UnaryOp::Complement => v
            .coerce_to_unsigned()
            .map(|u| Value::Count(!u))
            .ok_or_else(|| type_mismatch("complement")),
        UnaryOp::Positive => numeric::positive(result_ty, v),
        UnaryOp::Negate => numeric::negate(result_ty, v),
        UnaryOp::Clone => Ok(v.deep_clone()),
        UnaryOp::Size => Ok(size_of(v)),
    }
}

/// Membership test `v1 in v2`.
pub fn fold_in(v1: &Value, v2: &Value) -> EvalResult {
    let found = match (v1, v2) {
        (Value::Pattern(p), Value::Str(s)) => p.match_anywhere(s),
        (Value::Str(needle), Value::Str(haystack)) => contains_bytes(haystack, needle),
        (Value::Addr(a), Value::Subnet(net)) => net.contains(*a),
        (_, Value::Table(t)) => {
            if let Value::Addr(a) = v1 {
                if is_subnet_indexed(t.ty()) {
                    return Ok(Value::Bool(t.any_subnet_contains(*a)));
                }
            }
            match v1 {
                Value::List(index) => t.contains(index)?,
                single => t.contains(std::slice::from_ref(single))?,
            }
        }
        (_, Value::Vector(v)) => {
            let index = match v1 {
                Value::List(index) if index.len() == 1 => &index[0],
                other => other,
            };
            index
                .coerce_to_unsigned()
                .and_then(|i| usize::try_from(i).ok())
                .is_some_and(|i| v.get(i).is_some())
        }
        _ => return Err(type_mismatch("membership test")),
    };
    Ok(Value::Bool(found))
}

fn is_subnet_indexed(ty: &Type) -> bool {
    ty.as_table()
        .is_some_and(|t| t.indices.len() == 1 && t.indices[0].tag() == TypeTag::Subnet)
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

fn size_of(v: &Value) -> Value {
    let count = |n: usize| Value::Count(u64::try_from(n).unwrap_or(u64::MAX));
    match v {
        Value::Int(i) => Value::Count(i.unsigned_abs()),
        Value::Bool(_) | Value::Count(_) | Value::Counter(_) | Value::Enum(..) => {
            Value::Count(v.coerce_to_unsigned().unwrap_or(0))
        }
        Value::Port(p) => Value::Count(u64::from(p.number)),
        Value::Double(d) | Value::Time(d) | Value::Interval(d) => Value::Double(d.abs()),
        Value::Str(s) => count(s.len()),
        Value::Addr(a) => Value::Count(if a.is_ipv4() { 32 } else { 128 }),
        Value::Subnet(net) => {
            let total: u8 = if net.prefix().is_ipv4() { 32 } else { 128 };
            let host_bits = total.saturating_sub(net.width());
            Value::Double(2f64.powi(i32::from(host_bits)))
        }
        Value::Table(t) => count(t.len()),
        Value::Vector(vec) => count(vec.len()),
        Value::List(vals) => count(vals.len()),
        Value::Record(r) => count(r.num_fields()),
        Value::Func(f) => count(
            f.callable()
                .ty()
                .as_func()
                .map_or(0, |ft| ft.params.num_fields()),
        ),
        Value::Void | Value::Pattern(_) | Value::Type(_) => Value::Count(0),
    }
}

#[cfg(test)]
mod tests;
