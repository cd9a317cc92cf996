//! Integral and floating-point folds.
//!
//! Operands arrive already promoted to a common type by construction, so the
//! folding domain is picked from their representations: double if either is
//! double, unsigned if both are unsigned, signed otherwise. Integral
//! arithmetic wraps; a zero divisor is always an error.

use sift_ir::BinaryOp;
use sift_values::{
    bad_coercion_value, division_by_zero, modulo_by_zero, type_mismatch, EvalResult,
    InternalTag, Type, TypeTag, Value,
};

/// A number in one of the three folding representations.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Num {
    Int(i64),
    Unsigned(u64),
    Double(f64),
}

impl Num {
    fn of(v: &Value, domain: InternalTag) -> Option<Num> {
        match domain {
            InternalTag::Double => v.coerce_to_double().map(Num::Double),
            InternalTag::Unsigned => v.coerce_to_unsigned().map(Num::Unsigned),
            _ => v.coerce_to_int().map(Num::Int),
        }
    }
}

fn domain(v1: &Value, v2: &Value) -> InternalTag {
    match (v1.internal(), v2.internal()) {
        (InternalTag::Double, _) | (_, InternalTag::Double) => InternalTag::Double,
        (InternalTag::Unsigned, InternalTag::Unsigned) => InternalTag::Unsigned,
        _ => InternalTag::Int,
    }
}

fn compare<T: PartialOrd>(op: BinaryOp, a: T, b: T) -> Option<bool> {
    match op {
        BinaryOp::Lt => Some(a < b),
        BinaryOp::Le => Some(a <= b),
        BinaryOp::Eq => Some(a == b),
        BinaryOp::Ne => Some(a != b),
        BinaryOp::Ge => Some(a >= b),
        BinaryOp::Gt => Some(a > b),
        _ => None,
    }
}

/// Fold a binary arithmetic, bitwise or comparison operator.
pub fn fold(op: BinaryOp, result_ty: &Type, v1: &Value, v2: &Value) -> EvalResult {
    let domain = domain(v1, v2);
    let (Some(a), Some(b)) = (Num::of(v1, domain), Num::of(v2, domain)) else {
        return Err(type_mismatch("arithmetic expression"));
    };
    let result = match (a, b) {
        (Num::Int(a), Num::Int(b)) => {
            if let Some(r) = compare(op, a, b) {
                return Ok(Value::Bool(r));
            }
            Num::Int(fold_int(op, a, b)?)
        }
        (Num::Unsigned(a), Num::Unsigned(b)) => {
            if let Some(r) = compare(op, a, b) {
                return Ok(Value::Bool(r));
            }
            Num::Unsigned(fold_unsigned(op, a, b)?)
        }
        (Num::Double(a), Num::Double(b)) => {
            if let Some(r) = compare(op, a, b) {
                return Ok(Value::Bool(r));
            }
            Num::Double(fold_double(op, a, b)?)
        }
        _ => return Err(type_mismatch("arithmetic expression")),
    };
    Ok(make_numeric(result_ty.tag(), result))
}

fn fold_int(op: BinaryOp, a: i64, b: i64) -> Result<i64, sift_values::EvalError> {
    Ok(match op {
        BinaryOp::Add | BinaryOp::AddTo => a.wrapping_add(b),
        BinaryOp::Sub | BinaryOp::RemoveFrom => a.wrapping_sub(b),
        BinaryOp::Times => a.wrapping_mul(b),
        BinaryOp::Divide => {
            if b == 0 {
                return Err(division_by_zero());
            }
            a.wrapping_div(b)
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(modulo_by_zero());
            }
            a.wrapping_rem(b)
        }
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        _ => return Err(type_mismatch("integer expression")),
    })
}

fn fold_unsigned(op: BinaryOp, a: u64, b: u64) -> Result<u64, sift_values::EvalError> {
    Ok(match op {
        BinaryOp::Add | BinaryOp::AddTo => a.wrapping_add(b),
        BinaryOp::Sub | BinaryOp::RemoveFrom => a.wrapping_sub(b),
        BinaryOp::Times => a.wrapping_mul(b),
        BinaryOp::Divide => {
            if b == 0 {
                return Err(division_by_zero());
            }
            a.wrapping_div(b)
        }
        BinaryOp::Mod => {
            if b == 0 {
                return Err(modulo_by_zero());
            }
            a.wrapping_rem(b)
        }
        BinaryOp::BitAnd => a & b,
        BinaryOp::BitOr => a | b,
        BinaryOp::BitXor => a ^ b,
        _ => return Err(type_mismatch("count expression")),
    })
}

fn fold_double(op: BinaryOp, a: f64, b: f64) -> Result<f64, sift_values::EvalError> {
    Ok(match op {
        BinaryOp::Add | BinaryOp::AddTo => a + b,
        BinaryOp::Sub | BinaryOp::RemoveFrom => a - b,
        BinaryOp::Times => a * b,
        BinaryOp::Divide => {
            if b == 0.0 {
                return Err(division_by_zero());
            }
            a / b
        }
        _ => return Err(type_mismatch("double expression")),
    })
}

/// Represent `n` as a value of type tag `target`.
///
/// Interval and other double-represented targets keep their tag; unsigned
/// targets become counts (or counters), `bool` tests for nonzero and
/// everything else is a signed integer.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    reason = "Numeric results take the representation of the static type; conversion wraps or truncates"
)]
pub fn make_numeric(target: TypeTag, n: Num) -> Value {
    let as_double = || match n {
        Num::Int(i) => i as f64,
        Num::Unsigned(u) => u as f64,
        Num::Double(d) => d,
    };
    let as_int = || match n {
        Num::Int(i) => i,
        Num::Unsigned(u) => u as i64,
        Num::Double(d) => d as i64,
    };
    let as_unsigned = || match n {
        Num::Int(i) => i as u64,
        Num::Unsigned(u) => u,
        Num::Double(d) => d as u64,
    };
    match target {
        TypeTag::Interval => Value::Interval(as_double()),
        TypeTag::Time => Value::Time(as_double()),
        TypeTag::Double => Value::Double(as_double()),
        TypeTag::Counter => Value::Counter(as_unsigned()),
        TypeTag::Count | TypeTag::Port => Value::Count(as_unsigned()),
        TypeTag::Bool => Value::Bool(as_int() != 0),
        _ => Value::Int(as_int()),
    }
}

/// Unary `+`. Doubles and intervals keep their kind; anything else is an int.
pub fn positive(result_ty: &Type, v: &Value) -> EvalResult {
    match v {
        Value::Double(_) | Value::Interval(_) | Value::Int(_) => Ok(v.clone()),
        _ => v
            .coerce_to_int()
            .map(|i| make_numeric(result_ty.tag(), Num::Int(i)))
            .ok_or_else(|| type_mismatch("unary plus")),
    }
}

/// Unary `-`. Doubles and intervals keep their kind; anything else is an int.
pub fn negate(result_ty: &Type, v: &Value) -> EvalResult {
    match v {
        Value::Double(d) => Ok(Value::Double(-d)),
        Value::Interval(d) => Ok(Value::Interval(-d)),
        _ => v
            .coerce_to_int()
            .map(|i| make_numeric(result_ty.tag(), Num::Int(i.wrapping_neg())))
            .ok_or_else(|| type_mismatch("unary minus")),
    }
}

/// Convert `v` to the representation of `target`.
pub fn coerce(target: TypeTag, v: &Value) -> EvalResult {
    let n = match target.internal() {
        InternalTag::Int => v.coerce_to_int().map(Num::Int),
        InternalTag::Unsigned => v.coerce_to_unsigned().map(Num::Unsigned),
        InternalTag::Double => v.coerce_to_double().map(Num::Double),
        _ => None,
    };
    n.map(|n| make_numeric(target, n)).ok_or_else(bad_coercion_value)
}
