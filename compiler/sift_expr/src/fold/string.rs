//! Byte-string folds: concatenation and byte-wise ordering.

use sift_ir::BinaryOp;
use sift_values::{type_mismatch, EvalResult, Value};

pub fn fold(op: BinaryOp, v1: &Value, v2: &Value) -> EvalResult {
    let Some(s1) = v1.as_bytes() else {
        return Err(type_mismatch("string expression"));
    };
    if let Value::Pattern(p) = v2 {
        return match op {
            BinaryOp::Eq => Ok(Value::Bool(p.match_exactly(s1))),
            BinaryOp::Ne => Ok(Value::Bool(!p.match_exactly(s1))),
            _ => Err(type_mismatch("string expression")),
        };
    }
    let Some(s2) = v2.as_bytes() else {
        return Err(type_mismatch("string expression"));
    };
    let result = match op {
        BinaryOp::Add | BinaryOp::AddTo => return Ok(concat(s1, s2)),
        BinaryOp::Lt => s1 < s2,
        BinaryOp::Le => s1 <= s2,
        BinaryOp::Eq => s1 == s2,
        BinaryOp::Ne => s1 != s2,
        BinaryOp::Ge => s1 >= s2,
        BinaryOp::Gt => s1 > s2,
        _ => return Err(type_mismatch("string expression")),
    };
    Ok(Value::Bool(result))
}

fn concat(s1: &[u8], s2: &[u8]) -> Value {
    let mut bytes = Vec::with_capacity(s1.len().saturating_add(s2.len()));
    bytes.extend_from_slice(s1);
    bytes.extend_from_slice(s2);
    Value::Str(bytes.into())
}
