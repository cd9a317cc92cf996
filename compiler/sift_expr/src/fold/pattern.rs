//! Pattern folds: `&` and `|` combine patterns, `==` matches a string exactly.

use sift_ir::BinaryOp;
use sift_values::{type_mismatch, EvalResult, Value};

pub fn fold(op: BinaryOp, v1: &Value, v2: &Value) -> EvalResult {
    let Some(p1) = v1.as_pattern() else {
        return Err(type_mismatch("pattern expression"));
    };
    match (op, v2) {
        (BinaryOp::Eq, Value::Str(s)) => Ok(Value::Bool(p1.match_exactly(s))),
        (BinaryOp::Ne, Value::Str(s)) => Ok(Value::Bool(!p1.match_exactly(s))),
        (BinaryOp::BitAnd, Value::Pattern(p2)) => Ok(Value::Pattern(p1.conjunction(p2)?)),
        (BinaryOp::BitOr, Value::Pattern(p2)) => Ok(Value::Pattern(p1.disjunction(p2)?)),
        _ => Err(type_mismatch("pattern expression")),
    }
}
