//! Set algebra.
//!
//! Union and difference work on a copy of the left operand; neither input is
//! modified.

use sift_ir::BinaryOp;
use sift_values::{type_mismatch, EvalResult, Value};

pub fn fold(op: BinaryOp, v1: &Value, v2: &Value) -> EvalResult {
    let (Some(s1), Some(s2)) = (v1.as_table(), v2.as_table()) else {
        return Err(type_mismatch("set expression"));
    };
    let result = match op {
        BinaryOp::BitAnd => return Ok(Value::Table(s1.intersection(s2))),
        BinaryOp::BitOr => {
            let union = s1.deep_clone();
            union.add_all(s2);
            return Ok(Value::Table(union));
        }
        BinaryOp::Sub => {
            let difference = s1.deep_clone();
            difference.remove_all(s2);
            return Ok(Value::Table(difference));
        }
        BinaryOp::Eq => s1.equal_to(s2),
        BinaryOp::Ne => !s1.equal_to(s2),
        BinaryOp::Le => s1.is_subset_of(s2),
        BinaryOp::Lt => s1.is_subset_of(s2) && s1.len() < s2.len(),
        BinaryOp::Ge => s2.is_subset_of(s1),
        BinaryOp::Gt => s2.is_subset_of(s1) && s2.len() < s1.len(),
        _ => return Err(type_mismatch("set expression")),
    };
    Ok(Value::Bool(result))
}
