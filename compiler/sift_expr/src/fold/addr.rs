//! Address and subnet folds.

use std::cmp::Ordering;

use sift_ir::BinaryOp;
use sift_values::{addr_cmp, type_mismatch, EvalResult, SubnetVal, Value};

/// Comparisons over address bytes, and `addr / width` building a subnet.
pub fn fold_addr(op: BinaryOp, v1: &Value, v2: &Value) -> EvalResult {
    let Some(a1) = v1.as_addr() else {
        return Err(type_mismatch("address expression"));
    };
    if op == BinaryOp::Divide {
        let width = v2
            .coerce_to_int()
            .ok_or_else(|| type_mismatch("address mask"))?;
        return Ok(Value::Subnet(SubnetVal::new(a1, width)?));
    }
    let Some(a2) = v2.as_addr() else {
        return Err(type_mismatch("address expression"));
    };
    let ord = addr_cmp(a1, a2);
    let result = match op {
        BinaryOp::Lt => ord == Ordering::Less,
        BinaryOp::Le => ord != Ordering::Greater,
        BinaryOp::Eq => ord == Ordering::Equal,
        BinaryOp::Ne => ord != Ordering::Equal,
        BinaryOp::Ge => ord != Ordering::Less,
        BinaryOp::Gt => ord == Ordering::Greater,
        _ => return Err(type_mismatch("address expression")),
    };
    Ok(Value::Bool(result))
}

/// Subnet equality: same prefix and same width.
pub fn fold_subnet(op: BinaryOp, v1: &Value, v2: &Value) -> EvalResult {
    let (Some(n1), Some(n2)) = (v1.as_subnet(), v2.as_subnet()) else {
        return Err(type_mismatch("subnet expression"));
    };
    let same = n1.width() == n2.width() && addr_cmp(n1.prefix(), n2.prefix()) == Ordering::Equal;
    match op {
        BinaryOp::Eq => Ok(Value::Bool(same)),
        BinaryOp::Ne => Ok(Value::Bool(!same)),
        _ => Err(type_mismatch("subnet expression")),
    }
}
