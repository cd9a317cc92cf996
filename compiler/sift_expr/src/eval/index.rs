//! Indexing and slicing of vectors, tables and strings.

use std::net::IpAddr;

use sift_values::{
    bool_index_size_mismatch, no_such_index, not_indexable, type_mismatch, EvalError,
    EvalResult, Frame, TableVal, TypeTag, Value, VectorVal,
};

use crate::node::Expr;

/// Resolve a slice bound against a sequence of length `len`.
///
/// Negative bounds count from the end; bounds past either end clamp to it.
pub(crate) fn slice_index(idx: i64, len: usize) -> usize {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if idx.unsigned_abs() > u64::try_from(len).unwrap_or(u64::MAX) {
        if idx > 0 {
            len_i
        } else {
            0
        }
    } else if idx < 0 {
        idx.saturating_add(len_i)
    } else {
        idx
    };
    usize::try_from(resolved).unwrap_or(0)
}

fn bound(v: &Value) -> Result<i64, EvalError> {
    v.coerce_to_int().ok_or_else(|| type_mismatch("index bound"))
}

/// `[first, last)` for a slice `v[a:b]` over length `len`.
pub(crate) fn slice_bounds(
    first: &Value,
    last: &Value,
    len: usize,
) -> Result<(usize, usize), EvalError> {
    Ok((slice_index(bound(first)?, len), slice_index(bound(last)?, len)))
}

fn describe_index(index: &[Value]) -> String {
    Value::list(index.to_vec()).to_string()
}

impl Expr {
    pub(super) fn eval_index(
        &self,
        base: &Expr,
        index: &Expr,
        is_slice: bool,
        frame: &mut dyn Frame,
    ) -> EvalResult {
        let v1 = base.eval_node(frame)?;
        let idx = index.eval_list(frame)?;
        if let ([Value::Vector(selector)], Value::Vector(vec)) = (idx.as_slice(), &v1) {
            return self.select(vec, selector);
        }
        index_value(&v1, &idx, is_slice)
    }

    /// `v[mask]` keeps the elements whose mask entry is true; `v[indices]`
    /// gathers the listed positions.
    fn select(&self, vec: &VectorVal, selector: &VectorVal) -> EvalResult {
        let slots = if selector.yield_type().tag() == TypeTag::Bool {
            if selector.len() != vec.len() {
                return Err(bool_index_size_mismatch());
            }
            selector
                .slots()
                .into_iter()
                .enumerate()
                .filter(|(_, m)| m.as_ref().is_some_and(|m| !m.is_zero()))
                .map(|(i, _)| vec.get(i))
                .collect()
        } else {
            selector
                .slots()
                .into_iter()
                .map(|s| {
                    s.and_then(|i| i.coerce_to_unsigned())
                        .and_then(|i| usize::try_from(i).ok())
                        .and_then(|i| vec.get(i))
                })
                .collect()
        };
        Ok(Value::Vector(VectorVal::from_slots(self.ty().clone(), slots)))
    }
}

fn is_subnet_indexed(table: &TableVal) -> bool {
    table
        .ty()
        .as_table()
        .is_some_and(|t| matches!(t.indices.as_slice(), [i] if i.tag() == TypeTag::Subnet))
}

/// Yield of the most specific subnet index containing `addr`.
fn best_subnet_match(table: &TableVal, addr: IpAddr) -> Option<Value> {
    table
        .entries()
        .into_iter()
        .filter_map(|entry| match entry.index.as_slice() {
            [Value::Subnet(s)] if s.contains(addr) => Some((s.width(), entry.value)),
            _ => None,
        })
        .max_by_key(|(width, _)| *width)
        .and_then(|(_, value)| value)
}

/// Look up `index` in an already evaluated aggregate.
pub(crate) fn index_value(v1: &Value, index: &[Value], is_slice: bool) -> EvalResult {
    match v1 {
        Value::Vector(vec) => match index {
            [i] => bound(i)
                .ok()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| vec.get(i))
                .ok_or_else(|| no_such_index(&describe_index(index))),
            [first, last] => {
                let (first, last) = slice_bounds(first, last, vec.len())?;
                let slots = vec.slots();
                let taken = slots.get(first..last).map(<[_]>::to_vec).unwrap_or_default();
                Ok(Value::Vector(VectorVal::from_slots(vec.ty().clone(), taken)))
            }
            _ => Err(no_such_index(&describe_index(index))),
        },
        Value::Table(table) => {
            let addr = match index {
                [Value::Addr(a)] if is_subnet_indexed(table) => Some(*a),
                _ => None,
            };
            if table.is_set() {
                let found = match addr {
                    Some(a) => table.any_subnet_contains(a),
                    None => table.contains(index)?,
                };
                return if found {
                    Ok(Value::Void)
                } else {
                    Err(no_such_index(&describe_index(index)))
                };
            }
            let found = match addr {
                Some(a) => best_subnet_match(table, a),
                None => table.lookup(index)?,
            };
            found.ok_or_else(|| no_such_index(&describe_index(index)))
        }
        Value::Str(s) => {
            let len = s.len();
            match (index, is_slice) {
                ([first, last], true) => {
                    let (first, last) = slice_bounds(first, last, len)?;
                    Ok(Value::bytes(s.get(first..last).unwrap_or_default()))
                }
                ([i], _) => {
                    let i = bound(i)?;
                    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
                    let i = if i < 0 { i.saturating_add(len_i) } else { i };
                    let byte = usize::try_from(i)
                        .ok()
                        .and_then(|i| s.get(i..=i))
                        .unwrap_or_default();
                    Ok(Value::bytes(byte))
                }
                _ => Err(no_such_index(&describe_index(index))),
            }
        }
        other => Err(not_indexable(&other.ty().to_string())),
    }
}

#[cfg(test)]
mod tests;
