//! The l-value protocol: assignment, and the add/delete statement hooks.

use sift_values::{
    no_such_index, type_mismatch, EvalError, Frame, IdScope, InternalTag, TypeTag, Value,
};

use crate::eval::slice_bounds;
use crate::node::{Expr, ExprKind};

impl Expr {
    /// Store `value` into the location this expression denotes.
    ///
    /// `None` clears a binding or field. Only names, references, fields,
    /// index expressions and lists of names are assignable.
    pub fn assign(&self, frame: &mut dyn Frame, value: Option<Value>) -> Result<(), EvalError> {
        self.assign_inner(frame, value)
            .map_err(|err| self.annotate(err, &*frame))
    }

    fn assign_inner(&self, frame: &mut dyn Frame, value: Option<Value>) -> Result<(), EvalError> {
        match self.kind() {
            ExprKind::Ref(inner) => inner.assign(frame, value),
            ExprKind::Name { id, .. } => {
                match id.scope() {
                    IdScope::Global => id.set_global_value(value),
                    IdScope::Local(offset) => frame.set_local(offset, value),
                }
                Ok(())
            }
            ExprKind::Field { base, offset, .. } => {
                let v = base.eval_node(frame)?;
                let rec = v.as_record().ok_or_else(|| type_mismatch("field assignment"))?;
                rec.set(*offset, value);
                Ok(())
            }
            ExprKind::Index {
                base,
                index,
                is_slice,
            } => {
                let v1 = base.eval_node(frame)?;
                let idx = index.eval_list(frame)?;
                assign_index(&v1, &idx, *is_slice, value)
            }
            ExprKind::List(targets) => {
                let Some(Value::List(values)) = value else {
                    return Err(type_mismatch("list assignment"));
                };
                if values.len() != targets.len() {
                    return Err(EvalError::new("mismatch in list lengths"));
                }
                for (target, v) in targets.iter().zip(values.iter()) {
                    target.assign(frame, Some(v.clone()))?;
                }
                Ok(())
            }
            _ => Err(EvalError::new(format!("{self} is not assignable"))),
        }
    }

    /// Whether `add` applies: an index into a set.
    pub fn can_add(&self) -> bool {
        match self.kind() {
            ExprKind::Ref(inner) => inner.can_add(),
            ExprKind::Index { base, .. } => base.ty().is_set(),
            _ => false,
        }
    }

    /// Whether `delete` applies: an index into a table or set, or a field
    /// that may be unset.
    pub fn can_del(&self) -> bool {
        match self.kind() {
            ExprKind::Ref(inner) => inner.can_del(),
            ExprKind::Index { base, .. } => base.ty().tag() == TypeTag::Table,
            ExprKind::Field { base, offset, .. } => base
                .ty()
                .as_record()
                .and_then(|rt| rt.field(*offset))
                .is_some_and(|f| f.is_optional() || f.has_default()),
            _ => false,
        }
    }

    /// `add s[x]`: insert the index into the set.
    pub fn add(&self, frame: &mut dyn Frame) -> Result<(), EvalError> {
        match self.kind() {
            ExprKind::Ref(inner) => inner.add(frame),
            ExprKind::Index { base, index, .. } if self.can_add() => {
                let v1 = base.eval_node(frame)?;
                let idx = index.eval_list(frame)?;
                let set = v1.as_table().ok_or_else(|| type_mismatch("add"))?;
                set.assign(idx, None)
                    .map_err(|err| self.annotate(err.into(), &*frame))
            }
            _ => Err(self.annotate(EvalError::new("illegal add statement"), &*frame)),
        }
    }

    /// `delete t[x]` removes the entry; `delete r$f` unsets the field.
    pub fn delete(&self, frame: &mut dyn Frame) -> Result<(), EvalError> {
        match self.kind() {
            ExprKind::Ref(inner) => inner.delete(frame),
            ExprKind::Index { base, index, .. } if self.can_del() => {
                let v1 = base.eval_node(frame)?;
                let idx = index.eval_list(frame)?;
                let table = v1.as_table().ok_or_else(|| type_mismatch("delete"))?;
                table
                    .remove(&idx)
                    .map(|_| ())
                    .map_err(|err| self.annotate(err.into(), &*frame))
            }
            ExprKind::Field { base, offset, .. } if self.can_del() => {
                let v = base.eval_node(frame)?;
                let rec = v.as_record().ok_or_else(|| type_mismatch("delete"))?;
                rec.set(*offset, None);
                Ok(())
            }
            _ => Err(self.annotate(EvalError::new("illegal delete statement"), &*frame)),
        }
    }
}

fn assign_index(
    aggregate: &Value,
    index: &[Value],
    is_slice: bool,
    value: Option<Value>,
) -> Result<(), EvalError> {
    match aggregate {
        Value::Vector(vec) if is_slice => {
            let [first, last] = index else {
                return Err(type_mismatch("slice bounds"));
            };
            let Some(Value::Vector(src)) = value else {
                return Err(type_mismatch("slice assignment"));
            };
            // Snapshot first: the source may alias the target.
            let slots = src.slots();
            let (first, last) = slice_bounds(first, last, vec.len())?;
            vec.remove_range(first, last);
            vec.insert_slots(first, slots)?;
            Ok(())
        }
        Value::Vector(vec) => {
            let [i] = index else {
                return Err(type_mismatch("vector index"));
            };
            let i = vector_slot(i)?;
            if value.is_none() {
                return Err(EvalError::new("assignment failed with null value"));
            }
            vec.assign(i, value)?;
            Ok(())
        }
        Value::Table(table) => {
            table.assign(index.to_vec(), value)?;
            Ok(())
        }
        Value::Str(_) => Err(EvalError::new(
            "assignment via string index accessor not allowed",
        )),
        _ => Err(EvalError::new("bad index expression type in assignment")),
    }
}

/// Slot addressed by a vector element assignment. Negative positions
/// address nothing.
fn vector_slot(index: &Value) -> Result<usize, EvalError> {
    let slot = if index.internal() == InternalTag::Unsigned {
        index.coerce_to_unsigned().and_then(|u| usize::try_from(u).ok())
    } else {
        index.coerce_to_int().and_then(|k| usize::try_from(k).ok())
    };
    slot.ok_or_else(|| no_such_index(&index.to_string()))
}
