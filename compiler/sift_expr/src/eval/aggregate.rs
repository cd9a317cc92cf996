//! Constructors, conversions and `flatten`.

use sift_values::{
    field_value_missing, is_arithmetic, same_type, type_mismatch, EvalError, EvalResult, Frame,
    RecordVal, TableVal, Type, TypeTag, Value, VectorVal,
};

use crate::fold::numeric;
use crate::node::{CoerceKind, Expr, ExprKind};

impl Expr {
    pub(super) fn eval_record_constructor(&self, list: &Expr, frame: &mut dyn Frame) -> EvalResult {
        let rec = RecordVal::with_defaults(self.ty().clone())?;
        let rt = rec.record_type().clone();
        for item in list.list_exprs().unwrap_or_default() {
            let ExprKind::FieldAssign { name, value } = item.kind() else {
                return Err(type_mismatch("record constructor"));
            };
            let offset = rt
                .field_offset(name)
                .ok_or_else(|| field_value_missing(name))?;
            rec.set(offset, Some(value.eval_node(frame)?));
        }
        Ok(Value::Record(rec))
    }

    pub(super) fn eval_table_constructor(&self, list: &Expr, frame: &mut dyn Frame) -> EvalResult {
        let table = TableVal::new(self.ty().clone());
        for item in list.list_exprs().unwrap_or_default() {
            let ExprKind::Assign { target, value, .. } = item.kind() else {
                return Err(type_mismatch("table constructor"));
            };
            let index = target.eval_list(frame)?;
            let v = value.eval_node(frame)?;
            table.assign(index, Some(v))?;
        }
        Ok(Value::Table(table))
    }

    pub(super) fn eval_set_constructor(&self, list: &Expr, frame: &mut dyn Frame) -> EvalResult {
        let set = TableVal::new(self.ty().clone());
        for item in list.list_exprs().unwrap_or_default() {
            let index = match item.kind() {
                ExprKind::List(_) => item.eval_list(frame)?,
                _ => vec![item.eval_node(frame)?],
            };
            set.assign(index, None)?;
        }
        Ok(Value::Table(set))
    }

    pub(super) fn eval_vector_constructor(&self, list: &Expr, frame: &mut dyn Frame) -> EvalResult {
        let vec = VectorVal::new(self.ty().clone());
        for (i, item) in list.list_exprs().unwrap_or_default().iter().enumerate() {
            let v = item.eval_node(frame)?;
            vec.assign(i, Some(v))
                .map_err(|_| EvalError::new(format!("type mismatch at index {i}")))?;
        }
        Ok(Value::Vector(vec))
    }

    pub(super) fn eval_coerce(
        &self,
        kind: CoerceKind,
        operand: &Expr,
        frame: &mut dyn Frame,
    ) -> EvalResult {
        let v = operand.eval_node(frame)?;
        match kind {
            CoerceKind::Arith => {
                let target = self.base_tag();
                match &v {
                    Value::Vector(vec) => {
                        let slots = vec
                            .slots()
                            .into_iter()
                            .map(|slot| slot.map(|x| numeric::coerce(target, &x)).transpose())
                            .collect::<Result<Vec<_>, _>>()?;
                        Ok(Value::Vector(VectorVal::from_slots(self.ty().clone(), slots)))
                    }
                    _ => numeric::coerce(target, &v),
                }
            }
            CoerceKind::Table => match &v {
                Value::Table(t) if !t.is_empty() => {
                    Err(EvalError::new("coercion of non-empty table/set"))
                }
                _ => Ok(Value::Table(TableVal::new(self.ty().clone()))),
            },
            CoerceKind::Vector => match &v {
                Value::Vector(vec) if !vec.is_empty() => {
                    Err(EvalError::new("coercion of non-empty vector"))
                }
                _ => Ok(Value::Vector(VectorVal::new(self.ty().clone()))),
            },
        }
    }
}

/// Build a record of type `ty` from `v`, copying field `map[i]` of the
/// source into field `i`. Unmapped fields take their default or stay unset.
pub(super) fn coerce_record(v: &Value, ty: &Type, map: &[Option<usize>]) -> EvalResult {
    let source = v.as_record().ok_or_else(|| type_mismatch("record coercion"))?;
    let target = RecordVal::new(ty.clone())?;
    let rt = target.record_type().clone();
    for (i, (field, mapped)) in rt.fields().iter().zip(map).enumerate() {
        let value = match mapped {
            Some(src) => source
                .get_or_default(*src)?
                .map(|x| convert_field(x, &field.ty))
                .transpose()?,
            None => field
                .default
                .as_ref()
                .map(|d| d.eval_default())
                .transpose()?,
        };
        target.set(i, value);
    }
    Ok(Value::Record(target))
}

/// Bring one field value to the declared field type.
fn convert_field(v: Value, ty: &Type) -> EvalResult {
    if let Value::Record(rec) = &v {
        if ty.tag() == TypeTag::Record && !same_type(rec.ty(), ty) {
            let map = name_map(rec, ty);
            return coerce_record(&v, ty, &map);
        }
    }
    if is_arithmetic(ty.tag()) && v.tag() != ty.tag() {
        return numeric::coerce(ty.tag(), &v);
    }
    Ok(v)
}

/// Field correspondence for nested records, matched by name.
fn name_map(source: &RecordVal, ty: &Type) -> Vec<Option<usize>> {
    let src = source.record_type();
    ty.as_record()
        .map(|rt| {
            rt.fields()
                .iter()
                .map(|f| src.field_offset(&f.name))
                .collect()
        })
        .unwrap_or_default()
}

pub(super) fn eval_flatten(operand: &Expr, frame: &mut dyn Frame) -> EvalResult {
    let v = operand.eval_node(frame)?;
    let rec = v.as_record().ok_or_else(|| type_mismatch("flatten"))?;
    let rt = rec.record_type().clone();
    let mut fields = Vec::with_capacity(rt.num_fields());
    for (i, field) in rt.fields().iter().enumerate() {
        let value = rec
            .get_or_default(i)?
            .ok_or_else(|| field_value_missing(&field.name))?;
        fields.push(value);
    }
    Ok(Value::list(fields))
}
