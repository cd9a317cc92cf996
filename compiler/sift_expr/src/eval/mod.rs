//! Tree-walking evaluation.
//!
//! `eval` never mutates the tree. Arithmetic, comparison and logical nodes
//! with a vector result broadcast element-wise, with absent elements staying
//! absent; the short-circuit connectives and the conditional evaluate only
//! what their scalar semantics require.

mod aggregate;
mod call;
mod index;

use sift_ir::{BinaryOp, UnaryOp};
use sift_values::{
    can_cast, count_underflow, field_value_missing, invalid_cast, type_mismatch, value_not_set,
    vector_size_mismatch, EvalError, EvalResult, Frame, Id, IdScope, InternalTag, Type, TypeTag,
    Value, VectorVal,
};

use crate::fold::numeric::{make_numeric, Num};
use crate::fold::{fold_binary, fold_in, fold_unary};
use crate::node::{Expr, ExprKind};
use crate::stack::ensure_sufficient_stack;

pub(crate) use index::slice_bounds;

impl Expr {
    /// Evaluate this expression in `frame`.
    ///
    /// Errors carry the span and description of the innermost failing node
    /// and the call stack at the time of failure. Suspension signals from a
    /// callee pass through unchanged.
    #[tracing::instrument(level = "trace", skip_all, fields(expr = self.tag().name()))]
    pub fn eval(&self, frame: &mut dyn Frame) -> EvalResult {
        self.eval_node(frame)
    }

    pub(crate) fn eval_node(&self, frame: &mut dyn Frame) -> EvalResult {
        let result = ensure_sufficient_stack(|| self.eval_kind(frame));
        result.map_err(|err| self.annotate(err, &*frame))
    }

    pub(crate) fn annotate(&self, err: EvalError, frame: &dyn Frame) -> EvalError {
        if err.is_suspension() || err.span.is_some() {
            return err;
        }
        let err = if err.backtrace.is_none() {
            err.with_backtrace(frame.backtrace())
        } else {
            err
        };
        err.with_span(self.span()).with_expr(self.to_string())
    }

    /// Evaluate the elements of a list expression.
    pub(crate) fn eval_list(&self, frame: &mut dyn Frame) -> Result<Vec<Value>, EvalError> {
        match self.kind() {
            ExprKind::List(exprs) => exprs.iter().map(|e| e.eval_node(frame)).collect(),
            _ => Ok(vec![self.eval_node(frame)?]),
        }
    }

    fn eval_kind(&self, frame: &mut dyn Frame) -> EvalResult {
        if self.is_error() {
            return Err(EvalError::new("expression has a type error"));
        }
        match self.kind() {
            ExprKind::Name { id, .. } => eval_name(id, frame),
            ExprKind::Const(v) => Ok(v.clone()),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, frame),
            ExprKind::Incr { decrement, operand } => self.eval_incr(*decrement, operand, frame),
            ExprKind::Binary { op, lhs, rhs } => match op {
                BinaryOp::AndAnd | BinaryOp::OrOr => self.eval_connective(*op, lhs, rhs, frame),
                BinaryOp::AddTo | BinaryOp::RemoveFrom => {
                    self.eval_compound(*op, lhs, rhs, frame)
                }
                BinaryOp::In => eval_in(lhs, rhs, frame),
                _ => {
                    let v1 = lhs.eval_node(frame)?;
                    let v2 = rhs.eval_node(frame)?;
                    self.fold_pair(*op, &v1, &v2)
                }
            },
            ExprKind::Cond {
                cond,
                then_branch,
                else_branch,
            } => self.eval_cond(cond, then_branch, else_branch, frame),
            ExprKind::Ref(inner) => inner.eval_node(frame),
            ExprKind::Assign {
                target,
                value,
                is_init,
                slice,
            } => {
                if *is_init {
                    return Err(EvalError::new("illegal assignment in initialization"));
                }
                let v = value.eval_node(frame)?;
                target.assign(frame, Some(v.clone()))?;
                Ok(if *slice { Value::Void } else { v })
            }
            ExprKind::Index {
                base,
                index,
                is_slice,
            } => self.eval_index(base, index, *is_slice, frame),
            ExprKind::Field { base, offset, name } => {
                let v = base.eval_node(frame)?;
                let rec = v.as_record().ok_or_else(|| type_mismatch("field access"))?;
                rec.get_or_default(*offset)?
                    .ok_or_else(|| field_value_missing(name))
            }
            ExprKind::HasField { base, offset, .. } => {
                let v = base.eval_node(frame)?;
                let rec = v.as_record().ok_or_else(|| type_mismatch("field test"))?;
                Ok(Value::Bool(rec.get(*offset).is_some()))
            }
            ExprKind::RecordConstructor(list) => self.eval_record_constructor(list, frame),
            ExprKind::TableConstructor(list) => self.eval_table_constructor(list, frame),
            ExprKind::SetConstructor(list) => self.eval_set_constructor(list, frame),
            ExprKind::VectorConstructor(list) => self.eval_vector_constructor(list, frame),
            ExprKind::FieldAssign { value, .. } => value.eval_node(frame),
            ExprKind::List(_) => Ok(Value::list(self.eval_list(frame)?)),
            ExprKind::Call { func, args } => self.eval_call(func, args, frame),
            ExprKind::Lambda(template) => call::eval_lambda(template.as_ref(), frame),
            ExprKind::Event { handler, args } => call::eval_event(handler, args, frame),
            ExprKind::Schedule { when, event } => call::eval_schedule(when, event, frame),
            ExprKind::Coerce { kind, operand } => self.eval_coerce(*kind, operand, frame),
            ExprKind::RecordCoerce { operand, map } => {
                let v = operand.eval_node(frame)?;
                aggregate::coerce_record(&v, self.ty(), map)
            }
            ExprKind::Flatten(operand) => aggregate::eval_flatten(operand, frame),
            ExprKind::Cast(operand) => {
                let v = operand.eval_node(frame)?;
                let from = v.ty();
                if self.ty().tag() == TypeTag::Any || can_cast(&from, self.ty()) {
                    Ok(v)
                } else {
                    Err(invalid_cast(&from.to_string(), &self.ty().to_string()))
                }
            }
            ExprKind::Is { operand, target } => {
                let v = operand.eval_node(frame)?;
                Ok(Value::Bool(can_cast(&v.ty(), target)))
            }
            ExprKind::Default(default) => default.eval_default(),
        }
    }

    fn eval_unary(&self, op: UnaryOp, operand: &Expr, frame: &mut dyn Frame) -> EvalResult {
        let v = operand.eval_node(frame)?;
        match &v {
            Value::Vector(vec) if op != UnaryOp::Clone && self.is_vector() => {
                let elem = self.base_type();
                let slots = vec
                    .slots()
                    .into_iter()
                    .map(|slot| slot.map(|x| fold_unary(op, elem, &x)).transpose())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Vector(VectorVal::from_slots(self.ty().clone(), slots)))
            }
            _ => fold_unary(op, self.ty(), &v),
        }
    }

    /// `++x` / `--x`: update the target, yield the new value. Vectors are
    /// stepped element by element in place.
    fn eval_incr(&self, decrement: bool, operand: &Expr, frame: &mut dyn Frame) -> EvalResult {
        let v = operand.eval_node(frame)?;
        let elem = self.base_type();
        if let Value::Vector(vec) = &v {
            for i in 0..vec.len() {
                let stepped = vec.get(i).map(|x| step(decrement, elem, &x)).transpose()?;
                vec.assign(i, stepped)?;
            }
            operand.assign(frame, Some(v.clone()))?;
            return Ok(v);
        }
        let stepped = step(decrement, elem, &v)?;
        operand.assign(frame, Some(stepped.clone()))?;
        Ok(stepped)
    }

    /// `&&` / `||`. A scalar left operand short-circuits; with a vector
    /// operand on either side the result is a vector.
    fn eval_connective(
        &self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        frame: &mut dyn Frame,
    ) -> EvalResult {
        let is_and = op == BinaryOp::AndAnd;
        let v1 = lhs.eval_node(frame)?;
        match (lhs.is_vector(), rhs.is_vector()) {
            (false, false) => {
                if v1.is_zero() == is_and {
                    return Ok(Value::Bool(!is_and));
                }
                let v2 = rhs.eval_node(frame)?;
                Ok(Value::Bool(!v2.is_zero()))
            }
            (true, true) => {
                let v2 = rhs.eval_node(frame)?;
                let (Some(a), Some(b)) = (v1.as_vector(), v2.as_vector()) else {
                    return Err(type_mismatch("vector connective"));
                };
                if a.len() != b.len() {
                    return Err(vector_size_mismatch());
                }
                let slots = a
                    .slots()
                    .into_iter()
                    .zip(b.slots())
                    .map(|pair| match pair {
                        (Some(x), Some(y)) => Some(Value::Bool(if is_and {
                            !x.is_zero() && !y.is_zero()
                        } else {
                            !x.is_zero() || !y.is_zero()
                        })),
                        _ => None,
                    })
                    .collect();
                Ok(Value::Vector(VectorVal::from_slots(self.ty().clone(), slots)))
            }
            (vector_lhs, _) => {
                let (scalar, vector) = if vector_lhs {
                    (rhs.eval_node(frame)?, v1)
                } else {
                    let v2 = rhs.eval_node(frame)?;
                    (v1, v2)
                };
                let Some(vec) = vector.as_vector() else {
                    return Err(type_mismatch("vector connective"));
                };
                if scalar.is_zero() == is_and {
                    let slots = vec![Some(Value::Bool(!is_and)); vec.len()];
                    Ok(Value::Vector(VectorVal::from_slots(self.ty().clone(), slots)))
                } else {
                    Ok(vector)
                }
            }
        }
    }

    /// `+=` and `-=`. A vector target gets the value appended.
    fn eval_compound(
        &self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        frame: &mut dyn Frame,
    ) -> EvalResult {
        let v1 = lhs.eval_node(frame)?;
        let v2 = rhs.eval_node(frame)?;
        if op == BinaryOp::AddTo {
            if let Value::Vector(vec) = &v1 {
                vec.push(Some(v2))
                    .map_err(|_| EvalError::new("type-checking failed in vector append"))?;
                return Ok(v1);
            }
        }
        let result = self.fold_pair(op, &v1, &v2)?;
        lhs.assign(frame, Some(result.clone()))?;
        Ok(result)
    }

    /// Apply a binary fold, broadcasting over vector operands.
    fn fold_pair(&self, op: BinaryOp, v1: &Value, v2: &Value) -> EvalResult {
        let elem = self.base_type();
        if !self.is_vector() {
            return fold_binary(op, elem, v1, v2);
        }
        let slots = match (v1, v2) {
            (Value::Vector(a), Value::Vector(b)) => {
                if a.len() != b.len() {
                    return Err(vector_size_mismatch());
                }
                a.slots()
                    .into_iter()
                    .zip(b.slots())
                    .map(|pair| match pair {
                        (Some(x), Some(y)) => fold_binary(op, elem, &x, &y).map(Some),
                        _ => Ok(None),
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            (Value::Vector(a), scalar) => a
                .slots()
                .into_iter()
                .map(|slot| slot.map(|x| fold_binary(op, elem, &x, scalar)).transpose())
                .collect::<Result<Vec<_>, _>>()?,
            (scalar, Value::Vector(b)) => b
                .slots()
                .into_iter()
                .map(|slot| slot.map(|y| fold_binary(op, elem, scalar, &y)).transpose())
                .collect::<Result<Vec<_>, _>>()?,
            _ => return fold_binary(op, elem, v1, v2),
        };
        Ok(Value::Vector(VectorVal::from_slots(self.ty().clone(), slots)))
    }

    /// Scalar conditions evaluate one branch; a vector condition selects
    /// element-wise between two equally sized vectors.
    fn eval_cond(
        &self,
        cond: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
        frame: &mut dyn Frame,
    ) -> EvalResult {
        let c = cond.eval_node(frame)?;
        let Value::Vector(mask) = &c else {
            return if c.is_zero() {
                else_branch.eval_node(frame)
            } else {
                then_branch.eval_node(frame)
            };
        };
        let v2 = then_branch.eval_node(frame)?;
        let v3 = else_branch.eval_node(frame)?;
        let (Some(a), Some(b)) = (v2.as_vector(), v3.as_vector()) else {
            return Err(type_mismatch("vector conditional"));
        };
        if mask.len() != a.len() || a.len() != b.len() {
            return Err(EvalError::new(
                "vectors in conditional expression have different sizes",
            ));
        }
        let slots = mask
            .slots()
            .into_iter()
            .enumerate()
            .map(|(i, m)| match m {
                Some(m) if !m.is_zero() => a.get(i),
                Some(_) => b.get(i),
                None => None,
            })
            .collect();
        Ok(Value::Vector(VectorVal::from_slots(self.ty().clone(), slots)))
    }
}

fn eval_name(id: &Id, frame: &mut dyn Frame) -> EvalResult {
    if id.is_type() {
        return Ok(Value::Type(id.ty().clone()));
    }
    let value = match id.scope() {
        IdScope::Global => id.global_value(),
        IdScope::Local(offset) => frame.local(offset),
    };
    value.ok_or_else(|| value_not_set(id.name()))
}

fn eval_in(lhs: &Expr, rhs: &Expr, frame: &mut dyn Frame) -> EvalResult {
    let v1 = lhs.eval_node(frame)?;
    let v2 = rhs.eval_node(frame)?;
    match &v1 {
        Value::Record(rec) => {
            let mut fields = Vec::with_capacity(rec.num_fields());
            for i in 0..rec.num_fields() {
                fields.push(rec.get_or_default(i)?.unwrap_or(Value::Void));
            }
            fold_in(&Value::list(fields), &v2)
        }
        _ => fold_in(&v1, &v2),
    }
}

/// One `++`/`--` step, in the representation of `ty`.
fn step(decrement: bool, ty: &Type, v: &Value) -> EvalResult {
    if v.internal() == InternalTag::Unsigned {
        let u = v
            .coerce_to_unsigned()
            .ok_or_else(|| type_mismatch("increment"))?;
        let u = if decrement {
            u.checked_sub(1).ok_or_else(count_underflow)?
        } else {
            u.wrapping_add(1)
        };
        return Ok(make_numeric(ty.tag(), Num::Unsigned(u)));
    }
    let k = v.coerce_to_int().ok_or_else(|| type_mismatch("increment"))?;
    let k = if decrement {
        k.wrapping_sub(1)
    } else {
        k.wrapping_add(1)
    };
    Ok(make_numeric(ty.tag(), Num::Int(k)))
}
