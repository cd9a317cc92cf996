//! Assignment and l-value formation.

use sift_diagnostic::ErrorCode;
use sift_ir::{ExprTag, Span};
use sift_values::{is_arithmetic, same_attrs, same_type, Type, TypeTag};

use super::{operands_ok, reject, ExprBuilder, Rejection};
use crate::node::{Expr, ExprKind};

fn is_assignable(ty: &Type) -> bool {
    !matches!(ty.tag(), TypeTag::Void | TypeTag::Timer)
}

impl ExprBuilder {
    /// Wrap `e` in a reference node marking it as an assignment target.
    pub fn make_ref(&mut self, e: Expr) -> Expr {
        let span = e.span();
        let typed = operands_ok(&[&e]).and_then(|()| {
            if is_assignable(e.ty()) {
                Ok(e.ty().clone())
            } else {
                Err(reject(ErrorCode::E2006, "illegal assignment target"))
            }
        });
        self.seal(ExprKind::Ref(Box::new(e)), span, typed)
    }

    /// Turn `e` into something that can be assigned to.
    ///
    /// Names, index and field expressions, and lists of names are wrapped in
    /// a reference node. Anything else is reported and comes back in error.
    pub fn make_lvalue(&mut self, mut e: Expr) -> Expr {
        if e.is_error() {
            return e;
        }
        let (rejection, wrap) = match e.kind() {
            ExprKind::Ref(_) => return e,
            ExprKind::Name { id, in_const_init } => {
                let rejection = if id.is_type() {
                    Some(reject(ErrorCode::E2006, "type name is not an lvalue"))
                } else if id.is_const() && !in_const_init {
                    Some(reject(ErrorCode::E2006, "const is not a modifiable lvalue"))
                } else if id.is_option() && !in_const_init {
                    Some(reject(ErrorCode::E2006, "option is not a modifiable lvalue"))
                } else {
                    None
                };
                (rejection, true)
            }
            ExprKind::Index { base, .. } => {
                let rejection = (base.ty().tag() == TypeTag::String).then(|| {
                    reject(ErrorCode::E2006, "cannot assign to string index expression")
                });
                (rejection, true)
            }
            ExprKind::Field { .. } => (None, true),
            ExprKind::List(exprs) => {
                let rejection = exprs
                    .iter()
                    .any(|x| x.tag() != ExprTag::Name)
                    .then(|| reject(ErrorCode::E2006, "can only assign to list of identifiers"));
                (rejection, true)
            }
            _ => (Some(reject(ErrorCode::E2006, "can't be assigned to")), false),
        };
        if let Some(rejection) = rejection {
            self.fail(&mut e, rejection);
        }
        if !wrap {
            return e;
        }
        self.make_ref(e)
    }

    /// `target = value`. Initializations skip the l-value conversion and the
    /// type check.
    pub fn assign(&mut self, target: Expr, value: Expr, is_init: bool, span: Span) -> Expr {
        self.assign_expr(target, value, is_init, false, span)
    }

    /// `v[a:b] = w`. Yields no value.
    pub fn index_slice_assign(&mut self, target: Expr, value: Expr, is_init: bool, span: Span) -> Expr {
        self.assign_expr(target, value, is_init, true, span)
    }

    fn assign_expr(&mut self, target: Expr, mut value: Expr, is_init: bool, slice: bool, span: Span) -> Expr {
        let target = if is_init { target } else { self.make_lvalue(target) };
        let typed = operands_ok(&[&target, &value]).and_then(|()| {
            if !is_init {
                self.type_assignment(&target, &mut value, span)?;
            }
            if slice {
                Ok(Type::base(TypeTag::Void))
            } else {
                Ok(target.ty().clone())
            }
        });
        let kind = ExprKind::Assign {
            target: Box::new(target),
            value: Box::new(value),
            is_init,
            slice,
        };
        self.seal(kind, span, typed)
    }

    /// Check `value` against the target's type, converting it where the
    /// language allows.
    fn type_assignment(&mut self, target: &Expr, value: &mut Expr, span: Span) -> Result<(), Rejection> {
        let t1 = target.ty().clone();
        let (bt1, bt2) = (t1.tag(), value.ty().tag());

        if bt1 == TypeTag::List && bt2 == TypeTag::Any {
            return Ok(());
        }
        if (bt1 == TypeTag::Enum) != (bt2 == TypeTag::Enum) {
            return Err(reject(
                ErrorCode::E2007,
                "can't convert to/from enumerated type",
            ));
        }
        if is_arithmetic(bt1) {
            return self.type_arithmetic_assignment(bt1, value, span);
        }
        if bt1 == TypeTag::Time && is_arithmetic(bt2) && value.is_zero() {
            value.replace_with(|v| self.arith_coerce(v, TypeTag::Time));
            return Ok(());
        }
        if bt1 == TypeTag::Table && bt2 == TypeTag::Table && value.ty().is_unspecified_table() {
            value.replace_with(|v| self.table_coerce(v, t1.clone()));
            return Ok(());
        }
        if bt1 == TypeTag::Table && value.tag() == ExprTag::List {
            let vspan = value.span();
            if t1.is_set() {
                value.replace_with(|v| self.set_constructor(v, Some(t1.clone()), vspan));
            } else {
                value.replace_with(|v| self.table_constructor(v, Some(t1.clone()), vspan));
            }
            return if value.is_error() {
                Err(Rejection::Silent)
            } else {
                Ok(())
            };
        }
        if bt1 == TypeTag::Vector {
            if bt2 == TypeTag::Vector && value.ty().is_unspecified_vector() {
                value.replace_with(|v| self.vector_coerce(v, t1.clone()));
                return Ok(());
            }
            if value.tag() == ExprTag::List {
                let vspan = value.span();
                value.replace_with(|v| self.vector_constructor(v, Some(t1.clone()), vspan));
                return if value.is_error() {
                    Err(Rejection::Silent)
                } else {
                    Ok(())
                };
            }
        }
        if let (Some(r1), Some(r2)) = (t1.as_record(), value.ty().as_record()) {
            if same_type(&t1, value.ty()) && same_attrs(r1, r2) {
                return Ok(());
            }
            value.replace_with(|v| self.record_coerce(v, t1.clone()));
            return if value.is_error() {
                Err(Rejection::Silent)
            } else {
                Ok(())
            };
        }
        if !same_type(&t1, value.ty()) {
            if t1.is_set() && value.tag() == ExprTag::SetConstructor {
                let vspan = value.span();
                value.replace_with(|v| match v.into_kind() {
                    ExprKind::SetConstructor(list) => {
                        self.set_constructor(*list, Some(t1.clone()), vspan)
                    }
                    other => Expr::new(other, Type::error(), vspan),
                });
                return if value.is_error() {
                    Err(reject(ErrorCode::E2001, "type clash in assignment"))
                } else {
                    Ok(())
                };
            }
            return Err(reject(
                ErrorCode::E2001,
                format!("type clash in assignment ({} = {})", t1, value.ty()),
            ));
        }
        Ok(())
    }

    fn type_arithmetic_assignment(
        &mut self,
        bt1: TypeTag,
        value: &mut Expr,
        span: Span,
    ) -> Result<(), Rejection> {
        let bt2 = value.ty().tag();
        if !is_arithmetic(bt2) {
            return Err(reject(
                ErrorCode::E2002,
                format!("assignment of non-arithmetic value to arithmetic ({bt1}/{bt2})"),
            ));
        }
        if bt1 == TypeTag::Double {
            self.coerce_operand(value, bt1);
            return Ok(());
        }
        if bt2 == TypeTag::Double {
            self.warn(span, ErrorCode::W2001, "dangerous assignment of double to integral");
            self.coerce_operand(value, bt1);
            return Ok(());
        }
        if bt1 == TypeTag::Int {
            self.coerce_operand(value, bt1);
            return Ok(());
        }
        if bt2 == TypeTag::Int {
            self.warn(span, ErrorCode::W2001, "dangerous assignment of integer to count");
            self.coerce_operand(value, bt1);
        }
        Ok(())
    }

    /// Pick the assignment form for `target = value`: record initializer
    /// lists, vector slices and plain assignment.
    pub fn get_assign_expr(&mut self, target: Expr, value: Expr, is_init: bool, span: Span) -> Expr {
        if target.ty().tag() == TypeTag::Record && value.ty().tag() == TypeTag::List {
            return self.record_assign(target, value, is_init, span);
        }
        if matches!(target.kind(), ExprKind::Index { is_slice: true, .. }) {
            return self.index_slice_assign(target, value, is_init, span);
        }
        self.assign(target, value, is_init, span)
    }

    /// `r = [$a = x, ...]` or `r = other_record, ...`: one field assignment
    /// per initializer, as a list.
    pub fn record_assign(&mut self, record: Expr, inits: Expr, is_init: bool, span: Span) -> Expr {
        if record.is_error() || inits.is_error() {
            let kind = ExprKind::List(vec![record, inits]);
            return self.seal(kind, span, Err(Rejection::Silent));
        }
        let Some(rt) = record.ty().as_record().cloned() else {
            let kind = ExprKind::List(vec![record, inits]);
            return self.seal(kind, span, Err(reject(ErrorCode::E2008, "not a record")));
        };
        let mut assigns = Vec::new();
        let mut rejection = None;
        for init in inits.into_kind_list() {
            let init_span = init.span();
            if let Some(init_rt) = init.ty().as_record().cloned() {
                for field in init_rt.fields() {
                    let matches = rt
                        .field_offset(&field.name)
                        .and_then(|o| rt.field(o))
                        .is_some_and(|f| same_type(&f.ty, &field.ty));
                    if matches {
                        let lhs = self.field(record.duplicate(), &field.name, init_span);
                        let rhs = self.field(init.duplicate(), &field.name, init_span);
                        assigns.push(self.assign(lhs, rhs, is_init, init_span));
                    }
                }
                continue;
            }
            match init.into_kind() {
                ExprKind::FieldAssign { name, value } => {
                    if rt.field_offset(&name).is_some() {
                        let lhs = self.field(record.duplicate(), &name, init_span);
                        assigns.push(self.assign(lhs, *value, is_init, init_span));
                    } else {
                        rejection.get_or_insert_with(|| {
                            reject(ErrorCode::E2008, format!("no such field '{name}'"))
                        });
                    }
                }
                _ => {
                    rejection.get_or_insert_with(|| {
                        reject(ErrorCode::E2008, "bad record initializer")
                    });
                }
            }
        }
        let typed = match rejection {
            Some(r) => Err(r),
            None if assigns.iter().any(Expr::is_error) => Err(Rejection::Silent),
            None => Ok(Type::list(assigns.iter().map(|a| a.ty().clone()).collect())),
        };
        self.seal(ExprKind::List(assigns), span, typed)
    }
}

impl Expr {
    /// Elements of a list expression, or the expression itself.
    fn into_kind_list(self) -> Vec<Expr> {
        if self.tag() == ExprTag::List {
            match self.into_kind() {
                ExprKind::List(exprs) => exprs,
                _ => Vec::new(),
            }
        } else {
            vec![self]
        }
    }
}
