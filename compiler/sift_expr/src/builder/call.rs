//! Calls, closures, event invocation and scheduling.

use std::sync::Arc;

use sift_diagnostic::ErrorCode;
use sift_ir::{ExprTag, Span};
use sift_values::{ClosureTemplate, FuncFlavor, Type, TypeTag};

use super::{operands_ok, reject, ExprBuilder, Rejection};
use crate::check;
use crate::node::{Expr, ExprKind};

impl ExprBuilder {
    /// `func(args)`. `in_hook` is set when the call is the operand of the
    /// hook operator, the only place a hook may be invoked.
    pub fn call(&mut self, func: Expr, mut args: Expr, in_hook: bool, span: Span) -> Expr {
        let typed = operands_ok(&[&func, &args]).and_then(|()| {
            let Some(ft) = func.ty().as_func().cloned() else {
                return Err(reject(ErrorCode::E2011, "not a function"));
            };
            if ft.flavor == FuncFlavor::Hook && !in_hook {
                return Err(reject(
                    ErrorCode::E2011,
                    "hook cannot be called directly, use hook operator",
                ));
            }
            check::promote_args(self, &mut args, &ft.params).map_err(|r| match r {
                Rejection::Silent => Rejection::Silent,
                Rejection::Report { .. } => reject(
                    ErrorCode::E2011,
                    "argument type mismatch in function call",
                ),
            })?;
            match (ft.yield_type, ft.flavor) {
                (Some(y), _) => Ok(y),
                (None, FuncFlavor::Function) => {
                    Err(reject(ErrorCode::E2011, "function has no yield type"))
                }
                (None, FuncFlavor::Event) => Err(reject(
                    ErrorCode::E2011,
                    "event called in expression, use event statement instead",
                )),
                (None, FuncFlavor::Hook) => Err(reject(ErrorCode::E2011, "hook has no yield type")),
            }
        });
        let kind = ExprKind::Call {
            func: Box::new(func),
            args: Box::new(args),
        };
        self.seal(kind, span, typed)
    }

    /// Anonymous function; evaluating it captures the outer identifiers.
    pub fn lambda(&mut self, template: Arc<dyn ClosureTemplate>, span: Span) -> Expr {
        let ty = template.ty();
        Expr::new(ExprKind::Lambda(template), ty, span)
    }

    /// `event name(args)`. Unknown handlers are registered on first use.
    pub fn event(&mut self, name: &str, mut args: Expr, span: Span) -> Expr {
        let handler = self.events.lookup_or_register(name);
        handler.mark_used();
        let typed = operands_ok(&[&args]).and_then(|()| {
            let Some(ty) = handler.ty() else {
                return Err(reject(ErrorCode::E2012, format!("not an event: {name}")));
            };
            let Some(ft) = ty.as_func() else {
                return Err(reject(ErrorCode::E2012, format!("not an event: {name}")));
            };
            check::promote_args(self, &mut args, &ft.params).map_err(|r| match r {
                Rejection::Silent => Rejection::Silent,
                Rejection::Report { .. } => reject(
                    ErrorCode::E2012,
                    "argument type mismatch in event invocation",
                ),
            })?;
            if ft.yield_type.is_some() {
                return Err(reject(ErrorCode::E2012, "function invoked as an event"));
            }
            Ok(Type::base(TypeTag::Void))
        });
        let kind = ExprKind::Event {
            handler,
            args: Box::new(args),
        };
        self.seal(kind, span, typed)
    }

    /// `schedule when { event }`.
    pub fn schedule(&mut self, when: Expr, event: Expr, span: Span) -> Expr {
        let typed = operands_ok(&[&when, &event]).and_then(|()| {
            if event.tag() != ExprTag::Event {
                return Err(reject(ErrorCode::E2015, "schedule requires an event"));
            }
            if matches!(when.ty().tag(), TypeTag::Time | TypeTag::Interval) {
                Ok(Type::base(TypeTag::Timer))
            } else {
                Err(reject(
                    ErrorCode::E2015,
                    "schedule expression requires a time or time interval",
                ))
            }
        });
        let kind = ExprKind::Schedule {
            when: Box::new(when),
            event: Box::new(event),
        };
        self.seal(kind, span, typed)
    }
}
