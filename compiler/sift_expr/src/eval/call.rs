//! Calls, closures, events and timers.

use sift_values::{
    type_mismatch, CallOutcome, ClosureTemplate, EvalError, EvalResult, EventHandler, EventSink,
    Frame, IdScope, Value,
};

use crate::node::{Expr, ExprKind};

impl Expr {
    /// Invoke the callee. A result cached for this call site by an earlier,
    /// suspended pass is substituted without calling again.
    pub(super) fn eval_call(&self, func: &Expr, args: &Expr, frame: &mut dyn Frame) -> EvalResult {
        if let Some(cached) = frame.trigger().and_then(|t| t.lookup(self.id())) {
            tracing::trace!(site = ?self.id(), "provides cached function result");
            return Ok(cached.clone());
        }
        let callee = func.eval_node(frame)?;
        let f = callee
            .as_func()
            .ok_or_else(|| type_mismatch("call of non-function"))?
            .clone();
        let args = args.eval_list(frame)?;
        let callable = f.callable();

        frame.enter_call(callable.name(), self.span())?;
        let saved_site = frame.call_site();
        frame.set_call_site(Some(self.id()));
        let outcome = callable.call(args, frame);
        frame.set_call_site(saved_site);
        frame.exit_call();

        match outcome? {
            CallOutcome::Value(v) => Ok(v),
            CallOutcome::NoValue => Ok(Value::Void),
            CallOutcome::Suspended(token) => {
                tracing::trace!(site = ?token.site(), "call suspended");
                Err(EvalError::suspended(token))
            }
        }
    }
}

/// Instantiate a closure, capturing the current value of each outer
/// identifier it refers to.
pub(super) fn eval_lambda(template: &dyn ClosureTemplate, frame: &mut dyn Frame) -> EvalResult {
    let captures = template
        .outer_ids()
        .iter()
        .map(|id| {
            let value = match id.scope() {
                IdScope::Global => id.global_value(),
                IdScope::Local(offset) => frame.local(offset),
            };
            (id.clone(), value)
        })
        .collect();
    Ok(Value::Func(template.instantiate(captures)?))
}

fn event_sink(frame: &mut dyn Frame) -> Result<&mut dyn EventSink, EvalError> {
    if !frame.mode().allows_events() {
        return Err(EvalError::new("events cannot be raised in this evaluation mode"));
    }
    frame
        .event_sink()
        .ok_or_else(|| EvalError::new("no event queue available"))
}

pub(super) fn eval_event(handler: &EventHandler, args: &Expr, frame: &mut dyn Frame) -> EvalResult {
    let vals = args.eval_list(frame)?;
    tracing::debug!(event = handler.name(), "queueing event");
    event_sink(frame)?.queue_event(handler, vals);
    Ok(Value::Void)
}

/// Arm a timer for the event. Intervals are relative to network time.
pub(super) fn eval_schedule(when: &Expr, event: &Expr, frame: &mut dyn Frame) -> EvalResult {
    let t = when.eval_node(frame)?;
    let ExprKind::Event { handler, args } = event.kind() else {
        return Err(type_mismatch("schedule of non-event"));
    };
    let vals = args.eval_list(frame)?;
    let sink = event_sink(frame)?;
    let at = match t {
        Value::Time(t) => t,
        Value::Interval(dt) => sink.network_time() + dt,
        _ => return Err(type_mismatch("schedule time")),
    };
    tracing::debug!(event = handler.name(), at, "scheduling event");
    sink.schedule(at, handler, vals);
    Ok(Value::Void)
}
