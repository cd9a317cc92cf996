use super::*;
use crate::types::{Type, TypeTag};
use crate::value::Value;
use sift_ir::{ExprId, Span};

#[test]
fn global_ids_hold_values() {
    let id = Id::new_global("x", Type::base(TypeTag::Count), IdFlags::empty());
    assert!(id.is_global());
    assert_eq!(id.global_value(), None);
    id.set_global_value(Some(Value::Count(3)));
    assert_eq!(id.global_value(), Some(Value::Count(3)));
    let alias = id.clone();
    assert!(alias.ptr_eq(&id));
}

#[test]
fn local_ids_report_offsets() {
    let id = Id::new_local("y", Type::base(TypeTag::Int), 2, IdFlags::CONST);
    assert_eq!(id.scope(), IdScope::Local(2));
    assert!(id.is_const());
    assert!(!id.is_option());
    assert!(!id.is_global());
}

#[test]
fn trigger_cache_keys_by_site() {
    let site = ExprId::fresh();
    let other = ExprId::fresh();
    let mut cache = TriggerCache::new();
    assert!(cache.is_empty());
    cache.cache(SuspendToken::new(site), Value::Bool(true));
    assert_eq!(cache.lookup(site), Some(&Value::Bool(true)));
    assert_eq!(cache.lookup(other), None);
    assert_eq!(cache.len(), 1);
}

#[test]
fn call_stack_enforces_depth() {
    let mut stack = CallStack::new(Some(2));
    let frame = |name: &str| CallFrame {
        name: name.into(),
        call_span: Some(Span::new(0, 1)),
    };
    assert!(stack.push(frame("f")).is_ok());
    assert!(stack.push(frame("g")).is_ok());
    let err = stack.push(frame("h"));
    assert!(err.is_err());
    assert_eq!(stack.depth(), 2);
    let bt = stack.capture();
    assert_eq!(bt.frames()[0].name, "g");
    assert_eq!(bt.frames()[1].name, "f");
    stack.pop();
    assert_eq!(stack.current_frame().map(|f| &*f.name), Some("f"));
}

#[test]
fn unbounded_stack_captures_nothing_when_empty() {
    let stack = CallStack::new(None);
    assert!(stack.capture().is_empty());
}

#[test]
fn mode_policies() {
    assert!(EvalMode::Interpret.allows_events());
    assert_eq!(EvalMode::Interpret.max_call_depth(), None);
    let fold = EvalMode::const_fold();
    assert!(!fold.allows_events());
    assert_eq!(fold.max_call_depth(), Some(64));
    assert_eq!(fold.call_budget(), Some(EvalMode::FOLD_BUDGET));
}

#[test]
fn registry_reuses_handlers() {
    let registry = EventRegistry::new();
    let a = registry.lookup_or_register("new_connection");
    let b = registry.lookup_or_register("new_connection");
    assert!(a.ptr_eq(&b));
    assert_eq!(registry.len(), 1);
    assert!(registry.lookup("missing").is_none());

    a.mark_used();
    assert!(b.is_used());
    assert!(b.ty().is_none());
}
