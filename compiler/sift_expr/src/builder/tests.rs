use super::*;
use pretty_assertions::assert_eq;
use sift_diagnostic::DiagnosticConfig;
use sift_ir::{BinaryOp, ExprTag};
use sift_values::{FieldDecl, FuncFlavor, IdFlags, RecordType, TypeTag};

use crate::test_helpers::*;

fn int_var(b: &mut ExprBuilder, name: &str, offset: usize) -> Expr {
    b.name(local(name, t(TypeTag::Int), offset), sp())
}

fn operands(e: &Expr) -> (&Expr, &Expr) {
    match e.kind() {
        ExprKind::Binary { lhs, rhs, .. } => (lhs, rhs),
        _ => panic!("not a binary node: {e:?}"),
    }
}

// Arithmetic typing

#[test]
fn mixed_arithmetic_promotes_to_the_wider_type() {
    let mut b = builder();
    let x = int_var(&mut b, "x", 0);
    let d = double(&mut b, 1.5);
    let sum = b.add(x, d, sp());

    assert_eq!(sum.ty().tag(), TypeTag::Double);
    let (lhs, rhs) = operands(&sum);
    assert_eq!(lhs.tag(), ExprTag::ArithCoerce);
    assert_eq!(lhs.ty().tag(), TypeTag::Double);
    assert_eq!(rhs.tag(), ExprTag::Const);
    assert!(errors(&b).is_empty());
}

#[test]
fn count_and_int_promote_to_int() {
    let mut b = builder();
    let c = count(&mut b, 2);
    let i = int(&mut b, -3);
    let e = b.times(c, i, sp());
    assert_eq!(e.ty().tag(), TypeTag::Int);
}

#[test]
fn time_plus_interval_is_time() {
    let mut b = builder();
    let now = b.name(local("now", t(TypeTag::Time), 0), sp());
    let dt = b.constant(Value::Interval(5.0), sp());
    let e = b.add(dt, now, sp());
    assert_eq!(e.ty().tag(), TypeTag::Time);
    assert_eq!(operands(&e).0.tag(), ExprTag::Name);
}

#[test]
fn string_plus_int_is_rejected() {
    let mut b = builder();
    let s = string(&mut b, "a");
    let i = int(&mut b, 1);
    let e = b.add(s, i, sp());

    assert!(e.is_error());
    assert!(e.ty().is_error());
    assert_eq!(errors(&b), vec!["requires arithmetic operands".to_string()]);
}

#[test]
fn errors_do_not_cascade_to_parents() {
    let mut b = builder();
    let s = string(&mut b, "a");
    let i = int(&mut b, 1);
    let bad = b.add(s, i, sp());
    let one = int(&mut b, 1);
    let outer = b.add(bad, one, sp());
    let two = int(&mut b, 2);
    let outermost = b.times(outer, two, sp());

    assert!(outermost.is_error());
    assert_eq!(b.error_count(), 1);
}

#[test]
fn modulo_requires_integral_operands() {
    let mut b = builder();
    let d = double(&mut b, 1.0);
    let i = int(&mut b, 2);
    let e = b.modulo(d, i, sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["requires integral operands".to_string()]);
}

#[test]
fn interval_divided_by_interval_is_double() {
    let mut b = builder();
    let a = b.constant(Value::Interval(10.0), sp());
    let c = b.constant(Value::Interval(2.0), sp());
    let e = b.divide(a, c, sp());
    assert_eq!(e.ty().tag(), TypeTag::Double);
}

#[test]
fn address_divided_by_count_is_subnet() {
    let mut b = builder();
    let a = b.name(local("a", t(TypeTag::Addr), 0), sp());
    let w = count(&mut b, 24);
    let e = b.divide(a, w, sp());
    assert_eq!(e.ty().tag(), TypeTag::Subnet);
}

#[test]
fn xor_of_sets_is_rejected() {
    let mut b = builder();
    let set_ty = Type::set(vec![t(TypeTag::Count)]);
    let s1 = b.name(local("s1", set_ty.clone(), 0), sp());
    let s2 = b.name(local("s2", set_ty.clone(), 1), sp());
    let e = b.bit(BinaryOp::BitXor, s1, s2, sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["'^' operator does not apply to sets".to_string()]);

    let s1 = b.name(local("s1", set_ty.clone(), 0), sp());
    let s2 = b.name(local("s2", set_ty, 1), sp());
    let union = b.bit(BinaryOp::BitOr, s1, s2, sp());
    assert!(union.ty().is_set());
}

#[test]
fn connectives_require_booleans() {
    let mut b = builder();
    let yes = boolean(&mut b, true);
    let one = int(&mut b, 1);
    let e = b.and_and(yes, one, sp());
    assert!(e.is_error());

    let yes = boolean(&mut b, true);
    let no = boolean(&mut b, false);
    let ok = b.or_or(yes, no, sp());
    assert_eq!(ok.ty().tag(), TypeTag::Bool);
}

// Canonical operand order

#[test]
fn constants_move_to_the_right() {
    let mut b = builder();
    let one = int(&mut b, 1);
    let x = int_var(&mut b, "x", 0);
    let e = b.add(one, x, sp());
    assert_eq!(e.to_string(), "x + 1");
}

#[test]
fn greater_than_becomes_less_than() {
    let mut b = builder();
    let x = int_var(&mut b, "x", 0);
    let y = int_var(&mut b, "y", 1);
    let e = b.rel(BinaryOp::Gt, x, y, sp());
    assert_eq!(e.tag(), ExprTag::Lt);
    assert_eq!(e.to_string(), "y < x");
}

#[test]
fn side_effects_keep_their_order() {
    let mut b = builder();
    let x = int_var(&mut b, "x", 0);
    let target = int_var(&mut b, "y", 1);
    let bumped = b.incr(target, sp());
    let e = b.rel(BinaryOp::Gt, bumped, x, sp());
    assert_eq!(e.tag(), ExprTag::Gt);
}

#[test]
fn canonicalization_can_be_disabled() {
    let mut b = ExprBuilder::with_config(BuilderConfig::default().with_canonicalize(false));
    let one = int(&mut b, 1);
    let x = int_var(&mut b, "x", 0);
    let e = b.add(one, x, sp());
    assert_eq!(e.to_string(), "1 + x");
}

// Comparisons

#[test]
fn time_compares_with_zero_constant() {
    let mut b = builder();
    let now = b.name(local("now", t(TypeTag::Time), 0), sp());
    let zero = int(&mut b, 0);
    let e = b.eq(BinaryOp::Eq, now, zero, sp());
    assert_eq!(e.ty().tag(), TypeTag::Bool);
    assert!(errors(&b).is_empty());
}

#[test]
fn comparison_of_unrelated_types_is_a_clash() {
    let mut b = builder();
    let s = string(&mut b, "a");
    let p = b.name(local("p", t(TypeTag::Addr), 0), sp());
    let e = b.eq(BinaryOp::Eq, p, s, sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["type clash in comparison".to_string()]);
}

#[test]
fn relational_operands_must_match() {
    let mut b = builder();
    let s = string(&mut b, "a");
    let now = b.name(local("now", t(TypeTag::Time), 0), sp());
    let e = b.rel(BinaryOp::Lt, now, s, sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["operands must be of the same type".to_string()]);
}

#[test]
fn membership_wraps_a_single_operand_in_a_list() {
    let mut b = builder();
    let table = b.name(
        local("t", Type::table(vec![t(TypeTag::Int)], t(TypeTag::String)), 0),
        sp(),
    );
    let key = count(&mut b, 3);
    let e = b.in_expr(key, table, sp());

    assert_eq!(e.ty().tag(), TypeTag::Bool);
    let (lhs, _) = operands(&e);
    assert_eq!(lhs.tag(), ExprTag::List);
    assert_eq!(lhs.list_exprs().map(|l| l[0].ty().tag()), Some(TypeTag::Int));
}

#[test]
fn conditional_promotes_arithmetic_branches() {
    let mut b = builder();
    let c = boolean(&mut b, true);
    let i = int(&mut b, 1);
    let d = double(&mut b, 2.0);
    let e = b.cond(c, i, d, sp());
    assert_eq!(e.ty().tag(), TypeTag::Double);

    let c = int(&mut b, 1);
    let i = int(&mut b, 1);
    let d = int(&mut b, 2);
    let bad = b.cond(c, i, d, sp());
    assert!(bad.is_error());
    assert_eq!(errors(&b), vec!["requires boolean conditional".to_string()]);
}

// Unary operators

#[test]
fn unary_result_types() {
    let mut b = builder();
    let c = count(&mut b, 5);
    assert_eq!(b.negate(c, sp()).ty().tag(), TypeTag::Int);
    let d = double(&mut b, 5.0);
    assert_eq!(b.negate(d, sp()).ty().tag(), TypeTag::Double);
    let s = string(&mut b, "abc");
    assert_eq!(b.size(s, sp()).ty().tag(), TypeTag::Count);
    let c = count(&mut b, 1);
    assert_eq!(b.not(c, sp()).ty().tag(), TypeTag::Bool);
    let s = string(&mut b, "x");
    assert!(b.complement(s, sp()).is_error());
}

#[test]
fn increment_requires_an_assignable_integral() {
    let mut b = builder();
    let x = int_var(&mut b, "x", 0);
    let e = b.incr(x, sp());
    assert_eq!(e.ty().tag(), TypeTag::Int);

    let one = int(&mut b, 1);
    let bad = b.incr(one, sp());
    assert!(bad.is_error());
    assert_eq!(errors(&b), vec!["can't be assigned to".to_string()]);
}

#[test]
fn vector_increment_is_deprecated() {
    let mut b = builder();
    let v = b.name(local("v", Type::vector(t(TypeTag::Count)), 0), sp());
    let e = b.incr(v, sp());
    assert!(!e.is_error());
    assert_eq!(
        warnings(&b),
        vec![(
            ErrorCode::W2002,
            "increment/decrement operations for vectors are deprecated".to_string()
        )]
    );
}

#[test]
fn vector_scalar_mixing_warns() {
    let mut b = builder();
    let v = b.name(local("v", Type::vector(t(TypeTag::Int)), 0), sp());
    let one = int(&mut b, 1);
    let e = b.add(v, one, sp());
    assert_eq!(e.ty().vector_yield().map(Type::tag), Some(TypeTag::Int));
    assert_eq!(
        warnings(&b),
        vec![(
            ErrorCode::W2002,
            "mixing vector and scalar operands is deprecated".to_string()
        )]
    );
}

#[test]
fn deprecation_warnings_can_be_silenced() {
    let mut b = ExprBuilder::with_config(
        BuilderConfig::default()
            .with_diagnostics(DiagnosticConfig::unlimited())
            .with_deprecation_warnings(false),
    );
    let v = b.name(local("v", Type::vector(t(TypeTag::Int)), 0), sp());
    let one = int(&mut b, 1);
    let _ = b.add(v, one, sp());
    assert!(warnings(&b).is_empty());
}

// Assignment

#[test]
fn assigning_double_to_int_warns_and_coerces() {
    let mut b = builder();
    let x = int_var(&mut b, "x", 0);
    let d = double(&mut b, 1.5);
    let e = b.assign(x, d, false, sp());

    assert!(!e.is_error());
    assert_eq!(e.ty().tag(), TypeTag::Int);
    let ExprKind::Assign { target, value, .. } = e.kind() else {
        panic!("not an assignment");
    };
    assert_eq!(target.tag(), ExprTag::Ref);
    assert_eq!(value.tag(), ExprTag::ArithCoerce);
    assert_eq!(
        warnings(&b),
        vec![(ErrorCode::W2001, "dangerous assignment of double to integral".to_string())]
    );
}

#[test]
fn constants_are_not_assignable() {
    let mut b = builder();
    let limit = Id::new_global("limit", t(TypeTag::Count), IdFlags::CONST);
    let target = b.name(limit.clone(), sp());
    let one = count(&mut b, 1);
    let e = b.assign(target, one, false, sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["const is not a modifiable lvalue".to_string()]);

    let target = b.init_name(limit, sp());
    let one = count(&mut b, 1);
    assert!(!b.assign(target, one, false, sp()).is_error());
}

#[test]
fn type_clash_in_assignment() {
    let mut b = builder();
    let s = b.name(local("s", t(TypeTag::String), 0), sp());
    let p = b.name(local("a", t(TypeTag::Addr), 1), sp());
    let e = b.assign(s, p, false, sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["type clash in assignment (string = addr)".to_string()]);
}

#[test]
fn untyped_table_constructor_takes_the_target_type() {
    let mut b = builder();
    let ty = Type::table(vec![t(TypeTag::Count)], t(TypeTag::String));
    let target = b.name(local("t", ty, 0), sp());
    let empty = b.list(Vec::new(), sp());
    let ctor = b.table_constructor(empty, None, sp());
    assert!(ctor.ty().is_unspecified_table());

    let e = b.assign(target, ctor, false, sp());
    let ExprKind::Assign { value, .. } = e.kind() else {
        panic!("not an assignment");
    };
    assert_eq!(value.tag(), ExprTag::TableCoerce);
    assert_eq!(value.ty().yield_type().map(Type::tag), Some(TypeTag::String));
}

#[test]
fn record_assignment_inserts_a_coercion() {
    let mut b = builder();
    let target = b.name(local("c", conn_type(), 0), sp());
    let host = b.constant(Value::Addr([10, 0, 0, 1].into()), sp());
    let host = b.field_assign("host", host, sp());
    let port = count(&mut b, 80);
    let port = b.field_assign("port", port, sp());
    let fields = b.list(vec![host, port], sp());
    let ctor = b.record_constructor(fields, sp());
    let e = b.assign(target, ctor, false, sp());

    assert!(!e.is_error(), "{:?}", errors(&b));
    let ExprKind::Assign { value, .. } = e.kind() else {
        panic!("not an assignment");
    };
    assert_eq!(value.tag(), ExprTag::RecordCoerce);
}

#[test]
fn record_coercion_requires_non_optional_fields() {
    let mut b = builder();
    let target = b.name(local("c", conn_type(), 0), sp());
    let host = b.constant(Value::Addr([10, 0, 0, 1].into()), sp());
    let host = b.field_assign("host", host, sp());
    let fields = b.list(vec![host], sp());
    let ctor = b.record_constructor(fields, sp());
    let e = b.assign(target, ctor, false, sp());

    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["non-optional field \"port\" missing".to_string()]);
}

#[test]
fn record_coercion_rejects_orphaned_fields() {
    let mut b = builder();
    let target = b.name(local("c", conn_type(), 0), sp());
    let bogus = count(&mut b, 1);
    let bogus = b.field_assign("bogus", bogus, sp());
    let fields = b.list(vec![bogus], sp());
    let ctor = b.record_constructor(fields, sp());
    let _ = b.assign(target, ctor, false, sp());
    assert_eq!(
        errors(&b),
        vec!["orphaned field \"bogus\" in record coercion".to_string()]
    );
}

#[test]
fn record_initializer_list_expands_to_field_assignments() {
    let mut b = builder();
    let target = b.name(local("c", conn_type(), 0), sp());
    let port = count(&mut b, 443);
    let port = b.field_assign("port", port, sp());
    let inits = b.list(vec![port], sp());
    let e = b.get_assign_expr(target, inits, false, sp());

    assert_eq!(e.tag(), ExprTag::List);
    let assigns = e.list_exprs().unwrap_or_default();
    assert_eq!(assigns.len(), 1);
    assert_eq!(assigns[0].to_string(), "c$port = 443");
}

#[test]
fn slice_targets_build_slice_assignments() {
    let mut b = builder();
    let v = b.name(local("v", Type::vector(t(TypeTag::Int)), 0), sp());
    let lo = int(&mut b, 1);
    let hi = int(&mut b, 3);
    let bounds = b.list(vec![lo, hi], sp());
    let target = b.index(v, bounds, true, sp());
    let w = b.name(local("w", Type::vector(t(TypeTag::Int)), 1), sp());
    let e = b.get_assign_expr(target, w, false, sp());

    assert_eq!(e.tag(), ExprTag::IndexSliceAssign);
    assert_eq!(e.ty().tag(), TypeTag::Void);
}

// Indexing and fields

#[test]
fn indexing_yields_the_element_type() {
    let mut b = builder();
    let ty = Type::table(vec![t(TypeTag::String)], t(TypeTag::Count));
    let table = b.name(local("t", ty, 0), sp());
    let key = string(&mut b, "k");
    let key = b.list(vec![key], sp());
    let e = b.index(table, key, false, sp());
    assert_eq!(e.ty().tag(), TypeTag::Count);

    let v = b.name(local("v", Type::vector(t(TypeTag::Double)), 1), sp());
    let i = count(&mut b, 0);
    let i = b.list(vec![i], sp());
    assert_eq!(b.index(v, i, false, sp()).ty().tag(), TypeTag::Double);
}

#[test]
fn string_index_must_be_single() {
    let mut b = builder();
    let s = string(&mut b, "hello");
    let lo = int(&mut b, 0);
    let hi = int(&mut b, 1);
    let idx = b.list(vec![lo, hi], sp());
    let e = b.index(s, idx, false, sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["invalid string index expression".to_string()]);
}

#[test]
fn unknown_field_is_reported() {
    let mut b = builder();
    let c = b.name(local("c", conn_type(), 0), sp());
    let e = b.field(c, "nope", sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["no such field in record: \"nope\"".to_string()]);

    let c = b.name(local("c", conn_type(), 0), sp());
    let e = b.has_field(c, "note", sp());
    assert_eq!(e.ty().tag(), TypeTag::Bool);
}

// Constructors

#[test]
fn vector_constructor_merges_arithmetic_elements() {
    let mut b = builder();
    let i = int(&mut b, 1);
    let d = double(&mut b, 2.5);
    let items = b.list(vec![i, d], sp());
    let e = b.vector_constructor(items, None, sp());
    assert_eq!(e.ty().vector_yield().map(Type::tag), Some(TypeTag::Double));
}

#[test]
fn set_constructor_rejects_mixed_elements() {
    let mut b = builder();
    let i = int(&mut b, 1);
    let s = string(&mut b, "a");
    let items = b.list(vec![i, s], sp());
    let e = b.set_constructor(items, None, sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["inconsistent type in set constructor".to_string()]);
}

#[test]
fn record_constructor_requires_field_assignments() {
    let mut b = builder();
    let one = int(&mut b, 1);
    let items = b.list(vec![one], sp());
    let e = b.record_constructor(items, sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["bad type in record constructor".to_string()]);
}

// Calls and events

#[test]
fn call_checks_arguments() {
    let mut b = builder();
    let params = RecordType::new(vec![FieldDecl::new("n", t(TypeTag::Count))]);
    let f_ty = Type::func(FuncFlavor::Function, params, Some(t(TypeTag::Bool)));
    let f = b.name(global("f", f_ty.clone()), sp());
    let arg = count(&mut b, 1);
    let args = b.list(vec![arg], sp());
    let call = b.call(f, args, false, sp());
    assert_eq!(call.ty().tag(), TypeTag::Bool);

    let f = b.name(global("f", f_ty), sp());
    let arg = string(&mut b, "x");
    let args = b.list(vec![arg], sp());
    let bad = b.call(f, args, false, sp());
    assert!(bad.is_error());
    assert_eq!(
        errors(&b),
        vec!["argument type mismatch in function call".to_string()]
    );
}

#[test]
fn unknown_events_are_registered_on_use() {
    let mut b = builder();
    let args = b.list(Vec::new(), sp());
    let e = b.event("new_connection", args, sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["not an event: new_connection".to_string()]);

    let handler = b.events().lookup("new_connection");
    assert!(handler.is_some_and(|h| h.is_used()));
}

#[test]
fn schedule_requires_an_event_and_a_time() {
    let mut b = builder();
    let when = b.constant(Value::Interval(1.0), sp());
    let one = int(&mut b, 1);
    let e = b.schedule(when, one, sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["schedule requires an event".to_string()]);
}

#[test]
fn cast_between_unrelated_types_is_rejected() {
    let mut b = builder();
    let s = string(&mut b, "x");
    let e = b.cast(s, t(TypeTag::Count), sp());
    assert!(e.is_error());
    assert_eq!(errors(&b), vec!["cast not supported (string as count)".to_string()]);
}

#[test]
fn finish_drains_the_queue() {
    let mut b = builder();
    let s = string(&mut b, "a");
    let i = int(&mut b, 1);
    let _ = b.add(s, i, sp());
    assert!(b.has_errors().is_some());

    let drained = b.finish();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].code, ErrorCode::E2002);
    assert!(b.has_errors().is_none());
}
