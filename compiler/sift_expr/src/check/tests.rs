use super::*;
use pretty_assertions::assert_eq;
use sift_ir::ExprTag;
use sift_values::{FieldDecl, Value, ValueDefault};

use crate::test_helpers::*;

#[test]
fn matching_type_is_left_alone() {
    let mut b = builder();
    let mut e = int(&mut b, 1);
    assert!(check_and_promote_expr(&mut b, &mut e, &t(TypeTag::Int)));
    assert_eq!(e.tag(), ExprTag::Const);
}

#[test]
fn narrower_arithmetic_is_promoted() {
    let mut b = builder();
    let mut e = count(&mut b, 1);
    assert!(check_and_promote_expr(&mut b, &mut e, &t(TypeTag::Double)));
    assert_eq!(e.tag(), ExprTag::ArithCoerce);
    assert_eq!(e.ty().tag(), TypeTag::Double);
}

#[test]
fn arithmetic_is_never_demoted() {
    let mut b = builder();
    let mut e = double(&mut b, 1.5);
    assert!(!check_and_promote_expr(&mut b, &mut e, &t(TypeTag::Count)));
    assert_eq!(
        errors(&b),
        vec!["over-promotion of arithmetic value".to_string()]
    );
}

#[test]
fn arithmetic_does_not_mix_with_strings() {
    let mut b = builder();
    let mut e = string(&mut b, "a");
    assert!(!check_and_promote_expr(&mut b, &mut e, &t(TypeTag::Int)));
    assert_eq!(
        errors(&b),
        vec!["arithmetic mixed with non-arithmetic".to_string()]
    );
}

#[test]
fn any_accepts_everything() {
    let mut b = builder();
    let mut e = string(&mut b, "a");
    assert!(check_and_promote_expr(&mut b, &mut e, &t(TypeTag::Any)));
    assert!(errors(&b).is_empty());
}

#[test]
fn errored_expressions_fail_silently() {
    let mut b = builder();
    let s = string(&mut b, "a");
    let i = int(&mut b, 1);
    let mut bad = b.add(s, i, sp());
    assert!(!check_and_promote_expr(&mut b, &mut bad, &t(TypeTag::Int)));
    assert_eq!(b.error_count(), 1);
}

#[test]
fn list_elements_are_promoted_pairwise() {
    let mut b = builder();
    let c = count(&mut b, 1);
    let s = string(&mut b, "k");
    let mut list = b.list(vec![c, s], sp());
    let types = [t(TypeTag::Int), t(TypeTag::String)];
    assert!(check_and_promote_exprs(&mut b, &mut list, &types));

    let elems = list.list_exprs().unwrap_or_default();
    assert_eq!(elems[0].ty().tag(), TypeTag::Int);
    assert_eq!(list.to_string(), "1, \"k\"");
    assert_eq!(list.ty().to_string(), "int,string");
}

#[test]
fn list_length_must_match() {
    let mut b = builder();
    let c = count(&mut b, 1);
    let mut list = b.list(vec![c], sp());
    let types = [t(TypeTag::Count), t(TypeTag::Count)];
    assert!(!check_and_promote_exprs(&mut b, &mut list, &types));
    assert_eq!(errors(&b), vec!["indexing mismatch".to_string()]);
}

#[test]
fn list_promotion_to_single_type() {
    let mut b = builder();
    let c = count(&mut b, 1);
    let i = int(&mut b, -1);
    let mut list = b.list(vec![c, i], sp());
    assert!(check_and_promote_exprs_to_type(&mut b, &mut list, &t(TypeTag::Double)));
    assert!(list
        .list_exprs()
        .unwrap_or_default()
        .iter()
        .all(|e| e.ty().tag() == TypeTag::Double));
}

#[test]
fn clash_inside_a_list_names_the_element() {
    let mut b = builder();
    let s = string(&mut b, "a");
    let mut list = b.list(vec![s], sp());
    assert!(!check_and_promote_exprs_to_type(&mut b, &mut list, &t(TypeTag::Addr)));
    assert_eq!(
        errors(&b),
        vec!["type mismatch (type clash: string is not addr)".to_string()]
    );
}

#[test]
fn missing_arguments_come_from_defaults() {
    let mut b = builder();
    let params = RecordType::new(vec![
        FieldDecl::new("n", t(TypeTag::Count)),
        FieldDecl::new("verbose", t(TypeTag::Bool))
            .with_default(Arc::new(ValueDefault(Value::Bool(false)))),
    ]);
    let n = count(&mut b, 3);
    let mut args = b.list(vec![n], sp());
    assert!(check_and_promote_args(&mut b, &mut args, &params));

    let elems = args.list_exprs().unwrap_or_default();
    assert_eq!(elems.len(), 2);
    assert_eq!(elems[1].tag(), ExprTag::Default);
    assert_eq!(elems[1].ty().tag(), TypeTag::Bool);
}

#[test]
fn missing_argument_without_default_is_a_mismatch() {
    let mut b = builder();
    let params = RecordType::new(vec![
        FieldDecl::new("a", t(TypeTag::Count)),
        FieldDecl::new("b", t(TypeTag::Count)),
    ]);
    let a = count(&mut b, 3);
    let mut args = b.list(vec![a], sp());
    assert!(!check_and_promote_args(&mut b, &mut args, &params));
    assert_eq!(errors(&b), vec!["parameter mismatch".to_string()]);
}

#[test]
fn untyped_empty_table_takes_the_required_type() {
    let mut b = builder();
    let empty = b.list(Vec::new(), sp());
    let mut ctor = b.set_constructor(empty, None, sp());
    let target = Type::set(vec![t(TypeTag::Addr)]);
    assert!(check_and_promote_expr(&mut b, &mut ctor, &target));
    assert_eq!(ctor.tag(), ExprTag::TableCoerce);
    assert!(ctor.ty().is_set());
}
