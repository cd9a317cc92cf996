#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::net::IpAddr;

use super::*;
use numeric::{make_numeric, Num};
use pretty_assertions::assert_eq;
use sift_values::{EvalErrorKind, PatternVal, SubnetVal, TableVal};

fn t(tag: TypeTag) -> Type {
    Type::base(tag)
}

fn addr(s: &str) -> Value {
    Value::Addr(s.parse::<IpAddr>().unwrap())
}

fn count_set(items: &[u64]) -> Value {
    let set = TableVal::new(Type::set(vec![t(TypeTag::Count)]));
    for i in items {
        set.assign(vec![Value::Count(*i)], None).unwrap();
    }
    Value::Table(set)
}

fn set_members(v: &Value) -> Vec<u64> {
    let mut out: Vec<u64> = v
        .as_table()
        .unwrap()
        .entries()
        .iter()
        .filter_map(|e| e.index[0].coerce_to_unsigned())
        .collect();
    out.sort_unstable();
    out
}

// Numeric

#[test]
fn integer_arithmetic_matches_native() {
    let int = t(TypeTag::Int);
    assert_eq!(
        fold_binary(BinaryOp::Add, &int, &Value::Int(3), &Value::Int(4)).unwrap(),
        Value::Int(7)
    );
    assert_eq!(
        fold_binary(BinaryOp::Divide, &int, &Value::Int(7), &Value::Int(2)).unwrap(),
        Value::Int(3)
    );
    assert_eq!(
        fold_binary(BinaryOp::Mod, &int, &Value::Int(-7), &Value::Int(2)).unwrap(),
        Value::Int(-1)
    );
}

#[test]
fn double_division_is_exact() {
    let result = fold_binary(
        BinaryOp::Divide,
        &t(TypeTag::Double),
        &Value::Double(7.0),
        &Value::Double(2.0),
    );
    assert_eq!(result.unwrap(), Value::Double(3.5));
}

#[test]
fn zero_divisor_is_an_error() {
    let err = fold_binary(BinaryOp::Divide, &t(TypeTag::Int), &Value::Int(1), &Value::Int(0))
        .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);

    let err = fold_binary(BinaryOp::Mod, &t(TypeTag::Count), &Value::Count(1), &Value::Count(0))
        .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::ModuloByZero);

    let err = fold_binary(
        BinaryOp::Divide,
        &t(TypeTag::Double),
        &Value::Double(1.0),
        &Value::Double(0.0),
    )
    .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
}

#[test]
fn integer_overflow_wraps() {
    let result = fold_binary(
        BinaryOp::Add,
        &t(TypeTag::Count),
        &Value::Count(u64::MAX),
        &Value::Count(1),
    );
    assert_eq!(result.unwrap(), Value::Count(0));
}

#[test]
fn result_representation_follows_static_type() {
    assert_eq!(make_numeric(TypeTag::Interval, Num::Int(2)), Value::Interval(2.0));
    assert_eq!(make_numeric(TypeTag::Time, Num::Double(1.5)), Value::Time(1.5));
    assert_eq!(make_numeric(TypeTag::Count, Num::Int(5)), Value::Count(5));
    assert_eq!(make_numeric(TypeTag::Counter, Num::Unsigned(5)), Value::Counter(5));
    assert_eq!(make_numeric(TypeTag::Bool, Num::Int(2)), Value::Bool(true));
    assert_eq!(make_numeric(TypeTag::Int, Num::Unsigned(9)), Value::Int(9));
}

#[test]
fn time_difference_is_an_interval() {
    let result = fold_binary(
        BinaryOp::Sub,
        &t(TypeTag::Interval),
        &Value::Time(10.0),
        &Value::Time(4.0),
    );
    assert_eq!(result.unwrap(), Value::Interval(6.0));
}

#[test]
fn comparisons_yield_bools() {
    let b = t(TypeTag::Bool);
    assert_eq!(
        fold_binary(BinaryOp::Lt, &b, &Value::Count(1), &Value::Count(2)).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        fold_binary(BinaryOp::Ge, &b, &Value::Double(1.0), &Value::Double(2.0)).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        fold_binary(BinaryOp::Ne, &b, &Value::Int(-1), &Value::Int(-1)).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn bitwise_on_counts() {
    let c = t(TypeTag::Count);
    assert_eq!(
        fold_binary(BinaryOp::BitAnd, &c, &Value::Count(0b1100), &Value::Count(0b1010)).unwrap(),
        Value::Count(0b1000)
    );
    assert_eq!(
        fold_binary(BinaryOp::BitXor, &c, &Value::Count(0b1100), &Value::Count(0b1010)).unwrap(),
        Value::Count(0b0110)
    );
}

#[test]
fn double_modulo_is_rejected() {
    let err = fold_binary(
        BinaryOp::Mod,
        &t(TypeTag::Double),
        &Value::Double(1.0),
        &Value::Double(2.0),
    )
    .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));
}

#[test]
fn arithmetic_coercion() {
    assert_eq!(numeric::coerce(TypeTag::Double, &Value::Count(3)).unwrap(), Value::Double(3.0));
    assert_eq!(numeric::coerce(TypeTag::Int, &Value::Double(3.9)).unwrap(), Value::Int(3));
    assert_eq!(numeric::coerce(TypeTag::Counter, &Value::Count(3)).unwrap(), Value::Counter(3));
    let err = numeric::coerce(TypeTag::Int, &Value::string("x")).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::BadCoercionValue);
}

// Unary

#[test]
fn unary_folds() {
    let int = t(TypeTag::Int);
    assert_eq!(
        fold_unary(UnaryOp::Negate, &int, &Value::Count(3)).unwrap(),
        Value::Int(-3)
    );
    assert_eq!(
        fold_unary(UnaryOp::Negate, &t(TypeTag::Interval), &Value::Interval(2.0)).unwrap(),
        Value::Interval(-2.0)
    );
    assert_eq!(
        fold_unary(UnaryOp::Positive, &int, &Value::Count(3)).unwrap(),
        Value::Int(3)
    );
    assert_eq!(
        fold_unary(UnaryOp::Not, &t(TypeTag::Bool), &Value::Bool(false)).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        fold_unary(UnaryOp::Complement, &t(TypeTag::Count), &Value::Count(0)).unwrap(),
        Value::Count(u64::MAX)
    );
}

#[test]
fn size_of_values() {
    let c = t(TypeTag::Count);
    assert_eq!(fold_unary(UnaryOp::Size, &c, &Value::Int(-5)).unwrap(), Value::Count(5));
    assert_eq!(
        fold_unary(UnaryOp::Size, &c, &Value::string("hello")).unwrap(),
        Value::Count(5)
    );
    assert_eq!(fold_unary(UnaryOp::Size, &c, &addr("::1")).unwrap(), Value::Count(128));
    assert_eq!(
        fold_unary(UnaryOp::Size, &c, &count_set(&[1, 2, 3])).unwrap(),
        Value::Count(3)
    );
    let net = Value::Subnet(SubnetVal::new("10.0.0.0".parse().unwrap(), 24).unwrap());
    assert_eq!(
        fold_unary(UnaryOp::Size, &t(TypeTag::Double), &net).unwrap(),
        Value::Double(256.0)
    );
}

#[test]
fn clone_is_deep() {
    let original = count_set(&[1]);
    let copy = fold_unary(UnaryOp::Clone, &original.ty(), &original).unwrap();
    copy.as_table()
        .unwrap()
        .assign(vec![Value::Count(2)], None)
        .unwrap();
    assert_eq!(set_members(&original), vec![1]);
    assert_eq!(set_members(&copy), vec![1, 2]);
}

// Strings and patterns

#[test]
fn string_concatenation_and_ordering() {
    let s = t(TypeTag::String);
    assert_eq!(
        fold_binary(BinaryOp::Add, &s, &Value::string("ab"), &Value::string("cd")).unwrap(),
        Value::string("abcd")
    );
    assert_eq!(
        fold_binary(BinaryOp::Lt, &t(TypeTag::Bool), &Value::string("ab"), &Value::string("b"))
            .unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn pattern_matches_string_exactly() {
    let p = Value::Pattern(PatternVal::new("fo+").unwrap());
    let b = t(TypeTag::Bool);
    assert_eq!(
        fold_binary(BinaryOp::Eq, &b, &p, &Value::string("foo")).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        fold_binary(BinaryOp::Eq, &b, &p, &Value::string("xfoo")).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(
        fold_binary(BinaryOp::Ne, &b, &Value::string("foo"), &p).unwrap(),
        Value::Bool(false)
    );
}

#[test]
fn pattern_combination() {
    let p = Value::Pattern(PatternVal::new("a").unwrap());
    let q = Value::Pattern(PatternVal::new("b").unwrap());
    let both = fold_binary(BinaryOp::BitAnd, &t(TypeTag::Pattern), &p, &q).unwrap();
    assert!(both.as_pattern().unwrap().match_exactly(b"ab"));
    let either = fold_binary(BinaryOp::BitOr, &t(TypeTag::Pattern), &p, &q).unwrap();
    assert!(either.as_pattern().unwrap().match_exactly(b"b"));
}

// Sets

#[test]
fn set_algebra_leaves_inputs_untouched() {
    let a = count_set(&[1, 2, 3]);
    let b = count_set(&[2, 3, 4]);
    let ty = a.ty();

    let union = fold_binary(BinaryOp::BitOr, &ty, &a, &b).unwrap();
    let inter = fold_binary(BinaryOp::BitAnd, &ty, &a, &b).unwrap();
    let diff = fold_binary(BinaryOp::Sub, &ty, &a, &b).unwrap();

    assert_eq!(set_members(&union), vec![1, 2, 3, 4]);
    assert_eq!(set_members(&inter), vec![2, 3]);
    assert_eq!(set_members(&diff), vec![1]);
    assert_eq!(set_members(&a), vec![1, 2, 3]);
    assert_eq!(set_members(&b), vec![2, 3, 4]);
}

#[test]
fn set_comparisons() {
    let small = count_set(&[1]);
    let big = count_set(&[1, 2]);
    let b = t(TypeTag::Bool);
    assert_eq!(fold_binary(BinaryOp::Lt, &b, &small, &big).unwrap(), Value::Bool(true));
    assert_eq!(fold_binary(BinaryOp::Le, &b, &big, &big).unwrap(), Value::Bool(true));
    assert_eq!(fold_binary(BinaryOp::Lt, &b, &big, &big).unwrap(), Value::Bool(false));
    assert_eq!(fold_binary(BinaryOp::Gt, &b, &big, &small).unwrap(), Value::Bool(true));
    assert_eq!(
        fold_binary(BinaryOp::Eq, &b, &small, &count_set(&[1])).unwrap(),
        Value::Bool(true)
    );
}

// Addresses

#[test]
fn address_ordering() {
    let b = t(TypeTag::Bool);
    assert_eq!(
        fold_binary(BinaryOp::Lt, &b, &addr("10.0.0.1"), &addr("10.0.0.2")).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        fold_binary(BinaryOp::Eq, &b, &addr("10.0.0.1"), &addr("10.0.0.1")).unwrap(),
        Value::Bool(true)
    );
}

#[test]
fn address_mask_builds_subnet() {
    let result = fold_binary(
        BinaryOp::Divide,
        &t(TypeTag::Subnet),
        &addr("192.168.1.77"),
        &Value::Count(24),
    )
    .unwrap();
    let expected = SubnetVal::new("192.168.1.0".parse().unwrap(), 24).unwrap();
    assert_eq!(result, Value::Subnet(expected));

    let err = fold_binary(
        BinaryOp::Divide,
        &t(TypeTag::Subnet),
        &addr("192.168.1.77"),
        &Value::Count(33),
    )
    .unwrap_err();
    assert_eq!(err.message, "bad IPv4 subnet prefix length: 33");
}

#[test]
fn subnet_equality_needs_same_width() {
    let a = Value::Subnet(SubnetVal::new("10.0.0.0".parse().unwrap(), 8).unwrap());
    let b = Value::Subnet(SubnetVal::new("10.0.0.0".parse().unwrap(), 16).unwrap());
    let bt = t(TypeTag::Bool);
    assert_eq!(fold_binary(BinaryOp::Eq, &bt, &a, &b).unwrap(), Value::Bool(false));
    assert_eq!(fold_binary(BinaryOp::Eq, &bt, &a, &a).unwrap(), Value::Bool(true));
}

// Membership

#[test]
fn membership() {
    assert_eq!(
        fold_in(&Value::Count(2), &count_set(&[1, 2])).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        fold_in(&Value::list(vec![Value::Count(5)]), &count_set(&[1, 2])).unwrap(),
        Value::Bool(false)
    );
    let p = Value::Pattern(PatternVal::new("ell").unwrap());
    assert_eq!(fold_in(&p, &Value::string("hello")).unwrap(), Value::Bool(true));
    assert_eq!(
        fold_in(&Value::string("lo"), &Value::string("hello")).unwrap(),
        Value::Bool(true)
    );
    let net = Value::Subnet(SubnetVal::new("10.0.0.0".parse().unwrap(), 8).unwrap());
    assert_eq!(fold_in(&addr("10.1.2.3"), &net).unwrap(), Value::Bool(true));
    assert_eq!(fold_in(&addr("11.1.2.3"), &net).unwrap(), Value::Bool(false));
}

#[test]
fn address_in_subnet_indexed_table() {
    let table = TableVal::new(Type::table(vec![t(TypeTag::Subnet)], t(TypeTag::String)));
    let net = Value::Subnet(SubnetVal::new("10.0.0.0".parse().unwrap(), 8).unwrap());
    table.assign(vec![net], Some(Value::string("ten"))).unwrap();
    let table = Value::Table(table);
    assert_eq!(fold_in(&addr("10.9.9.9"), &table).unwrap(), Value::Bool(true));
    assert_eq!(fold_in(&addr("192.0.2.1"), &table).unwrap(), Value::Bool(false));
}
