#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::net::Ipv4Addr;

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sift_values::{SubnetVal, Type};

use crate::test_helpers::*;

fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(a, b, c, d))
}

fn subnet(addr: IpAddr, width: i64) -> Value {
    Value::Subnet(SubnetVal::new(addr, width).unwrap())
}

#[test]
fn slice_bounds_count_from_the_end() {
    assert_eq!(slice_index(-1, 5), 4);
    assert_eq!(slice_index(-5, 5), 0);
    assert_eq!(slice_index(2, 5), 2);
}

#[test]
fn slice_bounds_clamp() {
    assert_eq!(slice_index(9, 5), 5);
    assert_eq!(slice_index(-9, 5), 0);
    assert_eq!(slice_index(0, 0), 0);
}

proptest! {
    #[test]
    fn slice_index_stays_in_range(idx in any::<i64>(), len in 0usize..10_000) {
        prop_assert!(slice_index(idx, len) <= len);
    }
}

#[test]
fn string_index_from_the_end() {
    let s = Value::string("hello");
    let last = index_value(&s, &[Value::Int(-1)], false).unwrap();
    assert_eq!(last, Value::string("o"));

    let first = index_value(&s, &[Value::Count(0)], false).unwrap();
    assert_eq!(first, Value::string("h"));
}

#[test]
fn string_index_out_of_range_is_empty() {
    let s = Value::string("hi");
    assert_eq!(
        index_value(&s, &[Value::Int(7)], false).unwrap(),
        Value::string("")
    );
}

#[test]
fn string_slice() {
    let s = Value::string("hello");
    let sliced = index_value(&s, &[Value::Int(1), Value::Int(3)], true).unwrap();
    assert_eq!(sliced, Value::string("el"));

    let tail = index_value(&s, &[Value::Int(-3), Value::Int(99)], true).unwrap();
    assert_eq!(tail, Value::string("llo"));
}

#[test]
fn vector_index_out_of_range() {
    let v = int_vector(&[1, 2]);
    let err = index_value(&v, &[Value::Count(9)], false).unwrap_err();
    assert_eq!(err.message, "no such index: 9");
}

#[test]
fn vector_slice_with_negative_start() {
    let v = int_vector(&[1, 2, 3, 4]);
    let tail = index_value(&v, &[Value::Int(-2), Value::Int(4)], true).unwrap();
    assert_eq!(vector_ints(&tail), vec![Some(3), Some(4)]);
}

#[test]
fn scalars_cannot_be_indexed() {
    let err = index_value(&Value::Int(1), &[Value::Int(0)], false).unwrap_err();
    assert_eq!(err.message, "type cannot be indexed: int");
}

#[test]
fn address_lookup_picks_the_longest_prefix() {
    let ty = Type::table(vec![t(TypeTag::Subnet)], t(TypeTag::String));
    let table = TableVal::new(ty);
    table
        .assign(vec![subnet(v4(10, 0, 0, 0), 8)], Some(Value::string("wide")))
        .unwrap();
    table
        .assign(vec![subnet(v4(10, 1, 0, 0), 16)], Some(Value::string("narrow")))
        .unwrap();
    let table = Value::Table(table);

    let hit = index_value(&table, &[Value::Addr(v4(10, 1, 2, 3))], false).unwrap();
    assert_eq!(hit, Value::string("narrow"));

    let hit = index_value(&table, &[Value::Addr(v4(10, 2, 0, 1))], false).unwrap();
    assert_eq!(hit, Value::string("wide"));

    let miss = index_value(&table, &[Value::Addr(v4(192, 168, 0, 1))], false);
    assert!(miss.is_err());
}

#[test]
fn address_membership_in_a_subnet_set() {
    let set = TableVal::new(Type::set(vec![t(TypeTag::Subnet)]));
    set.assign(vec![subnet(v4(192, 168, 0, 0), 16)], None).unwrap();
    let set = Value::Table(set);

    let hit = index_value(&set, &[Value::Addr(v4(192, 168, 3, 4))], false).unwrap();
    assert_eq!(hit, Value::Void);
    assert!(index_value(&set, &[Value::Addr(v4(10, 0, 0, 1))], false).is_err());
}
