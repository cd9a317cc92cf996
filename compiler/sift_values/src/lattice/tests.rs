use super::*;
use crate::types::FieldDecl;
use proptest::prelude::*;

fn lattice_tag() -> impl Strategy<Value = TypeTag> {
    prop_oneof![
        Just(TypeTag::Bool),
        Just(TypeTag::Count),
        Just(TypeTag::Counter),
        Just(TypeTag::Int),
        Just(TypeTag::Double),
    ]
}

proptest! {
    #[test]
    fn max_type_is_commutative(a in lattice_tag(), b in lattice_tag()) {
        prop_assert_eq!(max_type(a, b), max_type(b, a));
    }

    #[test]
    fn max_type_is_idempotent(a in lattice_tag()) {
        prop_assert_eq!(max_type(a, a), Some(a));
    }

    #[test]
    fn max_type_is_an_upper_bound(a in lattice_tag(), b in lattice_tag()) {
        let m = max_type(a, b);
        prop_assert!(m.is_some());
        if let Some(m) = m {
            prop_assert_eq!(max_type(a, m), Some(m));
            prop_assert_eq!(max_type(b, m), Some(m));
        }
    }
}

#[test]
fn max_type_examples() {
    assert_eq!(max_type(TypeTag::Count, TypeTag::Int), Some(TypeTag::Int));
    assert_eq!(max_type(TypeTag::Int, TypeTag::Double), Some(TypeTag::Double));
    assert_eq!(max_type(TypeTag::Count, TypeTag::Counter), Some(TypeTag::Counter));
    assert_eq!(max_type(TypeTag::Interval, TypeTag::Count), Some(TypeTag::Double));
    assert_eq!(max_type(TypeTag::String, TypeTag::Count), None);
}

#[test]
fn arithmetic_classification() {
    assert!(is_arithmetic(TypeTag::Counter));
    assert!(!is_arithmetic(TypeTag::Bool));
    assert!(!is_arithmetic(TypeTag::Interval));
    assert!(is_integral(TypeTag::Int));
    assert!(!is_integral(TypeTag::Double));
    assert!(both_integral(TypeTag::Count, TypeTag::Int));
}

#[test]
fn promotion_rejects_narrowing() {
    assert!(arith_promotable(TypeTag::Count, TypeTag::Double));
    assert!(arith_promotable(TypeTag::Count, TypeTag::Int));
    assert!(!arith_promotable(TypeTag::Double, TypeTag::Int));
    assert!(!arith_promotable(TypeTag::Int, TypeTag::Count));
    assert!(!arith_promotable(TypeTag::String, TypeTag::Int));
}

#[test]
fn same_type_structural() {
    let a = Type::table(vec![Type::base(TypeTag::Addr)], Type::base(TypeTag::Count));
    let b = Type::table(vec![Type::base(TypeTag::Addr)], Type::base(TypeTag::Count));
    let c = Type::set(vec![Type::base(TypeTag::Addr)]);
    assert!(same_type(&a, &b));
    assert!(!same_type(&a, &c));
    assert!(same_type(&a, &Type::base(TypeTag::Any)));
    assert!(!same_type(
        &Type::vector(Type::base(TypeTag::Int)),
        &Type::vector(Type::base(TypeTag::Count))
    ));
}

#[test]
fn record_promotion() {
    let inner_src = RecordType::new(vec![FieldDecl::new("n", Type::base(TypeTag::Count))]);
    let inner_dst = RecordType::new(vec![
        FieldDecl::new("n", Type::base(TypeTag::Double)),
        FieldDecl::new("m", Type::base(TypeTag::String)).optional(),
    ]);
    let src = RecordType::new(vec![
        FieldDecl::new("a", Type::base(TypeTag::Count)),
        FieldDecl::new("r", Type::record(inner_src.clone())),
    ]);
    let dst = RecordType::new(vec![
        FieldDecl::new("a", Type::base(TypeTag::Int)),
        FieldDecl::new("r", Type::record(inner_dst.clone())),
    ]);
    assert!(record_promotion_compatible(&dst, &src));
    assert!(!record_promotion_compatible(&inner_src, &inner_dst));
    assert!(!same_attrs(&inner_src, &inner_dst));
}

#[test]
fn cast_legality() {
    let any = Type::base(TypeTag::Any);
    let count = Type::base(TypeTag::Count);
    assert!(can_cast(&any, &count));
    assert!(can_cast(&count, &any));
    assert!(!can_cast(&count, &Type::base(TypeTag::String)));
}
