use super::*;
use pretty_assertions::assert_eq;

#[test]
fn describe_names() {
    assert_eq!(ExprTag::Add.name(), "+");
    assert_eq!(ExprTag::Positive.name(), "+");
    assert_eq!(ExprTag::RecordConstructor.name(), "[=]");
    assert_eq!(ExprTag::IndexSliceAssign.name(), "[:]=");
    assert_eq!(ExprTag::List.to_string(), "<<>>");
}

#[test]
fn tag_order_places_const_after_name() {
    assert!(ExprTag::Const > ExprTag::Name);
    assert!(ExprTag::Call > ExprTag::Index);
}

#[test]
fn binary_symbols_follow_tags() {
    assert_eq!(BinaryOp::BitXor.as_symbol(), "^");
    assert_eq!(BinaryOp::AddTo.to_string(), "+=");
    assert_eq!(BinaryOp::In.tag(), ExprTag::In);
}

#[test]
fn comparison_classification() {
    assert!(BinaryOp::Ge.is_comparison());
    assert!(!BinaryOp::In.is_comparison());
    assert!(BinaryOp::RemoveFrom.is_compound_assign());
    assert!(!BinaryOp::Add.is_compound_assign());
}

#[test]
fn vector_opaque_tags() {
    assert!(ExprTag::Cast.is_vector_opaque());
    assert!(ExprTag::Is.is_vector_opaque());
    assert!(!ExprTag::Add.is_vector_opaque());
    assert_eq!(UnaryOp::Size.tag(), ExprTag::Size);
}
