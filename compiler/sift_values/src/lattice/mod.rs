//! Promotion lattice and structural type relations.

use crate::types::{RecordType, Type, TypeKind, TypeTag};

pub fn is_arithmetic(tag: TypeTag) -> bool {
    matches!(
        tag,
        TypeTag::Int | TypeTag::Count | TypeTag::Counter | TypeTag::Double
    )
}

pub fn is_integral(tag: TypeTag) -> bool {
    matches!(tag, TypeTag::Int | TypeTag::Count | TypeTag::Counter)
}

pub fn both_arithmetic(a: TypeTag, b: TypeTag) -> bool {
    is_arithmetic(a) && is_arithmetic(b)
}

pub fn both_integral(a: TypeTag, b: TypeTag) -> bool {
    is_integral(a) && is_integral(b)
}

/// Position in the promotion lattice; `time` and `interval` rank as `double`.
fn promotion_rank(tag: TypeTag) -> Option<u8> {
    match tag {
        TypeTag::Bool => Some(0),
        TypeTag::Count => Some(1),
        TypeTag::Counter => Some(2),
        TypeTag::Int => Some(3),
        TypeTag::Double | TypeTag::Time | TypeTag::Interval => Some(4),
        _ => None,
    }
}

/// Least upper bound of two tags in `bool < count < counter < int < double`.
///
/// Returns `None` when either tag lies outside the lattice.
pub fn max_type(a: TypeTag, b: TypeTag) -> Option<TypeTag> {
    let ra = promotion_rank(a)?;
    let rb = promotion_rank(b)?;
    Some(match ra.max(rb) {
        0 => TypeTag::Bool,
        1 => TypeTag::Count,
        2 => TypeTag::Counter,
        3 => TypeTag::Int,
        _ => TypeTag::Double,
    })
}

/// Whether a value of `from` may be implicitly widened to `to`.
///
/// Rejects `double` to integral and `int` to `count`/`counter`.
pub fn arith_promotable(from: TypeTag, to: TypeTag) -> bool {
    if !both_arithmetic(from, to) {
        return false;
    }
    if from == TypeTag::Double && is_integral(to) {
        return false;
    }
    if from == TypeTag::Int && matches!(to, TypeTag::Count | TypeTag::Counter) {
        return false;
    }
    true
}

/// Structural type equality. `any` matches everything.
pub fn same_type(a: &Type, b: &Type) -> bool {
    if a.ptr_eq(b) || a.tag() == TypeTag::Any || b.tag() == TypeTag::Any {
        return true;
    }
    if a.tag() != b.tag() {
        return false;
    }
    match (a.kind(), b.kind()) {
        (TypeKind::Enum(x), TypeKind::Enum(y)) => x.name == y.name,
        (TypeKind::Table(x), TypeKind::Table(y)) => {
            same_type_list(&x.indices, &y.indices)
                && match (&x.yield_type, &y.yield_type) {
                    (Some(xy), Some(yy)) => same_type(xy, yy),
                    (None, None) => true,
                    _ => false,
                }
        }
        (TypeKind::Vector(x), TypeKind::Vector(y)) | (TypeKind::TypeOf(x), TypeKind::TypeOf(y)) => {
            same_type(x, y)
        }
        (TypeKind::Record(x), TypeKind::Record(y)) => same_record_shape(x, y),
        (TypeKind::List(x), TypeKind::List(y)) => same_type_list(x, y),
        (TypeKind::Func(x), TypeKind::Func(y)) => {
            x.flavor == y.flavor
                && same_record_shape(&x.params, &y.params)
                && match (&x.yield_type, &y.yield_type) {
                    (Some(xy), Some(yy)) => same_type(xy, yy),
                    (None, None) => true,
                    _ => false,
                }
        }
        _ => true,
    }
}

fn same_type_list(a: &[Type], b: &[Type]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_type(x, y))
}

fn same_record_shape(a: &RecordType, b: &RecordType) -> bool {
    a.num_fields() == b.num_fields()
        && a
            .fields()
            .iter()
            .zip(b.fields())
            .all(|(x, y)| x.name == y.name && same_type(&x.ty, &y.ty))
}

/// Field attributes match pairwise. Both records must have the same shape.
pub fn same_attrs(a: &RecordType, b: &RecordType) -> bool {
    a.num_fields() == b.num_fields()
        && a
            .fields()
            .iter()
            .zip(b.fields())
            .all(|(x, y)| x.attrs == y.attrs)
}

/// Whether every field of `source` has a compatible counterpart in `target`.
///
/// Compatible means structurally equal, arithmetically promotable, or a
/// nested record that is itself promotion-compatible. Target fields missing
/// from the source are not checked here.
pub fn record_promotion_compatible(target: &RecordType, source: &RecordType) -> bool {
    source.fields().iter().all(|sf| {
        let Some(tf) = target.field_offset(&sf.name).and_then(|o| target.field(o)) else {
            return false;
        };
        if same_type(&sf.ty, &tf.ty) || arith_promotable(sf.ty.tag(), tf.ty.tag()) {
            return true;
        }
        match (sf.ty.as_record(), tf.ty.as_record()) {
            (Some(s), Some(t)) => record_promotion_compatible(t, s),
            _ => false,
        }
    })
}

/// Static legality of `x as T`: from or to `any`, or between equal types.
pub fn can_cast(from: &Type, to: &Type) -> bool {
    same_type(from, to)
}

#[cfg(test)]
mod tests;
