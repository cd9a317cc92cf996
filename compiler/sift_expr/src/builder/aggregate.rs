//! Indexing, field access and the aggregate constructors.

use std::sync::Arc;

use sift_diagnostic::ErrorCode;
use sift_ir::{ExprTag, Span};
use sift_values::{
    both_arithmetic, is_integral, max_type, same_type, FieldAttrs, FieldDecl, RecordType, Type,
    TypeKind, TypeTag,
};

use super::{operands_ok, reject, retype_list, ExprBuilder, Rejection, Typed};
use crate::check;
use crate::node::{Expr, ExprKind};

/// How an index list fits the indexed type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum IndexMatch {
    /// Selects a single element.
    Scalar,
    /// Selects a sub-vector (slice, mask or gather).
    Vector,
    NoMatch,
}

fn is_index_scalar(t: TypeTag) -> bool {
    is_integral(t) || t == TypeTag::Bool
}

/// Common type of `types`: the arithmetic maximum, or the shared type.
pub(crate) fn merge_types(types: &[Type]) -> Option<Type> {
    let (first, rest) = types.split_first()?;
    let mut merged = first.clone();
    for t in rest {
        if both_arithmetic(merged.tag(), t.tag()) {
            merged = Type::base(max_type(merged.tag(), t.tag())?);
        } else if same_type(&merged, t) {
            if merged.tag() == TypeTag::Any {
                merged = t.clone();
            }
        } else {
            return None;
        }
    }
    Some(merged)
}

impl ExprBuilder {
    /// Match the list expression `index` against the index types of `ty`,
    /// promoting its elements on success.
    pub(crate) fn matches_index(&mut self, ty: &Type, index: &mut Expr) -> IndexMatch {
        let Some(elems) = index.list_exprs() else {
            return IndexMatch::NoMatch;
        };
        let n = elems.len();
        match ty.kind() {
            TypeKind::Vector(_) => match elems {
                [single] => match single.ty().vector_yield() {
                    Some(y) if is_index_scalar(y.tag()) => IndexMatch::Vector,
                    Some(_) => IndexMatch::NoMatch,
                    None if is_index_scalar(single.ty().tag()) => IndexMatch::Scalar,
                    None => IndexMatch::NoMatch,
                },
                [first, last] if is_integral(first.ty().tag()) && is_integral(last.ty().tag()) => {
                    IndexMatch::Vector
                }
                _ => IndexMatch::NoMatch,
            },
            TypeKind::Table(table) => {
                let subnet_lookup = n == 1
                    && table.indices.len() == 1
                    && table.indices[0].tag() == TypeTag::Subnet
                    && elems[0].ty().tag() == TypeTag::Addr;
                if subnet_lookup {
                    IndexMatch::Scalar
                } else {
                    let indices = table.indices.clone();
                    match check::promote_exprs(self, index, &indices) {
                        Ok(()) => IndexMatch::Scalar,
                        Err(_) => IndexMatch::NoMatch,
                    }
                }
            }
            TypeKind::Base(TypeTag::String) if n == 1 || n == 2 => {
                match check::promote_exprs_to_type(self, index, &Type::base(TypeTag::Int)) {
                    Ok(()) => IndexMatch::Scalar,
                    Err(_) => IndexMatch::NoMatch,
                }
            }
            _ => IndexMatch::NoMatch,
        }
    }

    /// `base[index]`, or `base[first:last]` when `is_slice`.
    pub fn index(&mut self, base: Expr, mut index: Expr, is_slice: bool, span: Span) -> Expr {
        let typed = operands_ok(&[&base, &index]).and_then(|()| {
            let base_ty = base.ty().clone();
            let bt = base_ty.tag();
            let n = index.list_exprs().map_or(0, <[Expr]>::len);
            if is_slice {
                if !matches!(bt, TypeTag::String | TypeTag::Vector) {
                    return Err(reject(
                        ErrorCode::E2009,
                        "slice notation indexing only supported for strings and vectors currently",
                    ));
                }
            } else if bt == TypeTag::String && n != 1 {
                return Err(reject(ErrorCode::E2009, "invalid string index expression"));
            }
            match self.matches_index(&base_ty, &mut index) {
                IndexMatch::NoMatch => Err(reject(
                    ErrorCode::E2009,
                    format!("expression with type '{bt}' is not a type that can be indexed"),
                )),
                _ if bt == TypeTag::String => Ok(Type::base(TypeTag::String)),
                IndexMatch::Vector => Ok(base_ty),
                IndexMatch::Scalar => Ok(base_ty
                    .yield_type()
                    .cloned()
                    .unwrap_or_else(|| Type::base(TypeTag::Void))),
            }
        });
        let kind = ExprKind::Index {
            base: Box::new(base),
            index: Box::new(index),
            is_slice,
        };
        self.seal(kind, span, typed)
    }

    fn resolve_field(&mut self, base: &Expr, name: &str, span: Span) -> Result<(usize, Type), Rejection> {
        operands_ok(&[base])?;
        let Some(rt) = base.ty().as_record() else {
            return Err(reject(ErrorCode::E2008, "not a record"));
        };
        let Some(offset) = rt.field_offset(name) else {
            return Err(reject(
                ErrorCode::E2008,
                format!("no such field in record: \"{name}\""),
            ));
        };
        let Some(field) = rt.field(offset) else {
            return Err(reject(ErrorCode::E2008, "no such field in record"));
        };
        let ty = field.ty.clone();
        if field.attrs.contains(FieldAttrs::DEPRECATED) {
            self.deprecated(span, format!("deprecated ({}${name})", base));
        }
        Ok((offset, ty))
    }

    /// `base$name`.
    pub fn field(&mut self, base: Expr, name: &str, span: Span) -> Expr {
        let resolved = self.resolve_field(&base, name, span);
        let offset = resolved.as_ref().map_or(0, |(o, _)| *o);
        let kind = ExprKind::Field {
            base: Box::new(base),
            offset,
            name: Arc::from(name),
        };
        self.seal(kind, span, resolved.map(|(_, ty)| ty))
    }

    /// `base?$name`.
    pub fn has_field(&mut self, base: Expr, name: &str, span: Span) -> Expr {
        let resolved = self.resolve_field(&base, name, span);
        let offset = resolved.as_ref().map_or(0, |(o, _)| *o);
        let kind = ExprKind::HasField {
            base: Box::new(base),
            offset,
            name: Arc::from(name),
        };
        self.seal(kind, span, resolved.map(|_| Type::base(TypeTag::Bool)))
    }

    /// `$name = value` inside a record constructor.
    pub fn field_assign(&mut self, name: &str, value: Expr, span: Span) -> Expr {
        let typed = operands_ok(&[&value]).map(|()| value.ty().clone());
        let kind = ExprKind::FieldAssign {
            name: Arc::from(name),
            value: Box::new(value),
        };
        self.seal(kind, span, typed)
    }

    /// `[$a = x, $b = y]`, typed as an anonymous record.
    pub fn record_constructor(&mut self, list: Expr, span: Span) -> Expr {
        let typed = operands_ok(&[&list]).and_then(|()| {
            let mut fields = Vec::new();
            for e in list.list_exprs().unwrap_or_default() {
                match e.kind() {
                    ExprKind::FieldAssign { name, value } => {
                        fields.push(FieldDecl::new(name, value.ty().clone()));
                    }
                    _ => return Err(reject(ErrorCode::E2008, "bad type in record constructor")),
                }
            }
            Ok(Type::record(RecordType::new(fields)))
        });
        self.seal(ExprKind::RecordConstructor(Box::new(list)), span, typed)
    }

    /// `table([k] = v, ...)`, optionally with a declared type.
    pub fn table_constructor(&mut self, mut list: Expr, ty: Option<Type>, span: Span) -> Expr {
        let typed = operands_ok(&[&list]).and_then(|()| {
            let ty = match ty {
                Some(t) => {
                    if t.tag() != TypeTag::Table || t.is_set() {
                        return Err(reject(ErrorCode::E2010, "bad table constructor type"));
                    }
                    t
                }
                None if list.list_exprs().is_some_and(<[Expr]>::is_empty) => {
                    return Ok(Type::unspecified_table());
                }
                None => infer_table_type(&list)?,
            };
            let Some(table) = ty.as_table() else {
                return Err(reject(ErrorCode::E2010, "bad table constructor type"));
            };
            let (indices, yield_type) = (table.indices.clone(), table.yield_type.clone());
            let inconsistent = || reject(ErrorCode::E2010, "inconsistent types in table constructor");
            for item in list.list_exprs_mut().into_iter().flatten() {
                let ExprKind::Assign { target, value, .. } = item.kind_mut() else {
                    return Err(inconsistent());
                };
                if target.tag() != ExprTag::List {
                    return Err(inconsistent());
                }
                check::promote_exprs(self, target, &indices).map_err(|_| inconsistent())?;
                if let Some(y) = &yield_type {
                    check::promote_expr(self, value, y).map_err(|_| inconsistent())?;
                }
            }
            Ok(ty)
        });
        self.seal(ExprKind::TableConstructor(Box::new(list)), span, typed)
    }

    /// `set(a, b, ...)`, optionally with a declared type.
    pub fn set_constructor(&mut self, mut list: Expr, ty: Option<Type>, span: Span) -> Expr {
        let typed = operands_ok(&[&list]).and_then(|()| {
            let ty = match ty {
                Some(t) => {
                    if !t.is_set() {
                        return Err(reject(ErrorCode::E2010, "bad set constructor type"));
                    }
                    t
                }
                None if list.list_exprs().is_some_and(<[Expr]>::is_empty) => {
                    return Ok(Type::unspecified_table());
                }
                None => infer_set_type(&list)?,
            };
            let indices = ty.as_table().map(|t| t.indices.clone()).unwrap_or_default();
            if let [single] = indices.as_slice() {
                check::promote_exprs_to_type(self, &mut list, single).map_err(|_| {
                    reject(ErrorCode::E2010, "inconsistent type in set constructor")
                })?;
            } else {
                let inconsistent =
                    || reject(ErrorCode::E2010, "inconsistent types in set constructor");
                for item in list.list_exprs_mut().into_iter().flatten() {
                    if item.tag() != ExprTag::List {
                        return Err(inconsistent());
                    }
                    check::promote_exprs(self, item, &indices).map_err(|_| inconsistent())?;
                }
                retype_list(&mut list);
            }
            Ok(ty)
        });
        self.seal(ExprKind::SetConstructor(Box::new(list)), span, typed)
    }

    /// `vector(a, b, ...)`, optionally with a declared type.
    pub fn vector_constructor(&mut self, mut list: Expr, ty: Option<Type>, span: Span) -> Expr {
        let typed = operands_ok(&[&list]).and_then(|()| {
            let inconsistent = || reject(ErrorCode::E2010, "inconsistent types in vector constructor");
            let ty = match ty {
                Some(t) => {
                    if t.tag() != TypeTag::Vector {
                        return Err(reject(ErrorCode::E2010, "bad vector constructor type"));
                    }
                    t
                }
                None => {
                    let types: Vec<Type> = list
                        .list_exprs()
                        .unwrap_or_default()
                        .iter()
                        .map(|e| e.ty().clone())
                        .collect();
                    if types.is_empty() {
                        return Ok(Type::unspecified_vector());
                    }
                    Type::vector(merge_types(&types).ok_or_else(inconsistent)?)
                }
            };
            let elem = ty.flatten_vector().clone();
            check::promote_exprs_to_type(self, &mut list, &elem).map_err(|_| inconsistent())?;
            Ok(ty)
        });
        self.seal(ExprKind::VectorConstructor(Box::new(list)), span, typed)
    }
}

/// Table type implied by `[k1, k2] = v` items.
fn infer_table_type(list: &Expr) -> Typed {
    let not_a_table = || {
        reject(
            ErrorCode::E2010,
            "values in table(...) constructor do not specify a table",
        )
    };
    let items = list.list_exprs().unwrap_or_default();
    let mut indices: Option<Vec<Type>> = None;
    let mut yields = Vec::with_capacity(items.len());
    for item in items {
        let ExprKind::Assign { target, value, .. } = item.kind() else {
            return Err(not_a_table());
        };
        let Some(keys) = target.list_exprs() else {
            return Err(not_a_table());
        };
        if indices.is_none() {
            indices = Some(keys.iter().map(|k| k.ty().clone()).collect());
        }
        yields.push(value.ty().clone());
    }
    let indices = indices.ok_or_else(not_a_table)?;
    let yield_type = merge_types(&yields).ok_or_else(|| {
        reject(ErrorCode::E2010, "inconsistent types in table constructor")
    })?;
    Ok(Type::table(indices, yield_type))
}

/// Set type implied by its elements; list elements form composite indices.
fn infer_set_type(list: &Expr) -> Typed {
    let items = list.list_exprs().unwrap_or_default();
    let Some(first) = items.first() else {
        return Ok(Type::unspecified_table());
    };
    if let Some(keys) = first.list_exprs() {
        return Ok(Type::set(keys.iter().map(|k| k.ty().clone()).collect()));
    }
    let types: Vec<Type> = items.iter().map(|e| e.ty().clone()).collect();
    let elem = merge_types(&types).ok_or_else(|| {
        reject(ErrorCode::E2010, "inconsistent type in set constructor")
    })?;
    Ok(Type::set(vec![elem]))
}
