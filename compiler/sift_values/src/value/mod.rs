//! Runtime values.
//!
//! Scalars are stored inline. Strings, patterns and lists are immutable
//! shared slices. Tables, vectors and records are shared mutable containers:
//! cloning a [`Value`] aliases them, [`Value::deep_clone`] copies them.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

mod key;
mod net;
mod pattern;
mod record;
mod table;
mod vector;

pub use key::{HashKey, KeyAtom};
pub use net::{addr_bytes, addr_cmp, PortVal, Proto, SubnetVal};
pub use pattern::PatternVal;
pub use record::RecordVal;
pub use table::{TableEntry, TableVal};
pub use vector::VectorVal;

use crate::lattice::same_type;
use crate::runtime::Callable;
use crate::types::{InternalTag, Type, TypeKind, TypeTag};

/// Failure of a container or value-construction operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error("type cannot be used as table index: {0}")]
    Unhashable(String),
    #[error("bad {family} subnet prefix length: {width}")]
    BadPrefix { family: &'static str, width: i64 },
    #[error("vector index assignment failed for invalid type '{ty}', value: {value}")]
    VectorElementType { ty: String, value: String },
    #[error("vector index too large: {0}")]
    IndexTooLarge(usize),
    #[error("record type required, found {0}")]
    NotARecord(String),
    #[error("table assignment requires a value")]
    MissingYield,
    #[error("invalid pattern: {0}")]
    Pattern(String),
}

/// A function value.
#[derive(Clone)]
pub struct FuncVal(Arc<dyn Callable>);

impl FuncVal {
    pub fn new(callable: Arc<dyn Callable>) -> Self {
        FuncVal(callable)
    }

    pub fn callable(&self) -> &dyn Callable {
        &*self.0
    }

    pub fn ptr_eq(&self, other: &FuncVal) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

/// A runtime datum.
#[derive(Clone)]
pub enum Value {
    /// Result of expressions evaluated only for effect (events, schedules).
    Void,
    Bool(bool),
    Int(i64),
    Count(u64),
    Counter(u64),
    Double(f64),
    /// Absolute time in seconds since the epoch.
    Time(f64),
    /// Duration in seconds.
    Interval(f64),
    Str(Arc<[u8]>),
    Pattern(PatternVal),
    /// Enum type and ordinal.
    Enum(Type, i64),
    Port(PortVal),
    Addr(IpAddr),
    Subnet(SubnetVal),
    Table(TableVal),
    Vector(VectorVal),
    Record(RecordVal),
    List(Arc<[Value]>),
    Func(FuncVal),
    Type(Type),
}

impl Value {
    pub fn string(s: &str) -> Value {
        Value::Str(Arc::from(s.as_bytes()))
    }

    pub fn bytes(b: &[u8]) -> Value {
        Value::Str(Arc::from(b))
    }

    pub fn list(vals: Vec<Value>) -> Value {
        Value::List(vals.into())
    }

    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Void => TypeTag::Void,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Count(_) => TypeTag::Count,
            Value::Counter(_) => TypeTag::Counter,
            Value::Double(_) => TypeTag::Double,
            Value::Time(_) => TypeTag::Time,
            Value::Interval(_) => TypeTag::Interval,
            Value::Str(_) => TypeTag::String,
            Value::Pattern(_) => TypeTag::Pattern,
            Value::Enum(..) => TypeTag::Enum,
            Value::Port(_) => TypeTag::Port,
            Value::Addr(_) => TypeTag::Addr,
            Value::Subnet(_) => TypeTag::Subnet,
            Value::Table(_) => TypeTag::Table,
            Value::Vector(_) => TypeTag::Vector,
            Value::Record(_) => TypeTag::Record,
            Value::List(_) => TypeTag::List,
            Value::Func(_) => TypeTag::Func,
            Value::Type(_) => TypeTag::Type,
        }
    }

    pub fn internal(&self) -> InternalTag {
        self.tag().internal()
    }

    /// Dynamic type of this value.
    pub fn ty(&self) -> Type {
        match self {
            Value::Enum(ty, _) => ty.clone(),
            Value::Table(t) => t.ty().clone(),
            Value::Vector(v) => v.ty().clone(),
            Value::Record(r) => r.ty().clone(),
            Value::List(vals) => Type::list(vals.iter().map(Value::ty).collect()),
            Value::Func(f) => f.callable().ty(),
            Value::Type(t) => Type::new(TypeKind::TypeOf(t.clone())),
            scalar => Type::base(scalar.tag()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableVal> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorVal> {
        match self {
            Value::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordVal> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(vals) => Some(&**vals),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncVal> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&PatternVal> {
        match self {
            Value::Pattern(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_addr(&self) -> Option<IpAddr> {
        match self {
            Value::Addr(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_subnet(&self) -> Option<SubnetVal> {
        match self {
            Value::Subnet(s) => Some(*s),
            _ => None,
        }
    }

    /// Signed view of an integral-, boolean- or double-represented value.
    #[expect(
        clippy::cast_possible_wrap,
        clippy::cast_possible_truncation,
        reason = "Coercion follows the target representation; wrapping is the defined behavior"
    )]
    pub fn coerce_to_int(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(i) | Value::Enum(_, i) => Some(*i),
            Value::Count(c) | Value::Counter(c) => Some(*c as i64),
            Value::Port(p) => Some(p.internal() as i64),
            Value::Double(d) | Value::Time(d) | Value::Interval(d) => Some(*d as i64),
            _ => None,
        }
    }

    /// Unsigned view of an integral-, boolean- or double-represented value.
    #[expect(
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation,
        reason = "Coercion follows the target representation; wrapping is the defined behavior"
    )]
    pub fn coerce_to_unsigned(&self) -> Option<u64> {
        match self {
            Value::Bool(b) => Some(u64::from(*b)),
            Value::Int(i) | Value::Enum(_, i) => Some(*i as u64),
            Value::Count(c) | Value::Counter(c) => Some(*c),
            Value::Port(p) => Some(p.internal()),
            Value::Double(d) | Value::Time(d) | Value::Interval(d) => Some(*d as u64),
            _ => None,
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "Widening to double is the defined promotion"
    )]
    pub fn coerce_to_double(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            Value::Int(i) | Value::Enum(_, i) => Some(*i as f64),
            Value::Count(c) | Value::Counter(c) => Some(*c as f64),
            Value::Double(d) | Value::Time(d) | Value::Interval(d) => Some(*d),
            _ => None,
        }
    }

    /// Numeric zero or `false`.
    pub fn is_zero(&self) -> bool {
        match self.internal() {
            InternalTag::Int => self.coerce_to_int() == Some(0),
            InternalTag::Unsigned => self.coerce_to_unsigned() == Some(0),
            InternalTag::Double => self.coerce_to_double() == Some(0.0),
            _ => false,
        }
    }

    pub fn is_one(&self) -> bool {
        match self.internal() {
            InternalTag::Int => self.coerce_to_int() == Some(1),
            InternalTag::Unsigned => self.coerce_to_unsigned() == Some(1),
            InternalTag::Double => self.coerce_to_double() == Some(1.0),
            _ => false,
        }
    }

    /// Copy containers recursively; scalars and immutable values are shared.
    #[must_use]
    pub fn deep_clone(&self) -> Value {
        match self {
            Value::Table(t) => Value::Table(t.deep_clone()),
            Value::Vector(v) => Value::Vector(v.deep_clone()),
            Value::Record(r) => Value::Record(r.deep_clone()),
            Value::List(vals) => Value::List(vals.iter().map(Value::deep_clone).collect()),
            other => other.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Count(a), Value::Count(b)) | (Value::Counter(a), Value::Counter(b)) => a == b,
            (Value::Double(a), Value::Double(b))
            | (Value::Time(a), Value::Time(b))
            | (Value::Interval(a), Value::Interval(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a.text() == b.text(),
            (Value::Enum(ta, a), Value::Enum(tb, b)) => a == b && same_type(ta, tb),
            (Value::Port(a), Value::Port(b)) => a == b,
            (Value::Addr(a), Value::Addr(b)) => a == b,
            (Value::Subnet(a), Value::Subnet(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a.equal_to(b),
            (Value::Vector(a), Value::Vector(b)) => a.ptr_eq(b) || a.slots() == b.slots(),
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b) || a.slots() == b.slots(),
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => a.ptr_eq(b),
            (Value::Type(a), Value::Type(b)) => same_type(a, b),
            _ => false,
        }
    }
}

fn write_double(f: &mut fmt::Formatter<'_>, d: f64) -> fmt::Result {
    if d.is_finite() && d.fract() == 0.0 {
        write!(f, "{d:.1}")
    } else {
        write!(f, "{d}")
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for &b in bytes {
        match b {
            b'"' => write!(f, "\\\"")?,
            b'\\' => write!(f, "\\\\")?,
            0x20..=0x7e => write!(f, "{}", char::from(b))?,
            _ => write!(f, "\\x{b:02x}")?,
        }
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Bool(b) => write!(f, "{}", if *b { "T" } else { "F" }),
            Value::Int(i) => write!(f, "{i}"),
            Value::Count(c) | Value::Counter(c) => write!(f, "{c}"),
            Value::Double(d) | Value::Time(d) => write_double(f, *d),
            Value::Interval(d) => {
                write_double(f, *d)?;
                write!(f, " secs")
            }
            Value::Str(s) => {
                write!(f, "\"")?;
                write_escaped(f, s)?;
                write!(f, "\"")
            }
            Value::Pattern(p) => write!(f, "{p}"),
            Value::Enum(ty, ord) => match ty.as_enum().and_then(|e| e.label_of(*ord)) {
                Some(label) => f.write_str(label),
                None => write!(f, "<enum {ord}>"),
            },
            Value::Port(p) => write!(f, "{p}"),
            Value::Addr(a) => write!(f, "{a}"),
            Value::Subnet(s) => write!(f, "{s}"),
            Value::Table(t) => write!(f, "{t}"),
            Value::Vector(v) => write!(f, "{v}"),
            Value::Record(r) => write!(f, "{r}"),
            Value::List(vals) => {
                for (i, v) in vals.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
            Value::Func(func) => f.write_str(func.callable().name()),
            Value::Type(t) => write!(f, "{t}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({self})", self.tag())
    }
}
