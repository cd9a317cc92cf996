//! The static type model.
//!
//! A [`Type`] is an immutable, shared handle. Base types are interned once per
//! process; composite types are built by whoever declares them and shared by
//! every node whose result has that type.

use std::fmt;
use std::sync::{Arc, OnceLock};

mod record;

pub use record::{DefaultValue, FieldAttrs, FieldDecl, RecordType, ValueDefault};

/// Kind of a type, independent of its parameters.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub enum TypeTag {
    Void,
    Bool,
    Int,
    Count,
    Counter,
    Double,
    Time,
    Interval,
    String,
    Pattern,
    Enum,
    Port,
    Addr,
    Subnet,
    Any,
    Table,
    Record,
    List,
    Func,
    Vector,
    Type,
    Timer,
    Error,
}

impl TypeTag {
    const BASE: [TypeTag; 14] = [
        TypeTag::Void,
        TypeTag::Bool,
        TypeTag::Int,
        TypeTag::Count,
        TypeTag::Counter,
        TypeTag::Double,
        TypeTag::Time,
        TypeTag::Interval,
        TypeTag::String,
        TypeTag::Pattern,
        TypeTag::Port,
        TypeTag::Addr,
        TypeTag::Subnet,
        TypeTag::Any,
    ];

    /// Machine representation used by the fold library.
    pub const fn internal(self) -> InternalTag {
        match self {
            TypeTag::Void => InternalTag::Void,
            TypeTag::Bool | TypeTag::Int | TypeTag::Enum => InternalTag::Int,
            TypeTag::Count | TypeTag::Counter | TypeTag::Port => InternalTag::Unsigned,
            TypeTag::Double | TypeTag::Time | TypeTag::Interval => InternalTag::Double,
            TypeTag::String => InternalTag::String,
            TypeTag::Addr => InternalTag::Addr,
            TypeTag::Subnet => InternalTag::Subnet,
            _ => InternalTag::Other,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Void => "void",
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Count => "count",
            TypeTag::Counter => "counter",
            TypeTag::Double => "double",
            TypeTag::Time => "time",
            TypeTag::Interval => "interval",
            TypeTag::String => "string",
            TypeTag::Pattern => "pattern",
            TypeTag::Enum => "enum",
            TypeTag::Port => "port",
            TypeTag::Addr => "addr",
            TypeTag::Subnet => "subnet",
            TypeTag::Any => "any",
            TypeTag::Table => "table",
            TypeTag::Record => "record",
            TypeTag::List => "list",
            TypeTag::Func => "func",
            TypeTag::Vector => "vector",
            TypeTag::Type => "type",
            TypeTag::Timer => "timer",
            TypeTag::Error => "error",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Internal value representation category.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum InternalTag {
    Void,
    Int,
    Unsigned,
    Double,
    String,
    Addr,
    Subnet,
    Other,
}

/// An enumeration type: a name plus its (label, ordinal) pairs.
#[derive(Clone, Debug)]
pub struct EnumType {
    pub name: Arc<str>,
    pub labels: Vec<(Arc<str>, i64)>,
}

impl EnumType {
    pub fn label_of(&self, ordinal: i64) -> Option<&str> {
        self.labels
            .iter()
            .find(|(_, o)| *o == ordinal)
            .map(|(l, _)| &**l)
    }

    pub fn ordinal_of(&self, label: &str) -> Option<i64> {
        self.labels
            .iter()
            .find(|(l, _)| &**l == label)
            .map(|(_, o)| *o)
    }
}

/// `table[indices] of yield`, or `set[indices]` when `yield_type` is `None`.
///
/// An empty index list marks the placeholder type of an untyped `table()` /
/// `set()` constructor, which only coerces to a concrete table type.
#[derive(Clone, Debug)]
pub struct TableType {
    pub indices: Vec<Type>,
    pub yield_type: Option<Type>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FuncFlavor {
    Function,
    Event,
    Hook,
}

/// Callable signature. Parameters are a record so they can carry defaults.
#[derive(Clone, Debug)]
pub struct FuncType {
    pub flavor: FuncFlavor,
    pub params: RecordType,
    pub yield_type: Option<Type>,
}

#[derive(Clone, Debug)]
pub enum TypeKind {
    Base(TypeTag),
    Enum(EnumType),
    Table(TableType),
    /// Vector with its element type; `void` marks an unspecified vector.
    Vector(Type),
    Record(RecordType),
    List(Vec<Type>),
    Func(FuncType),
    /// The type of a type name used as a value.
    TypeOf(Type),
}

/// Shared, immutable type handle.
#[derive(Clone)]
pub struct Type(Arc<TypeKind>);

impl Type {
    pub fn new(kind: TypeKind) -> Self {
        Type(Arc::new(kind))
    }

    /// Interned base type for a parameterless tag.
    ///
    /// Tags that need parameters (table, record, ...) get a fresh base node
    /// that only serves as an error placeholder.
    pub fn base(tag: TypeTag) -> Self {
        static BASE_TYPES: OnceLock<Vec<Type>> = OnceLock::new();
        let cache = BASE_TYPES.get_or_init(|| {
            TypeTag::BASE
                .iter()
                .map(|t| Type::new(TypeKind::Base(*t)))
                .collect()
        });
        cache
            .iter()
            .find(|t| t.tag() == tag)
            .cloned()
            .unwrap_or_else(|| Type::new(TypeKind::Base(tag)))
    }

    pub fn error() -> Self {
        Type::base(TypeTag::Error)
    }

    pub fn table(indices: Vec<Type>, yield_type: Type) -> Self {
        Type::new(TypeKind::Table(TableType {
            indices,
            yield_type: Some(yield_type),
        }))
    }

    pub fn set(indices: Vec<Type>) -> Self {
        Type::new(TypeKind::Table(TableType {
            indices,
            yield_type: None,
        }))
    }

    /// Placeholder type of an empty, untyped table or set constructor.
    pub fn unspecified_table() -> Self {
        Type::set(Vec::new())
    }

    pub fn vector(yield_type: Type) -> Self {
        Type::new(TypeKind::Vector(yield_type))
    }

    /// Placeholder type of an empty, untyped vector constructor.
    pub fn unspecified_vector() -> Self {
        Type::vector(Type::base(TypeTag::Void))
    }

    pub fn record(rt: RecordType) -> Self {
        Type::new(TypeKind::Record(rt))
    }

    pub fn list(types: Vec<Type>) -> Self {
        Type::new(TypeKind::List(types))
    }

    pub fn func(flavor: FuncFlavor, params: RecordType, yield_type: Option<Type>) -> Self {
        Type::new(TypeKind::Func(FuncType {
            flavor,
            params,
            yield_type,
        }))
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    pub fn tag(&self) -> TypeTag {
        match &*self.0 {
            TypeKind::Base(tag) => *tag,
            TypeKind::Enum(_) => TypeTag::Enum,
            TypeKind::Table(_) => TypeTag::Table,
            TypeKind::Vector(_) => TypeTag::Vector,
            TypeKind::Record(_) => TypeTag::Record,
            TypeKind::List(_) => TypeTag::List,
            TypeKind::Func(_) => TypeTag::Func,
            TypeKind::TypeOf(_) => TypeTag::Type,
        }
    }

    pub fn internal(&self) -> InternalTag {
        self.tag().internal()
    }

    pub fn is_error(&self) -> bool {
        self.tag() == TypeTag::Error
    }

    pub fn ptr_eq(&self, other: &Type) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_table(&self) -> Option<&TableType> {
        match &*self.0 {
            TypeKind::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordType> {
        match &*self.0 {
            TypeKind::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncType> {
        match &*self.0 {
            TypeKind::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match &*self.0 {
            TypeKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Type]> {
        match &*self.0 {
            TypeKind::List(types) => Some(types),
            _ => None,
        }
    }

    /// Element type of a vector.
    pub fn vector_yield(&self) -> Option<&Type> {
        match &*self.0 {
            TypeKind::Vector(y) => Some(y),
            _ => None,
        }
    }

    /// Element type of a vector, value type of a table, result of a function.
    pub fn yield_type(&self) -> Option<&Type> {
        match &*self.0 {
            TypeKind::Vector(y) => Some(y),
            TypeKind::Table(t) => t.yield_type.as_ref(),
            TypeKind::Func(f) => f.yield_type.as_ref(),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        self.as_table().is_some_and(|t| t.yield_type.is_none())
    }

    pub fn is_unspecified_table(&self) -> bool {
        self.as_table().is_some_and(|t| t.indices.is_empty())
    }

    pub fn is_unspecified_vector(&self) -> bool {
        self.vector_yield().is_some_and(|y| y.tag() == TypeTag::Void)
    }

    /// Element type for vectors, the type itself otherwise.
    pub fn flatten_vector(&self) -> &Type {
        self.vector_yield().unwrap_or(self)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            TypeKind::Base(tag) => write!(f, "{tag}"),
            TypeKind::Enum(e) => f.write_str(&e.name),
            TypeKind::Table(t) => {
                let head = if t.yield_type.is_some() { "table" } else { "set" };
                write!(f, "{head}[")?;
                write_joined(f, &t.indices)?;
                write!(f, "]")?;
                if let Some(y) = &t.yield_type {
                    write!(f, " of {y}")?;
                }
                Ok(())
            }
            TypeKind::Vector(y) => write!(f, "vector of {y}"),
            TypeKind::Record(r) => write!(f, "{r}"),
            TypeKind::List(types) => write_joined(f, types),
            TypeKind::Func(func) => {
                let head = match func.flavor {
                    FuncFlavor::Function => "function",
                    FuncFlavor::Event => "event",
                    FuncFlavor::Hook => "hook",
                };
                write!(f, "{head}(")?;
                for (i, p) in func.params.fields().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", p.name, p.ty)?;
                }
                write!(f, ")")?;
                if let Some(y) = &func.yield_type {
                    write!(f, ": {y}")?;
                }
                Ok(())
            }
            TypeKind::TypeOf(inner) => write!(f, "type {inner}"),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({self})")
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[Type]) -> fmt::Result {
    for (i, t) in types.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{t}")?;
    }
    Ok(())
}
