//! Record types and field declarations.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use super::Type;
use crate::{EvalResult, Value};

bitflags! {
    /// Attributes declared on a record field or parameter.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FieldAttrs: u8 {
        /// The field may be left unset.
        const OPTIONAL = 1 << 0;
        /// The field carries a default value.
        const DEFAULT = 1 << 1;
        /// The field is written to logs.
        const LOG = 1 << 2;
        /// Use of the field is deprecated.
        const DEPRECATED = 1 << 3;
    }
}

/// Produces the value of a `&default` attribute.
///
/// Evaluated each time the default is needed, so mutable defaults
/// (an empty table, a fresh vector) are never shared between records.
pub trait DefaultValue: Send + Sync {
    fn eval_default(&self) -> EvalResult;

    /// Text of the default as written in the declaration.
    fn describe(&self) -> String;
}

/// A default that is a fixed value, deep-copied on every use.
pub struct ValueDefault(pub Value);

impl DefaultValue for ValueDefault {
    fn eval_default(&self) -> EvalResult {
        Ok(self.0.deep_clone())
    }

    fn describe(&self) -> String {
        self.0.to_string()
    }
}

/// One field of a record type.
#[derive(Clone)]
pub struct FieldDecl {
    pub name: Arc<str>,
    pub ty: Type,
    pub attrs: FieldAttrs,
    pub default: Option<Arc<dyn DefaultValue>>,
}

impl FieldDecl {
    pub fn new(name: &str, ty: Type) -> Self {
        FieldDecl {
            name: Arc::from(name),
            ty,
            attrs: FieldAttrs::empty(),
            default: None,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.attrs |= FieldAttrs::OPTIONAL;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Arc<dyn DefaultValue>) -> Self {
        self.attrs |= FieldAttrs::DEFAULT;
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: FieldAttrs) -> Self {
        self.attrs |= attrs;
        self
    }

    pub fn is_optional(&self) -> bool {
        self.attrs.contains(FieldAttrs::OPTIONAL)
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl fmt::Debug for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDecl")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("attrs", &self.attrs)
            .field("default", &self.default.as_ref().map(|d| d.describe()))
            .finish()
    }
}

/// Record type: optional name plus ordered fields.
#[derive(Clone, Debug)]
pub struct RecordType {
    name: Option<Arc<str>>,
    fields: Arc<[FieldDecl]>,
}

impl RecordType {
    pub fn new(fields: Vec<FieldDecl>) -> Self {
        RecordType {
            name: None,
            fields: fields.into(),
        }
    }

    pub fn named(name: &str, fields: Vec<FieldDecl>) -> Self {
        RecordType {
            name: Some(Arc::from(name)),
            fields: fields.into(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, offset: usize) -> Option<&FieldDecl> {
        self.fields.get(offset)
    }

    pub fn field_offset(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| &*f.name == name)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            return f.write_str(name);
        }
        write!(f, "record {{")?;
        for field in self.fields.iter() {
            write!(f, " {}: {};", field.name, field.ty)?;
        }
        write!(f, " }}")
    }
}
