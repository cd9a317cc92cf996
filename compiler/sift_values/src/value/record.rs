//! Record values.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{ContainerError, Value};
use crate::errors::EvalError;
use crate::types::{RecordType, Type};

struct RecordInner {
    ty: Type,
    rt: RecordType,
    fields: RwLock<Vec<Option<Value>>>,
}

/// Shared record. Unset fields are `None`.
#[derive(Clone)]
pub struct RecordVal(Arc<RecordInner>);

impl RecordVal {
    /// Record with every field unset.
    pub fn new(ty: Type) -> Result<Self, ContainerError> {
        let rt = ty
            .as_record()
            .cloned()
            .ok_or_else(|| ContainerError::NotARecord(ty.to_string()))?;
        let fields = vec![None; rt.num_fields()];
        Ok(RecordVal(Arc::new(RecordInner {
            ty,
            rt,
            fields: RwLock::new(fields),
        })))
    }

    /// Record with every defaulted field initialised from its default.
    pub fn with_defaults(ty: Type) -> Result<Self, EvalError> {
        let rec = RecordVal::new(ty)?;
        for (i, field) in rec.0.rt.fields().iter().enumerate() {
            if let Some(default) = &field.default {
                rec.set(i, Some(default.eval_default()?));
            }
        }
        Ok(rec)
    }

    pub fn ty(&self) -> &Type {
        &self.0.ty
    }

    pub fn record_type(&self) -> &RecordType {
        &self.0.rt
    }

    pub fn num_fields(&self) -> usize {
        self.0.rt.num_fields()
    }

    pub fn ptr_eq(&self, other: &RecordVal) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn get(&self, offset: usize) -> Option<Value> {
        self.0.fields.read().get(offset).cloned().flatten()
    }

    /// Field value, falling back to the declared default when unset.
    pub fn get_or_default(&self, offset: usize) -> Result<Option<Value>, EvalError> {
        if let Some(v) = self.get(offset) {
            return Ok(Some(v));
        }
        match self.0.rt.field(offset).and_then(|f| f.default.as_ref()) {
            Some(default) => default.eval_default().map(Some),
            None => Ok(None),
        }
    }

    pub fn get_by_name(&self, name: &str) -> Option<Value> {
        self.0.rt.field_offset(name).and_then(|o| self.get(o))
    }

    /// Set or clear a field. Offsets past the end are ignored.
    pub fn set(&self, offset: usize, value: Option<Value>) {
        if let Some(slot) = self.0.fields.write().get_mut(offset) {
            *slot = value;
        }
    }

    pub fn slots(&self) -> Vec<Option<Value>> {
        self.0.fields.read().clone()
    }

    pub fn deep_clone(&self) -> RecordVal {
        let fields = self
            .slots()
            .iter()
            .map(|s| s.as_ref().map(Value::deep_clone))
            .collect();
        RecordVal(Arc::new(RecordInner {
            ty: self.0.ty.clone(),
            rt: self.0.rt.clone(),
            fields: RwLock::new(fields),
        }))
    }
}

impl fmt::Display for RecordVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (decl, slot)) in self.0.rt.fields().iter().zip(self.slots()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match slot {
                Some(v) => write!(f, "{}={v}", decl.name)?,
                None => write!(f, "{}=<uninitialized>", decl.name)?,
            }
        }
        write!(f, "]")
    }
}
