//! Vectors with absent-slot support.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{ContainerError, Value};
use crate::lattice::same_type;
use crate::types::{Type, TypeTag};

struct VectorInner {
    ty: Type,
    slots: RwLock<Vec<Option<Value>>>,
}

/// Shared vector. `None` slots are absent elements, a legitimate value-level
/// null that only exists inside aggregates.
#[derive(Clone)]
pub struct VectorVal(Arc<VectorInner>);

impl VectorVal {
    pub fn new(ty: Type) -> Self {
        Self::from_slots(ty, Vec::new())
    }

    pub fn from_slots(ty: Type, slots: Vec<Option<Value>>) -> Self {
        VectorVal(Arc::new(VectorInner {
            ty,
            slots: RwLock::new(slots),
        }))
    }

    /// Vector type of this value.
    pub fn ty(&self) -> &Type {
        &self.0.ty
    }

    pub fn yield_type(&self) -> Type {
        self.0
            .ty
            .vector_yield()
            .cloned()
            .unwrap_or_else(|| Type::base(TypeTag::Any))
    }

    pub fn len(&self) -> usize {
        self.0.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.slots.read().is_empty()
    }

    pub fn ptr_eq(&self, other: &VectorVal) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Element at `i`; `None` when absent or out of range.
    pub fn get(&self, i: usize) -> Option<Value> {
        self.0.slots.read().get(i).cloned().flatten()
    }

    pub fn slots(&self) -> Vec<Option<Value>> {
        self.0.slots.read().clone()
    }

    /// Whether `value` may be stored in this vector.
    pub fn accepts(&self, value: &Value) -> bool {
        let yield_type = self.yield_type();
        matches!(yield_type.tag(), TypeTag::Any | TypeTag::Void)
            || same_type(&value.ty(), &yield_type)
    }

    fn check(&self, value: Option<&Value>) -> Result<(), ContainerError> {
        match value {
            Some(v) if !self.accepts(v) => Err(ContainerError::VectorElementType {
                ty: v.ty().to_string(),
                value: v.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Store at `i`, growing with absent slots as needed.
    pub fn assign(&self, i: usize, value: Option<Value>) -> Result<(), ContainerError> {
        self.check(value.as_ref())?;
        let mut slots = self.0.slots.write();
        if i >= slots.len() {
            let len = i.checked_add(1).ok_or(ContainerError::IndexTooLarge(i))?;
            let additional = len.saturating_sub(slots.len());
            slots
                .try_reserve_exact(additional)
                .map_err(|_| ContainerError::IndexTooLarge(i))?;
            slots.resize(len, None);
        }
        slots[i] = value;
        Ok(())
    }

    pub fn push(&self, value: Option<Value>) -> Result<(), ContainerError> {
        self.check(value.as_ref())?;
        self.0.slots.write().push(value);
        Ok(())
    }

    /// Remove the half-open range `[first, last)`, clamped to the length.
    pub fn remove_range(&self, first: usize, last: usize) {
        let mut slots = self.0.slots.write();
        let last = last.min(slots.len());
        if first < last {
            slots.drain(first..last);
        }
    }

    /// Insert `values` starting at `at` (clamped to the length).
    pub fn insert_slots(&self, at: usize, values: Vec<Option<Value>>) -> Result<(), ContainerError> {
        for v in values.iter().flatten() {
            self.check(Some(v))?;
        }
        let mut slots = self.0.slots.write();
        let at = at.min(slots.len());
        slots.splice(at..at, values);
        Ok(())
    }

    pub fn deep_clone(&self) -> VectorVal {
        let slots = self
            .slots()
            .iter()
            .map(|s| s.as_ref().map(Value::deep_clone))
            .collect();
        VectorVal::from_slots(self.0.ty.clone(), slots)
    }
}

impl fmt::Display for VectorVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, slot) in self.slots().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if let Some(v) = slot {
                write!(f, "{v}")?;
            }
        }
        write!(f, "]")
    }
}
