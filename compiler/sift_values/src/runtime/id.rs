//! Identifiers.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use parking_lot::RwLock;

use crate::types::Type;
use crate::value::Value;

bitflags! {
    /// Declaration properties of an identifier.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct IdFlags: u8 {
        const CONST = 1 << 0;
        /// Redefinable only through the configuration framework.
        const OPTION = 1 << 1;
        /// Names a type rather than a value.
        const TYPE_NAME = 1 << 2;
    }
}

/// Where an identifier's value lives.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum IdScope {
    /// Process-wide cell owned by the identifier.
    Global,
    /// Slot in the active frame.
    Local(usize),
}

struct IdInner {
    name: Arc<str>,
    ty: Type,
    scope: IdScope,
    flags: IdFlags,
    global_value: RwLock<Option<Value>>,
}

/// A resolved identifier, shared by every node that names it.
#[derive(Clone)]
pub struct Id(Arc<IdInner>);

impl Id {
    pub fn new_global(name: &str, ty: Type, flags: IdFlags) -> Self {
        Self::build(name, ty, IdScope::Global, flags)
    }

    pub fn new_local(name: &str, ty: Type, offset: usize, flags: IdFlags) -> Self {
        Self::build(name, ty, IdScope::Local(offset), flags)
    }

    fn build(name: &str, ty: Type, scope: IdScope, flags: IdFlags) -> Self {
        Id(Arc::new(IdInner {
            name: Arc::from(name),
            ty,
            scope,
            flags,
            global_value: RwLock::new(None),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn ty(&self) -> &Type {
        &self.0.ty
    }

    pub fn scope(&self) -> IdScope {
        self.0.scope
    }

    pub fn flags(&self) -> IdFlags {
        self.0.flags
    }

    pub fn is_const(&self) -> bool {
        self.0.flags.contains(IdFlags::CONST)
    }

    pub fn is_option(&self) -> bool {
        self.0.flags.contains(IdFlags::OPTION)
    }

    pub fn is_type(&self) -> bool {
        self.0.flags.contains(IdFlags::TYPE_NAME)
    }

    pub fn is_global(&self) -> bool {
        self.0.scope == IdScope::Global
    }

    pub fn ptr_eq(&self, other: &Id) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Current value of a global; always `None` for locals.
    pub fn global_value(&self) -> Option<Value> {
        self.0.global_value.read().clone()
    }

    pub fn set_global_value(&self, value: Option<Value>) {
        *self.0.global_value.write() = value;
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({}: {})", self.0.name, self.0.ty)
    }
}
