//! Event handlers and the queue they are raised into.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::types::Type;
use crate::value::Value;

struct HandlerInner {
    name: Arc<str>,
    ty: RwLock<Option<Type>>,
    used: AtomicBool,
}

/// A named event. Its type is fixed by the first declaration or raise.
#[derive(Clone)]
pub struct EventHandler(Arc<HandlerInner>);

impl EventHandler {
    pub fn new(name: &str) -> Self {
        EventHandler(Arc::new(HandlerInner {
            name: Arc::from(name),
            ty: RwLock::new(None),
            used: AtomicBool::new(false),
        }))
    }

    pub fn with_type(name: &str, ty: Type) -> Self {
        let handler = Self::new(name);
        handler.set_ty(ty);
        handler
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn ty(&self) -> Option<Type> {
        self.0.ty.read().clone()
    }

    pub fn set_ty(&self, ty: Type) {
        *self.0.ty.write() = Some(ty);
    }

    /// Note that the event is raised somewhere.
    pub fn mark_used(&self) {
        self.0.used.store(true, Ordering::Relaxed);
    }

    pub fn is_used(&self) -> bool {
        self.0.used.load(Ordering::Relaxed)
    }

    pub fn ptr_eq(&self, other: &EventHandler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventHandler({})", self.0.name)
    }
}

/// Handlers by name.
#[derive(Default)]
pub struct EventRegistry {
    handlers: RwLock<FxHashMap<Arc<str>, EventHandler>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<EventHandler> {
        self.handlers.read().get(name).cloned()
    }

    pub fn register(&self, handler: EventHandler) {
        self.handlers
            .write()
            .insert(Arc::from(handler.name()), handler);
    }

    /// Existing handler for `name`, or a fresh untyped one.
    pub fn lookup_or_register(&self, name: &str) -> EventHandler {
        tracing::trace!(event = name, "resolving event handler");
        self.handlers
            .write()
            .entry(Arc::from(name))
            .or_insert_with(|| EventHandler::new(name))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

/// The event loop as seen from expression evaluation.
pub trait EventSink {
    /// Queue `handler(args)` for dispatch after the current event.
    fn queue_event(&mut self, handler: &EventHandler, args: Vec<Value>);

    /// Raise `handler(args)` at absolute time `when`.
    fn schedule(&mut self, when: f64, handler: &EventHandler, args: Vec<Value>);

    /// Current network time, the base for relative schedules.
    fn network_time(&self) -> f64;
}
