//! A concrete activation frame and an in-memory event queue.
//!
//! [`LocalFrame`] is what the statement executor hands to `Expr::eval`: slot
//! bindings indexed by identifier offset, the trigger cache consulted by
//! call nodes, the call stack used for recursion limits and backtraces, and
//! an optional [`EventQueue`] receiving raised events and armed timers.

use std::sync::Arc;

use sift_ir::{ExprId, Span};
use sift_values::{
    budget_exceeded, CallFrame, CallStack, EvalBacktrace, EvalError, EvalMode, EventHandler,
    EventSink, Frame, TriggerCache, Value,
};

/// An event waiting for dispatch.
#[derive(Clone, Debug)]
pub struct QueuedEvent {
    pub handler: EventHandler,
    pub args: Vec<Value>,
    /// Absolute firing time for scheduled events; `None` for immediate ones.
    pub when: Option<f64>,
}

/// Event sink that records everything it is given, in order.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    network_time: f64,
    events: Vec<QueuedEvent>,
}

impl EventQueue {
    /// Create an empty queue whose clock reads `network_time`.
    pub fn new(network_time: f64) -> Self {
        EventQueue {
            network_time,
            events: Vec::new(),
        }
    }

    pub fn set_network_time(&mut self, t: f64) {
        self.network_time = t;
    }

    /// Events queued so far, in the order they were raised.
    pub fn events(&self) -> &[QueuedEvent] {
        &self.events
    }

    /// Remove and return every queued event.
    pub fn drain(&mut self) -> Vec<QueuedEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventQueue {
    fn queue_event(&mut self, handler: &EventHandler, args: Vec<Value>) {
        self.events.push(QueuedEvent {
            handler: handler.clone(),
            args,
            when: None,
        });
    }

    fn schedule(&mut self, when: f64, handler: &EventHandler, args: Vec<Value>) {
        self.events.push(QueuedEvent {
            handler: handler.clone(),
            args,
            when: Some(when),
        });
    }

    fn network_time(&self) -> f64 {
        self.network_time
    }
}

/// Bindings and runtime context for one activation.
///
/// # Call accounting
/// `enter_call` pushes onto the call stack, which enforces the depth limit.
/// Under [`EvalMode::ConstFold`] each call also draws from the mode's call
/// budget; running out is an error rather than a silent stop.
pub struct LocalFrame {
    slots: Vec<Option<Value>>,
    trigger: Option<TriggerCache>,
    call_site: Option<ExprId>,
    call_stack: CallStack,
    events: Option<EventQueue>,
    mode: EvalMode,
    calls_made: u32,
}

impl LocalFrame {
    /// Create a frame with `size` unset slots in interpreter mode.
    pub fn new(size: usize) -> Self {
        LocalFrame {
            slots: vec![None; size],
            trigger: None,
            call_site: None,
            call_stack: CallStack::new(None),
            events: None,
            mode: EvalMode::Interpret,
            calls_made: 0,
        }
    }

    /// Switch evaluation mode. The call stack takes the mode's depth limit.
    #[must_use]
    pub fn with_mode(mut self, mode: EvalMode) -> Self {
        self.call_stack = CallStack::new(mode.max_call_depth());
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.call_stack = CallStack::new(Some(depth));
        self
    }

    /// Attach a trigger cache holding results of earlier suspended calls.
    #[must_use]
    pub fn with_trigger(mut self, cache: TriggerCache) -> Self {
        self.trigger = Some(cache);
        self
    }

    #[must_use]
    pub fn with_event_queue(mut self, queue: EventQueue) -> Self {
        self.events = Some(queue);
        self
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn event_queue(&self) -> Option<&EventQueue> {
        self.events.as_ref()
    }

    pub fn event_queue_mut(&mut self) -> Option<&mut EventQueue> {
        self.events.as_mut()
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// Number of calls made so far under a call budget.
    pub fn calls_made(&self) -> u32 {
        self.calls_made
    }
}

impl Frame for LocalFrame {
    fn local(&self, offset: usize) -> Option<Value> {
        self.slots.get(offset).cloned().flatten()
    }

    fn set_local(&mut self, offset: usize, value: Option<Value>) {
        if offset >= self.slots.len() {
            self.slots.resize(offset.saturating_add(1), None);
        }
        if let Some(slot) = self.slots.get_mut(offset) {
            *slot = value;
        }
    }

    fn trigger(&self) -> Option<&TriggerCache> {
        self.trigger.as_ref()
    }

    fn trigger_mut(&mut self) -> Option<&mut TriggerCache> {
        self.trigger.as_mut()
    }

    fn call_site(&self) -> Option<ExprId> {
        self.call_site
    }

    fn set_call_site(&mut self, site: Option<ExprId>) {
        self.call_site = site;
    }

    fn enter_call(&mut self, name: &str, span: Span) -> Result<(), EvalError> {
        if let Some(budget) = self.mode.call_budget() {
            if self.calls_made >= budget {
                tracing::debug!(budget, "call budget exhausted");
                return Err(budget_exceeded());
            }
            self.calls_made = self.calls_made.saturating_add(1);
        }
        self.call_stack.push(CallFrame {
            name: Arc::from(name),
            call_span: Some(span),
        })
    }

    fn exit_call(&mut self) {
        self.call_stack.pop();
    }

    fn backtrace(&self) -> EvalBacktrace {
        self.call_stack.capture()
    }

    fn event_sink(&mut self) -> Option<&mut dyn EventSink> {
        self.events.as_mut().map(|q| q as &mut dyn EventSink)
    }

    fn mode(&self) -> &EvalMode {
        &self.mode
    }
}
