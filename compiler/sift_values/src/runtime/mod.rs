//! Interfaces between the engine and the runtime that drives it.
//!
//! - [`Id`]: identifier bindings (global cells or frame slots)
//! - [`Frame`]: one activation's bindings plus the suspended-call cache
//! - [`Callable`] / [`ClosureTemplate`]: the call layer
//! - [`EventRegistry`] / [`EventSink`]: event dispatch and timers
//! - [`EvalMode`]: interpretation policy

mod call;
mod call_stack;
mod event;
mod frame;
mod id;
mod mode;

pub use call::{CallOutcome, Callable, ClosureTemplate};
pub use call_stack::{CallFrame, CallStack};
pub use event::{EventHandler, EventRegistry, EventSink};
pub use frame::{Frame, SuspendToken, TriggerCache};
pub use id::{Id, IdFlags, IdScope};
pub use mode::EvalMode;

#[cfg(test)]
mod tests;
