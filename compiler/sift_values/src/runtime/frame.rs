//! Activation frames and the suspended-call cache.

use rustc_hash::FxHashMap;
use sift_ir::{ExprId, Span};

use super::{EvalMode, EventSink};
use crate::errors::{EvalBacktrace, EvalError};
use crate::value::Value;

/// Identifies the call node that suspended.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SuspendToken {
    site: ExprId,
}

impl SuspendToken {
    pub fn new(site: ExprId) -> Self {
        SuspendToken { site }
    }

    pub fn site(self) -> ExprId {
        self.site
    }
}

/// Results of calls that suspended on an earlier pass, keyed by call node.
///
/// Resuming re-walks the same tree; a call node finding its own entry
/// substitutes the cached value instead of invoking the callee again.
#[derive(Clone, Debug, Default)]
pub struct TriggerCache {
    results: FxHashMap<ExprId, Value>,
}

impl TriggerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, site: ExprId) -> Option<&Value> {
        self.results.get(&site)
    }

    /// Record the result delivered for a suspended call.
    pub fn cache(&mut self, token: SuspendToken, value: Value) {
        self.results.insert(token.site(), value);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Variable bindings and call context for one activation.
pub trait Frame {
    /// Value bound to local slot `offset`.
    fn local(&self, offset: usize) -> Option<Value>;

    fn set_local(&mut self, offset: usize, value: Option<Value>);

    /// Cache of results for calls suspended on an earlier pass.
    fn trigger(&self) -> Option<&TriggerCache>;

    fn trigger_mut(&mut self) -> Option<&mut TriggerCache>;

    /// Call node currently being invoked from this frame.
    fn call_site(&self) -> Option<ExprId>;

    fn set_call_site(&mut self, site: Option<ExprId>);

    /// Push a call record; fails when the depth or budget limit is hit.
    fn enter_call(&mut self, name: &str, span: Span) -> Result<(), EvalError>;

    fn exit_call(&mut self);

    /// Snapshot of the active calls, innermost first.
    fn backtrace(&self) -> EvalBacktrace;

    /// Destination for queued events and timers, if any.
    fn event_sink(&mut self) -> Option<&mut dyn EventSink>;

    fn mode(&self) -> &EvalMode;
}
