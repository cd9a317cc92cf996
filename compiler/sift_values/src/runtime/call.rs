//! The call layer.

use super::{Frame, Id, SuspendToken};
use crate::errors::EvalError;
use crate::types::Type;
use crate::value::{FuncVal, Value};

/// What a callee produced.
#[derive(Clone, Debug)]
pub enum CallOutcome {
    Value(Value),
    /// Returned without a value (void function, hook body).
    NoValue,
    /// Deferred on an asynchronous operation; resumed via the trigger cache.
    Suspended(SuspendToken),
}

/// A resolved function, event handler body or built-in.
pub trait Callable: Send + Sync {
    fn name(&self) -> &str;

    /// Function type of this callable.
    fn ty(&self) -> Type;

    fn is_builtin(&self) -> bool {
        false
    }

    /// Calling has no observable side effects.
    fn is_pure(&self) -> bool {
        false
    }

    fn call(&self, args: Vec<Value>, frame: &mut dyn Frame) -> Result<CallOutcome, EvalError>;
}

/// The compiled body of an anonymous function, instantiated per evaluation.
pub trait ClosureTemplate: Send + Sync {
    fn name(&self) -> &str;

    fn ty(&self) -> Type;

    /// Outer identifiers the body refers to.
    fn outer_ids(&self) -> &[Id];

    /// Bind captured values and produce a callable function value.
    fn instantiate(&self, captures: Vec<(Id, Option<Value>)>) -> Result<FuncVal, EvalError>;
}
