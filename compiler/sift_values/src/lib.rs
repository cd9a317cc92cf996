#![deny(clippy::arithmetic_side_effects)]
//! Types, values and runtime interfaces consumed by the expression engine.
//!
//! Everything here is shared-ownership: [`Type`] is an immutable `Arc`,
//! container values (tables, vectors, records) are `Arc`s around a lock so
//! that cloning a [`Value`] aliases the container the way a reference does.
//! [`Value::deep_clone`] is the explicit copy.
//!
//! The runtime interfaces ([`Frame`], [`Callable`], [`EventSink`]) are the
//! seams to the statement executor, the call layer and the event loop.

mod errors;
mod lattice;
mod runtime;
mod types;
mod value;

pub use errors::{
    bad_coercion_value, bool_index_size_mismatch, budget_exceeded, count_underflow,
    division_by_zero, field_value_missing, invalid_cast, modulo_by_zero, no_such_index,
    not_indexable, recursion_limit_exceeded, type_mismatch, value_not_set,
    vector_size_mismatch, BacktraceFrame, EvalBacktrace, EvalError, EvalErrorKind, EvalNote,
    EvalResult,
};
pub use lattice::{
    arith_promotable, both_arithmetic, both_integral, can_cast, is_arithmetic, is_integral,
    max_type, record_promotion_compatible, same_attrs, same_type,
};
pub use runtime::{
    CallFrame, CallOutcome, CallStack, Callable, ClosureTemplate, EvalMode, EventHandler,
    EventRegistry, EventSink, Frame, Id, IdFlags, IdScope, SuspendToken, TriggerCache,
};
pub use types::{
    DefaultValue, EnumType, FieldAttrs, FieldDecl, FuncFlavor, FuncType, InternalTag,
    RecordType, TableType, Type, TypeKind, TypeTag, ValueDefault,
};
pub use value::{
    addr_bytes, addr_cmp, ContainerError, FuncVal, HashKey, KeyAtom, PatternVal, PortVal, Proto, RecordVal, SubnetVal,
    TableEntry, TableVal, Value, VectorVal,
};
