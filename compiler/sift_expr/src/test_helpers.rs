//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use sift_diagnostic::{DiagnosticConfig, ErrorCode};
use sift_ir::Span;
use sift_values::{
    CallOutcome, Callable, EvalError, FieldDecl, Frame, FuncFlavor, FuncVal, Id, IdFlags,
    RecordType, Type, TypeTag, Value, ValueDefault, VectorVal,
};

use crate::builder::ExprBuilder;
use crate::config::BuilderConfig;
use crate::frame::LocalFrame;
use crate::node::Expr;

pub(crate) fn sp() -> Span {
    Span::new(0, 1)
}

pub(crate) fn t(tag: TypeTag) -> Type {
    Type::base(tag)
}

/// Builder reporting every diagnostic, unfiltered.
pub(crate) fn builder() -> ExprBuilder {
    ExprBuilder::with_config(
        BuilderConfig::default().with_diagnostics(DiagnosticConfig::unlimited()),
    )
}

pub(crate) fn local(name: &str, ty: Type, offset: usize) -> Id {
    Id::new_local(name, ty, offset, IdFlags::empty())
}

pub(crate) fn global(name: &str, ty: Type) -> Id {
    Id::new_global(name, ty, IdFlags::empty())
}

pub(crate) fn int(b: &mut ExprBuilder, i: i64) -> Expr {
    b.constant(Value::Int(i), sp())
}

pub(crate) fn count(b: &mut ExprBuilder, c: u64) -> Expr {
    b.constant(Value::Count(c), sp())
}

pub(crate) fn double(b: &mut ExprBuilder, d: f64) -> Expr {
    b.constant(Value::Double(d), sp())
}

pub(crate) fn string(b: &mut ExprBuilder, s: &str) -> Expr {
    b.constant(Value::string(s), sp())
}

pub(crate) fn boolean(b: &mut ExprBuilder, v: bool) -> Expr {
    b.constant(Value::Bool(v), sp())
}

/// Error messages reported so far, in order.
pub(crate) fn errors(b: &ExprBuilder) -> Vec<String> {
    b.diagnostics()
        .filter(|d| d.is_error())
        .map(|d| d.message.clone())
        .collect()
}

/// Warning codes and messages reported so far, in order.
pub(crate) fn warnings(b: &ExprBuilder) -> Vec<(ErrorCode, String)> {
    b.diagnostics()
        .filter(|d| !d.is_error())
        .map(|d| (d.code, d.message.clone()))
        .collect()
}

/// Evaluate `e` in an empty interpreter frame.
pub(crate) fn eval_in_empty(e: &Expr) -> Result<Value, EvalError> {
    let mut frame = LocalFrame::new(0);
    e.eval(&mut frame)
}

pub(crate) fn int_vector(vals: &[i64]) -> Value {
    let slots = vals.iter().map(|i| Some(Value::Int(*i))).collect();
    Value::Vector(VectorVal::from_slots(Type::vector(t(TypeTag::Int)), slots))
}

pub(crate) fn vector_ints(v: &Value) -> Vec<Option<i64>> {
    v.as_vector()
        .map(|vec| {
            vec.slots()
                .into_iter()
                .map(|s| s.and_then(|x| x.coerce_to_int()))
                .collect()
        })
        .unwrap_or_default()
}

/// `record { host: addr; port: count; note: string &optional; tries: count &default=3 }`
pub(crate) fn conn_type() -> Type {
    Type::record(RecordType::named(
        "conn",
        vec![
            FieldDecl::new("host", t(TypeTag::Addr)),
            FieldDecl::new("port", t(TypeTag::Count)),
            FieldDecl::new("note", t(TypeTag::String)).optional(),
            FieldDecl::new("tries", t(TypeTag::Count))
                .with_default(Arc::new(ValueDefault(Value::Count(3)))),
        ],
    ))
}

/// A function that records its arguments and returns a fixed value.
pub(crate) struct RecordingFn {
    name: String,
    ty: Type,
    result: Value,
    calls: AtomicUsize,
    args: Mutex<Vec<Vec<Value>>>,
}

impl RecordingFn {
    pub(crate) fn new(name: &str, params: Vec<FieldDecl>, result: Value) -> Arc<Self> {
        let ty = Type::func(
            FuncFlavor::Function,
            RecordType::new(params),
            Some(result.ty()),
        );
        Arc::new(RecordingFn {
            name: name.to_string(),
            ty,
            result,
            calls: AtomicUsize::new(0),
            args: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub(crate) fn last_args(&self) -> Option<Vec<Value>> {
        self.args.lock().last().cloned()
    }
}

impl Callable for RecordingFn {
    fn name(&self) -> &str {
        &self.name
    }

    fn ty(&self) -> Type {
        self.ty.clone()
    }

    fn call(&self, args: Vec<Value>, _frame: &mut dyn Frame) -> Result<CallOutcome, EvalError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.args.lock().push(args);
        Ok(CallOutcome::Value(self.result.clone()))
    }
}

/// Global identifier bound to `f`.
pub(crate) fn bind_fn(f: Arc<RecordingFn>) -> Id {
    let id = global(&f.name, f.ty.clone());
    id.set_global_value(Some(Value::Func(FuncVal::new(f))));
    id
}
