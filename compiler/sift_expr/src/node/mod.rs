//! Expression nodes.
//!
//! An [`Expr`] is built and typed in one step by [`ExprBuilder`](crate::ExprBuilder)
//! and is immutable afterwards. Each node exclusively owns its operands; the
//! only structural change ever made to a subtree is the construction-time
//! substitution of a coercion wrapper for an operand, done through
//! [`Expr::replace_with`].

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use sift_ir::{BinaryOp, ExprId, ExprTag, Span, UnaryOp};
use sift_values::{ClosureTemplate, DefaultValue, EventHandler, Id, Type, TypeTag, Value};

/// Conversions whose wrapper carries nothing but its target type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CoerceKind {
    /// Numeric tag conversion, element-wise over vectors.
    Arith,
    /// Empty untyped table or set to a concrete table type.
    Table,
    /// Empty untyped vector to a concrete vector type.
    Vector,
}

/// Every expression form, with its operands.
#[derive(Clone)]
pub enum ExprKind {
    Name {
        id: Id,
        /// Initializer of a `const` or option, where assigning it is legal.
        in_const_init: bool,
    },
    Const(Value),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Incr {
        decrement: bool,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Cond {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// Generic l-value wrapper; forwards assignment to its operand.
    Ref(Box<Expr>),
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
        is_init: bool,
        /// `v[a:b] = w`, which yields no value.
        slice: bool,
    },
    Index {
        base: Box<Expr>,
        /// Always a list expression.
        index: Box<Expr>,
        is_slice: bool,
    },
    Field {
        base: Box<Expr>,
        offset: usize,
        name: Arc<str>,
    },
    HasField {
        base: Box<Expr>,
        offset: usize,
        name: Arc<str>,
    },
    RecordConstructor(Box<Expr>),
    TableConstructor(Box<Expr>),
    SetConstructor(Box<Expr>),
    VectorConstructor(Box<Expr>),
    FieldAssign {
        name: Arc<str>,
        value: Box<Expr>,
    },
    List(Vec<Expr>),
    Call {
        func: Box<Expr>,
        args: Box<Expr>,
    },
    Lambda(Arc<dyn ClosureTemplate>),
    Event {
        handler: EventHandler,
        args: Box<Expr>,
    },
    Schedule {
        when: Box<Expr>,
        event: Box<Expr>,
    },
    Coerce {
        kind: CoerceKind,
        operand: Box<Expr>,
    },
    RecordCoerce {
        operand: Box<Expr>,
        /// For each target field, the source field it is copied from.
        map: Arc<[Option<usize>]>,
    },
    Flatten(Box<Expr>),
    Cast(Box<Expr>),
    Is {
        operand: Box<Expr>,
        target: Type,
    },
    /// A parameter's `&default`, filled in for a missing call argument.
    Default(Arc<dyn DefaultValue>),
}

/// An expression node.
///
/// Cloning keeps the node identity ([`ExprId`]); results cached for a call
/// site apply to every clone of it.
#[derive(Clone)]
pub struct Expr {
    id: ExprId,
    ty: Type,
    span: Span,
    paren: bool,
    error: bool,
    kind: ExprKind,
}

impl Expr {
    pub(crate) fn new(kind: ExprKind, ty: Type, span: Span) -> Self {
        Expr {
            id: ExprId::fresh(),
            ty,
            span,
            paren: false,
            error: false,
            kind,
        }
    }

    /// Stand-in left behind while an operand is moved into a wrapper.
    fn placeholder() -> Self {
        Expr {
            id: ExprId::INVALID,
            ty: Type::error(),
            span: Span::DUMMY,
            paren: false,
            error: true,
            kind: ExprKind::Const(Value::Void),
        }
    }

    /// Substitute `f(self)` for this node in place.
    ///
    /// Used only while a parent is under construction to wrap an operand in a
    /// coercion; the original subtree becomes the wrapper's child.
    pub(crate) fn replace_with(&mut self, f: impl FnOnce(Expr) -> Expr) {
        let original = std::mem::replace(self, Expr::placeholder());
        *self = f(original);
    }

    /// Move this node out, leaving a placeholder.
    #[allow(dead_code)]
    pub(crate) fn take(&mut self) -> Expr {
        std::mem::replace(self, Expr::placeholder())
    }

    /// Put the node into the error state. Its type becomes `error`.
    pub(crate) fn set_error(&mut self) {
        self.error = true;
        self.ty = Type::error();
    }

    /// Set the result type unless the node is already in error.
    pub(crate) fn set_type(&mut self, ty: Type) {
        if !self.error {
            self.ty = ty;
        }
    }

    pub(crate) fn set_paren(&mut self, paren: bool) {
        self.paren = paren;
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ExprKind {
        &mut self.kind
    }

    pub(crate) fn into_kind(self) -> ExprKind {
        self.kind
    }

    /// Deep copy with fresh node identities throughout.
    #[must_use]
    pub(crate) fn duplicate(&self) -> Expr {
        let mut copy = self.clone();
        copy.refresh_ids();
        copy
    }

    fn refresh_ids(&mut self) {
        self.id = ExprId::fresh();
        for child in self.children_mut() {
            child.refresh_ids();
        }
    }

    pub fn id(&self) -> ExprId {
        self.id
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn is_paren(&self) -> bool {
        self.paren
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn tag(&self) -> ExprTag {
        match &self.kind {
            ExprKind::Name { .. } => ExprTag::Name,
            ExprKind::Const(_) => ExprTag::Const,
            ExprKind::Unary { op, .. } => op.tag(),
            ExprKind::Incr { decrement, .. } => {
                if *decrement {
                    ExprTag::Decr
                } else {
                    ExprTag::Incr
                }
            }
            ExprKind::Binary { op, .. } => op.tag(),
            ExprKind::Cond { .. } => ExprTag::Cond,
            ExprKind::Ref(_) => ExprTag::Ref,
            ExprKind::Assign { slice, .. } => {
                if *slice {
                    ExprTag::IndexSliceAssign
                } else {
                    ExprTag::Assign
                }
            }
            ExprKind::Index { .. } => ExprTag::Index,
            ExprKind::Field { .. } => ExprTag::Field,
            ExprKind::HasField { .. } => ExprTag::HasField,
            ExprKind::RecordConstructor(_) => ExprTag::RecordConstructor,
            ExprKind::TableConstructor(_) => ExprTag::TableConstructor,
            ExprKind::SetConstructor(_) => ExprTag::SetConstructor,
            ExprKind::VectorConstructor(_) => ExprTag::VectorConstructor,
            ExprKind::FieldAssign { .. } => ExprTag::FieldAssign,
            ExprKind::List(_) => ExprTag::List,
            ExprKind::Call { .. } => ExprTag::Call,
            ExprKind::Lambda(_) => ExprTag::Lambda,
            ExprKind::Event { .. } => ExprTag::Event,
            ExprKind::Schedule { .. } => ExprTag::Schedule,
            ExprKind::Coerce { kind, .. } => match kind {
                CoerceKind::Arith => ExprTag::ArithCoerce,
                CoerceKind::Table => ExprTag::TableCoerce,
                CoerceKind::Vector => ExprTag::VectorCoerce,
            },
            ExprKind::RecordCoerce { .. } => ExprTag::RecordCoerce,
            ExprKind::Flatten(_) => ExprTag::Flatten,
            ExprKind::Cast(_) => ExprTag::Cast,
            ExprKind::Is { .. } => ExprTag::Is,
            ExprKind::Default(_) => ExprTag::Default,
        }
    }

    pub fn is_const(&self) -> bool {
        matches!(self.kind, ExprKind::Const(_))
    }

    pub fn const_value(&self) -> Option<&Value> {
        match &self.kind {
            ExprKind::Const(v) => Some(v),
            _ => None,
        }
    }

    /// A constant numeric zero (or `F`).
    pub fn is_zero(&self) -> bool {
        self.const_value().is_some_and(Value::is_zero)
    }

    /// Whether the static result type is a vector.
    pub fn is_vector(&self) -> bool {
        self.ty.tag() == TypeTag::Vector
    }

    /// Element type for vector results, the result type otherwise.
    pub(crate) fn base_type(&self) -> &Type {
        self.ty.flatten_vector()
    }

    /// Element tag for vector results, the result tag otherwise.
    pub(crate) fn base_tag(&self) -> TypeTag {
        self.base_type().tag()
    }

    /// Elements of a list expression.
    pub fn list_exprs(&self) -> Option<&[Expr]> {
        match &self.kind {
            ExprKind::List(exprs) => Some(exprs),
            _ => None,
        }
    }

    pub(crate) fn list_exprs_mut(&mut self) -> Option<&mut Vec<Expr>> {
        match &mut self.kind {
            ExprKind::List(exprs) => Some(exprs),
            _ => None,
        }
    }

    /// Whether evaluating this node has no observable side effect.
    pub fn is_pure(&self) -> bool {
        match &self.kind {
            ExprKind::Name { id, .. } => id.is_const(),
            ExprKind::Assign { .. }
            | ExprKind::Incr { .. }
            | ExprKind::Event { .. }
            | ExprKind::Schedule { .. } => false,
            ExprKind::Call { func, args } => {
                if self.error {
                    return true;
                }
                func.is_pure()
                    && func.callee_value().is_some_and(|v| {
                        v.as_func().is_some_and(|f| {
                            let callable = f.callable();
                            callable.is_builtin() && callable.is_pure()
                        })
                    })
                    && args.is_pure()
            }
            _ => self.children().iter().all(|c| c.is_pure()),
        }
    }

    /// Value of a callee expression that can be known without a frame.
    fn callee_value(&self) -> Option<Value> {
        match &self.kind {
            ExprKind::Const(v) => Some(v.clone()),
            ExprKind::Name { id, .. } if id.is_global() => id.global_value(),
            _ => None,
        }
    }

    /// Operands in evaluation order.
    pub fn children(&self) -> SmallVec<[&Expr; 4]> {
        let mut out = SmallVec::new();
        match &self.kind {
            ExprKind::Name { .. }
            | ExprKind::Const(_)
            | ExprKind::Lambda(_)
            | ExprKind::Default(_) => {}
            ExprKind::Unary { operand, .. }
            | ExprKind::Incr { operand, .. }
            | ExprKind::Coerce { operand, .. }
            | ExprKind::RecordCoerce { operand, .. }
            | ExprKind::Is { operand, .. } => out.push(&**operand),
            ExprKind::Ref(e)
            | ExprKind::RecordConstructor(e)
            | ExprKind::TableConstructor(e)
            | ExprKind::SetConstructor(e)
            | ExprKind::VectorConstructor(e)
            | ExprKind::Flatten(e)
            | ExprKind::Cast(e) => out.push(&**e),
            ExprKind::Field { base, .. } | ExprKind::HasField { base, .. } => out.push(&**base),
            ExprKind::FieldAssign { value, .. } => out.push(&**value),
            ExprKind::Event { args, .. } => out.push(&**args),
            ExprKind::Binary { lhs, rhs, .. } => {
                out.push(&**lhs);
                out.push(&**rhs);
            }
            ExprKind::Assign { target, value, .. } => {
                out.push(&**target);
                out.push(&**value);
            }
            ExprKind::Index { base, index, .. } => {
                out.push(&**base);
                out.push(&**index);
            }
            ExprKind::Call { func, args } => {
                out.push(&**func);
                out.push(&**args);
            }
            ExprKind::Schedule { when, event } => {
                out.push(&**when);
                out.push(&**event);
            }
            ExprKind::Cond {
                cond,
                then_branch,
                else_branch,
            } => {
                out.push(&**cond);
                out.push(&**then_branch);
                out.push(&**else_branch);
            }
            ExprKind::List(exprs) => out.extend(exprs.iter()),
        }
        out
    }

    pub(crate) fn children_mut(&mut self) -> SmallVec<[&mut Expr; 4]> {
        let mut out = SmallVec::new();
        match &mut self.kind {
            ExprKind::Name { .. }
            | ExprKind::Const(_)
            | ExprKind::Lambda(_)
            | ExprKind::Default(_) => {}
            ExprKind::Unary { operand, .. }
            | ExprKind::Incr { operand, .. }
            | ExprKind::Coerce { operand, .. }
            | ExprKind::RecordCoerce { operand, .. }
            | ExprKind::Is { operand, .. } => out.push(&mut **operand),
            ExprKind::Ref(e)
            | ExprKind::RecordConstructor(e)
            | ExprKind::TableConstructor(e)
            | ExprKind::SetConstructor(e)
            | ExprKind::VectorConstructor(e)
            | ExprKind::Flatten(e)
            | ExprKind::Cast(e) => out.push(&mut **e),
            ExprKind::Field { base, .. } | ExprKind::HasField { base, .. } => {
                out.push(&mut **base);
            }
            ExprKind::FieldAssign { value, .. } => out.push(&mut **value),
            ExprKind::Event { args, .. } => out.push(&mut **args),
            ExprKind::Binary { lhs, rhs, .. } => {
                out.push(&mut **lhs);
                out.push(&mut **rhs);
            }
            ExprKind::Assign { target, value, .. } => {
                out.push(&mut **target);
                out.push(&mut **value);
            }
            ExprKind::Index { base, index, .. } => {
                out.push(&mut **base);
                out.push(&mut **index);
            }
            ExprKind::Call { func, args } => {
                out.push(&mut **func);
                out.push(&mut **args);
            }
            ExprKind::Schedule { when, event } => {
                out.push(&mut **when);
                out.push(&mut **event);
            }
            ExprKind::Cond {
                cond,
                then_branch,
                else_branch,
            } => {
                out.push(&mut **cond);
                out.push(&mut **then_branch);
                out.push(&mut **else_branch);
            }
            ExprKind::List(exprs) => out.extend(exprs.iter_mut()),
        }
        out
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({self}: {})", self.tag(), self.ty)
    }
}
