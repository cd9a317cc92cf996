#![deny(clippy::arithmetic_side_effects)]
//! Sift Expr - expression trees for the Sift scripting engine.
//!
//! Nodes are built through [`ExprBuilder`], which types every node as it is
//! constructed: operands are checked, a result type is computed and, where an
//! implicit conversion is legal, the operand is wrapped in a coercion node.
//! A node that fails to type stays in the tree in the error state so a whole
//! declaration's worth of diagnostics can be collected in one pass.
//!
//! # Architecture
//!
//! - [`Expr`] / [`ExprKind`]: the node and its exhaustively matched kinds
//! - [`ExprBuilder`]: per-kind constructors, canonicalization, coercion insertion
//! - [`check`]: promotion of expressions and lists against required types
//! - [`fold`]: operator implementations per value domain
//! - `Expr::eval` / `Expr::assign`: evaluation with vector broadcast and
//!   short-circuiting, and the l-value protocol
//! - [`LocalFrame`]: a concrete activation frame
//! - [`Traverse`]: pre/post-order walks over a tree

mod builder;
pub mod check;
mod config;
mod default;
mod describe;
mod eval;
pub mod fold;
mod frame;
mod lvalue;
mod node;
mod stack;
mod tracing_setup;
mod visitor;

#[cfg(test)]
mod test_helpers;

pub use builder::ExprBuilder;
pub use config::BuilderConfig;
pub use default::ExprDefault;
pub use frame::{EventQueue, LocalFrame, QueuedEvent};
pub use node::{CoerceKind, Expr, ExprKind};
pub use stack::ensure_sufficient_stack;
pub use tracing_setup::init_tracing;
pub use visitor::{walk_expr, TraversalCode, Traverse};

// Re-export the collaborator types callers need to drive the engine.
pub use sift_ir::{BinaryOp, ExprId, ExprTag, Span, UnaryOp};
pub use sift_values::{EvalError, EvalResult, Frame, Type, TypeTag, Value};
