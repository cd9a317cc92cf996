//! Shared vocabulary for the Sift policy language expression engine.
//!
//! - [`Span`]: compact source ranges carried by every node and error
//! - [`ExprId`]: stable node identity used to key suspended-call results
//! - [`ExprTag`]: the discriminant of every expression kind, with its describe name
//! - [`UnaryOp`] / [`BinaryOp`]: operator enums shared by construction and folding

mod expr_id;
mod operators;
mod span;

pub use expr_id::ExprId;
pub use operators::{BinaryOp, ExprTag, UnaryOp};
pub use span::Span;
