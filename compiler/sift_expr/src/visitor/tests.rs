use super::*;
use pretty_assertions::assert_eq;
use sift_ir::ExprTag;
use sift_values::{TypeTag, Value};

use crate::test_helpers::*;

#[derive(Default)]
struct Recorder {
    pre: Vec<ExprTag>,
    post: Vec<ExprTag>,
    prune: Option<ExprTag>,
    abort: Option<ExprTag>,
}

impl Traverse for Recorder {
    fn pre_expr(&mut self, expr: &Expr) -> TraversalCode {
        self.pre.push(expr.tag());
        if self.abort == Some(expr.tag()) {
            return TraversalCode::Abort;
        }
        if self.prune == Some(expr.tag()) {
            return TraversalCode::Prune;
        }
        TraversalCode::Continue
    }

    fn post_expr(&mut self, expr: &Expr) -> TraversalCode {
        self.post.push(expr.tag());
        TraversalCode::Continue
    }
}

/// `(y + 1) * x` with all-int operands.
fn sample() -> Expr {
    let mut b = builder();
    let x = b.name(local("x", t(TypeTag::Int), 0), sp());
    let y = b.name(local("y", t(TypeTag::Int), 1), sp());
    let one = b.constant(Value::Int(1), sp());
    let inner = b.add(y, one, sp());
    let inner = b.paren(inner);
    b.times(inner, x, sp())
}

#[test]
fn visits_in_pre_and_post_order() {
    let e = sample();
    let mut rec = Recorder::default();
    assert_eq!(e.traverse(&mut rec), TraversalCode::Continue);

    assert_eq!(
        rec.pre,
        vec![ExprTag::Times, ExprTag::Add, ExprTag::Name, ExprTag::Const, ExprTag::Name]
    );
    assert_eq!(
        rec.post,
        vec![ExprTag::Name, ExprTag::Const, ExprTag::Add, ExprTag::Name, ExprTag::Times]
    );
}

#[test]
fn prune_skips_children_but_not_the_post_hook() {
    let e = sample();
    let mut rec = Recorder {
        prune: Some(ExprTag::Add),
        ..Recorder::default()
    };
    assert_eq!(walk_expr(&mut rec, &e), TraversalCode::Continue);

    assert_eq!(rec.pre, vec![ExprTag::Times, ExprTag::Add, ExprTag::Name]);
    assert_eq!(rec.post, vec![ExprTag::Add, ExprTag::Name, ExprTag::Times]);
}

#[test]
fn abort_stops_the_walk() {
    let e = sample();
    let mut rec = Recorder {
        abort: Some(ExprTag::Add),
        ..Recorder::default()
    };
    assert_eq!(e.traverse(&mut rec), TraversalCode::Abort);

    assert_eq!(rec.pre, vec![ExprTag::Times, ExprTag::Add]);
    assert!(rec.post.is_empty());
}

#[test]
fn default_hooks_walk_everything() {
    struct Nothing;
    impl Traverse for Nothing {}

    let e = sample();
    assert_eq!(e.traverse(&mut Nothing), TraversalCode::Continue);
}
