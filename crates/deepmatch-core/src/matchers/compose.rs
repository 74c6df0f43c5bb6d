//! All / Any / Not / Lax.

use crate::compare::compare;
use crate::context::Context;
use crate::errors::{MatchResult, Reason};
use crate::value::{Type, Value};

use super::{first_broken, type_of_node, Matcher, Op};

// A child broken at construction breaks its parent too, wherever it sits in
// the child's tree; Any and Not only probe their children, which would
// otherwise swallow the error.
fn build(name: &str, children: Vec<Value>, op: fn(Vec<Value>) -> Op) -> Value {
    if let Some(bad) = first_broken(&children) {
        return Value::matcher(Matcher::broken(name, bad.to_string()));
    }
    Value::matcher(Matcher::new(name, op(children)))
}

/// Passes when every child passes.
pub fn all<I: IntoIterator<Item = Value>>(children: I) -> Value {
    build("All", children.into_iter().collect(), Op::All)
}

/// Passes when at least one child passes.
pub fn any<I: IntoIterator<Item = Value>>(children: I) -> Value {
    build("Any", children.into_iter().collect(), Op::Any)
}

/// Inverts its child. A child with a construction error is not inverted:
/// the error propagates.
pub fn not(child: Value) -> Value {
    build("Not", vec![child], |mut v| Op::Not(v.remove(0)))
}

/// Compares its child with lax type conversion enabled.
pub fn lax(child: Value) -> Value {
    build("Lax", vec![child], |mut v| Op::Lax(v.remove(0)))
}

pub(crate) fn match_all(ctx: &Context, got: &Value, children: &[Value]) -> MatchResult {
    for (i, child) in children.iter().enumerate() {
        compare(ctx, got, child).map_err(|e| {
            if e.is_boolean() || e.summary.is_some() {
                e
            } else {
                e.with_summary(format!("(part {} of {} is failing)", i + 1, children.len()))
            }
        })?;
    }
    Ok(())
}

pub(crate) fn match_any(ctx: &Context, got: &Value, children: &[Value], m: &Matcher) -> MatchResult {
    let probe = ctx.probe();
    if children.iter().any(|child| compare(&probe, got, child).is_ok()) {
        return Ok(());
    }
    Err(ctx.fail(Reason::OperatorFailed, "comparing with Any", |e| {
        e.with_got(got).with_expected(m)
    }))
}

pub(crate) fn match_not(ctx: &Context, got: &Value, child: &Value, m: &Matcher) -> MatchResult {
    if compare(&ctx.probe(), got, child).is_err() {
        return Ok(());
    }
    Err(ctx.fail(Reason::OperatorFailed, "comparing with Not", |e| {
        e.with_got(got).with_expected(m)
    }))
}

pub(crate) fn common_type(children: &[Value]) -> Option<Type> {
    let mut types = children.iter().map(type_of_node);
    let first = types.next()??;
    types.all(|t| t.as_ref() == Some(&first)).then_some(first)
}
