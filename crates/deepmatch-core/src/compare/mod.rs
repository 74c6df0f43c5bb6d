//! The recursive comparator.
//!
//! [`compare`] walks got and expected side by side. Literal expectations
//! are compared structurally, matchers are dispatched through
//! [`Matcher::match_value`]. The first divergence wins and is returned with
//! the path accumulated in the [`Context`].

mod containers;
pub(crate) mod lax;
#[cfg(test)]
mod tests;

use std::borrow::Cow;

use crate::context::Context;
use crate::errors::{MatchResult, Reason, Segment};
use crate::matchers::Matcher;
use crate::value::Value;

/// Compares `got` against `expected` under `ctx`.
pub fn compare(ctx: &Context, got: &Value, expected: &Value) -> MatchResult {
    if got.as_matcher().is_some() {
        return Err(ctx.fail(
            Reason::Usage,
            "found a matcher in got param, can only use it in expected one",
            |e| e.with_got(got),
        ));
    }
    if ctx.too_deep() {
        return Err(ctx.fail(Reason::Usage, "maximum comparison depth exceeded", |e| {
            e.with_expected(format!("depth <= {}", ctx.max_depth.unwrap_or_default()))
        }));
    }

    if let Some(m) = matcher_of(expected) {
        return compare_matcher(ctx, got, m);
    }
    compare_literal(ctx, got, expected)
}

/// Boolean shortcut over [`compare`] with a fresh default context.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    compare(&Context::default().probe(), a, b).is_ok()
}

/// Matcher classification of an expected node, looking through interface
/// slots (see [`crate::tag::classify`]).
fn matcher_of(v: &Value) -> Option<&Matcher> {
    match v {
        Value::Matcher(m) => Some(&**m),
        Value::Iface(_, Some(inner)) => matcher_of(inner),
        _ => None,
    }
}

fn compare_matcher(ctx: &Context, got: &Value, m: &Matcher) -> MatchResult {
    if let Some(err) = m.construction_error() {
        tracing::debug!(operator = m.name(), error = %err, "surfacing construction error");
        return Err(ctx.fail(Reason::Usage, &err.to_string(), |e| {
            e.with_operator(m.name())
        }));
    }

    let got: Cow<'_, Value> = match got {
        Value::Iface(..) => Cow::Owned(got.unwrap_iface()),
        other => Cow::Borrowed(other),
    };
    if !got.is_valid() && !m.accepts_invalid() {
        return Err(ctx.fail(Reason::Nil, "values differ", |e| {
            e.with_got("nil").with_expected(m)
        }));
    }
    m.match_value(ctx, &got)
        .map_err(|e| if e.is_boolean() { e } else { e.with_operator(m.name()) })
}

fn is_untyped_nil(v: &Value) -> bool {
    matches!(v, Value::Invalid | Value::Iface(_, None))
}

fn compare_literal(ctx: &Context, got: &Value, expected: &Value) -> MatchResult {
    match (is_untyped_nil(got), is_untyped_nil(expected)) {
        (true, true) => return Ok(()),
        (true, false) | (false, true) => {
            return Err(ctx.fail(Reason::Nil, "values differ", |e| {
                e.with_got(got).with_expected(expected)
            }))
        }
        (false, false) => {}
    }

    // Neither side is untyped nil past this point.
    let (Some(got_ty), Some(exp_ty)) = (got.ty(), expected.ty()) else {
        return Err(ctx.fail_plain(Reason::Nil, "values differ"));
    };

    if got_ty != exp_ty {
        if ctx.be_lax {
            if let Some(converted) = lax::convert(got, &exp_ty) {
                tracing::trace!(from = %got_ty, to = %exp_ty, "lax conversion");
                return compare_literal(ctx, &converted, expected);
            }
        }
        if let Value::Iface(_, Some(inner)) = got {
            return compare(ctx, inner, expected);
        }
        if let Value::Iface(_, Some(inner)) = expected {
            return compare(ctx, got, inner);
        }
        return Err(ctx.fail(Reason::TypeMismatch, "type mismatch", |e| {
            e.with_got(&got_ty).with_expected(&exp_ty)
        }));
    }

    match (got, expected) {
        (Value::Bool(a), Value::Bool(b)) => scalar(ctx, a == b, got, expected),
        (Value::Int(a, _), Value::Int(b, _)) => scalar(ctx, a == b, got, expected),
        (Value::Uint(a, _), Value::Uint(b, _)) => scalar(ctx, a == b, got, expected),
        // NaN != NaN; the NaN matcher exists for that.
        (Value::Float(a, _), Value::Float(b, _)) => scalar(ctx, a == b, got, expected),
        (Value::Str(a), Value::Str(b)) => scalar(ctx, a == b, got, expected),
        (Value::Array(_, a), Value::Array(_, b)) => containers::compare_array(ctx, a, b),
        (Value::Slice(_, a), Value::Slice(_, b)) => {
            containers::compare_slice(ctx, a.as_deref(), b.as_deref(), got, expected)
        }
        (Value::Map(_, _, a), Value::Map(_, _, b)) => {
            containers::compare_map(ctx, a.as_deref(), b.as_deref(), got, expected)
        }
        (Value::Struct(a), Value::Struct(b)) => containers::compare_struct(ctx, a, b),
        (Value::Ptr(_, a), Value::Ptr(_, b)) => match (a, b) {
            (None, None) => Ok(()),
            (Some(_), None) | (None, Some(_)) => Err(ctx.fail(Reason::Nil, "values differ", |e| {
                e.with_got(got).with_expected(expected)
            })),
            (Some(pa), Some(pb)) => {
                if pa.same_as(pb) {
                    return Ok(());
                }
                if ctx.enter(pa, pb) {
                    tracing::trace!(path = %ctx.path, "cycle closed");
                    return Ok(());
                }
                // Operators below may replace either pointee.
                let target_got = pa.get().clone();
                let target_exp = pb.get().clone();
                compare(&ctx.child(Segment::Deref), &target_got, &target_exp)
            }
        },
        (Value::Iface(_, Some(a)), Value::Iface(_, Some(b))) => compare(ctx, a, b),
        _ => Err(ctx.fail(Reason::TypeMismatch, "type mismatch", |e| {
            e.with_got(&got_ty).with_expected(&exp_ty)
        })),
    }
}

fn scalar(ctx: &Context, equal: bool, got: &Value, expected: &Value) -> MatchResult {
    if equal {
        return Ok(());
    }
    Err(ctx.fail(Reason::ValuesDiffer, "values differ", |e| {
        e.with_got(got).with_expected(expected)
    }))
}
