use std::fmt::Write as _;

use crate::context::Context;
use crate::errors::{MatchResult, Reason, Segment};
use crate::value::{StructValue, Value};

use super::compare;

pub(super) fn compare_array(ctx: &Context, got: &[Value], expected: &[Value]) -> MatchResult {
    for (i, (g, e)) in got.iter().zip(expected).enumerate() {
        compare(&ctx.child(Segment::Index(i)), g, e)?;
    }
    Ok(())
}

pub(super) fn compare_slice(
    ctx: &Context,
    got: Option<&[Value]>,
    expected: Option<&[Value]>,
    got_v: &Value,
    exp_v: &Value,
) -> MatchResult {
    let (got, expected) = match (got, expected) {
        (Some(g), Some(e)) => (g, e),
        (None, None) => return Ok(()),
        _ => {
            return Err(ctx.fail(Reason::Nil, "nil slice", |e| {
                e.with_got(got_v).with_expected(exp_v)
            }))
        }
    };

    compare_array(ctx, got, expected)?;

    let common = got.len().min(expected.len());
    if got.len() == expected.len() {
        return Ok(());
    }
    Err(ctx.fail(
        Reason::Length,
        &format!("comparing slices, from index #{common}"),
        |e| {
            let (label, rest) = if got.len() > expected.len() {
                ("Extra", &got[common..])
            } else {
                ("Missing", &expected[common..])
            };
            e.with_got(got.len())
                .with_expected(expected.len())
                .with_summary(item_list(label, rest))
        },
    ))
}

/// `Missing 2 items: (1, 2)` style summary line.
fn item_list<'a, I>(label: &str, items: I) -> String
where
    I: IntoIterator<Item = &'a Value>,
{
    let rendered: Vec<String> = items.into_iter().map(ToString::to_string).collect();
    let mut out = String::new();
    if rendered.len() == 1 {
        let _ = write!(out, "{label} item: ({})", rendered[0]);
    } else {
        let _ = write!(out, "{label} {} items: ({})", rendered.len(), rendered.join(", "));
    }
    out
}

fn find_key<'a>(ctx: &Context, entries: &'a [(Value, Value)], key: &Value) -> Option<&'a Value> {
    let probe = ctx.probe();
    entries
        .iter()
        .find(|(k, _)| compare(&probe, k, key).is_ok())
        .map(|(_, v)| v)
}

pub(super) fn compare_map(
    ctx: &Context,
    got: Option<&[(Value, Value)]>,
    expected: Option<&[(Value, Value)]>,
    got_v: &Value,
    exp_v: &Value,
) -> MatchResult {
    let (got, expected) = match (got, expected) {
        (Some(g), Some(e)) => (g, e),
        (None, None) => return Ok(()),
        _ => {
            return Err(ctx.fail(Reason::Nil, "nil map", |e| {
                e.with_got(got_v).with_expected(exp_v)
            }))
        }
    };

    let mut missing: Vec<&Value> = Vec::new();
    for (key, exp) in expected {
        match find_key(ctx, got, key) {
            Some(g) => compare(&ctx.child(Segment::Key(key.to_string())), g, exp)?,
            None => missing.push(key),
        }
    }
    let extra: Vec<&Value> = got
        .iter()
        .filter(|(k, _)| find_key(ctx, expected, k).is_none())
        .map(|(k, _)| k)
        .collect();

    if missing.is_empty() && extra.is_empty() {
        return Ok(());
    }
    Err(ctx.fail(Reason::Keys, "comparing hash keys", |e| {
        let mut lines = Vec::new();
        if !missing.is_empty() {
            lines.push(key_list("Missing", &missing));
        }
        if !extra.is_empty() {
            lines.push(key_list("Extra", &extra));
        }
        e.with_summary(lines.join("\n"))
    }))
}

fn key_list(label: &str, keys: &[&Value]) -> String {
    let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
    if rendered.len() == 1 {
        format!("{label} key: ({})", rendered[0])
    } else {
        format!("{label} {} keys: ({})", rendered.len(), rendered.join(", "))
    }
}

pub(super) fn compare_struct(ctx: &Context, got: &StructValue, expected: &StructValue) -> MatchResult {
    for field in &expected.fields {
        let here = ctx.child(Segment::Field(field.name.clone()));
        match got.field(&field.name) {
            Some(g) => compare(&here, g, &field.value)?,
            None => {
                let zero = field.value.ty().map_or(Value::Invalid, |t| t.zero_value());
                compare(&here, &zero, &field.value)?;
            }
        }
    }
    // Fields only present on the got side must hold their zero value.
    for field in &got.fields {
        if expected.field(&field.name).is_none() {
            let zero = field.value.ty().map_or(Value::Invalid, |t| t.zero_value());
            compare(&ctx.child(Segment::Field(field.name.clone())), &field.value, &zero)?;
        }
    }
    Ok(())
}
