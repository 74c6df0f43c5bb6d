//! Leaf matchers: no children beyond an optional expected value.

use std::cmp::Ordering;
use std::fmt;

use crate::compare::compare;
use crate::context::Context;
use crate::errors::{MatchResult, Reason, Segment};
use crate::value::{Kind, Type, Value};

use super::{find_broken, Matcher, Op};

pub fn ignore() -> Value {
    Value::matcher(Matcher::new("Ignore", Op::Ignore))
}

/// Nil-aware: untyped nil and nil pointers, slices, maps and interfaces
/// all pass.
pub fn nil() -> Value {
    Value::matcher(Matcher::new("Nil", Op::Nil))
}

pub fn not_nil() -> Value {
    Value::matcher(Matcher::new("NotNil", Op::NotNil))
}

pub fn nan() -> Value {
    Value::matcher(Matcher::new("NaN", Op::NaN))
}

pub fn not_nan() -> Value {
    Value::matcher(Matcher::new("NotNaN", Op::NotNaN))
}

/// Length of an array, slice, map or string (in bytes) compared against
/// `expected`, itself a literal `int` or a matcher.
pub fn len(expected: Value) -> Value {
    if let Some(bad) = find_broken(&expected) {
        return Value::matcher(Matcher::broken("Len", bad.to_string()));
    }
    Value::matcher(Matcher::new("Len", Op::Len(expected)))
}

pub fn re(pattern: &str) -> Value {
    match regex::Regex::new(pattern) {
        Ok(re) => Value::matcher(Matcher::new("Re", Op::Re(re))),
        Err(e) => Value::matcher(Matcher::broken("Re", e.to_string())),
    }
}

/// Passes when got has type `ty`. Interface types accept any non-nil got.
pub fn isa(ty: Type) -> Value {
    Value::matcher(Matcher::new("Isa", Op::Isa(ty)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    InIn,
    InOut,
    OutIn,
    OutOut,
}

#[derive(Debug, Clone)]
pub struct Between {
    name: &'static str,
    min: Option<Value>,
    max: Option<Value>,
    min_inclusive: bool,
    max_inclusive: bool,
}

fn orderable(v: &Value) -> bool {
    matches!(v.kind(), Kind::Int | Kind::Uint | Kind::Float | Kind::String)
}

/// Orders two scalars. Numbers of different kinds are ordered by value;
/// anything else unordered.
pub(crate) fn order(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x, _), Value::Int(y, _)) => Some(x.cmp(y)),
        (Value::Uint(x, _), Value::Uint(y, _)) => Some(x.cmp(y)),
        (Value::Int(x, _), Value::Uint(y, _)) => Some(i128::from(*x).cmp(&i128::from(*y))),
        (Value::Uint(x, _), Value::Int(y, _)) => Some(i128::from(*x).cmp(&i128::from(*y))),
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        _ => as_f64(a)?.partial_cmp(&as_f64(b)?),
    }
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Int(x, _) => Some(*x as f64),
        Value::Uint(x, _) => Some(*x as f64),
        Value::Float(x, _) => Some(*x),
        _ => None,
    }
}

fn one_sided(name: &'static str, bound: Value, is_min: bool, inclusive: bool) -> Value {
    if !orderable(&bound) {
        return Value::matcher(Matcher::broken(
            name,
            format!("usage: {name}(NUM|STRING), got {}", describe_arg(&bound)),
        ));
    }
    let b = if is_min {
        Between {
            name,
            min: Some(bound),
            max: None,
            min_inclusive: inclusive,
            max_inclusive: false,
        }
    } else {
        Between {
            name,
            min: None,
            max: Some(bound),
            min_inclusive: false,
            max_inclusive: inclusive,
        }
    };
    Value::matcher(Matcher::new(name, Op::Between(b)))
}

fn describe_arg(v: &Value) -> String {
    match v.ty() {
        Some(Type::Matcher) => format!("matcher {v}"),
        Some(ty) => ty.to_string(),
        None => "nil".to_string(),
    }
}

/// `min <= got <= max`.
pub fn between(min: Value, max: Value) -> Value {
    between_with(min, max, Bounds::InIn)
}

pub fn between_with(min: Value, max: Value, bounds: Bounds) -> Value {
    const NAME: &str = "Between";
    if !orderable(&min) || !orderable(&max) {
        return Value::matcher(Matcher::broken(
            NAME,
            format!(
                "usage: Between(NUM|STRING, NUM|STRING[, BOUNDS]), got ({}, {})",
                describe_arg(&min),
                describe_arg(&max)
            ),
        ));
    }
    if min.ty() != max.ty() {
        return Value::matcher(Matcher::broken(
            NAME,
            format!(
                "from and to params must be of the same type, got {} and {}",
                describe_arg(&min),
                describe_arg(&max)
            ),
        ));
    }
    if order(&min, &max) == Some(Ordering::Greater) {
        return Value::matcher(Matcher::broken(
            NAME,
            format!("from ({min}) must not be greater than to ({max})"),
        ));
    }
    let (min_inclusive, max_inclusive) = match bounds {
        Bounds::InIn => (true, true),
        Bounds::InOut => (true, false),
        Bounds::OutIn => (false, true),
        Bounds::OutOut => (false, false),
    };
    Value::matcher(Matcher::new(
        NAME,
        Op::Between(Between {
            name: NAME,
            min: Some(min),
            max: Some(max),
            min_inclusive,
            max_inclusive,
        }),
    ))
}

pub fn gt(min: Value) -> Value {
    one_sided("Gt", min, true, false)
}

pub fn gte(min: Value) -> Value {
    one_sided("Gte", min, true, true)
}

pub fn lt(max: Value) -> Value {
    one_sided("Lt", max, false, false)
}

pub fn lte(max: Value) -> Value {
    one_sided("Lte", max, false, true)
}

impl Between {
    pub fn bound_type(&self) -> Option<Type> {
        self.min.as_ref().or(self.max.as_ref()).and_then(Value::ty)
    }

    fn accepts_type(&self, got: &Value, lax: bool) -> bool {
        let Some(bound) = self.bound_type() else {
            return false;
        };
        match got.ty() {
            Some(ty) if ty == bound => true,
            Some(ty) => lax && ty.is_numeric() && bound.is_numeric(),
            None => false,
        }
    }

    fn within(&self, got: &Value) -> bool {
        let lower = self.min.as_ref().map_or(true, |min| match order(got, min) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.min_inclusive,
            _ => false,
        });
        let upper = self.max.as_ref().map_or(true, |max| match order(got, max) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.max_inclusive,
            _ => false,
        });
        lower && upper
    }

    fn expectation(&self) -> String {
        let op = |inclusive: bool| if inclusive { "<=" } else { "<" };
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => format!(
                "{min} {} got {} {max}",
                op(self.min_inclusive),
                op(self.max_inclusive)
            ),
            (Some(min), None) => format!("{} {min}", if self.min_inclusive { ">=" } else { ">" }),
            (None, Some(max)) => format!("{} {max}", op(self.max_inclusive)),
            (None, None) => "any".to_string(),
        }
    }

    pub(crate) fn match_value(&self, ctx: &Context, got: &Value, m: &Matcher) -> MatchResult {
        if !self.accepts_type(got, ctx.be_lax) {
            return Err(ctx.fail(Reason::TypeMismatch, "type mismatch", |e| {
                e.with_got(describe_arg(got)).with_expected(
                    self.bound_type()
                        .map_or_else(|| m.name().to_string(), |t| t.to_string()),
                )
            }));
        }
        if self.within(got) {
            return Ok(());
        }
        Err(ctx.fail(Reason::ValuesDiffer, "values differ", |e| {
            e.with_got(got).with_expected(self.expectation())
        }))
    }
}

impl fmt::Display for Between {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => {
                write!(f, "{}({min}, {max}", self.name)?;
                match (self.min_inclusive, self.max_inclusive) {
                    (true, true) => f.write_str(")"),
                    (true, false) => f.write_str(", InOut)"),
                    (false, true) => f.write_str(", OutIn)"),
                    (false, false) => f.write_str(", OutOut)"),
                }
            }
            (Some(v), None) | (None, Some(v)) => write!(f, "{}({v})", self.name),
            (None, None) => write!(f, "{}()", self.name),
        }
    }
}

pub(crate) fn match_nil(ctx: &Context, got: &Value, want_nil: bool) -> MatchResult {
    if got.is_nil() == want_nil {
        return Ok(());
    }
    Err(ctx.fail(Reason::Nil, "values differ", |e| {
        e.with_got(got)
            .with_expected(if want_nil { "nil" } else { "not nil" })
    }))
}

pub(crate) fn match_nan(ctx: &Context, got: &Value, want_nan: bool) -> MatchResult {
    let Value::Float(x, _) = got else {
        return Err(ctx.fail(Reason::TypeMismatch, "type mismatch", |e| {
            e.with_got(describe_arg(got))
                .with_expected("float32 OR float64")
        }));
    };
    if x.is_nan() == want_nan {
        return Ok(());
    }
    Err(ctx.fail(Reason::ValuesDiffer, "values differ", |e| {
        e.with_got(got)
            .with_expected(if want_nan { "NaN" } else { "not NaN" })
    }))
}

pub(crate) fn match_len(ctx: &Context, got: &Value, expected: &Value) -> MatchResult {
    let Some(n) = got.len() else {
        return Err(ctx.fail(Reason::TypeMismatch, "bad kind", |e| {
            e.with_got(describe_arg(got))
                .with_expected("array OR slice OR map OR string")
        }));
    };
    let n = i64::try_from(n).unwrap_or(i64::MAX);
    compare(&ctx.child(Segment::Call("len".to_string())), &Value::int(n), expected)
}

pub(crate) fn match_re(ctx: &Context, got: &Value, re: &regex::Regex) -> MatchResult {
    let Value::Str(s) = got else {
        return Err(ctx.fail(Reason::TypeMismatch, "bad type", |e| {
            e.with_got(describe_arg(got)).with_expected("string")
        }));
    };
    if re.is_match(s) {
        return Ok(());
    }
    Err(ctx.fail(Reason::ValuesDiffer, "does not match Regexp", |e| {
        e.with_got(got).with_expected(re.as_str())
    }))
}

pub(crate) fn match_isa(ctx: &Context, got: &Value, ty: &Type) -> MatchResult {
    let ok = match ty {
        Type::Interface(_) => got.is_valid(),
        other => got.ty().as_ref() == Some(other),
    };
    if ok {
        return Ok(());
    }
    Err(ctx.fail(Reason::TypeMismatch, "type mismatch", |e| {
        e.with_got(describe_arg(got)).with_expected(ty)
    }))
}
