//! Matchers: expectation nodes deciding pass/fail through custom logic.
//!
//! Every built-in matcher is a variant of the closed [`Op`] union and is
//! dispatched from [`Matcher::match_value`]. User matchers plug in through
//! the [`Operator`] trait and the `Op::Custom` variant.
//!
//! Constructors never fail: malformed arguments are recorded on the node
//! and reported as a `Usage` failure the first time the node is reached.
//!
//! ```
//! use deepmatch_core::matchers::{between, set};
//! use deepmatch_core::{cmp_deeply, Value};
//!
//! let got = Value::ints([1, 3, 5, 2]);
//! let expected = set([between(Value::int(1), Value::int(4)), Value::int(3), between(Value::int(2), Value::int(10))]);
//! assert!(cmp_deeply(&got, &expected).is_ok());
//! ```

pub(crate) mod compose;
pub(crate) mod leaf;
pub(crate) mod set;
pub(crate) mod smuggle;
#[cfg(test)]
mod tests;

use std::fmt;
use std::rc::Rc;

use serde_json::Value as Json;

use crate::context::Context;
use crate::errors::MatchResult;
use crate::value::{Type, Value, ValueError};

pub use compose::{all, any, lax, not};
pub use leaf::{
    between, between_with, gt, gte, ignore, isa, len, lt, lte, nan, nil, not_nan, not_nil, re,
    Between, Bounds,
};
pub use set::{
    bag, flatten, not_any, set, sub_bag_of, sub_set_of, super_bag_of, super_set_of, Duplicates,
    SetMatcher,
};
pub use smuggle::{smuggle, smuggle_typed, Smuggle, SmuggleFn};

/// The matcher contract, for matchers defined outside this crate.
pub trait Operator {
    fn name(&self) -> &str;

    fn match_value(&self, ctx: &Context, got: &Value) -> MatchResult;

    /// Whether untyped nil may be passed to `match_value` instead of being
    /// rejected by the comparator's generic nil handling.
    fn accepts_invalid(&self) -> bool {
        false
    }

    /// Best-effort type this matcher expects, used to pre-decode external
    /// data (see [`decode_for`]).
    fn type_behind(&self) -> Option<Type> {
        None
    }

    fn describe(&self) -> String {
        self.name().to_string()
    }
}

/// Malformed matcher arguments, captured at construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bad usage of {operator}: {message}")]
pub struct ConstructionError {
    pub operator: String,
    pub message: String,
}

pub enum Op {
    All(Vec<Value>),
    Any(Vec<Value>),
    Not(Value),
    Lax(Value),
    Set(SetMatcher),
    Ignore,
    Nil,
    NotNil,
    NaN,
    NotNaN,
    Between(Between),
    Len(Value),
    Re(regex::Regex),
    Isa(Type),
    Smuggle(Smuggle),
    Custom(Rc<dyn Operator>),
}

pub struct Matcher {
    name: String,
    op: Result<Op, ConstructionError>,
}

impl Matcher {
    pub fn new(name: impl Into<String>, op: Op) -> Self {
        Self {
            name: name.into(),
            op: Ok(op),
        }
    }

    /// A node that fails with `message` whenever it is reached.
    pub fn broken(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            op: Err(ConstructionError {
                operator: name.clone(),
                message: message.into(),
            }),
            name,
        }
    }

    pub fn custom(op: impl Operator + 'static) -> Self {
        Self::new(op.name().to_string(), Op::Custom(Rc::new(op)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn op(&self) -> Result<&Op, &ConstructionError> {
        self.op.as_ref()
    }

    pub fn construction_error(&self) -> Option<&ConstructionError> {
        self.op.as_ref().err()
    }

    pub fn accepts_invalid(&self) -> bool {
        match &self.op {
            Err(_) => false,
            Ok(op) => match op {
                Op::All(_) | Op::Any(_) | Op::Not(_) | Op::Lax(_) => true,
                Op::Ignore | Op::Nil | Op::NotNil => true,
                Op::Set(_)
                | Op::NaN
                | Op::NotNaN
                | Op::Between(_)
                | Op::Len(_)
                | Op::Re(_)
                | Op::Isa(_)
                | Op::Smuggle(_) => false,
                Op::Custom(c) => c.accepts_invalid(),
            },
        }
    }

    pub fn type_behind(&self) -> Option<Type> {
        let op = self.op.as_ref().ok()?;
        match op {
            Op::All(children) | Op::Any(children) => compose::common_type(children),
            Op::Lax(child) => type_of_node(child),
            Op::Not(_) | Op::Set(_) | Op::Ignore | Op::Nil | Op::NotNil | Op::Len(_) => None,
            Op::NaN | Op::NotNaN => Some(Type::float64()),
            Op::Between(b) => b.bound_type(),
            Op::Re(_) => Some(Type::String),
            Op::Isa(ty) => Some(ty.clone()),
            Op::Smuggle(s) => s.input_type(),
            Op::Custom(c) => c.type_behind(),
        }
    }

    /// Runs the matcher against `got`. Callers go through
    /// [`crate::compare::compare`], which handles construction errors and
    /// untyped nil first.
    pub fn match_value(&self, ctx: &Context, got: &Value) -> MatchResult {
        let op = match &self.op {
            Ok(op) => op,
            Err(e) => {
                return Err(ctx.fail(crate::errors::Reason::Usage, &e.to_string(), |err| {
                    err.with_operator(self.name.clone())
                }))
            }
        };
        match op {
            Op::All(children) => compose::match_all(ctx, got, children),
            Op::Any(children) => compose::match_any(ctx, got, children, self),
            Op::Not(child) => compose::match_not(ctx, got, child, self),
            Op::Lax(child) => crate::compare::compare(&ctx.with_lax(true), got, child),
            Op::Set(s) => s.match_value(ctx, got, self),
            Op::Ignore => Ok(()),
            Op::Nil => leaf::match_nil(ctx, got, true),
            Op::NotNil => leaf::match_nil(ctx, got, false),
            Op::NaN => leaf::match_nan(ctx, got, true),
            Op::NotNaN => leaf::match_nan(ctx, got, false),
            Op::Between(b) => b.match_value(ctx, got, self),
            Op::Len(expected) => leaf::match_len(ctx, got, expected),
            Op::Re(re) => leaf::match_re(ctx, got, re),
            Op::Isa(ty) => leaf::match_isa(ctx, got, ty),
            Op::Smuggle(s) => s.match_value(ctx, got),
            Op::Custom(c) => c.match_value(ctx, got),
        }
    }
}

/// First construction error anywhere under `v`: on a matcher node, or on
/// one reached through interface slots, containers or pointers.
pub(crate) fn find_broken(v: &Value) -> Option<ConstructionError> {
    fn walk(v: &Value, seen: &mut Vec<usize>) -> Option<ConstructionError> {
        match v {
            Value::Matcher(m) => m.construction_error().cloned(),
            Value::Iface(_, Some(inner)) => walk(inner, seen),
            Value::Array(_, items) | Value::Slice(_, Some(items)) => {
                items.iter().find_map(|item| walk(item, seen))
            }
            Value::Map(_, _, Some(entries)) => entries
                .iter()
                .find_map(|(key, val)| walk(key, seen).or_else(|| walk(val, seen))),
            Value::Struct(s) => s.fields.iter().find_map(|f| walk(&f.value, seen)),
            Value::Ptr(_, Some(p)) => {
                if seen.contains(&p.id()) {
                    return None;
                }
                seen.push(p.id());
                let target = p.get();
                walk(&target, seen)
            }
            _ => None,
        }
    }
    walk(v, &mut Vec::new())
}

/// First construction error among `children`, see [`find_broken`].
pub(crate) fn first_broken<'a, I>(children: I) -> Option<ConstructionError>
where
    I: IntoIterator<Item = &'a Value>,
{
    children.into_iter().find_map(find_broken)
}

fn type_of_node(v: &Value) -> Option<Type> {
    match v {
        Value::Matcher(m) => m.type_behind(),
        other => other.ty(),
    }
}

/// Decodes JSON into the type `expected` declares through `type_behind`,
/// or untyped when it declares none.
pub fn decode_for(expected: &Value, j: &Json) -> Result<Value, ValueError> {
    match type_of_node(expected) {
        Some(ty) if ty != Type::Matcher => Value::from_json_as(j, &ty),
        _ => Ok(Value::from_json(j)),
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Value]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match &self.op {
            Ok(op) => op,
            Err(_) => return write!(f, "{}(<bad usage>)", self.name),
        };
        match op {
            Op::All(children) | Op::Any(children) => {
                write!(f, "{}(", self.name)?;
                write_args(f, children)?;
                f.write_str(")")
            }
            Op::Not(child) | Op::Lax(child) | Op::Len(child) => write!(f, "{}({child})", self.name),
            Op::Set(s) => {
                write!(f, "{}(", self.name)?;
                for (i, pin) in s.pins().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{pin}")?;
                }
                f.write_str(")")
            }
            Op::Ignore | Op::Nil | Op::NotNil | Op::NaN | Op::NotNaN => f.write_str(&self.name),
            Op::Between(b) => write!(f, "{b}"),
            Op::Re(re) => write!(f, "{}({:?})", self.name, re.as_str()),
            Op::Isa(ty) => write!(f, "{}({ty})", self.name),
            Op::Smuggle(s) => write!(f, "{s}"),
            Op::Custom(c) => f.write_str(&c.describe()),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Wraps a user operator into an expectation value.
pub fn custom(op: impl Operator + 'static) -> Value {
    Value::matcher(Matcher::custom(op))
}
