//! Unordered container matchers: Bag, Set and their Sub/Super/None
//! variants. All of them hand the actual work to the assignment engine.

use std::borrow::Cow;
use std::rc::Rc;

use crate::assign::{AssignmentProblem, Policy, Unsatisfied};
use crate::compare::deep_equal;
use crate::context::Context;
use crate::errors::{MatchResult, Reason};
use crate::tag::Expectation;
use crate::value::Value;

use super::{first_broken, Matcher, Op};

pub use crate::assign::Duplicates;

#[derive(Clone)]
pub struct SetMatcher {
    policy: Policy,
    duplicates: Duplicates,
    pins: Vec<Expectation>,
}

impl SetMatcher {
    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn duplicates(&self) -> Duplicates {
        self.duplicates
    }

    pub fn pins(&self) -> &[Expectation] {
        &self.pins
    }
}

fn same_pin(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Matcher(x), Value::Matcher(y)) => Rc::ptr_eq(x, y),
        (Value::Matcher(_), _) | (_, Value::Matcher(_)) => false,
        _ => deep_equal(a, b),
    }
}

fn build(name: &str, policy: Policy, duplicates: Duplicates, pins: Vec<Value>) -> Value {
    if let Some(bad) = first_broken(&pins) {
        return Value::matcher(Matcher::broken(name, bad.to_string()));
    }

    let mut kept: Vec<Expectation> = Vec::with_capacity(pins.len());
    for pin in pins {
        if duplicates == Duplicates::Ignored && kept.iter().any(|k| same_pin(k.value(), &pin)) {
            continue;
        }
        kept.push(Expectation::new(pin));
    }
    Value::matcher(Matcher::new(
        name,
        Op::Set(SetMatcher {
            policy,
            duplicates,
            pins: kept,
        }),
    ))
}

/// Same items, in any order, duplicates counted.
pub fn bag<I: IntoIterator<Item = Value>>(pins: I) -> Value {
    build("Bag", Policy::Exact, Duplicates::Matter, pins.into_iter().collect())
}

/// Every got item has a distinct pin; pins may be left over.
pub fn sub_bag_of<I: IntoIterator<Item = Value>>(pins: I) -> Value {
    build("SubBagOf", Policy::Sub, Duplicates::Matter, pins.into_iter().collect())
}

/// Every pin has a distinct got item; got items may be left over.
pub fn super_bag_of<I: IntoIterator<Item = Value>>(pins: I) -> Value {
    build("SuperBagOf", Policy::Super, Duplicates::Matter, pins.into_iter().collect())
}

/// Same items, in any order, duplicates ignored on both sides.
pub fn set<I: IntoIterator<Item = Value>>(pins: I) -> Value {
    build("Set", Policy::Exact, Duplicates::Ignored, pins.into_iter().collect())
}

pub fn sub_set_of<I: IntoIterator<Item = Value>>(pins: I) -> Value {
    build("SubSetOf", Policy::Sub, Duplicates::Ignored, pins.into_iter().collect())
}

pub fn super_set_of<I: IntoIterator<Item = Value>>(pins: I) -> Value {
    build("SuperSetOf", Policy::Super, Duplicates::Ignored, pins.into_iter().collect())
}

/// No got item may match any pin.
pub fn not_any<I: IntoIterator<Item = Value>>(pins: I) -> Value {
    build("NotAny", Policy::None, Duplicates::Ignored, pins.into_iter().collect())
}

/// Splices the items of slices and arrays as individual pins; other values
/// are kept as they are.
///
/// ```
/// use deepmatch_core::matchers::{bag, flatten};
/// use deepmatch_core::{cmp_deeply, Value};
///
/// let pins = flatten([Value::ints([1, 2]), Value::int(3)]);
/// assert!(cmp_deeply(&Value::ints([3, 2, 1]), &bag(pins)).is_ok());
/// ```
pub fn flatten<I: IntoIterator<Item = Value>>(values: I) -> Vec<Value> {
    let mut out = Vec::new();
    for v in values {
        match v.items() {
            Some(items) => out.extend(items.iter().cloned()),
            None => out.push(v),
        }
    }
    out
}

fn list<'a, I>(items: I) -> String
where
    I: IntoIterator<Item = &'a Value>,
{
    items
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn summary_line(label: &str, items: &[&Value]) -> String {
    if items.len() == 1 {
        format!("{label} item: ({})", list(items.iter().copied()))
    } else {
        format!("{label} {} items: ({})", items.len(), list(items.iter().copied()))
    }
}

impl SetMatcher {
    fn explain(&self, got: &[Value], why: &Unsatisfied) -> String {
        let mut lines = Vec::new();
        if !why.missing.is_empty() {
            let missing: Vec<&Value> = why.missing.iter().map(|&p| self.pins[p].value()).collect();
            lines.push(summary_line("Missing", &missing));
        }
        let mut extra: Vec<&Value> = why.extra.iter().map(|&g| &got[g]).collect();
        let mut seen = Vec::new();
        for &(g, _) in &why.collisions {
            if !seen.contains(&g) {
                seen.push(g);
                extra.push(&got[g]);
            }
        }
        if !extra.is_empty() {
            lines.push(summary_line("Extra", &extra));
        }
        lines.join("\n")
    }

    pub(crate) fn match_value(&self, ctx: &Context, got: &Value, m: &Matcher) -> MatchResult {
        let items: Cow<'_, [Value]> = match got {
            Value::Array(..) | Value::Slice(..) => Cow::Borrowed(got.items().unwrap_or(&[])),
            Value::Ptr(_, Some(p)) => match p.get().items() {
                Some(items) => Cow::Owned(items.to_vec()),
                None => return Err(bad_kind(ctx, got)),
            },
            Value::Ptr(_, None) => {
                return Err(ctx.fail(Reason::Nil, "nil pointer", |e| {
                    e.with_got(got)
                        .with_expected("non-nil *slice OR *array")
                }))
            }
            _ => return Err(bad_kind(ctx, got)),
        };

        let problem = AssignmentProblem::new(&items, &self.pins, self.duplicates, self.policy);
        match problem.solve(ctx) {
            Ok(_) => Ok(()),
            Err(why) => Err(ctx.fail(
                Reason::Assignment,
                &format!("comparing {} as a {}", got_kind(got), m.name()),
                |e| e.with_summary(self.explain(&items, &why)),
            )),
        }
    }
}

fn got_kind(got: &Value) -> &'static str {
    match got {
        Value::Array(..) => "array",
        Value::Ptr(..) => "pointed container",
        _ => "slice",
    }
}

fn bad_kind(ctx: &Context, got: &Value) -> crate::errors::MatchError {
    ctx.fail(Reason::TypeMismatch, "bad kind", |e| {
        e.with_got(got.ty().map_or_else(|| "nil".to_string(), |t| t.to_string()))
            .with_expected("slice OR array OR *slice OR *array")
    })
}
