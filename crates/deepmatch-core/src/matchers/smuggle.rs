//! Smuggle: run got through a user function and compare what comes out.

use std::fmt;
use std::rc::Rc;

use crate::compare::{compare, lax};
use crate::context::Context;
use crate::errors::{MatchResult, Reason, Segment};
use crate::value::{Type, Value};

use super::{find_broken, Matcher, Op};

pub type SmuggleFn = Rc<dyn Fn(&Value) -> Result<Value, String>>;

#[derive(Clone)]
pub struct Smuggle {
    label: String,
    func: SmuggleFn,
    expected: Value,
    input: Option<Type>,
}

/// Passes when `f(got)` matches `expected`. An `Err` from `f` fails the
/// comparison with its message.
///
/// ```
/// use deepmatch_core::matchers::{gt, smuggle};
/// use deepmatch_core::{cmp_deeply, Value};
///
/// let len = smuggle("len", |v: &Value| Ok(Value::int(v.len().unwrap_or(0) as i64)), gt(Value::int(2)));
/// assert!(cmp_deeply(&Value::ints([1, 2, 3]), &len).is_ok());
/// ```
pub fn smuggle<F>(label: impl Into<String>, f: F, expected: Value) -> Value
where
    F: Fn(&Value) -> Result<Value, String> + 'static,
{
    build(label.into(), None, Rc::new(f), expected)
}

/// Like [`smuggle`], but got must be of type `input` (or convertible to it
/// in lax mode) before `f` is called.
pub fn smuggle_typed<F>(label: impl Into<String>, input: Type, f: F, expected: Value) -> Value
where
    F: Fn(&Value) -> Result<Value, String> + 'static,
{
    build(label.into(), Some(input), Rc::new(f), expected)
}

fn build(label: String, input: Option<Type>, func: SmuggleFn, expected: Value) -> Value {
    if let Some(err) = find_broken(&expected) {
        return Value::matcher(Matcher::broken("Smuggle", err.to_string()));
    }
    Value::matcher(Matcher::new(
        "Smuggle",
        Op::Smuggle(Smuggle {
            label,
            func,
            expected,
            input,
        }),
    ))
}

impl Smuggle {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn input_type(&self) -> Option<Type> {
        self.input.clone()
    }

    pub(crate) fn match_value(&self, ctx: &Context, got: &Value) -> MatchResult {
        let converted;
        let arg = match &self.input {
            None => got,
            Some(ty) if got.ty().as_ref() == Some(ty) => got,
            Some(ty) => {
                converted = ctx
                    .be_lax
                    .then(|| lax::convert(got, ty))
                    .flatten()
                    .ok_or_else(|| {
                        ctx.fail(Reason::TypeMismatch, "incompatible parameter type", |e| {
                            e.with_got(got.ty().map_or_else(|| "nil".to_string(), |t| t.to_string()))
                                .with_expected(ty)
                        })
                    })?;
                &converted
            }
        };

        let out = (self.func)(arg).map_err(|msg| {
            ctx.fail(Reason::OperatorFailed, "smuggle function failed", |e| {
                e.with_got(arg).with_summary(msg)
            })
        })?;

        compare(&ctx.child(Segment::Call(self.label.clone())), &out, &self.expected)
    }
}

impl fmt::Display for Smuggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Smuggle({}, {})", self.label, self.expected)
    }
}
