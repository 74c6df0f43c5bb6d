//! Literal/matcher classification of expected-side values.

use std::fmt;

use crate::matchers::Matcher;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// Compared structurally.
    Literal,
    /// Dispatched to the matcher contract.
    Matcher,
}

/// A value is a matcher iff it carries one, possibly behind interface
/// slots; everything else is a literal.
pub fn classify(v: &Value) -> Tag {
    match v {
        Value::Matcher(_) => Tag::Matcher,
        Value::Iface(_, Some(inner)) => classify(inner),
        _ => Tag::Literal,
    }
}

/// An expected-side node with its classification computed once.
#[derive(Clone)]
pub struct Expectation {
    value: Value,
    tag: Tag,
}

impl Expectation {
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        let tag = classify(&value);
        Self { value, tag }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn is_matcher(&self) -> bool {
        self.tag == Tag::Matcher
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The matcher behind this node, looking through interface slots.
    pub fn matcher(&self) -> Option<&Matcher> {
        let mut v = &self.value;
        loop {
            match v {
                Value::Matcher(m) => return Some(&**m),
                Value::Iface(_, Some(inner)) => v = &**inner,
                _ => return None,
            }
        }
    }
}

impl From<Value> for Expectation {
    fn from(v: Value) -> Self {
        Self::new(v)
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.tag, self.value)
    }
}
