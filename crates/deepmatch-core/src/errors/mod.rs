//! Match failures.
//!
//! Failures are ordinary values: a [`MatchError`] is returned up the call
//! chain with the [`Path`] where the comparison diverged, a machine
//! readable [`Reason`] and, unless the comparison runs in boolean-only
//! mode, rendered got/expected values.

pub mod path;

use std::fmt;

use serde::Serialize;

pub use path::{Path, Segment};

/// Short machine-checkable reason of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    #[error("values differ")]
    ValuesDiffer,
    #[error("type mismatch")]
    TypeMismatch,
    #[error("nil mismatch")]
    Nil,
    #[error("length mismatch")]
    Length,
    #[error("missing or extra keys")]
    Keys,
    #[error("assignment infeasible")]
    Assignment,
    #[error("bad usage")]
    Usage,
    #[error("operator failed")]
    OperatorFailed,
    /// Boolean-only mode: no detail was computed.
    #[error("mismatch")]
    Boolean,
}

// Error codes
pub mod codes {
    pub const E_VALUES_DIFFER: &str = "E_VALUES_DIFFER";
    pub const E_TYPE_MISMATCH: &str = "E_TYPE_MISMATCH";
    pub const E_NIL: &str = "E_NIL";
    pub const E_LENGTH: &str = "E_LENGTH";
    pub const E_KEYS: &str = "E_KEYS";
    pub const E_ASSIGNMENT: &str = "E_ASSIGNMENT";
    pub const E_BAD_USAGE: &str = "E_BAD_USAGE";
    pub const E_OPERATOR: &str = "E_OPERATOR";
    pub const E_MISMATCH: &str = "E_MISMATCH";
}

impl Reason {
    pub fn code(self) -> &'static str {
        match self {
            Self::ValuesDiffer => codes::E_VALUES_DIFFER,
            Self::TypeMismatch => codes::E_TYPE_MISMATCH,
            Self::Nil => codes::E_NIL,
            Self::Length => codes::E_LENGTH,
            Self::Keys => codes::E_KEYS,
            Self::Assignment => codes::E_ASSIGNMENT,
            Self::Usage => codes::E_BAD_USAGE,
            Self::OperatorFailed => codes::E_OPERATOR,
            Self::Boolean => codes::E_MISMATCH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchError {
    pub reason: Reason,
    pub message: String,
    /// Rendered location, e.g. `DATA[1].Name`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub got: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Multi-line explanation, e.g. Missing/Extra item lists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Name of the matcher that produced the failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

impl MatchError {
    pub fn new(reason: Reason, message: impl Into<String>, path: &Path) -> Self {
        Self {
            reason,
            message: message.into(),
            path: path.to_string(),
            got: None,
            expected: None,
            summary: None,
            operator: None,
        }
    }

    /// The detail-free failure used in boolean-only mode.
    pub fn boolean() -> Self {
        Self {
            reason: Reason::Boolean,
            message: String::new(),
            path: String::new(),
            got: None,
            expected: None,
            summary: None,
            operator: None,
        }
    }

    pub fn with_got(mut self, got: impl fmt::Display) -> Self {
        self.got = Some(got.to_string());
        self
    }

    pub fn with_expected(mut self, expected: impl fmt::Display) -> Self {
        self.expected = Some(expected.to_string());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Tags the error with the matcher it came from, keeping an existing
    /// tag so the innermost operator wins.
    pub fn with_operator(mut self, name: impl Into<String>) -> Self {
        if self.operator.is_none() {
            self.operator = Some(name.into());
        }
        self
    }

    pub fn is_boolean(&self) -> bool {
        self.reason == Reason::Boolean
    }

    pub fn code(&self) -> &'static str {
        self.reason.code()
    }

    /// Diagnostic-shaped JSON: code, message and a context object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "message": self.message,
            "context": {
                "path": self.path,
                "got": self.got,
                "expected": self.expected,
                "summary": self.summary,
                "operator": self.operator,
            }
        })
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_boolean() {
            return f.write_str("mismatch (boolean-only comparison, no detail)");
        }
        write!(f, "{}: {}", self.path, self.message)?;
        if let Some(got) = &self.got {
            write!(f, "\n\t     got: {got}")?;
        }
        if let Some(expected) = &self.expected {
            write!(f, "\n\texpected: {expected}")?;
        }
        if let Some(summary) = &self.summary {
            for line in summary.lines() {
                write!(f, "\n\t  {line}")?;
            }
        }
        if let Some(op) = &self.operator {
            write!(f, "\n\t[under operator {op}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for MatchError {}

/// Pass, or a failure carrying its explanation.
pub type MatchResult = Result<(), MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_detailed() {
        let err = MatchError::new(Reason::ValuesDiffer, "values differ", &Path::new("DATA").push(Segment::Index(1)))
            .with_got(2)
            .with_expected(3)
            .with_operator("Bag");
        let s = err.to_string();
        assert!(s.starts_with("DATA[1]: values differ"));
        assert!(s.contains("got: 2"));
        assert!(s.contains("expected: 3"));
        assert!(s.contains("[under operator Bag]"));
    }

    #[test]
    fn test_innermost_operator_wins() {
        let err = MatchError::new(Reason::ValuesDiffer, "x", &Path::new("DATA"))
            .with_operator("Between")
            .with_operator("All");
        assert_eq!(err.operator.as_deref(), Some("Between"));
    }

    #[test]
    fn test_json_diagnostic_shape() {
        let err = MatchError::new(Reason::TypeMismatch, "type mismatch", &Path::new("DATA"))
            .with_got("int")
            .with_expected("string");
        let j = err.to_json();
        assert_eq!(j["code"], "E_TYPE_MISMATCH");
        assert_eq!(j["context"]["path"], "DATA");
        assert_eq!(j["context"]["expected"], "string");
        assert!(MatchError::boolean().is_boolean());
    }
}
