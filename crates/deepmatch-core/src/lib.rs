//! Structural matching engine for test assertions.
//!
//! Compares a runtime value ("got") against an expectation tree made of
//! literal values and composable matchers ("expected"). On mismatch the
//! result says where (a path such as `DATA[2].Name`) and why.
//!
//! - Recursive comparator over dynamic [`Value`]s with cycle detection
//! - Matchers dispatched through a closed union, plus a trait for user
//!   operators
//! - Bag/Set matcher family backed by a bipartite assignment engine that
//!   reports which items could not be placed
//!
//! # Quick Start
//!
//! ```
//! use deepmatch_core::matchers::{bag, between, not_any};
//! use deepmatch_core::{cmp_deeply, Value};
//!
//! let got = Value::ints([3, 1, 2]);
//! assert!(cmp_deeply(&got, &bag([Value::int(1), Value::int(2), between(Value::int(3), Value::int(5))])).is_ok());
//!
//! let err = cmp_deeply(&got, &not_any([Value::int(2)])).unwrap_err();
//! assert_eq!(err.code(), "E_ASSIGNMENT");
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `DEEPMATCH_ROOT_NAME` | First element of error paths (default: `DATA`) |
//! | `DEEPMATCH_BE_LAX` | Compare convertible types after conversion |
//! | `DEEPMATCH_BOOLEAN_ONLY` | Skip building detailed errors |
//! | `DEEPMATCH_MAX_DEPTH` | Recursion guard (default: none) |
//!
//! Environment variables are only read through [`ContextConfig::from_env`].

pub mod assign;
pub mod compare;
pub mod config;
pub mod context;
pub mod errors;
pub mod matchers;
pub mod tag;
pub mod value;

// Re-export main types
pub use assign::{AssignmentProblem, Duplicates, Policy, Solution, Unsatisfied};
pub use compare::{compare, deep_equal};
pub use config::ContextConfig;
pub use context::Context;
pub use errors::{MatchError, MatchResult, Path, Reason, Segment};
pub use matchers::{ConstructionError, Matcher, Operator};
pub use tag::{Expectation, Tag};
pub use value::{Pointer, StructValue, Type, Value, ValueError};

/// Compares with the default configuration.
pub fn cmp_deeply(got: &Value, expected: &Value) -> MatchResult {
    cmp_deeply_with(&ContextConfig::default(), got, expected)
}

pub fn cmp_deeply_with(cfg: &ContextConfig, got: &Value, expected: &Value) -> MatchResult {
    let ctx = Context::new(cfg);
    let result = compare(&ctx, got, expected);
    if let Err(err) = &result {
        tracing::debug!(code = err.code(), path = %err.path, "comparison failed");
    }
    result
}

/// Pass/fail only; no error detail is built.
pub fn eq_deeply(got: &Value, expected: &Value) -> bool {
    cmp_deeply_with(&ContextConfig::default().boolean(true), got, expected).is_ok()
}
