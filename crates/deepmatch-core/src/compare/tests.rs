use super::*;
use crate::config::ContextConfig;
use crate::matchers::{all, any, between, custom, ignore, nil, not, Operator};
use crate::value::{IntKind, Pointer, StructValue, Type};

fn check(got: &Value, expected: &Value) -> MatchResult {
    compare(&Context::default(), got, expected)
}

fn lax() -> Context {
    Context::new(&ContextConfig::default().lax(true))
}

#[test]
fn test_scalars() {
    assert!(check(&Value::int(1), &Value::int(1)).is_ok());
    assert!(check(&Value::str("a"), &Value::str("a")).is_ok());
    assert!(check(&Value::Bool(true), &Value::Bool(true)).is_ok());

    let err = check(&Value::int(1), &Value::int(2)).unwrap_err();
    assert_eq!(err.reason, Reason::ValuesDiffer);
    assert_eq!(err.path, "DATA");
    assert_eq!(err.got.as_deref(), Some("1"));
    assert_eq!(err.expected.as_deref(), Some("2"));
}

#[test]
fn test_nan_never_equal() {
    let nan = Value::float(f64::NAN);
    assert!(check(&nan, &nan).is_err());
}

#[test]
fn test_kind_mismatch_and_lax() {
    let got = Value::Int(3, IntKind::I32);
    let err = check(&got, &Value::int(3)).unwrap_err();
    assert_eq!(err.reason, Reason::TypeMismatch);
    assert_eq!(err.got.as_deref(), Some("int32"));
    assert_eq!(err.expected.as_deref(), Some("int"));

    assert!(compare(&lax(), &got, &Value::int(3)).is_ok());
    assert!(compare(&lax(), &got, &Value::int(4)).is_err());
    assert!(compare(&lax(), &Value::str("3"), &Value::int(3)).is_err());
}

#[test]
fn test_slices() {
    assert!(check(&Value::ints([1, 2]), &Value::ints([1, 2])).is_ok());

    let err = check(&Value::ints([1, 2]), &Value::ints([2, 1])).unwrap_err();
    assert_eq!(err.path, "DATA[0]");

    let err = check(&Value::ints([1, 2, 3]), &Value::ints([1, 2])).unwrap_err();
    assert_eq!(err.reason, Reason::Length);
    assert_eq!(err.message, "comparing slices, from index #2");
    assert_eq!(err.summary.as_deref(), Some("Extra item: (3)"));

    let nil_slice = Value::Slice(Type::int(), None);
    assert!(check(&nil_slice, &nil_slice.clone()).is_ok());
    let err = check(&nil_slice, &Value::ints([])).unwrap_err();
    assert_eq!(err.reason, Reason::Nil);
}

#[test]
fn test_maps() {
    let m = |entries: &[(&str, i64)]| {
        Value::map(
            Type::String,
            Type::int(),
            entries.iter().map(|(k, v)| (Value::str(*k), Value::int(*v))),
        )
    };
    assert!(check(&m(&[("a", 1), ("b", 2)]), &m(&[("b", 2), ("a", 1)])).is_ok());

    let err = check(&m(&[("a", 1)]), &m(&[("a", 2)])).unwrap_err();
    assert_eq!(err.path, "DATA[\"a\"]");

    let err = check(&m(&[("a", 1), ("c", 3)]), &m(&[("a", 1), ("b", 2)])).unwrap_err();
    assert_eq!(err.reason, Reason::Keys);
    let summary = err.summary.unwrap();
    assert!(summary.contains("Missing key: (\"b\")"));
    assert!(summary.contains("Extra key: (\"c\")"));
}

#[test]
fn test_structs() {
    let got = StructValue::new("User").with("Name", "bob").with("Age", 42i64);
    let ok = StructValue::new("User").with("Name", "bob").with("Age", 42i64);
    assert!(check(&got.clone().into(), &ok.into()).is_ok());

    let bad = StructValue::new("User").with("Name", "bob").with("Age", 41i64);
    let err = check(&got.clone().into(), &bad.into()).unwrap_err();
    assert_eq!(err.path, "DATA.Age");

    let with_matcher = StructValue::new("User")
        .with("Name", ignore())
        .with("Age", between(Value::from(40i64), Value::from(50i64)));
    assert!(check(&got.into(), &with_matcher.into()).is_ok());
}

#[test]
fn test_untyped_nil_vs_interface_holding_nil_pointer() {
    assert!(check(&Value::Invalid, &Value::Invalid).is_ok());
    assert!(check(&Value::nil_iface("error"), &Value::Invalid).is_ok());

    let holding_nil = Value::boxed(Value::nil_ptr(Type::int()));
    let err = check(&holding_nil, &Value::Invalid).unwrap_err();
    assert_eq!(err.reason, Reason::Nil);
    assert!(check(&holding_nil, &nil()).is_ok());

    // A typed nil pointer still compares equal to a typed nil pointer.
    assert!(check(&holding_nil, &Value::nil_ptr(Type::int())).is_ok());
}

#[test]
fn test_pointers_and_cycles() {
    let node_ty = Type::Struct("Node".into());
    let cyclic = |val: i64| {
        let p = Pointer::new(Value::Invalid);
        p.set(
            StructValue::new("Node")
                .with("Val", val)
                .with("Next", Value::Ptr(node_ty.clone(), Some(p.clone())))
                .into(),
        );
        Value::Ptr(node_ty.clone(), Some(p))
    };
    assert!(check(&cyclic(1), &cyclic(1)).is_ok());

    let err = check(&cyclic(1), &cyclic(2)).unwrap_err();
    assert_eq!(err.path, "*DATA.Val");

    let a = Value::ptr(Type::int(), Value::int(1));
    assert!(check(&a, &a.clone()).is_ok());
    let err = check(&a, &Value::nil_ptr(Type::int())).unwrap_err();
    assert_eq!(err.reason, Reason::Nil);
}

/// Replaces the pointee of the pointer it holds, then passes.
struct Resets(Pointer);

impl Operator for Resets {
    fn name(&self) -> &str {
        "Resets"
    }

    fn match_value(&self, _ctx: &Context, _got: &Value) -> MatchResult {
        self.0.set(Value::int(0));
        Ok(())
    }
}

#[test]
fn test_operator_may_replace_pointee_during_comparison() {
    let target = Pointer::new(Value::int(7));
    let got = Value::Ptr(Type::int(), Some(target.clone()));
    let expected = Value::Ptr(Type::int(), Some(Pointer::new(custom(Resets(target.clone())))));

    assert!(check(&got, &expected).is_ok());
    assert!(matches!(*target.get(), Value::Int(0, _)));
}

#[test]
fn test_matcher_in_got_is_usage_error() {
    let err = check(&ignore(), &Value::int(1)).unwrap_err();
    assert_eq!(err.reason, Reason::Usage);
}

#[test]
fn test_composition() {
    let one_to_ten = between(Value::int(1), Value::int(10));
    assert!(check(&Value::int(5), &all([one_to_ten.clone(), not(Value::int(4))])).is_ok());

    let err = check(&Value::int(4), &all([one_to_ten.clone(), not(Value::int(4))])).unwrap_err();
    assert_eq!(err.operator.as_deref(), Some("Not"));
    assert_eq!(err.summary.as_deref(), Some("(part 2 of 2 is failing)"));

    assert!(check(&Value::int(12), &any([one_to_ten, Value::int(12)])).is_ok());
    assert!(check(&Value::Invalid, &any([Value::int(1), nil()])).is_ok());
}

#[test]
fn test_invalid_got_rejected_unless_accepted() {
    let err = check(&Value::Invalid, &between(Value::int(1), Value::int(2))).unwrap_err();
    assert_eq!(err.reason, Reason::Nil);
    assert_eq!(err.got.as_deref(), Some("nil"));
    assert_eq!(err.operator, None);
}

#[test]
fn test_boolean_mode_skips_detail() {
    let ctx = Context::new(&ContextConfig::default().boolean(true));
    let err = compare(&ctx, &Value::ints([1]), &Value::ints([2])).unwrap_err();
    assert!(err.is_boolean());
    assert_eq!(err.path, "");
}

#[test]
fn test_max_depth_guard() {
    let cfg = ContextConfig {
        max_depth: Some(1),
        ..ContextConfig::default()
    };
    let nested = Value::slice(
        Type::slice_of(Type::int()),
        [Value::ints([1]), Value::ints([2])],
    );
    let err = compare(&Context::new(&cfg), &nested, &nested.clone()).unwrap_err();
    assert_eq!(err.reason, Reason::Usage);
    assert_eq!(err.path, "DATA[0][0]");
}

#[test]
fn test_deep_equal() {
    assert!(deep_equal(&Value::ints([1, 2]), &Value::ints([1, 2])));
    assert!(!deep_equal(&Value::ints([1, 2]), &Value::ints([1])));
}
