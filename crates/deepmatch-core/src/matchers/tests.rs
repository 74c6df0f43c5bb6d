use serde_json::json;

use super::*;
use crate::compare::compare;
use crate::errors::Reason;
use crate::value::{IntKind, Pointer};

fn check(got: &Value, expected: &Value) -> MatchResult {
    compare(&Context::default(), got, expected)
}

fn ints(v: &[i64]) -> Vec<Value> {
    v.iter().copied().map(Value::int).collect()
}

#[test]
fn test_bag_family() {
    let got = Value::ints([1, 1, 2]);
    assert!(check(&got, &bag(ints(&[1, 2, 1]))).is_ok());

    let err = check(&got, &bag(ints(&[1, 2]))).unwrap_err();
    assert_eq!(err.reason, Reason::Assignment);
    assert_eq!(err.message, "comparing slice as a Bag");
    assert_eq!(err.summary.as_deref(), Some("Extra item: (1)"));
    assert_eq!(err.operator.as_deref(), Some("Bag"));

    assert!(check(&Value::ints([1]), &sub_bag_of(ints(&[1, 1, 2]))).is_ok());
    assert!(check(&Value::ints([1, 1, 1]), &sub_bag_of(ints(&[1, 1, 2]))).is_err());
    assert!(check(&Value::ints([3, 1, 1, 2]), &super_bag_of(ints(&[1, 1]))).is_ok());

    let err = check(&Value::ints([1]), &super_bag_of(ints(&[1, 4, 5]))).unwrap_err();
    assert_eq!(err.summary.as_deref(), Some("Missing 2 items: (4, 5)"));
}

#[test]
fn test_set_family() {
    let got = Value::ints([1, 1, 2]);
    assert!(check(&got, &set(ints(&[1, 2]))).is_ok());
    assert!(check(&got, &set(ints(&[1, 2, 1, 1, 1]))).is_ok());
    assert!(check(&got, &sub_set_of(ints(&[1, 2, 3]))).is_ok());
    assert!(check(&got, &super_set_of(ints(&[2]))).is_ok());
    assert!(check(&got, &super_set_of(ints(&[2, 3]))).is_err());
}

#[test]
fn test_set_dedups_pins_at_construction() {
    let v = set(ints(&[1, 2, 1, 1]));
    let Ok(Op::Set(s)) = v.as_matcher().unwrap().op() else {
        panic!("expected a set matcher");
    };
    assert_eq!(s.pins().len(), 2);
    assert_eq!(v.to_string(), "Set(1, 2)");

    let v = bag(ints(&[1, 1]));
    let Ok(Op::Set(s)) = v.as_matcher().unwrap().op() else {
        panic!("expected a set matcher");
    };
    assert_eq!(s.pins().len(), 2);
}

#[test]
fn test_not_any() {
    let got = Value::ints([4, 5, 9, 42]);
    assert!(check(&got, &not_any(ints(&[3, 6, 8, 41, 43]))).is_ok());
    let err = check(&got, &not_any(ints(&[3, 6, 8, 42, 43]))).unwrap_err();
    assert_eq!(err.summary.as_deref(), Some("Extra item: (42)"));
}

#[test]
fn test_set_accepts_arrays_and_pointers() {
    let arr = Value::array(Type::int(), ints(&[2, 1]));
    assert!(check(&arr, &bag(ints(&[1, 2]))).is_ok());

    let ptr = Value::Ptr(
        Type::slice_of(Type::int()),
        Some(Pointer::new(Value::ints([2, 1]))),
    );
    assert!(check(&ptr, &bag(ints(&[1, 2]))).is_ok());

    let err = check(&Value::nil_ptr(Type::slice_of(Type::int())), &bag(ints(&[1]))).unwrap_err();
    assert_eq!(err.reason, Reason::Nil);

    let err = check(&Value::int(1), &bag(ints(&[1]))).unwrap_err();
    assert_eq!(err.reason, Reason::TypeMismatch);
    assert_eq!(err.message, "bad kind");
}

#[test]
fn test_set_on_untyped_json() {
    let got = Value::from_json(&json!([1, "a", null]));
    assert!(check(&got, &bag([Value::str("a"), nil(), Value::int(1)])).is_ok());
}

#[test]
fn test_broken_pin_breaks_set() {
    let v = bag([Value::int(1), re("(")]);
    let err = check(&Value::ints([1]), &v).unwrap_err();
    assert_eq!(err.reason, Reason::Usage);
    assert_eq!(err.operator.as_deref(), Some("Bag"));
}

#[test]
fn test_flatten() {
    let pins = flatten([Value::ints([1, 2]), Value::int(3), Value::str("x")]);
    assert_eq!(pins.len(), 4);
    assert!(check(&Value::ints([3, 2, 1]), &set(flatten([Value::ints([1, 2, 3])]))).is_ok());
}

#[test]
fn test_smuggle() {
    let double = smuggle(
        "double",
        |v: &Value| match v {
            Value::Int(n, k) => Ok(Value::Int(n * 2, *k)),
            _ => Err("not an int".to_string()),
        },
        Value::int(8),
    );
    assert!(check(&Value::int(4), &double).is_ok());

    let err = check(&Value::int(3), &double).unwrap_err();
    assert_eq!(err.path, "double(DATA)");
    assert_eq!(err.operator.as_deref(), Some("Smuggle"));

    let err = check(&Value::str("x"), &double).unwrap_err();
    assert_eq!(err.reason, Reason::OperatorFailed);
    assert_eq!(err.summary.as_deref(), Some("not an int"));
}

#[test]
fn test_smuggle_typed_input() {
    let ident = smuggle_typed("id", Type::int(), |v: &Value| Ok(v.clone()), Value::int(4));
    let got = Value::Int(4, IntKind::I16);
    let err = check(&got, &ident).unwrap_err();
    assert_eq!(err.reason, Reason::TypeMismatch);

    let lax = Context::new(&crate::config::ContextConfig::default().lax(true));
    assert!(compare(&lax, &got, &ident).is_ok());
    assert_eq!(ident.as_matcher().unwrap().type_behind(), Some(Type::int()));
}

#[test]
fn test_lax_matcher() {
    let got = Value::Int(4, IntKind::I8);
    assert!(check(&got, &Value::int(4)).is_err());
    assert!(check(&got, &lax(Value::int(4))).is_ok());
}

struct Even;

impl Operator for Even {
    fn name(&self) -> &str {
        "Even"
    }

    fn match_value(&self, ctx: &Context, got: &Value) -> MatchResult {
        match got {
            Value::Int(n, _) if n % 2 == 0 => Ok(()),
            _ => Err(ctx.fail(crate::errors::Reason::ValuesDiffer, "not even", |e| e.with_got(got))),
        }
    }

    fn type_behind(&self) -> Option<Type> {
        Some(Type::int())
    }
}

#[test]
fn test_custom_operator() {
    let even = custom(Even);
    assert!(check(&Value::int(2), &even).is_ok());
    let err = check(&Value::int(3), &even).unwrap_err();
    assert_eq!(err.message, "not even");
    assert_eq!(err.operator.as_deref(), Some("Even"));

    assert!(check(&Value::ints([2, 4, 6]), &set([even.clone()])).is_ok());
    assert!(check(&Value::Invalid, &even).is_err());
}

#[test]
fn test_type_behind_and_decode_for() {
    assert_eq!(
        between(Value::from(1i32), Value::from(9i32)).as_matcher().unwrap().type_behind(),
        Some(Type::Int(IntKind::I32))
    );
    assert_eq!(re("x").as_matcher().unwrap().type_behind(), Some(Type::String));
    assert_eq!(bag(ints(&[1])).as_matcher().unwrap().type_behind(), None);
    assert_eq!(
        all([Value::int(1), gt(Value::int(0))]).as_matcher().unwrap().type_behind(),
        Some(Type::int())
    );

    let decoded = decode_for(&custom(Even), &json!(6)).unwrap();
    assert!(check(&decoded, &custom(Even)).is_ok());

    let decoded = decode_for(&between(Value::from(1i32), Value::from(9i32)), &json!(5)).unwrap();
    assert_eq!(decoded.ty(), Some(Type::Int(IntKind::I32)));

    assert!(decode_for(&isa(Type::Int(IntKind::I8)), &json!(300)).is_err());

    let untyped = decode_for(&ignore(), &json!([1])).unwrap();
    assert_eq!(untyped.ty(), Some(Type::slice_of(Type::any())));
}

#[test]
fn test_display() {
    assert_eq!(re("^a").to_string(), "Re(\"^a\")");
    assert_eq!(not(Value::int(1)).to_string(), "Not(1)");
    assert_eq!(
        between_with(Value::int(1), Value::int(2), Bounds::InOut).to_string(),
        "Between(1, 2, InOut)"
    );
    assert_eq!(gt(Value::int(1)).to_string(), "Gt(1)");
    assert_eq!(isa(Type::int()).to_string(), "Isa(int)");
    assert_eq!(len(Value::int(2)).to_string(), "Len(2)");
    assert_eq!(re("(").to_string(), "Re(<bad usage>)");
}

#[test]
fn test_accepts_invalid() {
    for m in [ignore(), nil(), not_nil(), any([Value::int(1)]), all([ignore()]), not(Value::int(1))] {
        assert!(m.as_matcher().unwrap().accepts_invalid(), "{m}");
    }
    for m in [bag(ints(&[1])), nan(), gt(Value::int(1)), re("a"), isa(Type::int())] {
        assert!(!m.as_matcher().unwrap().accepts_invalid(), "{m}");
    }
}

#[test]
fn test_set_family_summaries() {
    let err = check(&Value::ints([1, 1, 2, 7]), &sub_set_of(ints(&[1, 2, 3]))).unwrap_err();
    assert_eq!(err.message, "comparing slice as a SubSetOf");
    assert_eq!(err.summary.as_deref(), Some("Extra item: (7)"));

    let err = check(&Value::ints([1, 2]), &super_set_of(ints(&[2, 3, 4]))).unwrap_err();
    assert_eq!(err.message, "comparing slice as a SuperSetOf");
    assert_eq!(err.summary.as_deref(), Some("Missing 2 items: (3, 4)"));

    let err = check(&Value::ints([1, 5, 5]), &set(ints(&[1, 2]))).unwrap_err();
    assert_eq!(err.summary.as_deref(), Some("Missing item: (2)\nExtra item: (5)"));
}

#[test]
fn test_construction_errors_behind_slots_and_containers() {
    let words = Value::slice(Type::String, [Value::str("a")]);

    let err = check(&words, &not(Value::slice(Type::String, [re("(")]))).unwrap_err();
    assert_eq!(err.reason, Reason::Usage);
    assert_eq!(err.operator.as_deref(), Some("Not"));

    let err = check(&Value::str("a"), &not(Value::boxed(re("(")))).unwrap_err();
    assert_eq!(err.reason, Reason::Usage);

    let err = check(&Value::str("a"), &any([Value::boxed(re("(")), Value::str("a")])).unwrap_err();
    assert_eq!(err.reason, Reason::Usage);

    let err = check(&words, &bag([Value::boxed(re("("))])).unwrap_err();
    assert_eq!(err.reason.code(), crate::errors::codes::E_BAD_USAGE);
    assert_eq!(err.operator.as_deref(), Some("Bag"));

    let err = check(&Value::str("a"), &lax(Value::boxed(re("(")))).unwrap_err();
    assert_eq!(err.reason, Reason::Usage);
}

#[test]
fn test_smuggled_pointers_are_compared_each_time() {
    let five = Value::ptr(Type::int(), Value::int(5));
    let wrap = smuggle("p", |v: &Value| Ok(Value::ptr(Type::int(), v.clone())), five);
    let expected = Value::slice(Type::int(), [wrap.clone(), wrap]);

    assert!(check(&Value::ints([5, 5]), &expected).is_ok());
    let err = check(&Value::ints([5, 6]), &expected).unwrap_err();
    assert_eq!(err.reason, Reason::ValuesDiffer);
    assert_eq!(err.got.as_deref(), Some("6"));
}

#[test]
fn test_lax_pass_does_not_excuse_strict_compare() {
    let s_ty = Type::Struct("S".into());
    let got = Value::ptr(
        s_ty.clone(),
        crate::value::StructValue::new("S").with("A", Value::Int(3, IntKind::I32)).into(),
    );
    let want = Value::ptr(s_ty, crate::value::StructValue::new("S").with("A", 3i64).into());

    let strict = check(&got, &want).unwrap_err();
    assert_eq!(strict.reason, Reason::TypeMismatch);
    assert!(check(&got, &lax(want.clone())).is_ok());

    let err = check(&got, &all([lax(want.clone()), want])).unwrap_err();
    assert_eq!(err.reason, Reason::TypeMismatch);
    assert_eq!(err.path, "*DATA.A");
}
