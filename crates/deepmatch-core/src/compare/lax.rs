//! Lax-mode conversions: `got` converted to the expected type when the two
//! are convertible but not identical.

use crate::value::{FloatKind, IntKind, Type, UintKind, Value};

fn to_int(v: &Value, k: IntKind) -> Option<Value> {
    let raw = match v {
        Value::Int(x, _) => *x,
        Value::Uint(x, _) => *x as i64,
        Value::Float(x, _) => *x as i64,
        _ => return None,
    };
    Some(Value::Int(k.wrap(raw), k))
}

fn to_uint(v: &Value, k: UintKind) -> Option<Value> {
    let raw = match v {
        Value::Int(x, _) => *x as u64,
        Value::Uint(x, _) => *x,
        Value::Float(x, _) => *x as u64,
        _ => return None,
    };
    Some(Value::Uint(k.wrap(raw), k))
}

fn to_float(v: &Value, k: FloatKind) -> Option<Value> {
    let raw = match v {
        Value::Int(x, _) => *x as f64,
        Value::Uint(x, _) => *x as f64,
        Value::Float(x, _) => *x,
        _ => return None,
    };
    let raw = match k {
        FloatKind::F32 => f64::from(raw as f32),
        FloatKind::F64 => raw,
    };
    Some(Value::Float(raw, k))
}

fn convert_all(items: &[Value], elem: &Type) -> Option<Vec<Value>> {
    items.iter().map(|item| convert(item, elem)).collect()
}

/// Converts `got` to `target`, or `None` when the types are not
/// convertible. Identical types convert to a clone.
pub(crate) fn convert(got: &Value, target: &Type) -> Option<Value> {
    let got_ty = got.ty()?;
    if &got_ty == target {
        return Some(got.clone());
    }
    if !got_ty.convertible_to(target) {
        return None;
    }
    match target {
        Type::Int(k) => to_int(got, *k),
        Type::Uint(k) => to_uint(got, *k),
        Type::Float(k) => to_float(got, *k),
        Type::Slice(elem) => match got {
            Value::Slice(_, None) => Some(Value::Slice((**elem).clone(), None)),
            Value::Slice(_, Some(items)) | Value::Array(_, items) => {
                Some(Value::Slice((**elem).clone(), Some(convert_all(items, elem)?)))
            }
            _ => None,
        },
        Type::Array(elem, n) => {
            let items = got.items()?;
            if items.len() != *n {
                return None;
            }
            Some(Value::Array((**elem).clone(), convert_all(items, elem)?))
        }
        Type::Map(kt, vt) => match got {
            Value::Map(_, _, None) => Some(Value::Map((**kt).clone(), (**vt).clone(), None)),
            Value::Map(_, _, Some(entries)) => {
                let entries = entries
                    .iter()
                    .map(|(k, v)| Some((convert(k, kt)?, convert(v, vt)?)))
                    .collect::<Option<Vec<_>>>()?;
                Some(Value::Map((**kt).clone(), (**vt).clone(), Some(entries)))
            }
            _ => None,
        },
        _ => None,
    }
}
