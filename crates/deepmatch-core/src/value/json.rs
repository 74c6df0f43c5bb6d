//! serde_json interop.
//!
//! `from_json` mirrors an untyped decode (`any`), `from_json_as` decodes
//! into a declared type, typically the one a matcher reports through
//! `type_behind`.

use serde_json::Value as Json;

use super::{StructValue, Type, Value, ValueError};

fn json_kind(j: &Json) -> &'static str {
    match j {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn boxed_any(j: &Json) -> Value {
    match j {
        Json::Null => Value::nil_iface("any"),
        other => Value::boxed(Value::from_json(other)),
    }
}

impl Value {
    /// Untyped decode: integers that fit become `int` (or `uint` above
    /// `i64::MAX`), other numbers `float64`, arrays `[]any`, objects
    /// `map[string]any`, and `null` untyped nil.
    pub fn from_json(j: &Json) -> Value {
        match j {
            Json::Null => Value::Invalid,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::uint(u)
                } else {
                    Value::float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => Value::Slice(Type::any(), Some(items.iter().map(boxed_any).collect())),
            Json::Object(obj) => Value::Map(
                Type::String,
                Type::any(),
                Some(
                    obj.iter()
                        .map(|(k, v)| (Value::Str(k.clone()), boxed_any(v)))
                        .collect(),
                ),
            ),
        }
    }

    /// Decodes `j` into a value of type `ty`.
    pub fn from_json_as(j: &Json, ty: &Type) -> Result<Value, ValueError> {
        let mismatch = || ValueError::Decode {
            target: ty.to_string(),
            found: json_kind(j).to_string(),
        };
        let overflow = |number: String| ValueError::Overflow {
            target: ty.to_string(),
            number,
        };

        match ty {
            Type::Bool => j.as_bool().map(Value::Bool).ok_or_else(mismatch),
            Type::Int(k) => {
                let Json::Number(n) = j else {
                    return Err(mismatch());
                };
                let v = match n.as_i64() {
                    Some(v) => v,
                    None => match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                            f as i64
                        }
                        _ => return Err(overflow(n.to_string())),
                    },
                };
                if k.wrap(v) != v {
                    return Err(overflow(n.to_string()));
                }
                Ok(Value::Int(v, *k))
            }
            Type::Uint(k) => {
                let Json::Number(n) = j else {
                    return Err(mismatch());
                };
                let v = n.as_u64().ok_or_else(|| overflow(n.to_string()))?;
                if k.wrap(v) != v {
                    return Err(overflow(n.to_string()));
                }
                Ok(Value::Uint(v, *k))
            }
            Type::Float(k) => j
                .as_f64()
                .map(|f| Value::Float(f, *k))
                .ok_or_else(mismatch),
            Type::String => j.as_str().map(Value::str).ok_or_else(mismatch),
            Type::Slice(elem) => match j {
                Json::Null => Ok(Value::Slice((**elem).clone(), None)),
                Json::Array(items) => {
                    let items = items
                        .iter()
                        .map(|item| Value::from_json_as(item, elem))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Value::Slice((**elem).clone(), Some(items)))
                }
                _ => Err(mismatch()),
            },
            Type::Array(elem, n) => {
                let items = j.as_array().ok_or_else(mismatch)?;
                if items.len() > *n {
                    return Err(mismatch());
                }
                let mut out = items
                    .iter()
                    .map(|item| Value::from_json_as(item, elem))
                    .collect::<Result<Vec<_>, _>>()?;
                out.resize_with(*n, || elem.zero_value());
                Ok(Value::Array((**elem).clone(), out))
            }
            Type::Map(key, elem) => {
                if **key != Type::String {
                    return Err(ValueError::Unsupported(ty.to_string()));
                }
                match j {
                    Json::Null => Ok(Value::Map(Type::String, (**elem).clone(), None)),
                    Json::Object(obj) => {
                        let entries = obj
                            .iter()
                            .map(|(k, v)| -> Result<(Value, Value), ValueError> {
                                Ok((Value::Str(k.clone()), Value::from_json_as(v, elem)?))
                            })
                            .collect::<Result<Vec<_>, _>>()?;
                        Ok(Value::Map(Type::String, (**elem).clone(), Some(entries)))
                    }
                    _ => Err(mismatch()),
                }
            }
            Type::Ptr(elem) => match j {
                Json::Null => Ok(Value::nil_ptr((**elem).clone())),
                other => Ok(Value::ptr((**elem).clone(), Value::from_json_as(other, elem)?)),
            },
            Type::Interface(name) => Ok(match j {
                Json::Null => Value::nil_iface(name.clone()),
                other => Value::Iface(name.clone(), Some(Box::new(Value::from_json(other)))),
            }),
            Type::Struct(name) => {
                let obj = j.as_object().ok_or_else(mismatch)?;
                let s = obj
                    .iter()
                    .fold(StructValue::new(name.clone()), |s, (k, v)| {
                        s.with(k.clone(), Value::from_json(v))
                    });
                Ok(Value::Struct(s))
            }
            Type::Matcher => Err(ValueError::Unsupported(ty.to_string())),
        }
    }
}
