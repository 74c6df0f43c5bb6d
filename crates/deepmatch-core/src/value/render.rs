use std::fmt;

use super::{FloatKind, IntKind, Value};

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut Vec::new())
    }
}

fn write_list<'a, I>(
    f: &mut fmt::Formatter<'_>,
    items: I,
    seen: &mut Vec<usize>,
) -> fmt::Result
where
    I: IntoIterator<Item = &'a Value>,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_value(f, item, seen)?;
    }
    Ok(())
}

// `seen` holds the pointers on the current rendering path so cyclic data
// prints a marker instead of recursing forever.
fn write_value(f: &mut fmt::Formatter<'_>, v: &Value, seen: &mut Vec<usize>) -> fmt::Result {
    match v {
        Value::Invalid => f.write_str("nil"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Int(n, IntKind::Int) => write!(f, "{n}"),
        Value::Int(n, k) => write!(f, "({k}) {n}"),
        Value::Uint(n, k) => write!(f, "({k}) {n}"),
        Value::Float(x, FloatKind::F64) => write!(f, "{x}"),
        Value::Float(x, k) => write!(f, "({k}) {x}"),
        Value::Str(s) => write!(f, "{s:?}"),
        Value::Array(..) | Value::Slice(_, Some(_)) => {
            let ty = v.ty().map(|t| t.to_string()).unwrap_or_default();
            write!(f, "{ty}{{")?;
            write_list(f, v.items().unwrap_or(&[]), seen)?;
            f.write_str("}")
        }
        Value::Slice(elem, None) => write!(f, "([]{elem})(nil)"),
        Value::Map(k, e, None) => write!(f, "(map[{k}]{e})(nil)"),
        Value::Map(k, e, Some(entries)) => {
            write!(f, "map[{k}]{e}{{")?;
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, key, seen)?;
                f.write_str(": ")?;
                write_value(f, val, seen)?;
            }
            f.write_str("}")
        }
        Value::Struct(s) => {
            write!(f, "{}{{", s.name)?;
            for (i, field) in s.fields.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: ", field.name)?;
                write_value(f, &field.value, seen)?;
            }
            f.write_str("}")
        }
        Value::Ptr(elem, None) => write!(f, "(*{elem})(nil)"),
        Value::Ptr(elem, Some(p)) => {
            if seen.contains(&p.id()) {
                return write!(f, "(*{elem})(<cycle>)");
            }
            seen.push(p.id());
            f.write_str("&")?;
            let res = write_value(f, &p.get(), seen);
            seen.pop();
            res
        }
        Value::Iface(name, None) => write!(f, "({name})(nil)"),
        Value::Iface(_, Some(inner)) => write_value(f, inner, seen),
        Value::Matcher(m) => write!(f, "{m}"),
    }
}

#[cfg(test)]
mod tests {
    use crate::value::{Pointer, StructValue, Type, Value};

    #[test]
    fn test_render_scalars_and_containers() {
        assert_eq!(Value::ints([1, 2]).to_string(), "[]int{1, 2}");
        assert_eq!(Value::from(3u8).to_string(), "(uint8) 3");
        assert_eq!(Value::str("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Value::nil_ptr(Type::int()).to_string(), "(*int)(nil)");
        assert_eq!(Value::Slice(Type::String, None).to_string(), "([]string)(nil)");
        let m = Value::map(Type::String, Type::int(), [(Value::str("a"), Value::int(1))]);
        assert_eq!(m.to_string(), "map[string]int{\"a\": 1}");
    }

    #[test]
    fn test_render_cycle_terminates() {
        let node_ty = Type::Struct("Node".into());
        let p = Pointer::new(Value::Invalid);
        p.set(Value::Struct(
            StructValue::new("Node")
                .with("Val", Value::int(1))
                .with("Next", Value::Ptr(node_ty.clone(), Some(p.clone()))),
        ));
        let v = Value::Ptr(node_ty, Some(p));
        assert_eq!(v.to_string(), "&Node{Val: 1, Next: (*Node)(<cycle>)}");
    }
}
