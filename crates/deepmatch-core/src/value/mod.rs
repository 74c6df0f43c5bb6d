//! Dynamic values under comparison.
//!
//! A [`Value`] is a read-only view over a runtime value and its [`Type`].
//! Both the got side and the literal parts of an expectation tree are
//! built from it. Containers are only ever traversed through the
//! accessors here; pointers are shared identity handles so that cyclic
//! data can be expressed and detected.

mod json;
mod render;
pub mod types;

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::matchers::Matcher;

pub use types::{FloatKind, IntKind, Kind, Type, UintKind};

/// Errors raised while building or decoding values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("cannot decode JSON {found} into {target}")]
    Decode { target: String, found: String },

    #[error("number {number} overflows {target}")]
    Overflow { target: String, number: String },

    #[error("type {0} cannot be decoded from JSON")]
    Unsupported(String),
}

#[derive(Clone)]
pub enum Value {
    /// Untyped nil.
    Invalid,
    Bool(bool),
    Int(i64, IntKind),
    Uint(u64, UintKind),
    Float(f64, FloatKind),
    Str(String),
    /// Fixed-size array: element type and items.
    Array(Type, Vec<Value>),
    /// Slice: element type and items, `None` for a nil slice.
    Slice(Type, Option<Vec<Value>>),
    /// Map: key type, element type and entries in insertion order,
    /// `None` for a nil map.
    Map(Type, Type, Option<Vec<(Value, Value)>>),
    Struct(StructValue),
    /// Pointer: pointee type and target, `None` for a nil pointer.
    Ptr(Type, Option<Pointer>),
    /// Interface slot: interface name and dynamic value, `None` for a nil
    /// interface.
    Iface(String, Option<Box<Value>>),
    /// An expectation operator. Only legal on the expected side.
    Matcher(Rc<Matcher>),
}

/// Shared, identity-bearing pointer target.
///
/// Two pointers are the same pointer iff they share the allocation, which
/// is what [`Pointer::id`] exposes. `Pointer::set` makes it possible to
/// close a cycle after construction; such cycles are never freed, which is
/// acceptable for test fixtures.
#[derive(Clone)]
pub struct Pointer(Rc<RefCell<Value>>);

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct StructValue {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Pointer {
    pub fn new(target: Value) -> Self {
        Self(Rc::new(RefCell::new(target)))
    }

    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn get(&self) -> Ref<'_, Value> {
        self.0.borrow()
    }

    /// Replaces the pointee.
    pub fn set(&self, target: Value) {
        *self.0.borrow_mut() = target;
    }

    pub fn same_as(&self, other: &Pointer) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pointer({:#x})", self.id())
    }
}

impl StructValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field; builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

impl Value {
    pub fn int(v: i64) -> Self {
        Self::Int(v, IntKind::Int)
    }

    pub fn uint(v: u64) -> Self {
        Self::Uint(v, UintKind::Uint)
    }

    pub fn float(v: f64) -> Self {
        Self::Float(v, FloatKind::F64)
    }

    pub fn str(v: impl Into<String>) -> Self {
        Self::Str(v.into())
    }

    pub fn slice<I, T>(elem: Type, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Slice(elem, Some(items.into_iter().map(Into::into).collect()))
    }

    /// `[]int{...}`, the most common fixture shape.
    pub fn ints<I: IntoIterator<Item = i64>>(items: I) -> Self {
        Self::slice(Type::int(), items.into_iter().map(Value::int))
    }

    pub fn array<I, T>(elem: Type, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Array(elem, items.into_iter().map(Into::into).collect())
    }

    pub fn map<I>(key: Type, elem: Type, entries: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        Self::Map(key, elem, Some(entries.into_iter().collect()))
    }

    /// A non-nil pointer to a fresh allocation holding `target`.
    pub fn ptr(elem: Type, target: Value) -> Self {
        Self::Ptr(elem, Some(Pointer::new(target)))
    }

    pub fn nil_ptr(elem: Type) -> Self {
        Self::Ptr(elem, None)
    }

    /// `target` boxed in an `any` interface slot.
    pub fn boxed(target: Value) -> Self {
        Self::Iface("any".to_string(), Some(Box::new(target)))
    }

    pub fn nil_iface(name: impl Into<String>) -> Self {
        Self::Iface(name.into(), None)
    }

    pub fn matcher(m: Matcher) -> Self {
        Self::Matcher(Rc::new(m))
    }

    /// Dynamic type, `None` for untyped nil.
    pub fn ty(&self) -> Option<Type> {
        Some(match self {
            Self::Invalid => return None,
            Self::Bool(_) => Type::Bool,
            Self::Int(_, k) => Type::Int(*k),
            Self::Uint(_, k) => Type::Uint(*k),
            Self::Float(_, k) => Type::Float(*k),
            Self::Str(_) => Type::String,
            Self::Array(elem, items) => Type::Array(Box::new(elem.clone()), items.len()),
            Self::Slice(elem, _) => Type::Slice(Box::new(elem.clone())),
            Self::Map(k, v, _) => Type::Map(Box::new(k.clone()), Box::new(v.clone())),
            Self::Struct(s) => Type::Struct(s.name.clone()),
            Self::Ptr(elem, _) => Type::Ptr(Box::new(elem.clone())),
            Self::Iface(name, _) => Type::Interface(name.clone()),
            Self::Matcher(_) => Type::Matcher,
        })
    }

    pub fn kind(&self) -> Kind {
        self.ty().map_or(Kind::Invalid, |t| t.kind())
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Nil in the broad sense used by the `Nil` matcher: untyped nil, or a
    /// nil pointer, slice, map or interface.
    pub fn is_nil(&self) -> bool {
        matches!(
            self,
            Self::Invalid
                | Self::Slice(_, None)
                | Self::Map(_, _, None)
                | Self::Ptr(_, None)
                | Self::Iface(_, None)
        )
    }

    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Str(s) => Some(s.len()),
            Self::Array(_, items) => Some(items.len()),
            Self::Slice(_, items) => Some(items.as_ref().map_or(0, Vec::len)),
            Self::Map(_, _, entries) => Some(entries.as_ref().map_or(0, Vec::len)),
            _ => None,
        }
    }

    /// Items of an array or slice; `None` for other kinds.
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Self::Array(_, items) => Some(items),
            Self::Slice(_, items) => Some(items.as_deref().unwrap_or(&[])),
            _ => None,
        }
    }

    /// Strips interface slots. A nil interface becomes untyped nil.
    pub fn unwrap_iface(&self) -> Value {
        match self {
            Self::Iface(_, Some(inner)) => inner.unwrap_iface(),
            Self::Iface(_, None) => Self::Invalid,
            other => other.clone(),
        }
    }

    pub fn as_matcher(&self) -> Option<&Rc<Matcher>> {
        match self {
            Self::Matcher(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

macro_rules! from_scalar {
    ($($t:ty => $variant:ident($kind:expr) as $cast:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v as $cast, $kind)
                }
            }
        )*
    };
}

from_scalar! {
    i8 => Int(IntKind::I8) as i64,
    i16 => Int(IntKind::I16) as i64,
    i32 => Int(IntKind::I32) as i64,
    i64 => Int(IntKind::I64) as i64,
    isize => Int(IntKind::Int) as i64,
    u8 => Uint(UintKind::U8) as u64,
    u16 => Uint(UintKind::U16) as u64,
    u32 => Uint(UintKind::U32) as u64,
    u64 => Uint(UintKind::U64) as u64,
    usize => Uint(UintKind::Uint) as u64,
    f32 => Float(FloatKind::F32) as f64,
    f64 => Float(FloatKind::F64) as f64,
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<StructValue> for Value {
    fn from(v: StructValue) -> Self {
        Value::Struct(v)
    }
}

impl From<Matcher> for Value {
    fn from(m: Matcher) -> Self {
        Value::matcher(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_flavours() {
        assert!(Value::Invalid.is_nil());
        assert!(Value::nil_ptr(Type::int()).is_nil());
        assert!(Value::nil_iface("error").is_nil());
        assert!(Value::Slice(Type::int(), None).is_nil());
        assert!(!Value::ints([]).is_nil());
        assert!(!Value::Invalid.is_valid());
        assert!(Value::nil_ptr(Type::int()).is_valid());
    }

    #[test]
    fn test_pointer_identity() {
        let p = Pointer::new(Value::int(1));
        let q = p.clone();
        let r = Pointer::new(Value::int(1));
        assert!(p.same_as(&q));
        assert_eq!(p.id(), q.id());
        assert!(!p.same_as(&r));
        p.set(Value::int(2));
        assert!(matches!(*q.get(), Value::Int(2, IntKind::Int)));
    }

    #[test]
    fn test_from_scalars_keep_their_width() {
        assert_eq!(Value::from(1i8).ty(), Some(Type::Int(IntKind::I8)));
        assert_eq!(Value::from(1u32).ty(), Some(Type::Uint(UintKind::U32)));
        assert_eq!(Value::int(1).ty(), Some(Type::int()));
        assert_eq!(Value::Invalid.ty(), None);
    }

    #[test]
    fn test_len_and_items() {
        assert_eq!(Value::str("héllo").len(), Some(6));
        assert_eq!(Value::ints([1, 2, 3]).items().map(<[Value]>::len), Some(3));
        assert_eq!(Value::Slice(Type::int(), None).len(), Some(0));
        assert_eq!(Value::int(3).len(), None);
    }
}
