//! Type tags carried by every [`Value`](super::Value).
//!
//! Identity follows Go's rules: scalars by kind, composite types
//! structurally, structs and interfaces nominally by name.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntKind {
    Int,
    I8,
    I16,
    I32,
    I64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UintKind {
    Uint,
    U8,
    U16,
    U32,
    U64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatKind {
    F32,
    F64,
}

/// Coarse classification of a [`Type`], used for dispatch and for the
/// lax convertibility table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Invalid,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Array,
    Slice,
    Map,
    Struct,
    Ptr,
    Interface,
    Matcher,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    Int(IntKind),
    Uint(UintKind),
    Float(FloatKind),
    String,
    Array(Box<Type>, usize),
    Slice(Box<Type>),
    Map(Box<Type>, Box<Type>),
    /// Named struct type. Field layout lives on the value.
    Struct(String),
    Ptr(Box<Type>),
    /// Named interface type, `any` for the empty interface.
    Interface(String),
    Matcher,
}

impl IntKind {
    pub fn bits(self) -> u32 {
        match self {
            Self::I8 => 8,
            Self::I16 => 16,
            Self::I32 => 32,
            Self::Int | Self::I64 => 64,
        }
    }

    /// Truncates `v` to the width of this kind, sign-extending back.
    pub fn wrap(self, v: i64) -> i64 {
        match self {
            Self::I8 => v as i8 as i64,
            Self::I16 => v as i16 as i64,
            Self::I32 => v as i32 as i64,
            Self::Int | Self::I64 => v,
        }
    }
}

impl UintKind {
    pub fn bits(self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U16 => 16,
            Self::U32 => 32,
            Self::Uint | Self::U64 => 64,
        }
    }

    pub fn wrap(self, v: u64) -> u64 {
        match self {
            Self::U8 => v as u8 as u64,
            Self::U16 => v as u16 as u64,
            Self::U32 => v as u32 as u64,
            Self::Uint | Self::U64 => v,
        }
    }
}

impl Type {
    pub fn int() -> Self {
        Self::Int(IntKind::Int)
    }

    pub fn float64() -> Self {
        Self::Float(FloatKind::F64)
    }

    pub fn any() -> Self {
        Self::Interface("any".to_string())
    }

    pub fn slice_of(elem: Type) -> Self {
        Self::Slice(Box::new(elem))
    }

    pub fn ptr_to(elem: Type) -> Self {
        Self::Ptr(Box::new(elem))
    }

    pub fn map_of(key: Type, elem: Type) -> Self {
        Self::Map(Box::new(key), Box::new(elem))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::Uint(_) => Kind::Uint,
            Self::Float(_) => Kind::Float,
            Self::String => Kind::String,
            Self::Array(..) => Kind::Array,
            Self::Slice(_) => Kind::Slice,
            Self::Map(..) => Kind::Map,
            Self::Struct(_) => Kind::Struct,
            Self::Ptr(_) => Kind::Ptr,
            Self::Interface(_) => Kind::Interface,
            Self::Matcher => Kind::Matcher,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind(), Kind::Int | Kind::Uint | Kind::Float)
    }

    /// Whether a value of type `self` may be converted to `target` in
    /// lax mode. Numbers convert between all numeric kinds, and
    /// containers convert when their element types do.
    pub fn convertible_to(&self, target: &Type) -> bool {
        if self == target {
            return true;
        }
        match (self, target) {
            (a, b) if a.is_numeric() && b.is_numeric() => true,
            (Self::Slice(a), Self::Slice(b)) => a.convertible_to(b),
            (Self::Array(a, n), Self::Array(b, m)) => n == m && a.convertible_to(b),
            (Self::Array(a, _), Self::Slice(b)) | (Self::Slice(a), Self::Array(b, _)) => {
                a.convertible_to(b)
            }
            (Self::Map(ka, va), Self::Map(kb, vb)) => {
                ka.convertible_to(kb) && va.convertible_to(vb)
            }
            (Self::Ptr(a), Self::Ptr(b)) => a == b,
            _ => false,
        }
    }

    /// The zero value of this type: `0`, `""`, `false`, nil for pointers,
    /// slices, maps and interfaces, and element-wise zero for arrays.
    /// Struct zero values have no fields since layout is value-borne.
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int(k) => Value::Int(0, *k),
            Self::Uint(k) => Value::Uint(0, *k),
            Self::Float(k) => Value::Float(0.0, *k),
            Self::String => Value::Str(String::new()),
            Self::Array(elem, n) => Value::Array(
                (**elem).clone(),
                (0..*n).map(|_| elem.zero_value()).collect(),
            ),
            Self::Slice(elem) => Value::Slice((**elem).clone(), None),
            Self::Map(k, v) => Value::Map((**k).clone(), (**v).clone(), None),
            Self::Struct(name) => Value::Struct(super::StructValue::new(name.clone())),
            Self::Ptr(elem) => Value::Ptr((**elem).clone(), None),
            Self::Interface(name) => Value::Iface(name.clone(), None),
            Self::Matcher => Value::Invalid,
        }
    }
}

impl fmt::Display for IntKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Int => "int",
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::I64 => "int64",
        };
        f.write_str(s)
    }
}

impl fmt::Display for UintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uint => "uint",
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
        };
        f.write_str(s)
    }
}

impl fmt::Display for FloatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::F32 => "float32",
            Self::F64 => "float64",
        })
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int(k) => write!(f, "{k}"),
            Self::Uint(k) => write!(f, "{k}"),
            Self::Float(k) => write!(f, "{k}"),
            Self::String => f.write_str("string"),
            Self::Array(elem, n) => write!(f, "[{n}]{elem}"),
            Self::Slice(elem) => write!(f, "[]{elem}"),
            Self::Map(k, v) => write!(f, "map[{k}]{v}"),
            Self::Struct(name) | Self::Interface(name) => f.write_str(name),
            Self::Ptr(elem) => write!(f, "*{elem}"),
            Self::Matcher => f.write_str("matcher"),
        }
    }
}
