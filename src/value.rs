// src/value.rs
use crate::any_value::AnyValue;
use std::any::{Any, TypeId};
use std::fmt;

/// The coarse shape of a value or a target type.
///
/// Both sides of a conversion report a `Kind`: [`Value::kind`] for the input
/// and [`Target::kind`](crate::Target::kind) for the destination. The sequence
/// strategy keys off `Slice` and `Array`, and the structural strategy off `Map`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// No value at all
    Null,
    /// `bool`
    Bool,
    /// Signed integers of any width
    Int,
    /// Unsigned integers of any width
    Uint,
    /// `f32` and `f64`
    Float,
    /// `char`
    Char,
    /// Owned text
    String,
    /// Variable-length sequence
    Slice,
    /// Fixed-length sequence of the given length
    Array(usize),
    /// Key/value mapping
    Map,
    /// A record with named fields
    Struct,
    /// An owning pointer to another target
    Pointer,
    /// The dynamic [`Value`] type itself
    Dynamic,
    /// A payload the closed variants cannot describe
    Opaque,
}

/// A dynamically-typed value.
///
/// `Value` is the input side of every conversion: a closed set of variants
/// covering what parsed documents and generic containers usually hold, plus
/// [`Value::Other`] for anything else. Each variant has a *declared type*
/// ([`Value::type_id`]), which is what the identity strategy compares against
/// the target.
///
/// # Examples
///
/// ```
/// use sovran_convert::{Kind, Value};
///
/// let v = Value::from(vec![Value::from("1"), Value::from(2i64)]);
/// assert_eq!(v.kind(), Kind::Slice);
/// assert_eq!(v.type_name(), "Vec<Value>");
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    /// Raw bytes; declares `Vec<u8>`
    Bytes(Vec<u8>),
    /// A generic sequence of arbitrarily-typed elements; declares `Vec<Value>`
    Seq(Vec<Value>),
    /// A generic mapping; keys may be any value and order carries no meaning
    Map(Vec<(Value, Value)>),
    /// Any other `Clone + Send + Sync` payload
    Other(AnyValue),
}

impl Value {
    /// Wrap an arbitrary payload as [`Value::Other`].
    pub fn other<T: 'static + Any + Clone + Send + Sync>(value: T) -> Self {
        Value::Other(AnyValue::new(value))
    }

    /// The `TypeId` of the value's declared type.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Null => TypeId::of::<()>(),
            Value::Bool(_) => TypeId::of::<bool>(),
            Value::I8(_) => TypeId::of::<i8>(),
            Value::I16(_) => TypeId::of::<i16>(),
            Value::I32(_) => TypeId::of::<i32>(),
            Value::I64(_) => TypeId::of::<i64>(),
            Value::U8(_) => TypeId::of::<u8>(),
            Value::U16(_) => TypeId::of::<u16>(),
            Value::U32(_) => TypeId::of::<u32>(),
            Value::U64(_) => TypeId::of::<u64>(),
            Value::F32(_) => TypeId::of::<f32>(),
            Value::F64(_) => TypeId::of::<f64>(),
            Value::Char(_) => TypeId::of::<char>(),
            Value::String(_) => TypeId::of::<String>(),
            Value::Bytes(_) => TypeId::of::<Vec<u8>>(),
            Value::Seq(_) => TypeId::of::<Vec<Value>>(),
            Value::Map(_) => TypeId::of::<Vec<(Value, Value)>>(),
            Value::Other(any) => any.type_id(),
        }
    }

    /// A readable name for the value's declared type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "()",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Char(_) => "char",
            Value::String(_) => "String",
            Value::Bytes(_) => "Vec<u8>",
            Value::Seq(_) => "Vec<Value>",
            Value::Map(_) => "Vec<(Value, Value)>",
            Value::Other(any) => any.type_name(),
        }
    }

    /// The coarse kind of the value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::I8(_) | Value::I16(_) | Value::I32(_) | Value::I64(_) => Kind::Int,
            Value::U8(_) | Value::U16(_) | Value::U32(_) | Value::U64(_) => Kind::Uint,
            Value::F32(_) | Value::F64(_) => Kind::Float,
            Value::Char(_) => Kind::Char,
            Value::String(_) => Kind::String,
            Value::Bytes(_) | Value::Seq(_) => Kind::Slice,
            Value::Map(_) => Kind::Map,
            Value::Other(_) => Kind::Opaque,
        }
    }

    /// The text of a value whose declared type is `String`.
    ///
    /// Covers [`Value::String`] and an [`Value::Other`] holding a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Other(any) => any.downcast_ref::<String>().map(String::as_str),
            _ => None,
        }
    }

    /// The bytes of a value whose declared type is `Vec<u8>`.
    ///
    /// Covers [`Value::Bytes`] and an [`Value::Other`] holding a `Vec<u8>`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            Value::Other(any) => any.downcast_ref::<Vec<u8>>().map(Vec::as_slice),
            _ => None,
        }
    }

    /// The entries of a [`Value::Map`].
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a mapping entry whose key is the string `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Consume the value as its exact declared type.
    ///
    /// Succeeds only when `T` is the declared type ([`Value::type_id`]);
    /// otherwise the value is handed back untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_convert::Value;
    ///
    /// assert_eq!(Value::I32(5).downcast::<i32>().ok(), Some(5));
    /// assert!(Value::I32(5).downcast::<i64>().is_err());
    /// ```
    pub fn downcast<T: Any>(self) -> Result<T, Value> {
        if self.type_id() != TypeId::of::<T>() {
            return Err(self);
        }
        match self {
            Value::Null => reinterpret(()).map_err(|()| Value::Null),
            Value::Bool(v) => reinterpret(v).map_err(Value::Bool),
            Value::I8(v) => reinterpret(v).map_err(Value::I8),
            Value::I16(v) => reinterpret(v).map_err(Value::I16),
            Value::I32(v) => reinterpret(v).map_err(Value::I32),
            Value::I64(v) => reinterpret(v).map_err(Value::I64),
            Value::U8(v) => reinterpret(v).map_err(Value::U8),
            Value::U16(v) => reinterpret(v).map_err(Value::U16),
            Value::U32(v) => reinterpret(v).map_err(Value::U32),
            Value::U64(v) => reinterpret(v).map_err(Value::U64),
            Value::F32(v) => reinterpret(v).map_err(Value::F32),
            Value::F64(v) => reinterpret(v).map_err(Value::F64),
            Value::Char(v) => reinterpret(v).map_err(Value::Char),
            Value::String(v) => reinterpret(v).map_err(Value::String),
            Value::Bytes(v) => reinterpret(v).map_err(Value::Bytes),
            Value::Seq(v) => reinterpret(v).map_err(Value::Seq),
            Value::Map(v) => reinterpret(v).map_err(Value::Map),
            Value::Other(any) => any.downcast::<T>().map_err(Value::Other),
        }
    }
}

/// Move `source` into a `T` when both are the same type.
fn reinterpret<S: Any, T: Any>(source: S) -> Result<T, S> {
    let mut slot = Some(source);
    if let Some(target) = (&mut slot as &mut dyn Any).downcast_mut::<Option<T>>() {
        if let Some(value) = target.take() {
            return Ok(value);
        }
    }
    match slot {
        Some(source) => Err(source),
        None => unreachable!("slot emptied without producing a value"),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len() && a.iter().all(|entry| b.contains(entry))
            }
            // opaque payloads carry no equality
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{:?}", v),
            Value::Bytes(v) => write!(f, "{:?}", v),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Other(any) => write!(f, "<{}>", any.type_name()),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
    Vec<u8> => Bytes,
    Vec<Value> => Seq,
    Vec<(Value, Value)> => Map,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::I64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::U64(u)
                } else {
                    Value::F64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (Value::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}
