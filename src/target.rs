// src/target.rs
use crate::decode::{BinaryDecodable, DecodeError, TextDecodable};
use crate::native;
use crate::sequence::{self, Degrade};
use crate::structural::{self, StructDecoder};
use crate::value::{Kind, Value};
use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// A type that values can be converted into.
///
/// Implementing `Target` is how a type describes itself to the converter:
/// its [`Kind`], its zero instance, and which strategies it takes part in.
/// Every hook except `kind` and `zero` has a default that opts out, so a
/// target only declares the capabilities it actually has.
///
/// # Examples
///
/// A struct that decodes from a mapping through serde:
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use sovran_convert::{convert, decode_struct, DecodeError, Kind, StructDecoder, Target, Value};
///
/// #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
/// struct Person {
///     #[serde(rename = "Name")]
///     name: String,
/// }
///
/// impl Target for Person {
///     fn kind() -> Kind { Kind::Struct }
///     fn zero() -> Self { Self::default() }
///     fn from_map(map: &Value, decoder: &dyn StructDecoder) -> Result<Self, DecodeError> {
///         decode_struct(decoder, map)
///     }
/// }
///
/// let input = Value::Map(vec![(Value::from("Name"), Value::from("Ada"))]);
/// let person: Person = convert(input).unwrap();
/// assert_eq!(person.name, "Ada");
/// ```
pub trait Target: Any + Send + Sized {
    /// The coarse shape of this type.
    fn kind() -> Kind;

    /// A fresh zero instance.
    ///
    /// Pointer-like targets must return a non-null placeholder so that the
    /// capability hooks can be asked of it.
    fn zero() -> Self;

    /// Take `value` unchanged when its declared type is `Self`.
    fn from_identity(value: Value) -> Result<Self, Value> {
        value.downcast::<Self>()
    }

    /// Produce `Self` by native conversion, if the language permits one.
    fn from_native(_value: &Value) -> Option<Self> {
        None
    }

    /// Expose the text decode capability, if this type has one.
    fn text_decoder(&mut self) -> Option<&mut dyn TextDecodable> {
        None
    }

    /// Expose the binary decode capability, if this type has one.
    fn binary_decoder(&mut self) -> Option<&mut dyn BinaryDecodable> {
        None
    }

    /// Decode `Self` from a [`Value::Map`].
    ///
    /// Failure is not terminal: the converter moves on to the next strategy.
    fn from_map(_map: &Value, _decoder: &dyn StructDecoder) -> Result<Self, DecodeError> {
        Err(format!("{} does not decode from a mapping", type_name::<Self>()).into())
    }

    /// Build `Self` from loosely-typed elements.
    ///
    /// Only sequence targets return `Some`. Elements that cannot be taken
    /// become zero values and are recorded in `degrades`.
    fn from_elements(_elements: Vec<Value>, _degrades: &mut Vec<Degrade>) -> Option<Self> {
        None
    }
}

/// A runtime handle describing a [`Target`] type.
///
/// # Examples
///
/// ```
/// use sovran_convert::{Kind, TypeDescriptor, Value};
///
/// let desc = TypeDescriptor::of::<[i32; 3]>();
/// assert_eq!(desc.kind(), Kind::Array(3));
/// assert!(desc.is_sequence());
/// assert!(TypeDescriptor::of::<i32>().is_declared_type_of(&Value::I32(1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    type_id: TypeId,
    name: &'static str,
    kind: Kind,
}

impl TypeDescriptor {
    /// The descriptor for `T`.
    pub fn of<T: Target>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
            kind: T::kind(),
        }
    }

    /// The `TypeId` of the described type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The described type's name, as used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The coarse shape of the described type.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// True for variable- and fixed-length sequence targets.
    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, Kind::Slice | Kind::Array(_))
    }

    /// True when `value`'s declared type is exactly this type.
    pub fn is_declared_type_of(&self, value: &Value) -> bool {
        value.type_id() == self.type_id
    }
}

macro_rules! integer_target {
    ($kind:ident: $($ty:ty),*) => {
        $(
            impl Target for $ty {
                fn kind() -> Kind {
                    Kind::$kind
                }

                fn zero() -> Self {
                    0
                }

                fn from_native(value: &Value) -> Option<Self> {
                    native::integer::<$ty>(value)
                }
            }
        )*
    };
}

integer_target!(Int: i8, i16, i32, i64);
integer_target!(Uint: u8, u16, u32, u64);

impl Target for f32 {
    fn kind() -> Kind {
        Kind::Float
    }

    fn zero() -> Self {
        0.0
    }

    fn from_native(value: &Value) -> Option<Self> {
        native::float32(value)
    }
}

impl Target for f64 {
    fn kind() -> Kind {
        Kind::Float
    }

    fn zero() -> Self {
        0.0
    }

    fn from_native(value: &Value) -> Option<Self> {
        native::float64(value)
    }
}

impl Target for bool {
    fn kind() -> Kind {
        Kind::Bool
    }

    fn zero() -> Self {
        false
    }

    fn from_native(value: &Value) -> Option<Self> {
        native::boolean(value)
    }
}

impl Target for char {
    fn kind() -> Kind {
        Kind::Char
    }

    fn zero() -> Self {
        '\0'
    }

    fn from_native(value: &Value) -> Option<Self> {
        native::character(value)
    }
}

impl Target for String {
    fn kind() -> Kind {
        Kind::String
    }

    fn zero() -> Self {
        String::new()
    }

    fn from_native(value: &Value) -> Option<Self> {
        native::text(value)
    }
}

impl Target for Value {
    fn kind() -> Kind {
        Kind::Dynamic
    }

    fn zero() -> Self {
        Value::Null
    }

    fn from_identity(value: Value) -> Result<Self, Value> {
        Ok(value)
    }
}

impl<T: Target> Target for Vec<T> {
    fn kind() -> Kind {
        Kind::Slice
    }

    fn zero() -> Self {
        Vec::new()
    }

    // A string is natively a sequence of its bytes or of its chars.
    fn from_native(value: &Value) -> Option<Self> {
        let Value::String(s) = value else {
            return None;
        };
        if TypeId::of::<T>() == TypeId::of::<u8>() {
            s.bytes().map(|b| Value::U8(b).downcast::<T>().ok()).collect()
        } else if TypeId::of::<T>() == TypeId::of::<char>() {
            s.chars().map(|c| Value::Char(c).downcast::<T>().ok()).collect()
        } else {
            None
        }
    }

    fn from_elements(elements: Vec<Value>, degrades: &mut Vec<Degrade>) -> Option<Self> {
        Some(sequence::collect_vec(elements, degrades))
    }
}

impl<T: Target, const N: usize> Target for [T; N] {
    fn kind() -> Kind {
        Kind::Array(N)
    }

    fn zero() -> Self {
        std::array::from_fn(|_| T::zero())
    }

    fn from_native(value: &Value) -> Option<Self> {
        let Value::Bytes(bytes) = value else {
            return None;
        };
        if bytes.len() != N {
            return None;
        }
        let items = bytes
            .iter()
            .map(|b| Value::U8(*b).downcast::<T>().ok())
            .collect::<Option<Vec<T>>>()?;
        items.try_into().ok()
    }

    fn from_elements(elements: Vec<Value>, degrades: &mut Vec<Degrade>) -> Option<Self> {
        Some(sequence::fill_array(elements, degrades))
    }
}

/// `Box<T>` behaves as a pointer to `T`: its zero is a boxed `T::zero()`,
/// and every hook is answered by the pointee.
impl<T: Target> Target for Box<T> {
    fn kind() -> Kind {
        Kind::Pointer
    }

    fn zero() -> Self {
        Box::new(T::zero())
    }

    fn from_identity(value: Value) -> Result<Self, Value> {
        match value.downcast::<Self>() {
            Ok(boxed) => Ok(boxed),
            Err(value) => T::from_identity(value).map(Box::new),
        }
    }

    fn from_native(value: &Value) -> Option<Self> {
        T::from_native(value).map(Box::new)
    }

    fn text_decoder(&mut self) -> Option<&mut dyn TextDecodable> {
        (**self).text_decoder()
    }

    fn binary_decoder(&mut self) -> Option<&mut dyn BinaryDecodable> {
        (**self).binary_decoder()
    }

    fn from_map(map: &Value, decoder: &dyn StructDecoder) -> Result<Self, DecodeError> {
        T::from_map(map, decoder).map(Box::new)
    }

    fn from_elements(elements: Vec<Value>, degrades: &mut Vec<Degrade>) -> Option<Self> {
        T::from_elements(elements, degrades).map(Box::new)
    }
}

impl<K, V> Target for HashMap<K, V>
where
    K: Target + Eq + Hash,
    V: Target,
{
    fn kind() -> Kind {
        Kind::Map
    }

    fn zero() -> Self {
        HashMap::new()
    }

    fn from_map(map: &Value, _decoder: &dyn StructDecoder) -> Result<Self, DecodeError> {
        structural::decode_entries(map)
    }
}

impl<K, V> Target for BTreeMap<K, V>
where
    K: Target + Ord,
    V: Target,
{
    fn kind() -> Kind {
        Kind::Map
    }

    fn zero() -> Self {
        BTreeMap::new()
    }

    fn from_map(map: &Value, _decoder: &dyn StructDecoder) -> Result<Self, DecodeError> {
        structural::decode_entries(map)
    }
}

impl Target for IpAddr {
    fn kind() -> Kind {
        Kind::Opaque
    }

    fn zero() -> Self {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    }

    fn text_decoder(&mut self) -> Option<&mut dyn TextDecodable> {
        Some(self)
    }
}

impl Target for Ipv4Addr {
    fn kind() -> Kind {
        Kind::Opaque
    }

    fn zero() -> Self {
        Ipv4Addr::UNSPECIFIED
    }

    fn from_native(value: &Value) -> Option<Self> {
        match value {
            Value::U32(bits) => Some(Ipv4Addr::from(*bits)),
            _ => None,
        }
    }

    fn text_decoder(&mut self) -> Option<&mut dyn TextDecodable> {
        Some(self)
    }
}

impl Target for Ipv6Addr {
    fn kind() -> Kind {
        Kind::Opaque
    }

    fn zero() -> Self {
        Ipv6Addr::UNSPECIFIED
    }

    fn text_decoder(&mut self) -> Option<&mut dyn TextDecodable> {
        Some(self)
    }
}

impl Target for SocketAddr {
    fn kind() -> Kind {
        Kind::Opaque
    }

    fn zero() -> Self {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
    }

    fn text_decoder(&mut self) -> Option<&mut dyn TextDecodable> {
        Some(self)
    }
}
