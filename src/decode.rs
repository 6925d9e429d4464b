// src/decode.rs
use std::fmt;
use std::str::FromStr;

/// Error returned by decode capabilities and structural decoders.
pub type DecodeError = Box<dyn std::error::Error + Send + Sync>;

/// A type that can initialize itself from a textual representation.
///
/// Implementing this is only half of opting in: the target's
/// [`Target::text_decoder`](crate::Target::text_decoder) must also hand out
/// `self` so the converter can find the capability.
///
/// # Examples
///
/// ```
/// use sovran_convert::{convert, DecodeError, Kind, Target, TextDecodable, Value};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Level(u8);
///
/// impl TextDecodable for Level {
///     fn decode_text(&mut self, text: &[u8]) -> Result<(), DecodeError> {
///         self.0 = match text {
///             b"low" => 1,
///             b"high" => 9,
///             other => return Err(format!("unknown level {:?}", String::from_utf8_lossy(other)).into()),
///         };
///         Ok(())
///     }
/// }
///
/// impl Target for Level {
///     fn kind() -> Kind { Kind::Struct }
///     fn zero() -> Self { Self::default() }
///     fn text_decoder(&mut self) -> Option<&mut dyn TextDecodable> { Some(self) }
/// }
///
/// assert_eq!(convert::<Level>(Value::from("high")).unwrap(), Level(9));
/// assert!(convert::<Level>(Value::from("medium")).is_err());
/// ```
pub trait TextDecodable {
    /// Replace `self` with the value described by `text`.
    fn decode_text(&mut self, text: &[u8]) -> Result<(), DecodeError>;
}

/// A type that can initialize itself from raw bytes.
pub trait BinaryDecodable {
    /// Replace `self` with the value encoded in `data`.
    fn decode_binary(&mut self, data: &[u8]) -> Result<(), DecodeError>;
}

/// Which decode capability a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Text,
    Binary,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Text => write!(f, "text"),
            Capability::Binary => write!(f, "binary"),
        }
    }
}

/// Implement [`TextDecodable::decode_text`] in terms of `FromStr`.
///
/// The text must be UTF-8; parse errors are passed through as the decode error.
pub fn decode_text_from_str<T>(slot: &mut T, text: &[u8]) -> Result<(), DecodeError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text = std::str::from_utf8(text)?;
    *slot = text.parse::<T>()?;
    Ok(())
}

macro_rules! text_decodable_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TextDecodable for $ty {
                fn decode_text(&mut self, text: &[u8]) -> Result<(), DecodeError> {
                    decode_text_from_str(self, text)
                }
            }
        )*
    };
}

text_decodable_from_str!(
    std::net::IpAddr,
    std::net::Ipv4Addr,
    std::net::Ipv6Addr,
    std::net::SocketAddr,
);
