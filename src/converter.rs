use crate::decode::Capability;
use crate::error::{ConvertError, Result};
use crate::native::cast;
use crate::sequence::convert_slice;
use crate::structural::{JsonDecoder, StructDecoder};
use crate::target::{Target, TypeDescriptor};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Converts dynamic values into typed targets.
///
/// A `Converter` tries a fixed sequence of strategies and returns the first
/// that succeeds:
///
/// 1. **identity**: the value's declared type is already the target
/// 2. **native**: the language converts it directly (numeric casts, parsing)
/// 3. **text decode**: the value's declared type is `String` and the target is [`TextDecodable`](crate::TextDecodable)
/// 4. **binary decode**: the value's declared type is `Vec<u8>` and the target is [`BinaryDecodable`](crate::BinaryDecodable)
/// 5. **structural**: the value is a mapping and the target decodes from one
/// 6. **sequence**: the value is a [`Value::Seq`] and the target is a `Vec` or array
///
/// A decode capability that is present but rejects its input ends the
/// search with [`ConvertError::Decode`]. A failed structural decode does not;
/// the search continues. When nothing applies the result is
/// [`ConvertError::Unconvertible`].
///
/// The converter holds no mutable state and can be shared across threads.
/// Its only dependency is the [`StructDecoder`] used by step 5, which
/// defaults to [`JsonDecoder`].
///
/// # Examples
///
/// ```
/// use sovran_convert::{Converter, JsonDecoder, KeyStyle, Value};
///
/// let converter = Converter::with_decoder(JsonDecoder::new(KeyStyle::SnakeCase));
///
/// let port: u16 = converter.convert(Value::from("8080"))?;
/// assert_eq!(port, 8080);
///
/// let hosts: Vec<String> = converter.convert(Value::Seq(vec!["a".into(), 3i32.into()]))?;
/// assert_eq!(hosts, vec!["a".to_string(), "3".to_string()]);
/// # Ok::<(), sovran_convert::ConvertError>(())
/// ```
#[derive(Clone)]
pub struct Converter {
    decoder: Arc<dyn StructDecoder>,
}

impl Converter {
    /// Creates a converter with the default [`JsonDecoder`].
    pub fn new() -> Self {
        Self::with_decoder(JsonDecoder::default())
    }

    /// Creates a converter that uses `decoder` for mappings.
    pub fn with_decoder<D: StructDecoder + 'static>(decoder: D) -> Self {
        Self {
            decoder: Arc::new(decoder),
        }
    }

    /// The decoder used for structural decoding.
    pub fn decoder(&self) -> &dyn StructDecoder {
        self.decoder.as_ref()
    }

    /// Convert `input` into a `T`.
    ///
    /// # Errors
    ///
    /// - Returns `ConvertError::Decode` if `T` has a text or binary decode
    ///   capability matching the input and the decoder rejects it
    /// - Returns `ConvertError::Unconvertible` if no strategy produced a `T`
    pub fn convert<T: Target>(&self, input: Value) -> Result<T> {
        let target = TypeDescriptor::of::<T>();

        // identity, then native conversion
        let input = match T::from_identity(input) {
            Ok(value) => {
                trace!(to = target.name(), "identity");
                return Ok(value);
            }
            Err(input) => input,
        };
        if let Some(value) = T::from_native(&input) {
            trace!(from = input.type_name(), to = target.name(), "native conversion");
            return Ok(value);
        }

        if let Some(text) = input.as_str() {
            let mut out = T::zero();
            if let Some(decoder) = out.text_decoder() {
                trace!(to = target.name(), "text decode");
                return match decoder.decode_text(text.as_bytes()) {
                    Ok(()) => Ok(out),
                    Err(source) => Err(ConvertError::Decode {
                        capability: Capability::Text,
                        from: input.type_name(),
                        to: target.name(),
                        source,
                    }),
                };
            }
        }

        if let Some(bytes) = input.as_bytes() {
            let mut out = T::zero();
            if let Some(decoder) = out.binary_decoder() {
                trace!(to = target.name(), "binary decode");
                return match decoder.decode_binary(bytes) {
                    Ok(()) => Ok(out),
                    Err(source) => Err(ConvertError::Decode {
                        capability: Capability::Binary,
                        from: input.type_name(),
                        to: target.name(),
                        source,
                    }),
                };
            }
        }

        if let Value::Map(_) = &input {
            match T::from_map(&input, self.decoder()) {
                Ok(value) => {
                    trace!(to = target.name(), "structural decode");
                    return Ok(value);
                }
                Err(err) => {
                    debug!(to = target.name(), error = %err, "structural decode declined");
                }
            }
        }

        let from = input.type_name();
        match input {
            Value::Seq(elements) if target.is_sequence() => {
                trace!(to = target.name(), len = elements.len(), "sequence conversion");
                Ok(convert_slice(elements))
            }
            _ => Err(ConvertError::Unconvertible {
                from,
                to: target.name(),
            }),
        }
    }

    /// Convert each value of `inputs`, stopping at the first failure.
    pub fn convert_all<T: Target>(&self, inputs: impl IntoIterator<Item = Value>) -> Result<Vec<T>> {
        inputs.into_iter().map(|input| self.convert(input)).collect()
    }

    /// Identity and native conversion only; no decoders are consulted.
    ///
    /// This is the rule [`convert_slice`] applies to each element.
    pub fn cast<T: Target>(&self, input: Value) -> Result<T> {
        cast::<T>(input).map_err(|rejected| ConvertError::Unconvertible {
            from: rejected.type_name(),
            to: TypeDescriptor::of::<T>().name(),
        })
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").finish_non_exhaustive()
    }
}

/// Convert `input` into a `T` with a default [`Converter`].
///
/// # Examples
///
/// ```
/// use sovran_convert::{convert, ConvertError, Value};
///
/// assert_eq!(convert::<i64>(Value::I32(-4))?, -4);
/// assert_eq!(convert::<[i32; 3]>(Value::Seq(vec!["1".into(), "2".into(), "bad".into()]))?, [1, 2, 0]);
///
/// let err = convert::<bool>(Value::from("maybe")).unwrap_err();
/// assert_eq!(err.to_string(), "cannot convert String to bool");
/// # Ok::<(), ConvertError>(())
/// ```
pub fn convert<T: Target>(input: Value) -> Result<T> {
    Converter::new().convert(input)
}
