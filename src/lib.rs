//! # sovran-convert
//!
//! Coerce loosely-typed dynamic values into strongly-typed Rust values.
//!
//! `sovran-convert` is a building block for configuration loaders, decoders and
//! data-binding layers. Parsed documents, generic maps and untyped arrays come
//! in as [`Value`]s; typed values come out, without the caller enumerating
//! every source/target pair.
//!
//! ## Key Features
//!
//! - **Ordered strategies**: identity, native conversion, text and binary
//!   decode capabilities, structural map decoding, and sequence conversion
//! - **Explicit capabilities**: a target opts in through the [`Target`] trait,
//!   there is no open-ended runtime inspection
//! - **Lossy sequences, by contract**: [`convert_slice`] never fails; elements
//!   that cannot be converted become zero values, and [`convert_slice_report`]
//!   says which ones
//! - **Swappable structural decoding**: mappings are decoded through a
//!   [`StructDecoder`], serde-backed by default
//! - **Stateless**: nothing is shared between calls, so conversions are safe
//!   from any thread
//!
//! ## Usage Examples
//!
//! ### Scalars and sequences
//!
//! ```rust
//! use sovran_convert::{convert, ConvertError, Value};
//!
//! fn main() -> Result<(), ConvertError> {
//!     // Native conversion parses and widens
//!     let port: u16 = convert(Value::from("8080"))?;
//!     let ratio: f64 = convert(Value::I32(3))?;
//!     assert_eq!(port, 8080);
//!     assert_eq!(ratio, 3.0);
//!
//!     // Generic sequences convert element by element
//!     let input = Value::Seq(vec!["1".into(), "2".into(), "bad".into()]);
//!     let numbers: [i32; 3] = convert(input)?;
//!     assert_eq!(numbers, [1, 2, 0]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Structs from mappings
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use sovran_convert::{convert, decode_struct, DecodeError, Kind, StructDecoder, Target, Value};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Target for Person {
//!     fn kind() -> Kind { Kind::Struct }
//!     fn zero() -> Self { Self::default() }
//!     fn from_map(map: &Value, decoder: &dyn StructDecoder) -> Result<Self, DecodeError> {
//!         decode_struct(decoder, map)
//!     }
//! }
//!
//! // keys match fields ignoring case; fields the mapping omits stay at zero
//! let input = Value::Map(vec![(Value::from("Name"), Value::from("Ada"))]);
//! let person: Person = convert(input).unwrap();
//! assert_eq!(person.name, "Ada");
//! assert_eq!(person.age, 0);
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use sovran_convert::{convert, ConvertError, Value};
//! use std::net::IpAddr;
//!
//! // No strategy applies
//! match convert::<bool>(Value::I32(1)) {
//!     Err(ConvertError::Unconvertible { from, to }) => println!("{} -> {} not possible", from, to),
//!     other => panic!("unexpected {:?}", other),
//! }
//!
//! // The target decodes from text, and rejected this text
//! match convert::<IpAddr>(Value::from("not-an-ip")) {
//!     Err(ConvertError::Decode { capability, source, .. }) => {
//!         println!("{} decode failed: {}", capability, source)
//!     }
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

mod any_value;
mod converter;
mod decode;
mod error;
mod native;
mod sequence;
mod structural;
mod target;
mod value;


pub use any_value::AnyValue;
pub use converter::{convert, Converter};
pub use decode::{decode_text_from_str, BinaryDecodable, Capability, DecodeError, TextDecodable};
pub use error::{ConvertError, Result};
pub use sequence::{convert_slice, convert_slice_report, Degrade, SliceReport};
pub use structural::{decode_struct, JsonDecoder, KeyStyle, StructDecoder};
pub use target::{Target, TypeDescriptor};
pub use value::{Kind, Value};
