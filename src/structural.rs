//! Structural decoding: populating typed values from generic mappings.
//!
//! The converter treats this as a collaborator behind the [`StructDecoder`]
//! trait. A decoder lowers a [`Value::Map`] into a `serde_json` document,
//! [`decode_struct`] lays that document over the target's zero instance, and
//! the target's own `Deserialize` impl reads the result back. Swap the
//! decoder to change how keys are matched, or to stub decoding out in tests.

use crate::decode::DecodeError;
use crate::native::cast;
use crate::target::Target;
use crate::value::Value;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::any::type_name;

/// Lowers a mapping into a document that serde can deserialize from.
pub trait StructDecoder: Send + Sync {
    /// Build the document for `map`.
    ///
    /// # Errors
    ///
    /// Returns an error when `map` is not a mapping or holds something that
    /// has no document form.
    fn document(&self, map: &Value) -> Result<serde_json::Value, DecodeError>;

    /// Whether a document key may match a field whose name differs only in
    /// ASCII case.
    fn folds_case(&self) -> bool {
        false
    }
}

/// Decode a struct-shaped `T` from `map` through `decoder`.
///
/// This is the usual body of [`Target::from_map`] for serde types. Decoding
/// is best-effort: the document is laid over `T::zero()`, so fields the
/// mapping does not mention (or sets to null) keep their zero value, and keys
/// the target has no field for are ignored. Nested mappings are laid over the
/// matching nested field the same way.
///
/// # Errors
///
/// Fails when the decoder cannot build a document or a mentioned field has a
/// value of the wrong shape.
pub fn decode_struct<T>(decoder: &dyn StructDecoder, map: &Value) -> Result<T, DecodeError>
where
    T: Target + Serialize + DeserializeOwned,
{
    let document = decoder.document(map)?;
    let mut base = serde_json::to_value(T::zero())?;
    overlay(&mut base, document, decoder.folds_case());
    Ok(serde_json::from_value(base)?)
}

fn overlay(base: &mut Json, document: Json, fold_case: bool) {
    match (base, document) {
        (Json::Object(fields), Json::Object(entries)) => {
            for (key, value) in entries {
                let name = if fold_case && !fields.contains_key(&key) {
                    let matched = fields
                        .keys()
                        .find(|name| name.eq_ignore_ascii_case(&key))
                        .cloned();
                    matched.unwrap_or(key)
                } else {
                    key
                };
                match fields.get_mut(&name) {
                    Some(_) if value.is_null() => {}
                    Some(slot) => overlay(slot, value, fold_case),
                    None => {
                        fields.insert(name, value);
                    }
                }
            }
        }
        (slot, document) => *slot = document,
    }
}

/// How mapping keys are rewritten before field matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStyle {
    /// Keys are used as given and match field names ignoring ASCII case
    #[default]
    IgnoreCase,
    /// Keys are used as given and must match field names exactly
    Verbatim,
    /// `FirstName` becomes `firstname`
    Lowercase,
    /// `FirstName` and `first-name` become `first_name`
    SnakeCase,
}

impl KeyStyle {
    /// Rewrite `key` into the form field matching sees.
    pub fn apply(&self, key: &str) -> String {
        match self {
            KeyStyle::IgnoreCase | KeyStyle::Verbatim => key.to_string(),
            KeyStyle::Lowercase => key.to_lowercase(),
            KeyStyle::SnakeCase => snake_case(key),
        }
    }
}

fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for c in key.chars() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// The default [`StructDecoder`].
///
/// Non-string keys are stringified, keys are rewritten by `key_style`, bytes
/// become arrays of numbers, and `char`s become one-character strings.
/// Opaque [`Value::Other`] payloads have no document form and fail the decode.
///
/// The decoder is itself deserializable so hosts can embed it in their own
/// configuration:
///
/// ```
/// use sovran_convert::{JsonDecoder, KeyStyle};
///
/// let decoder: JsonDecoder = serde_json::from_str(r#"{"key_style": "snake_case"}"#).unwrap();
/// assert_eq!(decoder.key_style, KeyStyle::SnakeCase);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonDecoder {
    pub key_style: KeyStyle,
}

impl JsonDecoder {
    /// A decoder that rewrites keys with `key_style`.
    pub fn new(key_style: KeyStyle) -> Self {
        Self { key_style }
    }

    fn lower(&self, value: &Value) -> Result<serde_json::Value, DecodeError> {
        Ok(match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::I8(v) => Json::from(*v),
            Value::I16(v) => Json::from(*v),
            Value::I32(v) => Json::from(*v),
            Value::I64(v) => Json::from(*v),
            Value::U8(v) => Json::from(*v),
            Value::U16(v) => Json::from(*v),
            Value::U32(v) => Json::from(*v),
            Value::U64(v) => Json::from(*v),
            Value::F32(v) => Json::from(f64::from(*v)),
            Value::F64(v) => Json::from(*v),
            Value::Char(c) => Json::String(c.to_string()),
            Value::String(s) => Json::String(s.clone()),
            Value::Bytes(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
            Value::Seq(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.lower(item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(entries) => {
                let mut object = serde_json::Map::with_capacity(entries.len());
                for (key, value) in entries {
                    object.insert(self.key(key)?, self.lower(value)?);
                }
                Json::Object(object)
            }
            Value::Other(any) => {
                return Err(format!("{} has no document form", any.type_name()).into())
            }
        })
    }

    fn key(&self, key: &Value) -> Result<String, DecodeError> {
        let raw = match key {
            Value::String(s) => s.clone(),
            Value::Null | Value::Bytes(_) | Value::Seq(_) | Value::Map(_) | Value::Other(_) => {
                return Err(format!("{} cannot be used as a field name", key.type_name()).into())
            }
            scalar => scalar.to_string(),
        };
        Ok(self.key_style.apply(&raw))
    }
}

impl StructDecoder for JsonDecoder {
    fn document(&self, map: &Value) -> Result<serde_json::Value, DecodeError> {
        if !matches!(map, Value::Map(_)) {
            return Err(format!("expected a mapping, found {}", map.type_name()).into());
        }
        self.lower(map)
    }

    fn folds_case(&self) -> bool {
        self.key_style == KeyStyle::IgnoreCase
    }
}

/// Decode a mapping into a key/value collection by casting every entry.
///
/// Entries use the same identity-then-native rule as sequence elements, but
/// an unconvertible entry fails the whole decode instead of degrading.
pub(crate) fn decode_entries<K, V, C>(map: &Value) -> Result<C, DecodeError>
where
    K: Target,
    V: Target,
    C: FromIterator<(K, V)>,
{
    let entries = map
        .as_map()
        .ok_or_else(|| format!("expected a mapping, found {}", map.type_name()))?;

    entries
        .iter()
        .map(|(key, value)| -> Result<(K, V), DecodeError> {
            let key = cast::<K>(key.clone()).map_err(|key| {
                format!("map key {} is not convertible to {}", key, type_name::<K>())
            })?;
            let value = cast::<V>(value.clone()).map_err(|value| {
                format!("map value {} is not convertible to {}", value, type_name::<V>())
            })?;
            Ok((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;
    use serde_json::json;
    use std::collections::HashMap;

    fn map(entries: Vec<(Value, Value)>) -> Value {
        Value::Map(entries)
    }

    #[test]
    fn test_key_styles() {
        assert_eq!(KeyStyle::default(), KeyStyle::IgnoreCase);
        assert_eq!(KeyStyle::IgnoreCase.apply("FirstName"), "FirstName");
        assert_eq!(KeyStyle::Verbatim.apply("FirstName"), "FirstName");
        assert_eq!(KeyStyle::Lowercase.apply("FirstName"), "firstname");
        assert_eq!(KeyStyle::SnakeCase.apply("FirstName"), "first_name");
        assert_eq!(KeyStyle::SnakeCase.apply("first-name"), "first_name");
        assert_eq!(KeyStyle::SnakeCase.apply("Name"), "name");
        assert_eq!(KeyStyle::SnakeCase.apply("port2Use"), "port2_use");
        assert_eq!(KeyStyle::SnakeCase.apply("already_snake"), "already_snake");
    }

    #[test]
    fn test_document_lowering() {
        let input = map(vec![
            (Value::from("name"), Value::from("Ada")),
            (Value::I32(7), Value::Bytes(vec![1, 2])),
            (Value::from("tags"), Value::Seq(vec![Value::Char('x'), Value::Null])),
        ]);
        let doc = JsonDecoder::default().document(&input).unwrap();
        assert_eq!(doc, json!({"name": "Ada", "7": [1, 2], "tags": ["x", null]}));
    }

    #[test]
    fn test_document_rejects_opaque_and_non_maps() {
        let decoder = JsonDecoder::default();
        let opaque = map(vec![(Value::from("h"), Value::other(std::time::Duration::ZERO))]);
        assert!(decoder.document(&opaque).is_err());
        assert!(decoder.document(&Value::I32(1)).is_err());

        let bad_key = map(vec![(Value::Seq(vec![]), Value::I32(1))]);
        assert!(decoder.document(&bad_key).is_err());
    }

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Limits {
        max_conns: u32,
        burst: u32,
    }

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Server {
        host_name: String,
        port: u16,
        limits: Limits,
    }

    impl Target for Server {
        fn kind() -> Kind {
            Kind::Struct
        }

        fn zero() -> Self {
            Self {
                port: 80,
                ..Self::default()
            }
        }
    }

    #[test]
    fn test_decode_struct_with_key_style() {
        let input = map(vec![(Value::from("HostName"), Value::from("db"))]);
        let decoder = JsonDecoder::new(KeyStyle::SnakeCase);
        let server: Server = decode_struct(&decoder, &input).unwrap();
        assert_eq!(server.host_name, "db");
        assert_eq!(server.port, 80);

        // verbatim keys never reach `host_name`, so it keeps its zero value
        let server: Server = decode_struct(&JsonDecoder::new(KeyStyle::Verbatim), &input).unwrap();
        assert_eq!(server, Server::zero());
    }

    #[test]
    fn test_decode_struct_folds_case_by_default() {
        let input = map(vec![
            (Value::from("HOST_NAME"), Value::from("db")),
            (Value::from("Port"), Value::U16(5432)),
            (Value::from("Unknown"), Value::Bool(true)),
        ]);
        let server: Server = decode_struct(&JsonDecoder::default(), &input).unwrap();
        assert_eq!(server.host_name, "db");
        assert_eq!(server.port, 5432);
        assert_eq!(server.limits, Limits::default());
    }

    #[test]
    fn test_decode_struct_keeps_zero_for_missing_and_null_fields() {
        let input = map(vec![
            (Value::from("port"), Value::Null),
            (
                Value::from("Limits"),
                map(vec![(Value::from("Burst"), Value::I64(8))]),
            ),
        ]);
        let server: Server = decode_struct(&JsonDecoder::default(), &input).unwrap();
        assert_eq!(
            server,
            Server {
                host_name: String::new(),
                port: 80,
                limits: Limits {
                    max_conns: 0,
                    burst: 8
                },
            }
        );
    }

    #[test]
    fn test_decode_struct_rejects_wrong_shape() {
        let input = map(vec![(Value::from("port"), Value::from("eighty"))]);
        assert!(decode_struct::<Server>(&JsonDecoder::default(), &input).is_err());
    }

    #[test]
    fn test_overlay_replaces_non_objects() {
        let mut base = json!({"tags": ["a"], "n": 1});
        overlay(&mut base, json!({"TAGS": ["b", "c"], "extra": 2}), true);
        assert_eq!(base, json!({"tags": ["b", "c"], "n": 1, "extra": 2}));

        let mut base = json!({"n": 1});
        overlay(&mut base, json!({"N": 2}), false);
        assert_eq!(base, json!({"n": 1, "N": 2}));
    }

    #[test]
    fn test_decode_entries() {
        let input = map(vec![
            (Value::from("a"), Value::from("1")),
            (Value::from("b"), Value::I64(2)),
        ]);
        let out: HashMap<String, i32> = decode_entries(&input).unwrap();
        assert_eq!(out.get("a"), Some(&1));
        assert_eq!(out.get("b"), Some(&2));

        let bad = map(vec![(Value::from("a"), Value::from("x"))]);
        assert!(decode_entries::<String, i32, HashMap<_, _>>(&bad).is_err());
    }
}
