use serde::{Deserialize, Serialize};
use sovran_convert::{
    convert, convert_slice, convert_slice_report, decode_struct, ConvertError, Converter,
    DecodeError, Degrade, JsonDecoder, KeyStyle, Kind, StructDecoder, Target, Value,
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
struct Endpoint {
    host: String,
    port: u16,
    tags: Vec<String>,
}

impl Target for Endpoint {
    fn kind() -> Kind {
        Kind::Struct
    }

    fn zero() -> Self {
        Self::default()
    }

    fn from_map(map: &Value, decoder: &dyn StructDecoder) -> Result<Self, DecodeError> {
        decode_struct(decoder, map)
    }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
struct Named {
    #[serde(rename = "Name")]
    name: String,
}

impl Target for Named {
    fn kind() -> Kind {
        Kind::Struct
    }

    fn zero() -> Self {
        Self::default()
    }

    fn from_map(map: &Value, decoder: &dyn StructDecoder) -> Result<Self, DecodeError> {
        decode_struct(decoder, map)
    }
}

fn strings(items: &[&str]) -> Value {
    Value::Seq(items.iter().map(|s| Value::from(*s)).collect())
}

#[test]
fn test_mixed_strings_into_fixed_array() -> Result<(), ConvertError> {
    let numbers: [i32; 3] = convert(strings(&["1", "2", "bad"]))?;
    assert_eq!(numbers, [1, 2, 0]);
    Ok(())
}

#[test]
fn test_mapping_into_named_struct() -> Result<(), ConvertError> {
    let input = Value::Map(vec![(Value::from("Name"), Value::from("Ada"))]);
    let named: Named = convert(input)?;
    assert_eq!(named.name, "Ada");
    Ok(())
}

#[test]
fn test_short_sequence_into_longer_array_is_zero() -> Result<(), ConvertError> {
    let input = Value::Seq(vec![Value::I32(1), Value::I32(2)]);
    let out: [i32; 3] = convert(input)?;
    assert_eq!(out, <[i32; 3]>::zero());
    assert_ne!(out, [1, 2, 0]);
    Ok(())
}

#[test]
fn test_json_document_binding() -> Result<(), ConvertError> {
    let doc = serde_json::json!({
        "host": "db.internal",
        "port": 5432,
        "tags": ["primary", "eu"]
    });
    let endpoint: Endpoint = convert(Value::from(doc))?;
    assert_eq!(
        endpoint,
        Endpoint {
            host: "db.internal".into(),
            port: 5432,
            tags: vec!["primary".into(), "eu".into()],
        }
    );
    Ok(())
}

#[test]
fn test_key_style_is_configurable() {
    let input = Value::Map(vec![
        (Value::from("Host"), Value::from("cache")),
        (Value::from("Port"), Value::U16(6379)),
    ]);

    // the default decoder matches field names ignoring case
    let folded: Endpoint = convert(input.clone()).unwrap();
    assert_eq!(folded.host, "cache");
    assert_eq!(folded.port, 6379);

    let converter = Converter::with_decoder(JsonDecoder::new(KeyStyle::Lowercase));
    let lowered: Endpoint = converter.convert(input.clone()).unwrap();
    assert_eq!(lowered, folded);

    // exact matching finds no fields, so everything stays at zero
    let converter = Converter::with_decoder(JsonDecoder::new(KeyStyle::Verbatim));
    let verbatim: Endpoint = converter.convert(input).unwrap();
    assert_eq!(verbatim, Endpoint::default());
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Member {
    name: String,
    age: u32,
}

impl Target for Member {
    fn kind() -> Kind {
        Kind::Struct
    }

    fn zero() -> Self {
        Self {
            name: String::new(),
            age: 0,
        }
    }

    fn from_map(map: &Value, decoder: &dyn StructDecoder) -> Result<Self, DecodeError> {
        decode_struct(decoder, map)
    }
}

#[test]
fn test_mapping_keys_match_fields_ignoring_case() -> Result<(), ConvertError> {
    let input = Value::Map(vec![
        (Value::from("Name"), Value::from("Ada")),
        (Value::from("Age"), Value::I64(3)),
    ]);
    let member: Member = convert(input)?;
    assert_eq!(
        member,
        Member {
            name: "Ada".into(),
            age: 3
        }
    );
    Ok(())
}

#[test]
fn test_missing_fields_keep_zero_values() -> Result<(), ConvertError> {
    let input = Value::Map(vec![(Value::from("name"), Value::from("Ada"))]);
    let member: Member = convert(input)?;
    assert_eq!(member.name, "Ada");
    assert_eq!(member.age, 0);

    let empty: Member = convert(Value::Map(vec![]))?;
    assert_eq!(empty, Member::zero());
    Ok(())
}

#[test]
fn test_mistyped_field_falls_through_to_unconvertible() {
    let input = Value::Map(vec![(Value::from("Age"), Value::from("old"))]);
    let err = convert::<Member>(input).unwrap_err();
    assert!(err.is_unconvertible());
}

#[test]
fn test_network_targets_decode_from_text() -> Result<(), ConvertError> {
    let ip: IpAddr = convert(Value::from("::1"))?;
    assert!(ip.is_loopback());

    let sock: SocketAddr = convert(Value::from("127.0.0.1:8080"))?;
    assert_eq!(sock.port(), 8080);

    let err = convert::<Ipv4Addr>(Value::from("300.1.1.1")).unwrap_err();
    assert!(matches!(err, ConvertError::Decode { .. }));
    assert!(err.target_type().ends_with("Ipv4Addr"));
    Ok(())
}

#[test]
fn test_sequence_of_addresses_degrades_unparsed_text() {
    // sequence elements only get identity and native conversion, not text decoding
    let input = vec![Value::other(Ipv4Addr::LOCALHOST), Value::from("10.0.0.1")];
    let report = convert_slice_report::<Vec<Ipv4Addr>>(input);
    assert_eq!(report.value, vec![Ipv4Addr::LOCALHOST, Ipv4Addr::UNSPECIFIED]);
    assert_eq!(
        report.degrades,
        vec![Degrade::Element {
            index: 1,
            from: "String"
        }]
    );
}

#[test]
fn test_slice_conversion_preserves_length() {
    let input = vec![
        Value::Null,
        Value::from("x"),
        Value::Bool(true),
        Value::F64(2.0),
        Value::Map(vec![]),
    ];
    let out: Vec<u32> = convert_slice(input);
    assert_eq!(out, vec![0, 0, 1, 2, 0]);
}

#[test]
fn test_map_of_lists_is_not_recursive() -> Result<(), ConvertError> {
    let input = Value::Map(vec![
        (Value::from("ok"), Value::I32(1)),
        (Value::from("nested"), Value::Seq(vec![Value::I32(1)])),
    ]);
    assert!(convert::<HashMap<String, i32>>(input.clone())
        .unwrap_err()
        .is_unconvertible());

    let dynamic: HashMap<String, Value> = convert(input)?;
    assert_eq!(dynamic.len(), 2);
    Ok(())
}

#[test]
fn test_error_message_names_both_types() {
    let err = convert::<Vec<i32>>(Value::from("nope")).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("String"));
    assert!(message.contains("Vec<i32>"));
}

#[test]
fn test_concurrent_conversion() {
    let converter = Arc::new(Converter::new());
    let mut handles = vec![];

    for i in 0..8 {
        let converter = Arc::clone(&converter);
        handles.push(thread::spawn(move || {
            for j in 0..100 {
                let input = Value::Seq(vec![
                    Value::from(i.to_string()),
                    Value::I64(j),
                    Value::from("skip"),
                ]);
                let out: Vec<i64> = converter.convert(input).unwrap();
                assert_eq!(out, vec![i, j, 0]);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
