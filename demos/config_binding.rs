use serde::{Deserialize, Serialize};
use sovran_convert::{
    convert_slice_report, decode_struct, ConvertError, Converter, DecodeError, JsonDecoder,
    KeyStyle, Kind, StructDecoder, Target, TextDecodable, Value,
};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Log verbosity, written in config files as a word
#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Loud,
}

impl TextDecodable for Verbosity {
    fn decode_text(&mut self, text: &[u8]) -> Result<(), DecodeError> {
        *self = match text {
            b"quiet" => Verbosity::Quiet,
            b"normal" => Verbosity::Normal,
            b"loud" => Verbosity::Loud,
            other => {
                return Err(format!("unknown verbosity {:?}", String::from_utf8_lossy(other)).into())
            }
        };
        Ok(())
    }
}

impl Target for Verbosity {
    fn kind() -> Kind {
        Kind::Opaque
    }

    fn zero() -> Self {
        Self::default()
    }

    fn text_decoder(&mut self) -> Option<&mut dyn TextDecodable> {
        Some(self)
    }
}

/// The part of the config that serde can describe on its own
#[derive(Debug, Default, Serialize, Deserialize)]
struct ServerSection {
    listen: String,
    worker_count: u16,
    allowed_origins: Vec<String>,
}

impl Target for ServerSection {
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

/// Demonstrates binding a loosely-typed document into typed settings
fn main() -> Result<(), ConvertError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // What a generic parser might hand us: everything is strings and untyped lists
    let document = Value::from(serde_json::json!({
        "Server": {
            "Listen": "0.0.0.0:8443",
            "WorkerCount": 4,
            "AllowedOrigins": ["https://a.example", "https://b.example"]
        },
        "MaxConnections": "512",
        "Verbosity": "loud",
        "RetryDelaysMs": ["100", "250", "soon", 1000]
    }));

    // Keys in the document are PascalCase; our fields are snake_case
    let converter = Converter::with_decoder(JsonDecoder::new(KeyStyle::SnakeCase));

    let server: ServerSection = converter.convert(section(&document, "Server"))?;
    println!(
        "server: {} with {} workers, origins {}",
        server.listen,
        server.worker_count,
        server.allowed_origins.join(", ")
    );

    // Individual fields can go through the converter too
    let listen: SocketAddr = converter.convert(field(&document, "Server", "Listen"))?;
    let max_connections: u32 = converter.convert(section(&document, "MaxConnections"))?;
    println!("listen on {}, at most {} connections", listen, max_connections);

    let verbosity: Verbosity = converter.convert(section(&document, "Verbosity"))?;
    println!("verbosity: {:?}", verbosity);

    // Sequences never fail; the report says what was lost
    if let Value::Seq(delays) = section(&document, "RetryDelaysMs") {
        let report = convert_slice_report::<Vec<u64>>(delays);
        println!("retry delays: {:?}", report.value);
        for degrade in &report.degrades {
            println!("  degraded: {:?}", degrade);
        }
    }

    // A bad word is reported by the decoder itself
    match converter.convert::<Verbosity>(Value::from("deafening")) {
        Ok(v) => println!("unexpected: {:?}", v),
        Err(e) => println!("rejected: {}", e),
    }

    Ok(())
}

fn section(document: &Value, name: &str) -> Value {
    document.get(name).cloned().unwrap_or(Value::Null)
}

fn field(document: &Value, name: &str, key: &str) -> Value {
    document
        .get(name)
        .and_then(|s| s.get(key))
        .cloned()
        .unwrap_or(Value::Null)
}
