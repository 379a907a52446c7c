//! stream/entry.rs
//! Structured (semantic) form of one record: `{type, args?}`.
//!
//! JSON notes:
//! - `type` is the catalog name; case-insensitive on input, lowercase on output.
//! - `args` is omitted for marker-only records and for a dns record without domains.
//! - Binary fields (keys, IVs, certificates) are standard base64 text.
//! - Object keys keep insertion order (wc2 headers are order-significant).

use indexmap::IndexMap;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::catalog::{lookup_name, RecordType};
use crate::crypto::CbkKeys;
use crate::duration::{format_duration, parse_duration};
use crate::record::{Record, RecordBuilder, RecordError, Wc2Config};
use crate::stream::types::LoadError;
use crate::utils::{b64_decode, b64_encode};

/// One decoded record, typed by its record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Any payload-less record (plain connectors, plain wrappers, base64t).
    Marker(RecordType),
    Host(String),
    /// Nanoseconds.
    Sleep(i64),
    Jitter(u8),
    Ip(u8),
    TlsVersion(u8),
    TlsCa { version: u8, ca: Vec<u8> },
    TlsCert { version: u8, pem: Vec<u8>, key: Vec<u8> },
    Mtls { version: u8, ca: Vec<u8>, pem: Vec<u8>, key: Vec<u8> },
    Wc2(Wc2Config),
    Xor(Vec<u8>),
    Cbk { size: u8, keys: CbkKeys },
    Aes { key: Vec<u8>, iv: Vec<u8> },
    Dns(Vec<String>),
    Base64Shift(u8),
}

impl Entry {
    pub fn record_type(&self) -> RecordType {
        match self {
            Entry::Marker(kind) => *kind,
            Entry::Host(_) => RecordType::Host,
            Entry::Sleep(_) => RecordType::Sleep,
            Entry::Jitter(_) => RecordType::Jitter,
            Entry::Ip(_) => RecordType::Ip,
            Entry::TlsVersion(_) => RecordType::TlsEx,
            Entry::TlsCa { .. } => RecordType::TlsCa,
            Entry::TlsCert { .. } => RecordType::TlsCert,
            Entry::Mtls { .. } => RecordType::Mtls,
            Entry::Wc2(_) => RecordType::Wc2,
            Entry::Xor(_) => RecordType::Xor,
            Entry::Cbk { .. } => RecordType::Cbk,
            Entry::Aes { .. } => RecordType::Aes,
            Entry::Dns(_) => RecordType::Dns,
            Entry::Base64Shift(_) => RecordType::Base64Shift,
        }
    }

    /// Encode through the builder, with all of its validation.
    pub fn build(&self, b: &RecordBuilder) -> Result<Record, RecordError> {
        match self {
            Entry::Marker(kind) => b.marker(*kind),
            Entry::Host(name) => b.host(name),
            Entry::Sleep(ns) => b.sleep(*ns),
            Entry::Jitter(p) => b.jitter(*p),
            Entry::Ip(p) => b.ip(*p),
            Entry::TlsVersion(v) => b.tls_version(*v),
            Entry::TlsCa { version, ca } => b.tls_ca(*version, ca),
            Entry::TlsCert { version, pem, key } => b.tls_cert(*version, pem, key),
            Entry::Mtls { version, ca, pem, key } => b.mtls(*version, ca, pem, key),
            Entry::Wc2(cfg) => b.wc2(cfg),
            Entry::Xor(key) => b.xor(Some(key.as_slice())),
            Entry::Cbk { size, keys } => b.cbk(*size, *keys),
            Entry::Aes { key, iv } => b.aes(Some(key.as_slice()), Some(iv.as_slice())),
            Entry::Dns(domains) => b.dns(domains),
            Entry::Base64Shift(s) => b.base64_shift(*s),
        }
    }

    /// The `args` value, or `None` when it is omitted.
    pub fn args_json(&self) -> Option<Value> {
        let v = match self {
            Entry::Marker(_) => return None,
            Entry::Dns(d) if d.is_empty() => return None,
            Entry::Host(name) => json!(name),
            Entry::Sleep(ns) => json!(format_duration(*ns)),
            Entry::Jitter(n) | Entry::Ip(n) | Entry::TlsVersion(n) | Entry::Base64Shift(n) => json!(n),
            Entry::TlsCa { version, ca } => json!({
                "version": version,
                "ca": b64_encode(ca),
            }),
            Entry::TlsCert { version, pem, key } => json!({
                "version": version,
                "pem": b64_encode(pem),
                "key": b64_encode(key),
            }),
            Entry::Mtls { version, ca, pem, key } => json!({
                "version": version,
                "ca": b64_encode(ca),
                "pem": b64_encode(pem),
                "key": b64_encode(key),
            }),
            Entry::Wc2(cfg) => {
                let mut m = Map::new();
                for (name, field) in [("url", &cfg.url), ("host", &cfg.host), ("agent", &cfg.agent)] {
                    if let Some(s) = field.as_deref().filter(|s| !s.is_empty()) {
                        m.insert(name.into(), json!(s));
                    }
                }
                if !cfg.headers.is_empty() {
                    let h: Map<String, Value> =
                        cfg.headers.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
                    m.insert("headers".into(), Value::Object(h));
                }
                Value::Object(m)
            }
            Entry::Xor(key) => json!(b64_encode(key)),
            Entry::Cbk { size, keys } => json!({
                "size": size,
                "A": keys[0],
                "B": keys[1],
                "C": keys[2],
                "D": keys[3],
            }),
            Entry::Aes { key, iv } => json!({
                "key": b64_encode(key),
                "iv": b64_encode(iv),
            }),
            Entry::Dns(domains) => json!(domains),
        };
        Some(v)
    }

    /// `{"type": name, "args"?: ...}`.
    pub fn to_json(&self) -> Value {
        let mut m = Map::new();
        m.insert("type".into(), json!(self.record_type().name()));
        if let Some(args) = self.args_json() {
            m.insert("args".into(), args);
        }
        Value::Object(m)
    }

    /// Parse one structured entry, checking the shape of `args` for its type.
    /// `default_cbk_size` fills a cbk entry that omits `size`.
    pub fn from_json(v: &Value, default_cbk_size: u8) -> Result<Self, LoadError> {
        let obj = v
            .as_object()
            .filter(|o| !o.is_empty())
            .ok_or(LoadError::InvalidEntry { reason: "expected a non-empty object" })?;
        let name = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or(LoadError::InvalidEntry { reason: "missing or non-string \"type\"" })?;
        let kind = lookup_name(name)?;

        if kind.is_marker() {
            return Ok(Entry::Marker(kind));
        }
        let args = obj.get("args").filter(|a| !a.is_null());
        if kind == RecordType::Dns {
            return match args {
                None => Ok(Entry::Dns(Vec::new())),
                Some(a) => dns_from_json(a),
            };
        }
        let args = args.ok_or(LoadError::MissingArgs { kind })?;
        let f = Fields { kind, args };

        let entry = match kind {
            RecordType::Host => Entry::Host(f.whole_str()?.to_string()),
            RecordType::Sleep => {
                let text = f.whole_str()?;
                let ns = parse_duration(text).map_err(|e| f.invalid("args", e.to_string()))?;
                Entry::Sleep(ns)
            }
            RecordType::Jitter => Entry::Jitter(jitter_from_json(&f)?),
            RecordType::Ip => Entry::Ip(f.whole_u8(1)?),
            RecordType::TlsEx => Entry::TlsVersion(f.whole_u8(1)?),
            RecordType::Base64Shift => Entry::Base64Shift(f.whole_u8(1)?),
            RecordType::Xor => Entry::Xor(f.whole_b64()?),
            RecordType::TlsCa => Entry::TlsCa {
                version: f.u8_field("version", 1)?,
                ca: f.b64_field("ca")?,
            },
            RecordType::TlsCert => Entry::TlsCert {
                version: f.u8_field("version", 1)?,
                pem: f.b64_field("pem")?,
                key: f.b64_field("key")?,
            },
            RecordType::Mtls => Entry::Mtls {
                version: f.u8_field("version", 1)?,
                ca: f.b64_field("ca")?,
                pem: f.b64_field("pem")?,
                key: f.b64_field("key")?,
            },
            RecordType::Wc2 => Entry::Wc2(wc2_from_json(&f)?),
            RecordType::Cbk => {
                let size = match f.object()?.get("size") {
                    None | Some(Value::Null) => default_cbk_size,
                    Some(_) => f.u8_field("size", 0)?,
                };
                Entry::Cbk {
                    size,
                    keys: [
                        f.u8_field("A", 0)?,
                        f.u8_field("B", 0)?,
                        f.u8_field("C", 0)?,
                        f.u8_field("D", 0)?,
                    ],
                }
            }
            RecordType::Aes => Entry::Aes {
                key: f.b64_field("key")?,
                iv: f.b64_field("iv")?,
            },
            _ => return Err(LoadError::InvalidEntry { reason: "unhandled record type" }),
        };
        Ok(entry)
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(deserializer)?;
        Entry::from_json(&v, crate::constants::DEFAULT_CBK_SIZE).map_err(D::Error::custom)
    }
}

/// Shape checks over one entry's `args`, with errors naming the field.
struct Fields<'a> {
    kind: RecordType,
    args: &'a Value,
}

impl<'a> Fields<'a> {
    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> LoadError {
        LoadError::InvalidField { kind: self.kind, field, reason: reason.into() }
    }

    fn object(&self) -> Result<&'a Map<String, Value>, LoadError> {
        self.args.as_object().ok_or_else(|| self.invalid("args", "expected an object"))
    }

    fn get(&self, field: &'static str) -> Result<&'a Value, LoadError> {
        self.object()?
            .get(field)
            .filter(|v| !v.is_null())
            .ok_or(LoadError::MissingField { kind: self.kind, field })
    }

    fn whole_str(&self) -> Result<&'a str, LoadError> {
        as_nonempty_str(self.args).ok_or_else(|| self.invalid("args", "expected a non-empty string"))
    }

    fn whole_u8(&self, min: u64) -> Result<u8, LoadError> {
        as_u8(self.args, min).ok_or_else(|| self.invalid("args", format!("expected an integer in [{min}, 255]")))
    }

    fn whole_b64(&self) -> Result<Vec<u8>, LoadError> {
        let text = self.whole_str()?;
        b64_decode(text).map_err(|e| self.invalid("args", e.to_string()))
    }

    fn u8_field(&self, field: &'static str, min: u64) -> Result<u8, LoadError> {
        as_u8(self.get(field)?, min)
            .ok_or_else(|| self.invalid(field, format!("expected an integer in [{min}, 255]")))
    }

    fn b64_field(&self, field: &'static str) -> Result<Vec<u8>, LoadError> {
        let text = as_nonempty_str(self.get(field)?)
            .ok_or_else(|| self.invalid(field, "expected a non-empty base64 string"))?;
        b64_decode(text).map_err(|e| self.invalid(field, e.to_string()))
    }

    fn opt_str(&self, field: &'static str) -> Result<Option<String>, LoadError> {
        match self.object()?.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(field, "expected a string")),
        }
    }
}

fn as_nonempty_str(v: &Value) -> Option<&str> {
    v.as_str().filter(|s| !s.is_empty())
}

fn as_u8(v: &Value, min: u64) -> Option<u8> {
    v.as_u64().filter(|n| *n >= min && *n <= 255).map(|n| n as u8)
}

fn jitter_from_json(f: &Fields<'_>) -> Result<u8, LoadError> {
    let bad = || f.invalid("args", "expected a percentage in [0, 100]");
    match f.args {
        Value::Number(_) => f.args.as_u64().filter(|n| *n <= 100).map(|n| n as u8).ok_or_else(bad),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|&c| c != '%').collect();
            cleaned.trim().parse::<u8>().ok().filter(|n| *n <= 100).ok_or_else(bad)
        }
        _ => Err(bad()),
    }
}

fn wc2_from_json(f: &Fields<'_>) -> Result<Wc2Config, LoadError> {
    let obj = f.object()?;
    let mut headers = IndexMap::new();
    match obj.get("headers") {
        None | Some(Value::Null) => {}
        Some(Value::Object(h)) => {
            for (name, value) in h {
                if name.is_empty() {
                    return Err(f.invalid("headers", "empty header name"));
                }
                let value = match value {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    _ => return Err(f.invalid("headers", format!("value of {name:?} is not a string"))),
                };
                headers.insert(name.clone(), value);
            }
        }
        Some(_) => return Err(f.invalid("headers", "expected an object")),
    }
    Ok(Wc2Config {
        url: f.opt_str("url")?,
        host: f.opt_str("host")?,
        agent: f.opt_str("agent")?,
        headers,
    })
}

fn dns_from_json(args: &Value) -> Result<Entry, LoadError> {
    let invalid = |reason: &str| LoadError::InvalidField {
        kind: RecordType::Dns,
        field: "args",
        reason: reason.to_string(),
    };
    let list = args.as_array().ok_or_else(|| invalid("expected a list of domain names"))?;
    let domains = list
        .iter()
        .map(|d| as_nonempty_str(d).map(str::to_string).ok_or_else(|| invalid("expected non-empty domain strings")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Entry::Dns(domains))
}
