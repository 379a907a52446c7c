//! stream/decode.rs
//! Semantic decode of one walked record into an `Entry`.
//!
//! The walker has already proven every declared field lies inside the
//! stream; this layer only checks content rules (non-empty mandatory fields,
//! UTF-8 text) and reassembles typed values.

use byteorder::{BigEndian, ByteOrder};
use indexmap::IndexMap;

use crate::catalog::RecordType;
use crate::record::Wc2Config;
use crate::stream::entry::Entry;
use crate::stream::types::DecodeError;
use crate::stream::walk::RecordView;

pub fn decode_view(view: &RecordView<'_>) -> Result<Entry, DecodeError> {
    let kind = view.kind();
    if kind.is_marker() {
        return Ok(Entry::Marker(kind));
    }
    let offset = view.offset();
    let f = view.fields();

    let entry = match kind {
        RecordType::Host => Entry::Host(text(view, "name", f[0])?),
        RecordType::Sleep => Entry::Sleep(BigEndian::read_i64(&view.as_bytes()[1..9])),
        RecordType::Jitter => Entry::Jitter(view.byte(1)),
        RecordType::Ip => Entry::Ip(view.byte(1)),
        RecordType::TlsEx => Entry::TlsVersion(view.byte(1)),
        RecordType::Base64Shift => Entry::Base64Shift(view.byte(1)),
        RecordType::Xor => Entry::Xor(f[0].to_vec()),
        RecordType::Cbk => {
            let b = view.as_bytes();
            Entry::Cbk { size: b[1], keys: [b[2], b[3], b[4], b[5]] }
        }
        RecordType::Aes => {
            if f[0].is_empty() || f[1].is_empty() {
                return Err(DecodeError::InvalidKeyIv { offset });
            }
            Entry::Aes { key: f[0].to_vec(), iv: f[1].to_vec() }
        }
        RecordType::TlsCa => Entry::TlsCa {
            version: view.byte(1),
            ca: mandatory(view, "ca", f[0])?,
        },
        RecordType::TlsCert => Entry::TlsCert {
            version: view.byte(1),
            pem: mandatory(view, "pem", f[0])?,
            key: mandatory(view, "key", f[1])?,
        },
        RecordType::Mtls => Entry::Mtls {
            version: view.byte(1),
            ca: mandatory(view, "ca", f[0])?,
            pem: mandatory(view, "pem", f[1])?,
            key: mandatory(view, "key", f[2])?,
        },
        RecordType::Wc2 => Entry::Wc2(wc2(view)?),
        RecordType::Dns => {
            let mut domains = Vec::with_capacity(view.items().len());
            for item in view.items() {
                if item.is_empty() {
                    return Err(DecodeError::EmptyField { offset, kind, field: "domain" });
                }
                domains.push(text(view, "domain", item)?);
            }
            Entry::Dns(domains)
        }
        // Marker kinds returned above.
        _ => Entry::Marker(kind),
    };
    Ok(entry)
}

fn wc2(view: &RecordView<'_>) -> Result<Wc2Config, DecodeError> {
    let f = view.fields();
    let optional = |field: &'static str, data: &[u8]| -> Result<Option<String>, DecodeError> {
        if data.is_empty() {
            Ok(None)
        } else {
            text(view, field, data).map(Some)
        }
    };

    let mut headers = IndexMap::with_capacity(view.pairs().len());
    for &(name, value) in view.pairs() {
        if name.is_empty() {
            return Err(DecodeError::InvalidHeader { offset: view.offset() });
        }
        headers.insert(text(view, "header name", name)?, text(view, "header value", value)?);
    }

    Ok(Wc2Config {
        url: optional("url", f[0])?,
        host: optional("host", f[1])?,
        agent: optional("agent", f[2])?,
        headers,
    })
}

fn mandatory(view: &RecordView<'_>, field: &'static str, data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::EmptyField { offset: view.offset(), kind: view.kind(), field });
    }
    Ok(data.to_vec())
}

fn text(view: &RecordView<'_>, field: &'static str, data: &[u8]) -> Result<String, DecodeError> {
    std::str::from_utf8(data)
        .map(str::to_owned)
        .map_err(|_| DecodeError::InvalidUtf8 { offset: view.offset(), kind: view.kind(), field })
}
