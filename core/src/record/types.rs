//! record/types.rs
//! A single encoded record and the builder's validation errors.
//!
//! Notes:
//! - `Record` is a value type: type id + owned payload. It is produced by the
//!   builder and consumed by `RecordStream::append`.
//! - `Record::new` performs no validation so that foreign or hand-made records
//!   can be offered to the stream, which validates on append.

use indexmap::IndexMap;

use crate::catalog::{lookup_id, CatalogError, RecordType};
use crate::duration::DurationError;

/// One type id plus its type-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    type_id: u8,
    payload: Vec<u8>,
}

impl Record {
    /// Wrap raw parts without validation.
    pub fn new(type_id: u8, payload: Vec<u8>) -> Self {
        Self { type_id, payload }
    }

    /// A payload-less record of `kind`.
    pub(crate) fn marker(kind: RecordType) -> Self {
        Self { type_id: kind.id(), payload: Vec::new() }
    }

    #[inline]
    pub fn type_id(&self) -> u8 {
        self.type_id
    }

    /// Catalog entry for the type id.
    pub fn record_type(&self) -> Result<RecordType, CatalogError> {
        lookup_id(self.type_id)
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Encoded size: type id + payload.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        1 + self.payload.len()
    }

    /// Append the encoded record to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(self.encoded_len());
        out.push(self.type_id);
        out.extend_from_slice(&self.payload);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_to(&mut out);
        out
    }
}

/// Arguments of the wc2 connector. Empty strings and `None` both encode as
/// zero-length fields; header order is preserved on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wc2Config {
    pub url: Option<String>,
    pub host: Option<String>,
    pub agent: Option<String>,
    pub headers: IndexMap<String, String>,
}

impl Wc2Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Builder-side validation failures. Raised before any byte of the record exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("host: invalid name (empty)")]
    EmptyHost,

    #[error("sleep: {0}")]
    InvalidSleep(#[from] DurationError),

    #[error("sleep: duration must be positive, got {ns}ns")]
    NonPositiveSleep { ns: i64 },

    #[error("jitter: invalid percentage {value:?}")]
    InvalidJitter { value: String },

    #[error("{kind}: {field} {value} outside [{min}, {max}]")]
    OutOfRange { kind: RecordType, field: &'static str, value: i64, min: i64, max: i64 },

    #[error("{kind}: {field} must not be empty")]
    EmptyField { kind: RecordType, field: &'static str },

    #[error("{kind}: {field} is {len} bytes, limit is {max}")]
    FieldTooLong { kind: RecordType, field: &'static str, len: usize, max: usize },

    #[error("aes: invalid KEY size {have} (1..={max})")]
    InvalidKeySize { have: usize, max: usize },

    #[error("aes: invalid IV size {have} (need {need})")]
    InvalidIvSize { have: usize, need: usize },

    #[error("cbk: invalid block size {size}")]
    InvalidBlockSize { size: u8 },

    #[error("wc2: invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("{kind} is not a marker-only record")]
    NotAMarker { kind: RecordType },

    #[error("invalid builder option: {0}")]
    InvalidOption(String),
}
