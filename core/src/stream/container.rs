//! stream/container.rs
//! `RecordStream`: the owned, append-only byte buffer of a configuration.
//!
//! Design notes:
//! - The buffer is the only source of truth; there is no record index.
//!   Walking and decoding are recomputed from bytes on demand.
//! - `append` validates everything before the first byte is written, so a
//!   failed append leaves the stream exactly as it was.
//! - `ingest` is verbatim. It walks the new bytes only to mark occupied
//!   connector/transform slots and stops quietly at the first bad record.
//! - `load` is all-or-prefix: entries before a failing one stay appended.

use serde_json::Value;
use tracing::debug;

use crate::catalog::{lookup_id, Slots};
use crate::record::{Record, RecordBuilder};
use crate::stream::decode::decode_view;
use crate::stream::entry::Entry;
use crate::stream::types::{DecodeError, LoadError, StreamError};
use crate::stream::walk::{self, view_at, Records};
use crate::telemetry::StreamCounters;
use crate::utils::{b64_decode, b64_encode, fmt_bytes};

#[derive(Debug, Clone, Default)]
pub struct RecordStream {
    buf: Vec<u8>,
    slots: Slots,
    counters: StreamCounters,
}

impl RecordStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream over an existing raw byte form (see `ingest`).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut s = Self::new();
        s.ingest(bytes);
        s
    }

    /// Stream over base64 text of a raw byte form.
    pub fn from_base64(text: &str) -> Result<Self, LoadError> {
        let bytes = b64_decode(text)?;
        if bytes.is_empty() {
            return Err(LoadError::EmptyInput);
        }
        Ok(Self::from_bytes(&bytes))
    }

    /// Stream built from a JSON structured list with default builder options.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let mut s = Self::new();
        s.load_json(text)?;
        Ok(s)
    }

    /// Detect the input form: JSON list, then base64 text, then raw bytes.
    /// A form that fails to load falls through to the next one.
    pub fn parse_any(input: &[u8]) -> Result<Self, LoadError> {
        if input.is_empty() {
            return Err(LoadError::EmptyInput);
        }
        if let Ok(text) = std::str::from_utf8(input) {
            match Self::from_json(text) {
                Ok(s) => return Ok(s),
                Err(e) => debug!(error = %e, "input is not a structured list"),
            }
            match Self::from_base64(text) {
                Ok(s) => return Ok(s),
                Err(e) => debug!(error = %e, "input is not base64"),
            }
        }
        Ok(Self::from_bytes(input))
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Validate and append one record.
    pub fn append(&mut self, record: &Record) -> Result<(), StreamError> {
        match self.try_append(record) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.counters.add_rejected();
                debug!(type_id = record.type_id(), error = %e, "append rejected");
                Err(e)
            }
        }
    }

    fn try_append(&mut self, record: &Record) -> Result<(), StreamError> {
        let id = record.type_id();
        if id == 0 {
            return Err(StreamError::InvalidRecord);
        }
        let kind = lookup_id(id).map_err(|_| StreamError::UnknownType { id })?;

        if !kind.is_marker() {
            let bytes = record.to_bytes();
            let need = match view_at(&bytes, 0) {
                Ok(view) => view.encoded_len(),
                Err(DecodeError::Truncated { need, .. }) => need,
                Err(_) => 0,
            };
            if need != bytes.len() {
                return Err(StreamError::MalformedRecord { kind, have: bytes.len(), need });
            }
        }

        let slot = kind.category().slot();
        if self.slots.intersects(slot) {
            return Err(if slot == Slots::CONNECTOR {
                StreamError::DuplicateConnector { kind }
            } else {
                StreamError::DuplicateTransform { kind }
            });
        }

        let start = self.buf.len();
        if kind.is_marker() {
            self.buf.push(id);
        } else {
            record.write_to(&mut self.buf);
        }
        let len = self.buf.len() - start;
        self.slots.insert(slot);
        self.counters.add_record(len, kind.is_marker());
        debug!(record = %kind, offset = start, len, "record appended");
        Ok(())
    }

    /// Append raw bytes verbatim.
    pub fn ingest(&mut self, bytes: &[u8]) {
        let start = self.buf.len();
        self.buf.extend_from_slice(bytes);
        self.counters.add_ingest(bytes.len());

        let mut marked = Slots::empty();
        for view in Records::new(&self.buf[start..]) {
            match view {
                Ok(v) => marked.insert(v.kind().category().slot()),
                Err(e) => {
                    debug!(error = %e, "ingest walk stopped");
                    break;
                }
            }
        }
        self.slots.insert(marked);
        debug!(offset = start, len = bytes.len(), head = %fmt_bytes(bytes, 16), "bytes ingested");
    }

    /// Build and append every entry with default builder options.
    pub fn load(&mut self, entries: &[Entry]) -> Result<(), LoadError> {
        self.load_with(entries, &RecordBuilder::default())
    }

    pub fn load_with(&mut self, entries: &[Entry], builder: &RecordBuilder) -> Result<(), LoadError> {
        for entry in entries {
            self.load_entry(entry, builder)?;
        }
        Ok(())
    }

    /// Parse a JSON structured list and load it entry by entry.
    pub fn load_json(&mut self, text: &str) -> Result<(), LoadError> {
        self.load_json_with(text, &RecordBuilder::default())
    }

    pub fn load_json_with(&mut self, text: &str, builder: &RecordBuilder) -> Result<(), LoadError> {
        let value: Value = serde_json::from_str(text)?;
        let list = value.as_array().ok_or(LoadError::NotAList)?;
        for item in list {
            let entry = Entry::from_json(item, builder.options().cbk_size)?;
            self.load_entry(&entry, builder)?;
        }
        Ok(())
    }

    fn load_entry(&mut self, entry: &Entry, builder: &RecordBuilder) -> Result<(), LoadError> {
        let record = entry.build(builder)?;
        self.append(&record)?;
        self.counters.add_loaded();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Walking and decode
    // -------------------------------------------------------------------------

    /// Start offset of the record after the one at `offset`; `None` at or
    /// past the end.
    pub fn next_offset(&self, offset: usize) -> Result<Option<usize>, DecodeError> {
        walk::next_offset(&self.buf, offset)
    }

    pub fn records(&self) -> Records<'_> {
        Records::new(&self.buf)
    }

    /// Structured decode of every record, in stream order.
    pub fn decode(&self) -> Result<Vec<Entry>, DecodeError> {
        self.records().map(|v| decode_view(&v?)).collect()
    }

    /// Structured decode rendered as a JSON array.
    pub fn to_json(&self) -> Result<Value, DecodeError> {
        let entries = self.decode()?;
        Ok(Value::Array(entries.iter().map(Entry::to_json).collect()))
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn to_base64(&self) -> String {
        b64_encode(&self.buf)
    }

    /// Occupied single-instance slots.
    #[inline]
    pub fn slots(&self) -> Slots {
        self.slots
    }

    pub fn counters(&self) -> StreamCounters {
        self.counters.clone()
    }
}

impl AsRef<[u8]> for RecordStream {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}
