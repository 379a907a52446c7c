//! stream/types.rs
//! Error taxonomy of the record stream: append invariants, decode, and load.

use crate::catalog::{CatalogError, RecordType};
use crate::record::RecordError;

/// Invariant violations on append. The stream is unchanged when returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// Type id zero.
    #[error("add: invalid record (type id 0)")]
    InvalidRecord,

    #[error("add: unknown record type id 0x{id:02x}")]
    UnknownType { id: u8 },

    /// A connector or custom connector is already present.
    #[error("add: attempted to add multiple connection hints ({kind})")]
    DuplicateConnector { kind: RecordType },

    /// A transform is already present.
    #[error("add: attempted to add multiple transforms ({kind})")]
    DuplicateTransform { kind: RecordType },

    /// Payload length disagrees with the type's layout.
    #[error("add: malformed {kind} record: {have} bytes, layout needs {need}")]
    MalformedRecord { kind: RecordType, have: usize, need: usize },
}

/// Failures while walking or semantically decoding stream bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid record type id 0x{id:02x} at offset {offset}")]
    UnknownType { offset: usize, id: u8 },

    /// A length prefix or content runs past the end of the stream.
    #[error("truncated record at offset {offset}: need {need} bytes, {have} available")]
    Truncated { offset: usize, need: usize, have: usize },

    /// Mandatory content field declared with zero width.
    #[error("{kind} at offset {offset}: empty {field}")]
    EmptyField { offset: usize, kind: RecordType, field: &'static str },

    #[error("aes at offset {offset}: invalid KEY/IV values")]
    InvalidKeyIv { offset: usize },

    #[error("wc2 at offset {offset}: invalid header")]
    InvalidHeader { offset: usize },

    #[error("{kind} at offset {offset}: {field} is not valid UTF-8")]
    InvalidUtf8 { offset: usize, kind: RecordType, field: &'static str },
}

/// Failures while loading the structured form back into a stream.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("parse: invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parse: invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("input: empty input data")]
    EmptyInput,

    #[error("parse: expected a list of entries")]
    NotAList,

    #[error("parse: invalid entry: {reason}")]
    InvalidEntry { reason: &'static str },

    #[error("parse: {0}")]
    UnknownType(#[from] CatalogError),

    #[error("{kind}: missing args")]
    MissingArgs { kind: RecordType },

    #[error("{kind}: missing {field}")]
    MissingField { kind: RecordType, field: &'static str },

    #[error("{kind}: invalid {field}: {reason}")]
    InvalidField { kind: RecordType, field: &'static str, reason: String },

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Stream(#[from] StreamError),
}
