use crate::{
    catalog::CatalogError,
    duration::DurationError,
    record::RecordError,
    stream::{DecodeError, LoadError, StreamError},
};

/// Unified codec error covering every layer from duration text to stream load.
/// - `From<T>` impls let callers use `?` across layers.
/// - Display prefixes the layer so log lines stay greppable.
#[derive(Debug)]
pub enum CodecError {
    /// Unknown type id or name.
    Catalog(CatalogError),

    /// Duration text could not be parsed.
    Duration(DurationError),

    /// Builder-side validation.
    Record(RecordError),

    /// Append invariant violation.
    Stream(StreamError),

    /// Walking or semantic decode of stream bytes.
    Decode(DecodeError),

    /// Structured (JSON) or base64 input.
    Load(LoadError),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Catalog(e) => write!(f, "catalog error: {}", e),
            CodecError::Duration(e) => write!(f, "duration error: {}", e),
            CodecError::Record(e) => write!(f, "record error: {}", e),
            CodecError::Stream(e) => write!(f, "stream error: {}", e),
            CodecError::Decode(e) => write!(f, "decode error: {}", e),
            CodecError::Load(e) => write!(f, "load error: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Catalog(e) => Some(e),
            CodecError::Duration(e) => Some(e),
            CodecError::Record(e) => Some(e),
            CodecError::Stream(e) => Some(e),
            CodecError::Decode(e) => Some(e),
            CodecError::Load(e) => Some(e),
        }
    }
}

impl From<CatalogError> for CodecError {
    fn from(e: CatalogError) -> Self {
        CodecError::Catalog(e)
    }
}

impl From<DurationError> for CodecError {
    fn from(e: DurationError) -> Self {
        CodecError::Duration(e)
    }
}

impl From<RecordError> for CodecError {
    fn from(e: RecordError) -> Self {
        CodecError::Record(e)
    }
}

impl From<StreamError> for CodecError {
    fn from(e: StreamError) -> Self {
        CodecError::Stream(e)
    }
}

impl From<DecodeError> for CodecError {
    fn from(e: DecodeError) -> Self {
        CodecError::Decode(e)
    }
}

impl From<LoadError> for CodecError {
    fn from(e: LoadError) -> Self {
        CodecError::Load(e)
    }
}
