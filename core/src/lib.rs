//! agentcfg-core
//!
//! Binary record codec for agent configuration streams.
//! No I/O, no threads, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod options;

// Codec layers
pub mod catalog;
pub mod duration;
pub mod crypto;
pub mod record;
pub mod stream;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::catalog::{lookup_id, lookup_name, Category, RecordType, Slots};
    pub use crate::duration::{format_duration, parse_duration};
    pub use crate::options::{BuilderOptions, OversizePolicy};
    pub use crate::record::{Record, RecordBuilder, Wc2Config};
    pub use crate::stream::{Entry, RecordStream};
    pub use crate::types::CodecError;
}
