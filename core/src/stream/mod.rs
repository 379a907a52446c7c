//! stream/mod.rs
//! The record stream: container, offset walker, and the structured
//! `{type, args}` form in both directions.
//!
//! Layering:
//! - `walk` knows byte boundaries only (layout table, bounds checks).
//! - `decode` turns a walked record into an `Entry`.
//! - `entry` converts entries to and from JSON and back into records.
//! - `container` owns the bytes and enforces append invariants.

pub mod types;
pub mod walk;
pub mod entry;
pub mod decode;
pub mod container;

pub use types::*;
pub use walk::{next_offset, record_len, view_at, RecordView, Records};
pub use entry::Entry;
pub use decode::decode_view;
pub use container::RecordStream;
