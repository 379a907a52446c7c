//! telemetry/mod.rs
//! Per-stream counters, exposed as a snapshot by `RecordStream::counters()`.
//!
//! Counters never influence encoding; two streams with identical bytes may
//! carry different counters depending on how they were built.

pub mod counters;

pub use counters::*;
