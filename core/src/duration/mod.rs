//! duration/mod.rs
//! Bidirectional codec between i64 nanoseconds and compact strings (`"2h3m1.5s"`).
//!
//! Used by the sleep record: the wire carries nanoseconds, the structured
//! form carries the formatted string.

pub mod types;
pub mod format;
pub mod parse;

pub use types::*;
pub use format::*;
pub use parse::*;
