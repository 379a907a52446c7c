//! record/mod.rs
//! Single records: the `Record` value type and the `RecordBuilder` that
//! produces one validated record per call.

pub mod types;
pub mod builder;

pub use types::*;
pub use builder::*;
