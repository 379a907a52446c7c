//! catalog/mod.rs
//! Closed registry of record types: id, name, category, layout.
//!
//! Notes:
//! - The table is static and immutable; there is no registration API.
//! - Names are matched case-insensitively on input and always rendered lowercase.

pub mod types;
pub mod registry;

pub use types::*;
pub use registry::*;
