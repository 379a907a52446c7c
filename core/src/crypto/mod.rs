//! crypto/mod.rs
//! Key material helpers for wrapper records.
//!
//! The codec never encrypts anything itself: it only generates secrets that
//! callers omitted and derives the CBK sub-keys from supplied material.

pub mod kdf;
pub mod random;

pub use kdf::*;
pub use random::*;
