//! utils.rs
//! Small text helpers shared by the structured form and error rendering.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Standard (padded) base64, used for every binary field in JSON.
pub fn b64_encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

pub fn b64_decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(text.trim())
}

/// Lowercase hex of at most `max` leading bytes, with an ellipsis when cut.
pub fn fmt_bytes(data: &[u8], max: usize) -> String {
    if data.len() <= max {
        hex::encode(data)
    } else {
        format!("{}…({} bytes)", hex::encode(&data[..max]), data.len())
    }
}
