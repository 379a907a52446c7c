//! options.rs
//! Builder configuration.
//!
//! Defaults keep existing configuration blobs byte-compatible: oversize fields are
//! truncated to their length ceiling, XOR keys are 64 random bytes,
//! and CBK uses 128-byte blocks.

use serde::{Deserialize, Serialize};

use crate::constants::{CBK_BLOCK_SIZES, DEFAULT_CBK_SIZE, DEFAULT_XOR_KEY_LEN, MAX_FIELD_LEN};
use crate::record::RecordError;

/// What to do with a field longer than its length prefix can declare.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OversizePolicy {
    /// Declare and write only the first `max` bytes.
    #[default]
    Truncate,
    /// Fail with `RecordError::FieldTooLong`.
    Reject,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    pub oversize: OversizePolicy,
    /// Length of generated XOR keys.
    pub xor_key_len: usize,
    /// CBK block size used when none is given.
    pub cbk_size: u8,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            oversize: OversizePolicy::Truncate,
            xor_key_len: DEFAULT_XOR_KEY_LEN,
            cbk_size: DEFAULT_CBK_SIZE,
        }
    }
}

impl BuilderOptions {
    /// Parse from JSON text; absent keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if self.xor_key_len == 0 || self.xor_key_len > MAX_FIELD_LEN {
            return Err(RecordError::InvalidOption(format!(
                "xor_key_len {} outside 1..={}",
                self.xor_key_len, MAX_FIELD_LEN
            )));
        }
        if !CBK_BLOCK_SIZES.contains(&self.cbk_size) {
            return Err(RecordError::InvalidOption(format!(
                "cbk_size {} not one of {:?}",
                self.cbk_size, CBK_BLOCK_SIZES
            )));
        }
        Ok(())
    }
}
