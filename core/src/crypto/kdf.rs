//! crypto/kdf.rs
//! CBK sub-key derivation from arbitrary key material.
//!
//! Design:
//! - Feed the material into a single SHA-512 state `CBK_HASH_ROUNDS` times
//!   (the same bytes each round; the digest is never fed back).
//! - CRC-32 (IEEE) the final 64-byte digest.
//! - Split the checksum big-endian into the sub-keys A, B, C, D.
//!
//! Compatibility notes:
//! - Existing configuration blobs depend on this exact schedule. Changing the
//!   hash, the round count, or the byte order changes every derived key.

use sha2::{Digest, Sha512};

use crate::constants::{CBK_HASH_ROUNDS, DEFAULT_CBK_MATERIAL_LEN};
use crate::crypto::random::random_bytes;

/// Derived CBK sub-keys, in wire order.
pub type CbkKeys = [u8; 4];

/// Derive the four CBK sub-keys from `material`. Pure function of the input.
pub fn derive_cbk_keys(material: &[u8]) -> CbkKeys {
    let mut h = Sha512::new();
    for _ in 0..CBK_HASH_ROUNDS {
        h.update(material);
    }
    let digest = h.finalize();
    crc32fast::hash(digest.as_slice()).to_be_bytes()
}

/// Derive from `material` when it is present and non-empty, otherwise from
/// `DEFAULT_CBK_MATERIAL_LEN` fresh random bytes.
pub fn derive_cbk_keys_or_random(material: Option<&[u8]>) -> CbkKeys {
    match material {
        Some(m) if !m.is_empty() => derive_cbk_keys(m),
        _ => derive_cbk_keys(&random_bytes(DEFAULT_CBK_MATERIAL_LEN)),
    }
}
