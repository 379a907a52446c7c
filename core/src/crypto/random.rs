//! crypto/random.rs
//! Secret generation from the operating system CSPRNG.

use rand::rngs::OsRng;
use rand::RngCore;

/// Fill a fresh buffer of `len` bytes from `OsRng`.
#[inline]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    OsRng.fill_bytes(&mut out);
    out
}
