//! constants.rs
//! Wire identifiers, field ceilings, and defaults shared across the codec.
//!
//! Notes:
//! - Record type ids are partitioned into contiguous ranges, one per category.
//!   Keep new ids inside their category's range; the catalog relies on it.
//! - All multi-byte integers on the wire are big-endian.

/// System records (unlimited occurrences).
pub mod system_ids {
    pub const HOST: u8   = 0xA0;
    pub const SLEEP: u8  = 0xA1;
    pub const JITTER: u8 = 0xA2;
}

/// Parameterized connectors (share the single connector slot).
pub mod custom_ids {
    pub const IP: u8       = 0xB0;
    pub const WC2: u8      = 0xB1;
    pub const TLS_EX: u8   = 0xB2;
    pub const MTLS: u8     = 0xB3;
    pub const TLS_CA: u8   = 0xB4;
    pub const TLS_CERT: u8 = 0xB5;
}

/// Fixed-shape connectors (marker-only).
pub mod connector_ids {
    pub const TCP: u8          = 0xC0;
    pub const TLS: u8          = 0xC1;
    pub const UDP: u8          = 0xC2;
    pub const ICMP: u8         = 0xC3;
    pub const PIPE: u8         = 0xC4;
    pub const TLS_INSECURE: u8 = 0xC5;
}

/// Data wrappers, order-significant.
pub mod wrapper_ids {
    pub const HEX: u8    = 0xD0;
    pub const ZLIB: u8   = 0xD1;
    pub const GZIP: u8   = 0xD2;
    pub const BASE64: u8 = 0xD3;
    pub const XOR: u8    = 0xD4;
    pub const CBK: u8    = 0xD5;
    pub const AES: u8    = 0xD6;
}

/// Framing transforms (at most one per stream).
pub mod transform_ids {
    pub const BASE64: u8       = 0xE0;
    pub const DNS: u8          = 0xE1;
    pub const BASE64_SHIFT: u8 = 0xE2;
}

/// Duration unit multipliers, in nanoseconds.
pub mod units {
    pub const NANOSECOND: i64  = 1;
    pub const MICROSECOND: i64 = 1_000;
    pub const MILLISECOND: i64 = 1_000_000;
    pub const SECOND: i64      = 1_000_000_000;
    pub const MINUTE: i64      = 60 * SECOND;
    pub const HOUR: i64        = 60 * MINUTE;
}

/// Ceiling of any u16BE length-prefixed field.
pub const MAX_FIELD_LEN: usize = 0xFFFF;

/// Ceiling of any u8 length-prefixed field (wc2 header pairs, dns names)
/// and of the wc2 header / dns domain counts.
pub const MAX_SHORT_LEN: usize = 0xFF;

/// Random XOR key length when no key is supplied.
pub const DEFAULT_XOR_KEY_LEN: usize = 64;

/// Random AES key length when no key is supplied.
pub const DEFAULT_AES_KEY_LEN: usize = 32;

/// Largest accepted AES key.
pub const MAX_AES_KEY_LEN: usize = 32;

/// AES IV length (always exactly this).
pub const AES_IV_LEN: usize = 16;

/// Random CBK key material length when none is supplied.
pub const DEFAULT_CBK_MATERIAL_LEN: usize = 64;

/// Rounds of the CBK material hash.
pub const CBK_HASH_ROUNDS: usize = 256;

/// Accepted CBK block sizes.
pub const CBK_BLOCK_SIZES: &[u8] = &[16, 32, 64, 128];

/// Default CBK block size.
pub const DEFAULT_CBK_SIZE: u8 = 128;

/// Largest accepted jitter percentage.
pub const MAX_JITTER: u8 = 100;
