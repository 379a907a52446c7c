//! catalog/registry.rs
//! Immutable lookup tables over the closed record catalog.

use crate::catalog::types::{CatalogError, RecordType};

/// Every catalog entry, in wire-id order.
pub static CATALOG: [RecordType; 25] = [
    RecordType::Host,
    RecordType::Sleep,
    RecordType::Jitter,
    RecordType::Ip,
    RecordType::Wc2,
    RecordType::TlsEx,
    RecordType::Mtls,
    RecordType::TlsCa,
    RecordType::TlsCert,
    RecordType::Tcp,
    RecordType::Tls,
    RecordType::Udp,
    RecordType::Icmp,
    RecordType::Pipe,
    RecordType::TlsInsecure,
    RecordType::Hex,
    RecordType::Zlib,
    RecordType::Gzip,
    RecordType::Base64,
    RecordType::Xor,
    RecordType::Cbk,
    RecordType::Aes,
    RecordType::Base64T,
    RecordType::Dns,
    RecordType::Base64Shift,
];

/// Resolve a wire id. Zero and ids outside the catalog are unknown.
#[inline]
pub fn lookup_id(id: u8) -> Result<RecordType, CatalogError> {
    RecordType::try_from(id).map_err(|_| CatalogError::UnknownId(id))
}

/// Resolve a structured-form name, ignoring ASCII case.
pub fn lookup_name(name: &str) -> Result<RecordType, CatalogError> {
    CATALOG
        .iter()
        .copied()
        .find(|t| t.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| CatalogError::UnknownName(name.to_string()))
}
