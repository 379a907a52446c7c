//! catalog/types.rs
//! Record type identifiers, categories, and per-type wire layouts.
//!
//! Notes:
//! - `#[repr(u8)]` + `TryFromPrimitive` keep the enum and the wire id in lockstep.
//! - Layout descriptors are the single source of truth for field boundaries:
//!   both the offset walker and the semantic decoder read them.

use std::fmt;

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::constants::{connector_ids, custom_ids, system_ids, transform_ids, wrapper_ids};

/// Record categories. Each owns one contiguous id range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    System,
    Connector,
    CustomConnector,
    Wrapper,
    Transform,
}

bitflags! {
    /// Stream-wide slots that may be occupied at most once.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Slots: u8 {
        const CONNECTOR = 0b0000_0001;
        const TRANSFORM = 0b0000_0010;
    }
}

impl Category {
    /// The exclusive slot records of this category occupy (empty when unlimited).
    pub const fn slot(self) -> Slots {
        match self {
            Category::Connector | Category::CustomConnector => Slots::CONNECTOR,
            Category::Transform => Slots::TRANSFORM,
            Category::System | Category::Wrapper => Slots::empty(),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Category::System => "system",
            Category::Connector => "connector",
            Category::CustomConnector => "custom connector",
            Category::Wrapper => "wrapper",
            Category::Transform => "transform",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position and width of one length prefix inside a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LenField {
    /// One-byte length at this record offset.
    U8(usize),
    /// Big-endian two-byte length at this record offset.
    U16(usize),
}

/// Byte layout of a record, relative to its first (type id) byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// The record is exactly this many bytes, type id included.
    Fixed(usize),
    /// `head` bytes of id, scalars and length prefixes, then the content of
    /// every field in `lens`, in order.
    Sized { head: usize, lens: &'static [LenField] },
    /// A `Sized` record followed by `count` (u8 at `count_at`) groups of
    /// `{u8 name len, u8 value len, name, value}`.
    Pairs { head: usize, lens: &'static [LenField], count_at: usize },
    /// `head` bytes followed by `count` (u8 at `count_at`) groups of `{u8 len, bytes}`.
    List { head: usize, count_at: usize },
}

impl Layout {
    /// Marker-only records carry nothing beyond their type id.
    pub const fn is_marker(&self) -> bool {
        matches!(self, Layout::Fixed(1))
    }
}

// Length-prefix positions, relative to the type id byte.
const SINGLE_U16: &[LenField] = &[LenField::U16(1)];
const AES_LENS: &[LenField] = &[LenField::U8(1), LenField::U8(2)];
const TLS_CA_LENS: &[LenField] = &[LenField::U16(2)];
const TLS_CERT_LENS: &[LenField] = &[LenField::U16(2), LenField::U16(4)];
const MTLS_LENS: &[LenField] = &[LenField::U16(2), LenField::U16(4), LenField::U16(6)];
const WC2_LENS: &[LenField] = &[LenField::U16(1), LenField::U16(3), LenField::U16(5)];

/// Every record type the codec understands. The catalog is closed.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum RecordType {
    Host         = system_ids::HOST,
    Sleep        = system_ids::SLEEP,
    Jitter       = system_ids::JITTER,

    Ip           = custom_ids::IP,
    Wc2          = custom_ids::WC2,
    TlsEx        = custom_ids::TLS_EX,
    Mtls         = custom_ids::MTLS,
    TlsCa        = custom_ids::TLS_CA,
    TlsCert      = custom_ids::TLS_CERT,

    Tcp          = connector_ids::TCP,
    Tls          = connector_ids::TLS,
    Udp          = connector_ids::UDP,
    Icmp         = connector_ids::ICMP,
    Pipe         = connector_ids::PIPE,
    TlsInsecure  = connector_ids::TLS_INSECURE,

    Hex          = wrapper_ids::HEX,
    Zlib         = wrapper_ids::ZLIB,
    Gzip         = wrapper_ids::GZIP,
    Base64       = wrapper_ids::BASE64,
    Xor          = wrapper_ids::XOR,
    Cbk          = wrapper_ids::CBK,
    Aes          = wrapper_ids::AES,

    Base64T      = transform_ids::BASE64,
    Dns          = transform_ids::DNS,
    Base64Shift  = transform_ids::BASE64_SHIFT,
}

impl RecordType {
    /// Raw wire id.
    #[inline(always)]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Canonical lowercase name used in the structured form.
    pub const fn name(self) -> &'static str {
        use RecordType::*;
        match self {
            Host => "host",
            Sleep => "sleep",
            Jitter => "jitter",
            Ip => "ip",
            Wc2 => "wc2",
            TlsEx => "tls-ex",
            Mtls => "mtls",
            TlsCa => "tls-ca",
            TlsCert => "tls-cert",
            Tcp => "tcp",
            Tls => "tls",
            Udp => "udp",
            Icmp => "icmp",
            Pipe => "pipe",
            TlsInsecure => "tls-insecure",
            Hex => "hex",
            Zlib => "zlib",
            Gzip => "gzip",
            Base64 => "base64",
            Xor => "xor",
            Cbk => "cbk",
            Aes => "aes",
            Base64T => "base64t",
            Dns => "dns",
            Base64Shift => "b64s",
        }
    }

    pub const fn category(self) -> Category {
        match self.id() {
            0xA0..=0xAF => Category::System,
            0xB0..=0xBF => Category::CustomConnector,
            0xC0..=0xCF => Category::Connector,
            0xD0..=0xDF => Category::Wrapper,
            _ => Category::Transform,
        }
    }

    pub const fn layout(self) -> Layout {
        use RecordType::*;
        match self {
            Tcp | Tls | Udp | Icmp | Pipe | TlsInsecure
            | Hex | Zlib | Gzip | Base64 | Base64T => Layout::Fixed(1),

            Jitter | Ip | TlsEx | Base64Shift => Layout::Fixed(2),
            Cbk => Layout::Fixed(6),
            Sleep => Layout::Fixed(9),

            Host | Xor => Layout::Sized { head: 3, lens: SINGLE_U16 },
            Aes => Layout::Sized { head: 3, lens: AES_LENS },
            TlsCa => Layout::Sized { head: 4, lens: TLS_CA_LENS },
            TlsCert => Layout::Sized { head: 6, lens: TLS_CERT_LENS },
            Mtls => Layout::Sized { head: 8, lens: MTLS_LENS },

            Wc2 => Layout::Pairs { head: 8, lens: WC2_LENS, count_at: 7 },
            Dns => Layout::List { head: 2, count_at: 1 },
        }
    }

    /// True when the record is just its type id.
    #[inline]
    pub const fn is_marker(self) -> bool {
        self.layout().is_marker()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown record type id: 0x{0:02x}")]
    UnknownId(u8),

    #[error("unknown record type name: {0:?}")]
    UnknownName(String),
}
