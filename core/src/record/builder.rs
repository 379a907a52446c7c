//! record/builder.rs
//! One construction function per record type.
//!
//! Design notes:
//! - Every argument is validated before the payload buffer is allocated.
//! - Variable fields are length-prefixed big-endian. A field longer than its
//!   prefix can declare is handled by `BuilderOptions::oversize` (truncate by
//!   default: only the first `max` bytes are declared and written).
//! - Omitted secrets are generated from the OS CSPRNG.
//! - Multi-field records write all length prefixes first, then all contents.

use tracing::warn;

use crate::catalog::RecordType;
use crate::constants::{
    AES_IV_LEN, CBK_BLOCK_SIZES, DEFAULT_AES_KEY_LEN, MAX_AES_KEY_LEN, MAX_FIELD_LEN, MAX_JITTER,
    MAX_SHORT_LEN,
};
use crate::crypto::{derive_cbk_keys_or_random, random_bytes, CbkKeys};
use crate::duration::parse_duration;
use crate::options::{BuilderOptions, OversizePolicy};
use crate::record::types::{Record, RecordError, Wc2Config};

/// Produces validated records. Holds only configuration; cheap to clone.
#[derive(Clone, Debug, Default)]
pub struct RecordBuilder {
    options: BuilderOptions,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuilderOptions) -> Result<Self, RecordError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    // -------------------------------------------------------------------------
    // System
    // -------------------------------------------------------------------------

    /// Host name hint.
    pub fn host(&self, name: &str) -> Result<Record, RecordError> {
        if name.is_empty() {
            return Err(RecordError::EmptyHost);
        }
        let name = self.cap(RecordType::Host, "name", name.as_bytes(), MAX_FIELD_LEN)?;

        let mut p = Vec::with_capacity(2 + name.len());
        put_u16_field(&mut p, name);
        Ok(Record::new(RecordType::Host.id(), p))
    }

    /// Sleep interval in nanoseconds; must be strictly positive.
    pub fn sleep(&self, ns: i64) -> Result<Record, RecordError> {
        if ns <= 0 {
            return Err(RecordError::NonPositiveSleep { ns });
        }
        Ok(Record::new(RecordType::Sleep.id(), ns.to_be_bytes().to_vec()))
    }

    /// Sleep interval from a duration string (`"30s"`, `"1h30m"`, `"5"`).
    pub fn sleep_text(&self, text: &str) -> Result<Record, RecordError> {
        self.sleep(parse_duration(text)?)
    }

    /// Jitter percentage in `[0, 100]`.
    pub fn jitter(&self, percent: u8) -> Result<Record, RecordError> {
        if percent > MAX_JITTER {
            return Err(RecordError::InvalidJitter { value: percent.to_string() });
        }
        Ok(Record::new(RecordType::Jitter.id(), vec![percent]))
    }

    /// Jitter from text; `'%'` characters are ignored (`"25%"`).
    pub fn jitter_text(&self, text: &str) -> Result<Record, RecordError> {
        let cleaned: String = text.chars().filter(|&c| c != '%').collect();
        let percent = cleaned
            .trim()
            .parse::<u8>()
            .map_err(|_| RecordError::InvalidJitter { value: text.to_string() })?;
        self.jitter(percent)
    }

    // -------------------------------------------------------------------------
    // Markers (plain connectors, plain wrappers, base64 transform)
    // -------------------------------------------------------------------------

    pub fn marker(&self, kind: RecordType) -> Result<Record, RecordError> {
        if !kind.is_marker() {
            return Err(RecordError::NotAMarker { kind });
        }
        Ok(Record::marker(kind))
    }

    // -------------------------------------------------------------------------
    // Custom connectors
    // -------------------------------------------------------------------------

    /// Raw IP connector with protocol number in `(0, 255]`.
    pub fn ip(&self, protocol: u8) -> Result<Record, RecordError> {
        single_byte(RecordType::Ip, "protocol", protocol)
    }

    /// TLS connector pinned to a version byte in `(0, 255]`.
    pub fn tls_version(&self, version: u8) -> Result<Record, RecordError> {
        single_byte(RecordType::TlsEx, "version", version)
    }

    /// TLS connector verifying the peer against `ca`.
    pub fn tls_ca(&self, version: u8, ca: &[u8]) -> Result<Record, RecordError> {
        let kind = RecordType::TlsCa;
        check_version(kind, version)?;
        require(kind, "ca", ca)?;
        let ca = self.cap(kind, "ca", ca, MAX_FIELD_LEN)?;

        let mut p = Vec::with_capacity(3 + ca.len());
        p.push(version);
        put_u16_field(&mut p, ca);
        Ok(Record::new(kind.id(), p))
    }

    /// TLS connector presenting a certificate and key.
    pub fn tls_cert(&self, version: u8, pem: &[u8], key: &[u8]) -> Result<Record, RecordError> {
        let kind = RecordType::TlsCert;
        check_version(kind, version)?;
        require(kind, "pem", pem)?;
        require(kind, "key", key)?;
        let pem = self.cap(kind, "pem", pem, MAX_FIELD_LEN)?;
        let key = self.cap(kind, "key", key, MAX_FIELD_LEN)?;

        let mut p = Vec::with_capacity(5 + pem.len() + key.len());
        p.push(version);
        put_u16_lens(&mut p, &[pem, key]);
        p.extend_from_slice(pem);
        p.extend_from_slice(key);
        Ok(Record::new(kind.id(), p))
    }

    /// Mutual TLS: CA to verify the peer, plus our certificate and key.
    pub fn mtls(&self, version: u8, ca: &[u8], pem: &[u8], key: &[u8]) -> Result<Record, RecordError> {
        let kind = RecordType::Mtls;
        check_version(kind, version)?;
        require(kind, "ca", ca)?;
        require(kind, "pem", pem)?;
        require(kind, "key", key)?;
        let ca = self.cap(kind, "ca", ca, MAX_FIELD_LEN)?;
        let pem = self.cap(kind, "pem", pem, MAX_FIELD_LEN)?;
        let key = self.cap(kind, "key", key, MAX_FIELD_LEN)?;

        let mut p = Vec::with_capacity(7 + ca.len() + pem.len() + key.len());
        p.push(version);
        put_u16_lens(&mut p, &[ca, pem, key]);
        p.extend_from_slice(ca);
        p.extend_from_slice(pem);
        p.extend_from_slice(key);
        Ok(Record::new(kind.id(), p))
    }

    /// Web-camouflage connector with optional URL/Host/User-Agent/headers.
    pub fn wc2(&self, cfg: &Wc2Config) -> Result<Record, RecordError> {
        let kind = RecordType::Wc2;

        if cfg.headers.keys().any(|k| k.is_empty()) {
            return Err(RecordError::InvalidHeader { reason: "empty header name".into() });
        }
        let mut headers: Vec<(&str, &str)> =
            cfg.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        if headers.len() > MAX_SHORT_LEN {
            match self.options.oversize {
                OversizePolicy::Truncate => {
                    warn!(record = %kind, count = headers.len(), max = MAX_SHORT_LEN, "wc2 headers truncated");
                    headers.truncate(MAX_SHORT_LEN);
                }
                OversizePolicy::Reject => {
                    return Err(RecordError::FieldTooLong {
                        kind,
                        field: "headers",
                        len: headers.len(),
                        max: MAX_SHORT_LEN,
                    });
                }
            }
        }

        let url = self.cap(kind, "url", opt_bytes(&cfg.url), MAX_FIELD_LEN)?;
        let host = self.cap(kind, "host", opt_bytes(&cfg.host), MAX_FIELD_LEN)?;
        let agent = self.cap(kind, "agent", opt_bytes(&cfg.agent), MAX_FIELD_LEN)?;

        let mut pairs = Vec::with_capacity(headers.len());
        for (name, value) in headers {
            let name = self.cap(kind, "header name", name.as_bytes(), MAX_SHORT_LEN)?;
            let value = self.cap(kind, "header value", value.as_bytes(), MAX_SHORT_LEN)?;
            pairs.push((name, value));
        }

        let tail: usize = pairs.iter().map(|(n, v)| 2 + n.len() + v.len()).sum();
        let mut p = Vec::with_capacity(7 + url.len() + host.len() + agent.len() + tail);
        put_u16_lens(&mut p, &[url, host, agent]);
        p.push(pairs.len() as u8);
        p.extend_from_slice(url);
        p.extend_from_slice(host);
        p.extend_from_slice(agent);
        for (name, value) in pairs {
            p.push(name.len() as u8);
            p.push(value.len() as u8);
            p.extend_from_slice(name);
            p.extend_from_slice(value);
        }
        Ok(Record::new(kind.id(), p))
    }

    // -------------------------------------------------------------------------
    // Wrappers
    // -------------------------------------------------------------------------

    /// XOR wrapper. `None` generates `xor_key_len` random bytes.
    pub fn xor(&self, key: Option<&[u8]>) -> Result<Record, RecordError> {
        let kind = RecordType::Xor;
        let key = match key {
            Some(k) => {
                require(kind, "key", k)?;
                k.to_vec()
            }
            None => random_bytes(self.options.xor_key_len),
        };
        let key = self.cap(kind, "key", &key, MAX_FIELD_LEN)?;

        let mut p = Vec::with_capacity(2 + key.len());
        put_u16_field(&mut p, key);
        Ok(Record::new(kind.id(), p))
    }

    /// CBK wrapper with explicit sub-keys A, B, C, D.
    pub fn cbk(&self, size: u8, keys: CbkKeys) -> Result<Record, RecordError> {
        if !CBK_BLOCK_SIZES.contains(&size) {
            return Err(RecordError::InvalidBlockSize { size });
        }
        let mut p = Vec::with_capacity(5);
        p.push(size);
        p.extend_from_slice(&keys);
        Ok(Record::new(RecordType::Cbk.id(), p))
    }

    /// CBK wrapper with sub-keys derived from `material` (random when absent).
    pub fn cbk_derived(&self, size: u8, material: Option<&[u8]>) -> Result<Record, RecordError> {
        if !CBK_BLOCK_SIZES.contains(&size) {
            return Err(RecordError::InvalidBlockSize { size });
        }
        self.cbk(size, derive_cbk_keys_or_random(material))
    }

    /// AES wrapper. Missing key → 32 random bytes, missing IV → 16 random bytes.
    pub fn aes(&self, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<Record, RecordError> {
        let key = key.map(<[u8]>::to_vec).unwrap_or_else(|| random_bytes(DEFAULT_AES_KEY_LEN));
        let iv = iv.map(<[u8]>::to_vec).unwrap_or_else(|| random_bytes(AES_IV_LEN));
        if key.is_empty() || key.len() > MAX_AES_KEY_LEN {
            return Err(RecordError::InvalidKeySize { have: key.len(), max: MAX_AES_KEY_LEN });
        }
        if iv.len() != AES_IV_LEN {
            return Err(RecordError::InvalidIvSize { have: iv.len(), need: AES_IV_LEN });
        }

        let mut p = Vec::with_capacity(2 + key.len() + iv.len());
        p.push(key.len() as u8);
        p.push(iv.len() as u8);
        p.extend_from_slice(&key);
        p.extend_from_slice(&iv);
        Ok(Record::new(RecordType::Aes.id(), p))
    }

    // -------------------------------------------------------------------------
    // Transforms
    // -------------------------------------------------------------------------

    /// Shifted base64 transform, shift in `(0, 255]`.
    pub fn base64_shift(&self, shift: u8) -> Result<Record, RecordError> {
        single_byte(RecordType::Base64Shift, "shift", shift)
    }

    /// DNS packet transform with optional domain names.
    pub fn dns<S: AsRef<str>>(&self, domains: &[S]) -> Result<Record, RecordError> {
        let kind = RecordType::Dns;
        for d in domains {
            require(kind, "domain", d.as_ref().as_bytes())?;
        }
        let mut domains: Vec<&str> = domains.iter().map(AsRef::as_ref).collect();
        if domains.len() > MAX_SHORT_LEN {
            match self.options.oversize {
                OversizePolicy::Truncate => {
                    warn!(record = %kind, count = domains.len(), max = MAX_SHORT_LEN, "dns domains truncated");
                    domains.truncate(MAX_SHORT_LEN);
                }
                OversizePolicy::Reject => {
                    return Err(RecordError::FieldTooLong {
                        kind,
                        field: "domains",
                        len: domains.len(),
                        max: MAX_SHORT_LEN,
                    });
                }
            }
        }

        let mut p = Vec::with_capacity(1 + domains.iter().map(|d| 1 + d.len()).sum::<usize>());
        p.push(domains.len() as u8);
        for d in domains {
            let d = self.cap(kind, "domain", d.as_bytes(), MAX_SHORT_LEN)?;
            p.push(d.len() as u8);
            p.extend_from_slice(d);
        }
        Ok(Record::new(kind.id(), p))
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Apply the oversize policy to one field.
    fn cap<'a>(
        &self,
        kind: RecordType,
        field: &'static str,
        data: &'a [u8],
        max: usize,
    ) -> Result<&'a [u8], RecordError> {
        if data.len() <= max {
            return Ok(data);
        }
        match self.options.oversize {
            OversizePolicy::Truncate => {
                warn!(record = %kind, field, len = data.len(), max, "field truncated");
                Ok(&data[..max])
            }
            OversizePolicy::Reject => Err(RecordError::FieldTooLong { kind, field, len: data.len(), max }),
        }
    }
}

fn single_byte(kind: RecordType, field: &'static str, value: u8) -> Result<Record, RecordError> {
    if value == 0 {
        return Err(RecordError::OutOfRange { kind, field, value: 0, min: 1, max: 255 });
    }
    Ok(Record::new(kind.id(), vec![value]))
}

#[inline]
fn check_version(kind: RecordType, version: u8) -> Result<(), RecordError> {
    if version == 0 {
        return Err(RecordError::OutOfRange { kind, field: "version", value: 0, min: 1, max: 255 });
    }
    Ok(())
}

#[inline]
fn require(kind: RecordType, field: &'static str, data: &[u8]) -> Result<(), RecordError> {
    if data.is_empty() {
        return Err(RecordError::EmptyField { kind, field });
    }
    Ok(())
}

#[inline]
fn opt_bytes(v: &Option<String>) -> &[u8] {
    v.as_deref().map(str::as_bytes).unwrap_or_default()
}

/// `u16BE len` followed by the content. Caller has already capped `data`.
#[inline]
fn put_u16_field(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(&(data.len() as u16).to_be_bytes());
    out.extend_from_slice(data);
}

/// Consecutive `u16BE` lengths only; contents follow separately.
#[inline]
fn put_u16_lens(out: &mut Vec<u8>, fields: &[&[u8]]) {
    for f in fields {
        out.extend_from_slice(&(f.len() as u16).to_be_bytes());
    }
}
