//! stream/walk.rs
//! Index-free, table-driven record walking.
//!
//! Design notes:
//! - A record's extent is a pure function of its type id and the length
//!   prefixes its `Layout` names; content bytes are sliced, never scanned.
//! - Every read is bounds-checked against the stream: a prefix or content that
//!   runs past the end is `DecodeError::Truncated`, never a panic.
//! - Offsets in errors are absolute stream offsets of the record start.

use byteorder::{BigEndian, ByteOrder};

use crate::catalog::{lookup_id, LenField, Layout, RecordType};
use crate::stream::types::DecodeError;

/// Borrowed view of one record inside a stream, with its variable fields split out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView<'a> {
    offset: usize,
    kind: RecordType,
    bytes: &'a [u8],
    fields: Vec<&'a [u8]>,
    pairs: Vec<(&'a [u8], &'a [u8])>,
    items: Vec<&'a [u8]>,
}

impl<'a> RecordView<'a> {
    /// Absolute offset of the type id byte.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn kind(&self) -> RecordType {
        self.kind
    }

    /// The whole record, type id included.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Encoded length of the record.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        self.bytes.len()
    }

    /// Offset of the record that follows this one.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.bytes.len()
    }

    /// Byte at `pos` relative to the type id. Only valid for fixed positions
    /// inside the layout head.
    #[inline]
    pub(crate) fn byte(&self, pos: usize) -> u8 {
        self.bytes[pos]
    }

    /// Contents of the length-prefixed fields, in layout order.
    #[inline]
    pub fn fields(&self) -> &[&'a [u8]] {
        &self.fields
    }

    /// wc2 header `(name, value)` pairs.
    #[inline]
    pub fn pairs(&self) -> &[(&'a [u8], &'a [u8])] {
        &self.pairs
    }

    /// dns domain names.
    #[inline]
    pub fn items(&self) -> &[&'a [u8]] {
        &self.items
    }
}

/// Parse the record starting at `offset`.
pub fn view_at(buf: &[u8], offset: usize) -> Result<RecordView<'_>, DecodeError> {
    let id = *buf.get(offset).ok_or(DecodeError::Truncated { offset, need: 1, have: 0 })?;
    let kind = lookup_id(id).map_err(|_| DecodeError::UnknownType { offset, id })?;
    let r = Reader { buf, offset };

    let mut fields = Vec::new();
    let mut pairs = Vec::new();
    let mut items = Vec::new();

    let end = match kind.layout() {
        Layout::Fixed(n) => {
            r.span(0, n)?;
            n
        }
        Layout::Sized { head, lens } => r.sized(head, lens, &mut fields)?,
        Layout::Pairs { head, lens, count_at } => {
            let mut pos = r.sized(head, lens, &mut fields)?;
            let count = r.byte(count_at)?;
            for _ in 0..count {
                let name_len = r.byte(pos)? as usize;
                let value_len = r.byte(pos + 1)? as usize;
                let name = r.span(pos + 2, name_len)?;
                let value = r.span(pos + 2 + name_len, value_len)?;
                pairs.push((name, value));
                pos += 2 + name_len + value_len;
            }
            pos
        }
        Layout::List { head, count_at } => {
            r.span(0, head)?;
            let count = r.byte(count_at)?;
            let mut pos = head;
            for _ in 0..count {
                let len = r.byte(pos)? as usize;
                items.push(r.span(pos + 1, len)?);
                pos += 1 + len;
            }
            pos
        }
    };

    Ok(RecordView {
        offset,
        kind,
        bytes: &buf[offset..offset + end],
        fields,
        pairs,
        items,
    })
}

/// Encoded length of the record starting at `offset`.
#[inline]
pub fn record_len(buf: &[u8], offset: usize) -> Result<usize, DecodeError> {
    view_at(buf, offset).map(|v| v.encoded_len())
}

/// Start of the record after the one at `offset`; `None` once `offset` is at
/// or past the end of the stream.
pub fn next_offset(buf: &[u8], offset: usize) -> Result<Option<usize>, DecodeError> {
    if offset >= buf.len() {
        return Ok(None);
    }
    record_len(buf, offset).map(|n| Some(offset + n))
}

/// Iterator over the records of a byte stream. Stops after the first error.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    buf: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Records<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0, failed: false }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<RecordView<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }
        match view_at(self.buf, self.offset) {
            Ok(view) => {
                self.offset = view.end();
                Some(Ok(view))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Bounds-checked reads relative to one record start.
struct Reader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn span(&self, pos: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        let start = self.offset + pos;
        self.buf.get(start..start + len).ok_or(DecodeError::Truncated {
            offset: self.offset,
            need: pos + len,
            have: self.buf.len().saturating_sub(self.offset),
        })
    }

    fn byte(&self, pos: usize) -> Result<u8, DecodeError> {
        self.span(pos, 1).map(|b| b[0])
    }

    fn len_field(&self, field: LenField) -> Result<usize, DecodeError> {
        match field {
            LenField::U8(at) => self.byte(at).map(usize::from),
            LenField::U16(at) => self.span(at, 2).map(|b| BigEndian::read_u16(b) as usize),
        }
    }

    /// Read every declared length, slice the contents in order after `head`,
    /// and return the position just past the last content byte.
    fn sized(
        &self,
        head: usize,
        lens: &[LenField],
        out: &mut Vec<&'a [u8]>,
    ) -> Result<usize, DecodeError> {
        self.span(0, head)?;
        let mut pos = head;
        for &field in lens {
            let len = self.len_field(field)?;
            out.push(self.span(pos, len)?);
            pos += len;
        }
        Ok(pos)
    }
}
