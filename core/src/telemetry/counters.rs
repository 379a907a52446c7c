//! telemetry/counters.rs
//! Deterministic counters kept by one `RecordStream`.
//!
//! Summary: counts what went into the stream and what was turned away.
//! Plain integers, no atomics: the stream itself is single-writer.

use std::ops::AddAssign;

use serde::Serialize;

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StreamCounters {
    /// Records accepted by `append` (markers included).
    pub records_appended: u64,
    /// Of those, marker-only records.
    pub markers_appended: u64,
    /// Bytes written by `append`.
    pub bytes_appended: u64,
    /// Bytes written verbatim by `ingest`.
    pub bytes_ingested: u64,
    /// Structured entries accepted by `load`.
    pub entries_loaded: u64,
    /// Appends refused by validation or uniqueness.
    pub rejected: u64,
}

impl StreamCounters {
    /// Record one accepted append of `len` encoded bytes.
    pub fn add_record(&mut self, len: usize, marker: bool) {
        self.records_appended += 1;
        if marker {
            self.markers_appended += 1;
        }
        self.bytes_appended += len as u64;
    }

    pub fn add_ingest(&mut self, len: usize) {
        self.bytes_ingested += len as u64;
    }

    pub fn add_loaded(&mut self) {
        self.entries_loaded += 1;
    }

    pub fn add_rejected(&mut self) {
        self.rejected += 1;
    }

    /// Total bytes in the stream that these counters account for.
    pub fn total_bytes(&self) -> u64 {
        self.bytes_appended + self.bytes_ingested
    }

    pub fn merge(&mut self, other: &StreamCounters) {
        self.records_appended += other.records_appended;
        self.markers_appended += other.markers_appended;
        self.bytes_appended += other.bytes_appended;
        self.bytes_ingested += other.bytes_ingested;
        self.entries_loaded += other.entries_loaded;
        self.rejected += other.rejected;
    }
}

impl AddAssign for StreamCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
