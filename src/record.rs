//! Binary latency log reader.
//!
//! A latency log is a flat array of unsigned 64-bit integers, grouped in
//! triples of `(queue, service, sojourn)` times in nanoseconds. Integers are
//! little-endian; that is the byte order of the request loggers producing
//! these files and it is never auto-detected.

use std::fs;
use std::path::Path;

use plain::Plain;

use crate::error::{LatsError, Result};

/// Size of one encoded integer.
pub const WORD_SIZE: usize = std::mem::size_of::<u64>();
/// Number of integers in one record.
pub const WORDS_PER_RECORD: usize = 3;
/// Size of one encoded record.
pub const RECORD_SIZE: usize = WORD_SIZE * WORDS_PER_RECORD;

/// On-disk layout of a record, before byte order is fixed up.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct RawRecord {
    queue_ns: u64,
    service_ns: u64,
    sojourn_ns: u64,
}

unsafe impl Plain for RawRecord {}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Record {
            queue_time: u64::from_le(raw.queue_ns),
            service_time: u64::from_le(raw.service_ns),
            sojourn_time: u64::from_le(raw.sojourn_ns),
        }
    }
}

/// One request's latency breakdown, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub queue_time: u64,
    pub service_time: u64,
    pub sojourn_time: u64,
}

/// What to do with bytes after the last complete record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailingData {
    /// Drop them, logging a warning.
    #[default]
    Truncate,
    /// Fail with [`LatsError::Malformed`].
    Reject,
}

/// Records of a latency log, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Load a latency log from `path`.
    ///
    /// The path is checked for existence before anything is read.
    pub fn load(path: &Path, trailing: TrailingData) -> Result<Self> {
        if !path.exists() {
            return Err(LatsError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = fs::read(path).map_err(|e| LatsError::io(path, e))?;
        tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

        let set = Self::from_bytes(&bytes, trailing).map_err(|reason| LatsError::Malformed {
            path: path.to_path_buf(),
            reason,
        })?;
        tracing::info!("Loaded {} records from {}", set.len(), path.display());
        Ok(set)
    }

    /// Decode records from raw log bytes.
    ///
    /// Returns a description of the problem when the bytes are rejected.
    pub fn from_bytes(bytes: &[u8], trailing: TrailingData) -> std::result::Result<Self, String> {
        let chunks = bytes.chunks_exact(RECORD_SIZE);
        let leftover = chunks.remainder().len();

        if leftover > 0 {
            match trailing {
                TrailingData::Truncate => {
                    tracing::warn!(
                        "Dropping {} trailing bytes ({} whole integers) after the last complete record",
                        leftover,
                        leftover / WORD_SIZE
                    );
                }
                TrailingData::Reject => {
                    return Err(format!(
                        "{leftover} trailing bytes after the last complete record \
                         (records are {RECORD_SIZE} bytes)"
                    ));
                }
            }
        }

        let mut records = Vec::with_capacity(bytes.len() / RECORD_SIZE);
        for chunk in chunks {
            let mut raw = RawRecord::default();
            plain::copy_from_bytes(&mut raw, chunk)
                .map_err(|e| format!("failed to decode record: {e:?}"))?;
            records.push(Record::from(raw));
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Queue times in record order.
    pub fn queue_times(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.queue_time).collect()
    }

    /// Service times in record order.
    pub fn service_times(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.service_time).collect()
    }

    /// Sojourn times in record order.
    pub fn sojourn_times(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.sojourn_time).collect()
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Encode integers the way a latency log stores them.
#[cfg(test)]
pub(crate) fn encode_words(words: &[u64]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}
