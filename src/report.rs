//! Millisecond conversion and the fixed-width latency table.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{LatsError, Result};
use crate::record::RecordSet;

/// Nanoseconds per millisecond.
pub const NS_PER_MS: f64 = 1_000_000.0;

/// Width each table column is right-aligned to.
const COLUMN_WIDTH: usize = 12;

const HEADERS: [&str; 3] = ["QueueTimes", "ServiceTimes", "SojournTimes"];

#[inline]
pub fn ns_to_ms(ns: u64) -> f64 {
    ns as f64 / NS_PER_MS
}

/// The three latency columns of a log, converted to milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatencyTable {
    pub queue_ms: Vec<f64>,
    pub service_ms: Vec<f64>,
    pub sojourn_ms: Vec<f64>,
}

impl LatencyTable {
    pub fn from_records(records: &RecordSet) -> Self {
        let convert = |ns: Vec<u64>| -> Vec<f64> { ns.into_iter().map(ns_to_ms).collect() };
        Self {
            queue_ms: convert(records.queue_times()),
            service_ms: convert(records.service_times()),
            sojourn_ms: convert(records.sojourn_times()),
        }
    }

    pub fn len(&self) -> usize {
        self.sojourn_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sojourn_ms.is_empty()
    }

    /// Render the header and one row per record.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.len() + 1) * (COLUMN_WIDTH * 3 + 7));
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{:>w$} | {:>w$} | {:>w$}",
            HEADERS[0],
            HEADERS[1],
            HEADERS[2],
            w = COLUMN_WIDTH
        );
        let rows = self
            .queue_ms
            .iter()
            .zip(&self.service_ms)
            .zip(&self.sojourn_ms);
        for ((queue, service), sojourn) in rows {
            let _ = writeln!(
                out,
                "{:>w$.3} | {:>w$.3} | {:>w$.3}",
                queue,
                service,
                sojourn,
                w = COLUMN_WIDTH
            );
        }
        out
    }

    /// Write the rendered table to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|e| LatsError::io(path, e))?;
        tracing::info!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }
}
