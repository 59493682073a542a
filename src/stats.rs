//! Percentile statistics over sojourn times.

use std::fmt;

use serde::Serialize;

use crate::error::{LatsError, Result};

/// Percentiles reported for every log, ascending.
pub const REPORTED_PERCENTILES: [u32; 5] = [50, 75, 90, 95, 99];

/// Score at percentile `pct` (0..=100) of an ascending-sorted sample.
///
/// Uses linear interpolation between the two closest ranks, so the 50th
/// percentile of an even-length sample is the mean of the middle pair.
/// Returns `None` for an empty sample.
pub fn score_at_percentile(sorted: &[f64], pct: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }

    let idx = pct.clamp(0.0, 100.0) / 100.0 * (n - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        Some(sorted[lo])
    } else {
        let frac = idx - lo as f64;
        Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
    }
}

/// A single percentile result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileValue {
    pub percentile: u32,
    pub latency_ms: f64,
}

/// Percentiles and maximum of the sojourn times of a log, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub samples: usize,
    pub percentiles: Vec<PercentileValue>,
    pub max_ms: f64,
}

impl LatencySummary {
    /// Summarize sojourn times given in milliseconds, in any order.
    pub fn from_sojourn_ms(sojourn_ms: &[f64]) -> Result<Self> {
        if sojourn_ms.is_empty() {
            return Err(LatsError::EmptyInput);
        }

        let mut sorted = sojourn_ms.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let percentiles = REPORTED_PERCENTILES
            .iter()
            .map(|&percentile| {
                score_at_percentile(&sorted, f64::from(percentile))
                    .map(|latency_ms| PercentileValue {
                        percentile,
                        latency_ms,
                    })
                    .ok_or(LatsError::EmptyInput)
            })
            .collect::<Result<Vec<_>>>()?;
        let max_ms = *sorted.last().ok_or(LatsError::EmptyInput)?;

        tracing::debug!(
            "Summarized {} sojourn samples, max {:.3} ms",
            sorted.len(),
            max_ms
        );

        Ok(Self {
            samples: sorted.len(),
            percentiles,
            max_ms,
        })
    }

    /// Value for `percentile`, if it is one of the reported ones.
    pub fn get(&self, percentile: u32) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|p| p.percentile == percentile)
            .map(|p| p.latency_ms)
    }
}

impl fmt::Display for LatencySummary {
    /// One line per percentile, each paired with the overall max.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.percentiles {
            writeln!(
                f,
                "{}th percentile latency {:.3} ms | max latency {:.3} ms",
                p.percentile, p.latency_ms, self.max_ms
            )?;
        }
        Ok(())
    }
}
