//! latstat library - reader and reporter for binary request latency logs.
//!
//! A latency log is a flat little-endian array of `u64` triples holding the
//! queue, service and sojourn time of each request in nanoseconds. The
//! pipeline loads the log, converts it to milliseconds, writes a fixed-width
//! table to a report file and prints sojourn-time percentiles.
//!
//! # Modules
//!
//! - [`record`] - decoding log bytes into a [`RecordSet`]
//! - [`report`] - millisecond conversion and the text table
//! - [`stats`] - score-at-percentile statistics
//! - [`error`] - the [`LatsError`] taxonomy
//!
//! # Example
//!
//! ```no_run
//! use latstat::{run, Config};
//! use std::path::PathBuf;
//!
//! let config = Config {
//!     input: PathBuf::from("lats.bin"),
//!     ..Config::default()
//! };
//! let summary = run(&config, &mut std::io::stdout()).expect("report failed");
//! println!("max sojourn {:.3} ms", summary.max_ms);
//! ```

pub mod error;
pub mod record;
pub mod report;
pub mod stats;

use std::io::Write;
use std::path::PathBuf;

pub use error::{LatsError, Result};
pub use record::{Record, RecordSet, TrailingData};
pub use report::{ns_to_ms, LatencyTable};
pub use stats::{score_at_percentile, LatencySummary, PercentileValue, REPORTED_PERCENTILES};

/// Report file name used when none is given.
pub const DEFAULT_REPORT_PATH: &str = "lats.txt";

/// How the summary is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SummaryFormat {
    /// One line per percentile.
    #[default]
    Text,
    /// Pretty-printed JSON object.
    Json,
}

/// Parameters for a single report run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Verbosity level (0 = warn, 1 = info, 2 = debug, 3+ = trace)
    pub verbosity: u8,
    /// Binary latency log to read
    pub input: PathBuf,
    /// Where the text table is written
    pub output: PathBuf,
    /// Handling of bytes after the last complete record
    pub trailing: TrailingData,
    /// Summary format on stdout
    pub format: SummaryFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbosity: 0,
            input: PathBuf::new(),
            output: PathBuf::from(DEFAULT_REPORT_PATH),
            trailing: TrailingData::default(),
            format: SummaryFormat::default(),
        }
    }
}

/// Run the whole pipeline, printing the summary to `out`.
///
/// Statistics are computed before the report is written, so an input without
/// complete records fails with [`LatsError::EmptyInput`] and leaves no report.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<LatencySummary> {
    let records = RecordSet::load(&config.input, config.trailing)?;
    let table = LatencyTable::from_records(&records);
    let summary = LatencySummary::from_sojourn_ms(&table.sojourn_ms)?;

    table.write_to(&config.output)?;
    print_summary(&summary, config.format, out)?;
    Ok(summary)
}

/// Print `summary` to `out` in the requested format.
pub fn print_summary<W: Write>(
    summary: &LatencySummary,
    format: SummaryFormat,
    out: &mut W,
) -> Result<()> {
    let res = match format {
        SummaryFormat::Text => write!(out, "{summary}"),
        SummaryFormat::Json => serde_json::to_writer_pretty(&mut *out, summary)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(out)),
    };
    res.and_then(|()| out.flush())
        .map_err(|e| LatsError::io("<stdout>", e))
}
