use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use latstat::{run, Config, LatsError, SummaryFormat, TrailingData, DEFAULT_REPORT_PATH};

/// Summarize a binary request latency log.
///
/// Writes a millisecond table of queue, service and sojourn times to the
/// report file and prints sojourn-time percentiles.
#[derive(Debug, Parser)]
#[command(name = "latstat", version)]
struct Command {
    /// Log verbosity, repeat for more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Report file to write
    #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
    output: PathBuf,
    /// Fail on trailing bytes instead of dropping the incomplete record
    #[arg(long)]
    strict: bool,
    /// Summary format on stdout
    #[arg(short, long, value_enum, default_value_t = SummaryFormat::Text)]
    format: SummaryFormat,
    /// Binary latency log (little-endian u64 queue/service/sojourn triples)
    input: PathBuf,
}

impl From<Command> for Config {
    fn from(opts: Command) -> Self {
        Config {
            verbosity: opts.verbose,
            input: opts.input,
            output: opts.output,
            trailing: if opts.strict {
                TrailingData::Reject
            } else {
                TrailingData::Truncate
            },
            format: opts.format,
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<LatsError>())
        .map_or(3, LatsError::exit_code)
}

fn report(config: &Config) -> Result<()> {
    let stdout = std::io::stdout();
    run(config, &mut stdout.lock())
        .with_context(|| format!("Failed to summarize {}", config.input.display()))?;
    Ok(())
}

fn main() {
    let config = Config::from(Command::parse());
    init_logging(config.verbosity);

    if let Err(err) = report(&config) {
        eprintln!("Error: {err:#}");
        process::exit(exit_code(&err));
    }
}
