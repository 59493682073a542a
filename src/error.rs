//! Error types for loading latency logs and producing reports.

use std::path::PathBuf;

/// Errors returned by the reader and reporter.
#[derive(Debug, thiserror::Error)]
pub enum LatsError {
    /// The input path does not exist.
    #[error("latency log not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The input exists but is not a sequence of u64 triples.
    #[error("malformed latency log {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// No complete records were left after parsing.
    #[error("latency log contains no complete records")]
    EmptyInput,

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LatsError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LatsError::NotFound { .. } => 1,
            LatsError::Malformed { .. } | LatsError::EmptyInput => 2,
            LatsError::Io { .. } => 3,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LatsError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LatsError>;
