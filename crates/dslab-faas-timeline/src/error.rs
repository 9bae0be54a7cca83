//! Error types.

use thiserror::Error;

/// Errors that abort the analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("malformed trace of function {function} at minute {minute}: {reason}")]
    MalformedTrace {
        function: String,
        minute: usize,
        reason: String,
    },

    #[error("trace of function {function} covers {available} minutes, but {required} are required")]
    TraceTooShort {
        function: String,
        available: usize,
        required: usize,
    },

    #[error("function {function} has invocation of {runtime} ms at minute {minute}, maximum is {max} ms")]
    RuntimeTooLong {
        function: String,
        minute: usize,
        runtime: u64,
        max: u64,
    },

    #[error("missing trace data: {0}")]
    MissingTraceData(String),

    #[error("cannot parse trace: {0}")]
    TraceParse(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("worker thread panicked while processing {0} function(s)")]
    WorkerPanicked(usize),

    #[error("output writer thread panicked")]
    WriterPanicked,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
