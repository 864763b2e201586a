//! Error types for the bamtally library.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("htslib error: {0}")]
    Htslib(#[from] rust_htslib::errors::Error),

    #[error("output error: {0}")]
    Output(#[from] csv::Error),

    /// An observation referenced a sample ordinal that was never registered.
    /// This is a contract violation by the pileup source, not a data problem,
    /// so the run aborts rather than mis-attributing counts.
    #[error("observation references unregistered sample ordinal {ordinal} ({registered} samples registered)")]
    UnknownSample { ordinal: u32, registered: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid region {region:?}: {reason}")]
    InvalidRegion { region: String, reason: String },

    #[error("input headers disagree: {0}")]
    HeaderMismatch(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;

/// Returns `true` if the error originated from a broken pipe.
#[inline]
pub fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.root_cause()
        .downcast_ref::<std::io::Error>()
        .map(|io_err| io_err.kind() == std::io::ErrorKind::BrokenPipe)
        .unwrap_or(false)
}
