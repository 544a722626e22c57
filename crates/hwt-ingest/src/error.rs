use thiserror::Error;

/// Failures raised while reading raw input, before any business rule runs.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Input is not well-formed XML; first parser defect, byte position kept.
    #[error("malformed document at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
