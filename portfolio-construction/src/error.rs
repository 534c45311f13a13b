use std::path::PathBuf;
use thiserror::Error;
use trading::{InsightId, InstrumentId};

/// Errors that abort a portfolio construction pass.
#[derive(Error, Debug)]
pub enum AllocatorError {
    /// An insight expired on an instrument that never received a weight.
    /// The activation step was skipped, so the expiry cannot be reversed.
    #[error("Insight {insight} expired on instrument {instrument_id} which has no accumulated weight")]
    MissingWeight {
        instrument_id: InstrumentId,
        insight: InsightId,
    },

    /// Failed to read a configuration file.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON for the expected schema.
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

/// A specialized Result type for portfolio construction.
pub type Result<T> = std::result::Result<T, AllocatorError>;
