//! Error types for the fallible edges of the engine (file loading, sweep construction)
//!
//! The projection and stress calculations themselves never fail; they degrade numerically.

use thiserror::Error;

/// Errors raised while loading tables/proposals or building sensitivity axes
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid cash value factor table: {reason}")]
    InvalidFactorTable { reason: String },

    #[error("Unknown value for {field}: {value:?}")]
    UnknownValue { field: &'static str, value: String },

    #[error("Invalid sensitivity axis {axis}: {reason}")]
    InvalidAxis { axis: String, reason: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
