//! Error types for the finance insight engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, InsightError>;

#[derive(Error, Debug)]
pub enum InsightError {

    // =============================
    // Core Pipeline Errors
    // =============================

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
