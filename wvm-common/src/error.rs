//! Common error types for WVM

use thiserror::Error;

/// Common result type for WVM operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across WVM crates
///
/// A corrupt catalog document and a failed image release are deliberately
/// absent: both are recovered where they happen and only logged.
#[derive(Error, Debug)]
pub enum Error {
    /// Id does not resolve within the required parent scope
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation is not valid for the record's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Invalid caller payload or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Payload collides with an existing record (e.g. duplicate slug)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Export requested but the page template is unavailable
    #[error("Template missing: {0}")]
    TemplateMissing(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable kind, used in API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NOT_FOUND",
            Error::InvalidState(_) => "INVALID_STATE",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Conflict(_) => "CONFLICT",
            Error::TemplateMissing(_) => "TEMPLATE_MISSING",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
