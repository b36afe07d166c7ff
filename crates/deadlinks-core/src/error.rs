use thiserror::Error;

/// Application-wide error types for deadlinks.
#[derive(Error, Debug)]
pub enum AppError {
    /// The HTTP client could not be constructed or used at all.
    ///
    /// Per-URL transport failures are not errors — they classify as an
    /// [`Outcome`](crate::outcome::Outcome) and never abort a pass.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Cache store operation failed (unwritable path, corrupt database).
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Markup could not be rewritten.
    #[error("Markup error: {0}")]
    MarkupError(String),

    /// Invalid or unusable configuration.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}
