use thiserror::Error;

/// Errors related to the core types of the URL shortener.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors raised by a [`Store`](crate::Store) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Raised only by stores that refuse to overwrite an existing mapping.
    #[error("mapping already exists: {code} -> {long_url}")]
    AlreadyExists { code: String, long_url: String },
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors surfaced by a [`Shortener`](crate::Shortener).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
