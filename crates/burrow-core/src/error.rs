use thiserror::Error;

/// Errors related to the core types of the URL shortener.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors returned to callers of [`Shortener::shorten`][crate::Shortener::shorten].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("no unused short code found after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },
    #[error("entropy source failed: {0}")]
    Entropy(String),
}

/// Errors raised while loading or saving a snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("snapshot backend unavailable: {0}")]
    Unavailable(String),
    #[error("snapshot content is malformed: {0}")]
    Malformed(String),
    #[error("snapshot serialization failed: {0}")]
    Serialization(String),
}
