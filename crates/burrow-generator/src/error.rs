use burrow_core::ShortenerError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("entropy source failed: {0}")]
    Entropy(String),
}

impl From<GeneratorError> for ShortenerError {
    fn from(value: GeneratorError) -> Self {
        match value {
            GeneratorError::Entropy(message) => Self::Entropy(message),
        }
    }
}
