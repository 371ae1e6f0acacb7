use crate::error::ShortenerError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Stores `original_url` under a freshly generated short code and returns the code.
    async fn shorten(&self, original_url: &str) -> Result<ShortCode>;

    /// Resolves a short code to the URL stored for it.
    /// Returns `None` if the code was never issued.
    fn lookup(&self, code: &str) -> Option<String>;
}
