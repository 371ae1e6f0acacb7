use std::sync::Arc;

use burrow_core::{ShortCode, Shortener};

/// Path prefix under which short codes are served.
pub const REDIRECT_PREFIX: &str = "/sh";

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: String,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, public_base_url: impl Into<String>) -> Self {
        Self {
            shortener,
            base_url: public_base_url.into(),
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    /// Builds the public URL that redirects to `code`.
    pub fn short_url(&self, code: &ShortCode) -> String {
        code.to_url(&format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            REDIRECT_PREFIX
        ))
    }
}
