use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Outcome of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shortened {
    /// Public URL composed as `base_url + "/" + code`.
    pub short_url: String,
    pub code: ShortCode,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a long URL. The same long URL always yields the same result.
    async fn shorten(&self, long_url: &str) -> Result<Shortened>;

    /// Resolves a short code to the long URL it was created from.
    async fn resolve(&self, code: &str) -> Result<String>;
}
