use async_trait::async_trait;
use snip_core::{ShortCode, Shortened, Shortener, ShortenerError, Store};
use snip_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;
use url::Url;

/// Settings for a [`ShortenerService`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Public origin prepended to every short code, e.g. `https://sn.ip`.
    #[builder(setter(into))]
    pub base_url: String,
}

/// A concrete implementation of the [`Shortener`] trait.
///
/// This service wraps a [`Store`] and a [`Generator`] to handle:
/// - URL validation
/// - Idempotent registration (one code per long URL)
/// - Short URL composition
///
/// Codes are derived from the long URL by the generator, so concurrent calls
/// for the same URL all save the same pair. Truncation collisions between
/// distinct URLs are not detected.
#[derive(Debug)]
pub struct ShortenerService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    base_url: Arc<str>,
}

impl<S, G> Clone for ShortenerService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            base_url: Arc::clone(&self.base_url),
        }
    }
}

impl<S: Store, G: Generator> ShortenerService<S, G> {
    /// Creates a new `ShortenerService` owning the given store and generator.
    pub fn new(store: S, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            base_url: settings.base_url.into(),
        }
    }

    /// The store backing this service.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Derives the short code for a long URL without touching the store.
    pub fn generate_code(&self, long_url: &str) -> ShortCode {
        self.generator.generate(long_url).into()
    }

    /// Validates that the URL is an absolute `scheme://` URI using the http or
    /// https scheme.
    ///
    /// The input is stored and redirected to verbatim, so anything the WHATWG
    /// parser would silently repair (whitespace, control characters, a missing
    /// `//`) is rejected up front.
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        if url.chars().any(|c| c.is_ascii_control() || c.is_whitespace()) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must not contain whitespace or control characters: {:?}",
                url
            )));
        }

        let Some((scheme, _)) = url.split_once("://") else {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have the form scheme://host: {}",
                url
            )));
        };

        let parsed = Url::parse(url)
            .map_err(|e| ShortenerError::InvalidUrl(format!("{}: {}", e, url)))?;

        if !scheme.eq_ignore_ascii_case(parsed.scheme()) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have the form scheme://host: {}",
                url
            )));
        }

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                scheme
            ))),
        }
    }

    fn shortened(&self, code: ShortCode) -> Shortened {
        Shortened {
            short_url: code.to_url(&self.base_url),
            code,
        }
    }
}

#[async_trait]
impl<S: Store, G: Generator> Shortener for ShortenerService<S, G> {
    async fn shorten(&self, long_url: &str) -> Result<Shortened, ShortenerError> {
        Self::validate_url(long_url).inspect_err(|e| {
            debug!(long_url = %long_url, error = %e, "rejected long url");
        })?;

        if let Some(code) = self.store.get_code(long_url).await? {
            debug!(code = %code, long_url = %long_url, "existing mapping found");
            return Ok(self.shortened(code));
        }

        let code = self.generate_code(long_url);
        self.store.save(&code, long_url).await?;
        debug!(code = %code, long_url = %long_url, "created mapping");

        Ok(self.shortened(code))
    }

    async fn resolve(&self, code: &str) -> Result<String, ShortenerError> {
        trace!(code = %code, "resolving short code");

        // A malformed code can never have been stored.
        let Ok(short_code) = ShortCode::new(code) else {
            debug!(code = %code, "malformed short code");
            return Err(ShortenerError::NotFound(code.to_string()));
        };

        match self.store.get_long_url(&short_code).await? {
            Some(long_url) => {
                debug!(code = %code, long_url = %long_url, "resolved short code");
                Ok(long_url)
            }
            None => {
                trace!(code = %code, "short code not found");
                Err(ShortenerError::NotFound(code.to_string()))
            }
        }
    }
}
