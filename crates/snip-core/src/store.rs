use crate::error::StoreError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, StoreError>;

/// One entry of the store: a short code paired with the long URL it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub code: ShortCode,
    pub long_url: String,
}

/// A read-only view of a store.
///
/// Both lookups observe the same logical set of mappings: a code returned by
/// [`get_code`](ReadStore::get_code) always resolves through
/// [`get_long_url`](ReadStore::get_long_url), and vice versa.
#[async_trait]
pub trait ReadStore: Send + Sync + 'static {
    /// Retrieves the long URL for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get_long_url(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Retrieves the short code previously assigned to a long URL.
    /// Returns `None` if the URL has never been saved.
    async fn get_code(&self, long_url: &str) -> Result<Option<ShortCode>>;

    /// Checks whether a short code already exists in the store.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;
}

#[async_trait]
pub trait Store: ReadStore {
    /// Saves a mapping in both directions at once.
    ///
    /// Re-saving an identical pair always succeeds. Whether a conflicting pair
    /// overwrites or fails with [`StoreError::AlreadyExists`] is up to the
    /// implementation.
    async fn save(&self, code: &ShortCode, long_url: &str) -> Result<()>;
}
