use async_trait::async_trait;
use parking_lot::RwLock;
use snip_core::error::StoreError;
use snip_core::store::{Mapping, ReadStore, Result, Store};
use snip_core::ShortCode;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// How [`InMemoryStore::save`] treats a pair that disagrees with an existing entry.
///
/// Identical re-saves are always accepted, whichever policy is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SavePolicy {
    /// Replace the existing entry, dropping the stale opposite direction.
    #[default]
    Permissive,
    /// Reject the save with [`StoreError::AlreadyExists`].
    Strict,
}

/// Both directions of the mapping. Only ever touched under the store's lock.
#[derive(Debug, Default)]
struct Maps {
    by_code: HashMap<ShortCode, String>,
    by_long_url: HashMap<String, ShortCode>,
}

impl Maps {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            by_code: HashMap::with_capacity(capacity),
            by_long_url: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the first existing entry that disagrees with `(code, long_url)`.
    fn conflict(&self, code: &ShortCode, long_url: &str) -> Option<Mapping> {
        if let Some(existing) = self.by_code.get(code) {
            if existing != long_url {
                return Some(Mapping {
                    code: code.clone(),
                    long_url: existing.clone(),
                });
            }
        }

        match self.by_long_url.get(long_url) {
            Some(existing) if existing != code => Some(Mapping {
                code: existing.clone(),
                long_url: long_url.to_owned(),
            }),
            _ => None,
        }
    }

    fn insert(&mut self, code: &ShortCode, long_url: &str) {
        if let Some(old_url) = self.by_code.insert(code.clone(), long_url.to_owned()) {
            if old_url != long_url {
                self.by_long_url.remove(&old_url);
            }
        }

        if let Some(old_code) = self.by_long_url.insert(long_url.to_owned(), code.clone()) {
            if &old_code != code {
                self.by_code.remove(&old_code);
            }
        }
    }
}

/// In-memory implementation of the [`Store`] trait.
///
/// Both directions live behind a single reader/writer lock: lookups share the
/// lock, while a save holds it exclusively until both maps are updated. A
/// reader therefore never sees a code in one direction without its partner in
/// the other. The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    maps: RwLock<Maps>,
    policy: SavePolicy,
}

impl InMemoryStore {
    /// Creates a new, empty store with the [`SavePolicy::Permissive`] policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            maps: RwLock::new(Maps::with_capacity(capacity)),
            policy: SavePolicy::default(),
        }
    }

    /// Creates a new, empty store using the given save policy.
    pub fn with_policy(policy: SavePolicy) -> Self {
        Self {
            maps: RwLock::default(),
            policy,
        }
    }

    /// Number of mappings currently held.
    pub fn len(&self) -> usize {
        self.maps.read().by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of every mapping, in no particular order.
    pub fn mappings(&self) -> Vec<Mapping> {
        self.maps
            .read()
            .by_code
            .iter()
            .map(|(code, long_url)| Mapping {
                code: code.clone(),
                long_url: long_url.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl ReadStore for InMemoryStore {
    async fn get_long_url(&self, code: &ShortCode) -> Result<Option<String>> {
        let long_url = self.maps.read().by_code.get(code).cloned();
        trace!(code = %code, found = long_url.is_some(), "lookup by code");
        Ok(long_url)
    }

    async fn get_code(&self, long_url: &str) -> Result<Option<ShortCode>> {
        let code = self.maps.read().by_long_url.get(long_url).cloned();
        trace!(long_url = %long_url, found = code.is_some(), "lookup by long url");
        Ok(code)
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.maps.read().by_code.contains_key(code))
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn save(&self, code: &ShortCode, long_url: &str) -> Result<()> {
        let mut maps = self.maps.write();

        if let Some(existing) = maps.conflict(code, long_url) {
            match self.policy {
                SavePolicy::Strict => {
                    warn!(
                        code = %code,
                        long_url = %long_url,
                        existing_code = %existing.code,
                        existing_url = %existing.long_url,
                        "rejecting save that conflicts with an existing mapping"
                    );
                    return Err(StoreError::AlreadyExists {
                        code: existing.code.to_string(),
                        long_url: existing.long_url,
                    });
                }
                SavePolicy::Permissive => {
                    warn!(
                        code = %code,
                        long_url = %long_url,
                        existing_code = %existing.code,
                        existing_url = %existing.long_url,
                        "overwriting conflicting mapping"
                    );
                }
            }
        }

        maps.insert(code, long_url);
        debug!(code = %code, long_url = %long_url, "saved mapping");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn save_and_lookup_both_directions() {
        let store = InMemoryStore::new();

        store
            .save(&code("abc12345"), "https://example.com")
            .await
            .unwrap();

        assert_eq!(
            store.get_long_url(&code("abc12345")).await.unwrap(),
            Some("https://example.com".to_string())
        );
        assert_eq!(
            store.get_code("https://example.com").await.unwrap(),
            Some(code("abc12345"))
        );
    }

    #[tokio::test]
    async fn lookup_nonexistent() {
        let store = InMemoryStore::new();

        assert!(store.get_long_url(&code("nope0000")).await.unwrap().is_none());
        assert!(store.get_code("https://nope.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn exists_checks() {
        let store = InMemoryStore::new();

        assert!(!store.exists(&code("abc12345")).await.unwrap());

        store
            .save(&code("abc12345"), "https://example.com")
            .await
            .unwrap();

        assert!(store.exists(&code("abc12345")).await.unwrap());
    }

    #[tokio::test]
    async fn identical_resave_is_a_noop() {
        for policy in [SavePolicy::Permissive, SavePolicy::Strict] {
            let store = InMemoryStore::with_policy(policy);

            store
                .save(&code("abc12345"), "https://example.com")
                .await
                .unwrap();
            store
                .save(&code("abc12345"), "https://example.com")
                .await
                .unwrap();

            assert_eq!(store.len(), 1);
        }
    }

    #[tokio::test]
    async fn permissive_overwrite_keeps_directions_in_sync() {
        let store = InMemoryStore::new();

        store
            .save(&code("abc12345"), "https://old.com")
            .await
            .unwrap();
        store
            .save(&code("abc12345"), "https://new.com")
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_long_url(&code("abc12345")).await.unwrap(),
            Some("https://new.com".to_string())
        );
        assert!(store.get_code("https://old.com").await.unwrap().is_none());
        assert_eq!(
            store.get_code("https://new.com").await.unwrap(),
            Some(code("abc12345"))
        );
    }

    #[tokio::test]
    async fn permissive_overwrite_by_long_url() {
        let store = InMemoryStore::new();

        store
            .save(&code("first000"), "https://example.com")
            .await
            .unwrap();
        store
            .save(&code("second00"), "https://example.com")
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert!(!store.exists(&code("first000")).await.unwrap());
        assert_eq!(
            store.get_code("https://example.com").await.unwrap(),
            Some(code("second00"))
        );
    }

    #[tokio::test]
    async fn strict_rejects_code_conflict() {
        let store = InMemoryStore::with_policy(SavePolicy::Strict);

        store
            .save(&code("abc12345"), "https://example.com")
            .await
            .unwrap();

        let err = store
            .save(&code("abc12345"), "https://other.com")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::AlreadyExists {
                code: "abc12345".to_string(),
                long_url: "https://example.com".to_string(),
            }
        );
        assert!(store.get_code("https://other.com").await.unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn strict_rejects_long_url_conflict() {
        let store = InMemoryStore::with_policy(SavePolicy::Strict);

        store
            .save(&code("abc12345"), "https://example.com")
            .await
            .unwrap();

        let err = store
            .save(&code("zzz99999"), "https://example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::AlreadyExists { .. }));
        assert!(!store.exists(&code("zzz99999")).await.unwrap());
    }

    #[tokio::test]
    async fn mappings_snapshot() {
        let store = InMemoryStore::with_capacity(4);
        assert!(store.is_empty());

        store.save(&code("aaaaaaaa"), "https://a.com").await.unwrap();
        store.save(&code("bbbbbbbb"), "https://b.com").await.unwrap();

        let mut mappings = store.mappings();
        mappings.sort_by(|a, b| a.long_url.cmp(&b.long_url));

        assert_eq!(
            mappings,
            vec![
                Mapping {
                    code: code("aaaaaaaa"),
                    long_url: "https://a.com".to_string(),
                },
                Mapping {
                    code: code("bbbbbbbb"),
                    long_url: "https://b.com".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn concurrent_access() {
        let store = Arc::new(InMemoryStore::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            let handle = tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("code-{:03}", i));
                store
                    .save(&c, &format!("https://example{}.com", i))
                    .await
                    .unwrap();
            });
            handles.push(handle);
        }

        for i in 0..10u64 {
            let store = Arc::clone(&store);
            let handle = tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("code-{:03}", i));
                let _ = store.get_long_url(&c).await;
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len(), 10);
        for i in 0..10u64 {
            let c = ShortCode::new_unchecked(format!("code-{:03}", i));
            let result = store.get_long_url(&c).await.unwrap().unwrap();
            assert_eq!(result, format!("https://example{}.com", i));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn readers_never_observe_half_written_entries() {
        let store = Arc::new(InMemoryStore::new());
        let mut writers = vec![];

        for i in 0..200u64 {
            let store = Arc::clone(&store);
            writers.push(tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("w{:07}", i));
                store
                    .save(&c, &format!("https://example.com/{}", i))
                    .await
                    .unwrap();
            }));
        }

        let reader = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for _ in 0..50 {
                    for i in 0..200u64 {
                        let url = format!("https://example.com/{}", i);
                        if let Some(c) = store.get_code(&url).await.unwrap() {
                            let back = store.get_long_url(&c).await.unwrap();
                            assert_eq!(back.as_deref(), Some(url.as_str()));
                        }
                    }
                    tokio::task::yield_now().await;
                }
            })
        };

        for writer in writers {
            writer.await.unwrap();
        }
        reader.await.unwrap();

        assert_eq!(store.len(), 200);
    }
}
