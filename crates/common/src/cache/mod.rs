//! Flat-file cache for remote lookups
//!
//! Provides:
//! - One file per looked-up entity in a single flat directory
//! - Read-through `get_or_fetch` used in front of every PubMed call
//! - Key builders for author searches and publication records
//!
//! Entries never expire. Existence check and write are not atomic: two
//! lookups of the same key may both fetch, and the last writer wins. Content
//! is identical per key, so the race is harmless.

use crate::errors::{AppError, Result};
use crate::metrics;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Flat-file cache client
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open a cache rooted at `dir`, creating the directory if missing
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| AppError::Cache {
            message: format!("Failed to create cache directory {}: {}", dir.display(), e),
        })?;
        Ok(Self { dir })
    }

    /// Cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Build the file path for a key
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> bool {
        tokio::fs::try_exists(self.path(key)).await.unwrap_or(false)
    }

    /// Get a value from cache
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(key = %key, "Cache hit");
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = %key, "Cache miss");
                Ok(None)
            }
            Err(e) => Err(AppError::Cache {
                message: format!("Failed to read '{}': {}", path.display(), e),
            }),
        }
    }

    /// Store a value
    pub async fn set(&self, key: &str, content: &str) -> Result<()> {
        let path = self.path(key);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| AppError::Cache {
                message: format!("Failed to write '{}': {}", path.display(), e),
            })?;

        debug!(key = %key, bytes = content.len(), "Cache set");
        Ok(())
    }

    /// Return the cached content for `key`, or run `fetch` and persist what it returns.
    ///
    /// `fetch` yields `None` when the remote answer is not worth keeping
    /// (nothing found); that outcome is passed through without touching disk.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Option<String>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<String>>>,
    {
        if let Some(cached) = self.get(key).await? {
            metrics::record_cache(true, keys::kind(key));
            return Ok(Some(cached));
        }
        metrics::record_cache(false, keys::kind(key));

        let fetched = fetch().await?;

        if let Some(ref content) = fetched {
            if let Err(e) = self.set(key, content).await {
                warn!(error = %e, "Failed to cache value, continuing without cache");
            }
        }

        Ok(fetched)
    }
}

/// Cache key builders
pub mod keys {
    /// Publication id list of an author: `{First}{Last}.xml`
    pub fn author_ids(first_name: &str, last_name: &str) -> String {
        format!("{}{}.xml", first_name, last_name)
    }

    /// MEDLINE record of a publication: `{pmid}.json`
    pub fn publication(pmid: &str) -> String {
        format!("{}.json", pmid)
    }

    /// Metric label for a key
    pub fn kind(key: &str) -> &'static str {
        if key.ends_with(".xml") {
            "author"
        } else {
            "publication"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_key_builders() {
        assert_eq!(keys::author_ids("Sanjana", "Srinivasan"), "SanjanaSrinivasan.xml");
        assert_eq!(keys::publication("34754938"), "34754938.json");
        assert_eq!(keys::kind("SanjanaSrinivasan.xml"), "author");
        assert_eq!(keys::kind("34754938.json"), "publication");
    }

    #[test]
    fn test_new_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("data");
        let cache = FileCache::new(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(cache.path("1.json"), dir.join("1.json"));
    }

    #[tokio::test]
    async fn test_get_or_fetch_persists_and_reuses() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileCache::new(tmp.path()).unwrap();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_fetch("1.json", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some("{\"FAU\": []}".to_string()))
                })
                .await
                .unwrap();
            assert_eq!(value.as_deref(), Some("{\"FAU\": []}"));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.exists("1.json").await);
    }

    #[tokio::test]
    async fn test_get_or_fetch_skips_empty_results() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileCache::new(tmp.path()).unwrap();

        let value = cache
            .get_or_fetch("NobodyHere.xml", || async { Ok(None) })
            .await
            .unwrap();

        assert!(value.is_none());
        assert!(!cache.exists("NobodyHere.xml").await);
    }

    #[tokio::test]
    async fn test_get_or_fetch_propagates_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileCache::new(tmp.path()).unwrap();

        let result = cache
            .get_or_fetch("2.json", || async {
                Err(AppError::BadRequest { query: "2".into() })
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest { .. })));
        assert!(!cache.exists("2.json").await);
    }

    #[test]
    fn test_blocking_get() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileCache::new(tmp.path()).unwrap();
        std::fs::write(tmp.path().join("3.json"), "{}").unwrap();

        let value = tokio_test::block_on(cache.get("3.json")).unwrap();
        assert_eq!(value.as_deref(), Some("{}"));
    }
}
