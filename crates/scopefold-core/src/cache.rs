//! Content-fingerprint result cache
//!
//! Leveled tokens are cached by a SHA-256 fingerprint of the document text.
//! Each fingerprint owns a [`OnceCell`], so concurrent requests for the same
//! text wait on the first caller's computation instead of repeating it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::{OnceCell, RwLock};
use tracing::debug;

use crate::error::Result;
use crate::token::Token;

/// Leveled tokens shared between cache readers
pub type SharedTokens = Arc<Vec<Token>>;

/// Compute the fingerprint of a document (`sha256:<hex>`)
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("sha256:{hex}")
}

/// Cache of leveled documents keyed by content fingerprint
///
/// The cache does not know which rules or lexer produced an entry; use one
/// cache per configuration.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: RwLock<HashMap<String, Arc<OnceCell<SharedTokens>>>>,
}

impl DocumentCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    async fn cell(&self, key: &str) -> Arc<OnceCell<SharedTokens>> {
        if let Some(cell) = self.entries.read().await.get(key) {
            return Arc::clone(cell);
        }
        let mut entries = self.entries.write().await;
        Arc::clone(entries.entry(key.to_string()).or_default())
    }

    /// Return the cached tokens for `text`, computing them on a miss
    ///
    /// A failed computation is not cached; the next request retries.
    pub async fn get_or_try_init<F, Fut>(&self, text: &str, compute: F) -> Result<SharedTokens>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Token>>>,
    {
        let key = fingerprint(text);
        let cell = self.cell(&key).await;
        if let Some(tokens) = cell.get() {
            debug!(fingerprint = %key, "token cache hit");
            return Ok(Arc::clone(tokens));
        }

        let result = cell
            .get_or_try_init(|| async {
                debug!(fingerprint = %key, "token cache miss");
                compute().await.map(Arc::new)
            })
            .await
            .map(Arc::clone);
        if result.is_err() {
            self.discard_failed(&key, &cell).await;
        }
        result
    }

    /// Drop an empty cell left by a failed computation
    ///
    /// The cell stays if another request is still waiting on it.
    async fn discard_failed(&self, key: &str, cell: &Arc<OnceCell<SharedTokens>>) {
        let mut entries = self.entries.write().await;
        let unused = entries.get(key).is_some_and(|current| {
            Arc::ptr_eq(current, cell) && !current.initialized() && Arc::strong_count(cell) == 2
        });
        if unused {
            entries.remove(key);
        }
    }

    /// Number of fingerprints with an entry, cached or not yet computed
    #[cfg(test)]
    async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Cached tokens for `text`, if present
    pub async fn get(&self, text: &str) -> Option<SharedTokens> {
        let entries = self.entries.read().await;
        entries.get(&fingerprint(text))?.get().cloned()
    }

    /// Drop the entry for `text`; returns whether it held tokens
    pub async fn invalidate(&self, text: &str) -> bool {
        let mut entries = self.entries.write().await;
        entries
            .remove(&fingerprint(text))
            .is_some_and(|cell| cell.initialized())
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of documents with cached tokens
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }

    /// Whether no document has cached tokens
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LevelError;
    use crate::token::RawToken;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tokens_for(text: &str) -> Vec<Token> {
        vec![Token::from_raw(
            RawToken::new(0, text.len(), ["source.x"]),
            0,
            text,
        )]
    }

    #[test]
    fn test_fingerprint_format() {
        let hash = fingerprint("if x\nend");
        assert!(hash.starts_with("sha256:"));
        assert_eq!(hash.len(), "sha256:".len() + 64);
        assert_eq!(hash, fingerprint("if x\nend"));
        assert_ne!(hash, fingerprint("if x\nend\n"));
    }

    #[test]
    fn test_fingerprint_known_value() {
        assert_eq!(
            fingerprint(""),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[tokio::test]
    async fn test_hit_reuses_result() {
        let cache = DocumentCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let tokens = cache
                .get_or_try_init("x", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(tokens_for("x"))
                })
                .await
                .unwrap();
            assert_eq!(tokens[0].text, "x");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    /// Concurrent requests for one document converge on a single computation
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_converge() {
        let cache = Arc::new(DocumentCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_try_init("shared document", || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            for _ in 0..10 {
                                tokio::task::yield_now().await;
                            }
                            Ok(tokens_for("shared document"))
                        })
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|tokens| Arc::ptr_eq(tokens, &results[0])));
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = DocumentCache::new();

        let err = cache
            .get_or_try_init("x", || async { Err(LevelError::Task("cancelled".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, LevelError::Task(_)));
        assert!(cache.get("x").await.is_none());
        assert!(cache.is_empty().await);
        assert_eq!(cache.entry_count().await, 0);

        let tokens = cache
            .get_or_try_init("x", || async { Ok(tokens_for("x")) })
            .await
            .unwrap();
        assert_eq!(tokens.len(), 1);
    }

    /// Failing documents do not accumulate empty entries
    #[tokio::test]
    async fn test_failures_leave_no_entries() {
        let cache = DocumentCache::new();

        for text in ["a", "b", "c"] {
            let result = cache
                .get_or_try_init(text, || async { Err(LevelError::Task("lexer gone".into())) })
                .await;
            assert!(result.is_err());
        }
        assert_eq!(cache.entry_count().await, 0);

        cache
            .get_or_try_init("a", || async { Ok(tokens_for("a")) })
            .await
            .unwrap();
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = DocumentCache::new();
        for text in ["a", "b"] {
            cache
                .get_or_try_init(text, || async move { Ok(tokens_for(text)) })
                .await
                .unwrap();
        }
        assert_eq!(cache.len().await, 2);

        assert!(cache.invalidate("a").await);
        assert!(!cache.invalidate("a").await);
        assert!(cache.get("a").await.is_none());
        assert!(cache.get("b").await.is_some());

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
