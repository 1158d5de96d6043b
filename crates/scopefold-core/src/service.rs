//! Async token service
//!
//! [`TokenService`] owns one rule configuration, one lexer and a
//! [`DocumentCache`]. Leveling runs on the blocking thread pool; distinct
//! documents are leveled concurrently, identical documents once.

use std::sync::Arc;

use crate::cache::{DocumentCache, SharedTokens};
use crate::config::Classifiers;
use crate::error::{LevelError, Result};
use crate::leveling::LevelingEngine;
use crate::lexer::LineTokenizer;

/// Cached, concurrent access to leveled documents
#[derive(Debug)]
pub struct TokenService<L> {
    classifiers: Arc<Classifiers>,
    lexer: Arc<L>,
    cache: DocumentCache,
}

impl<L> TokenService<L>
where
    L: LineTokenizer + Send + Sync + 'static,
{
    /// Create a service with an empty cache
    pub fn new(classifiers: Arc<Classifiers>, lexer: Arc<L>) -> Self {
        Self {
            classifiers,
            lexer,
            cache: DocumentCache::new(),
        }
    }

    /// Leveled tokens for a document, from the cache when possible
    pub async fn tokens(&self, text: &str) -> Result<SharedTokens> {
        let classifiers = Arc::clone(&self.classifiers);
        let lexer = Arc::clone(&self.lexer);
        let owned = text.to_string();

        self.cache
            .get_or_try_init(text, || async move {
                tokio::task::spawn_blocking(move || {
                    LevelingEngine::new(&classifiers, lexer.as_ref()).level_document(&owned)
                })
                .await
                .map_err(|error| LevelError::Task(error.to_string()))?
            })
            .await
    }

    /// The compiled classifiers
    pub fn classifiers(&self) -> &Classifiers {
        &self.classifiers
    }

    /// The document cache
    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompileMode, Rules};
    use crate::lexer::PatternLexer;

    fn service() -> TokenService<PatternLexer> {
        let rules = Rules::from_toml_str(
            "[indentation]\n\"keyword.control.end\" = -1\n\"keyword.control\" = 1\n",
        )
        .unwrap();
        let classifiers = Classifiers::compile(&rules, CompileMode::Strict).unwrap();
        let lexer = PatternLexer::from_toml_str(
            r#"
scope_name = "source.x"

[[rule]]
pattern = "\\bend\\b"
scopes = ["keyword.control.end.x"]

[[rule]]
pattern = "\\bif\\b"
scopes = ["keyword.control.if.x"]
"#,
        )
        .unwrap();
        TokenService::new(Arc::new(classifiers), Arc::new(lexer))
    }

    #[tokio::test]
    async fn test_tokens_are_leveled_and_cached() {
        let service = service();

        let first = service.tokens("if\n  body\nend").await.unwrap();
        let levels: Vec<i32> = first.iter().map(|token| token.level).collect();
        assert_eq!(levels, vec![0, 1, 0]);

        let second = service.tokens("if\n  body\nend").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_documents_are_separate_entries() {
        let service = service();
        let a = service.tokens("if\nend").await.unwrap();
        let b = service.tokens("end").await.unwrap();

        assert_ne!(a, b);
        assert_eq!(service.cache().len().await, 2);
        assert!(service.classifiers().continuation.is_never());
    }
}
