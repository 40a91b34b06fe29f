//! Recent conversation history from the response cache

use std::fmt;
use std::sync::Arc;

use crate::domain::semantic_cache::CacheEntry;
use crate::domain::vector_store::{OrderBy, VectorQuery, VectorStore};
use crate::domain::DomainError;

pub const DEFAULT_HISTORY_SIZE: usize = 3;

/// Reads the most recently written cache entries
pub struct HistoryRetriever {
    store: Arc<dyn VectorStore>,
    collection: String,
}

impl HistoryRetriever {
    pub fn new(store: Arc<dyn VectorStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Up to `n` entries, most recent first
    pub async fn recent(&self, n: usize) -> Result<Vec<CacheEntry>, DomainError> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let query = VectorQuery::new(&self.collection)
            .order_by(OrderBy::WrittenAtDesc)
            .top_k(n);

        let records = self
            .store
            .query(query)
            .await
            .map_err(|e| DomainError::retrieval(format!("History lookup failed: {}", e)))?;

        records
            .into_iter()
            .map(|scored| CacheEntry::try_from(scored.record))
            .collect()
    }
}

impl fmt::Debug for HistoryRetriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryRetriever")
            .field("store", &self.store.store_type())
            .field("collection", &self.collection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::semantic_cache::CacheUsage;
    use crate::domain::vector_store::MockVectorStore;
    use crate::infrastructure::vector_store::InMemoryVectorStore;

    #[tokio::test]
    async fn test_recent_returns_newest_first() {
        let store = Arc::new(InMemoryVectorStore::new());
        for i in 1..=5 {
            let record = CacheEntry::new_record(
                &format!("q{}", i),
                &format!("a{}", i),
                vec![1.0],
                CacheUsage::default(),
                "m",
            );
            store.insert("cache", record).await.unwrap();
        }

        let retriever = HistoryRetriever::new(store, "cache");
        let entries = retriever.recent(3).await.unwrap();

        let prompts: Vec<&str> = entries.iter().map(|e| e.prompt.as_str()).collect();
        assert_eq!(prompts, vec!["q5", "q4", "q3"]);
    }

    #[tokio::test]
    async fn test_recent_with_fewer_entries() {
        let store = Arc::new(InMemoryVectorStore::new());
        store
            .insert(
                "cache",
                CacheEntry::new_record("only", "one", vec![1.0], CacheUsage::default(), "m"),
            )
            .await
            .unwrap();

        let retriever = HistoryRetriever::new(store, "cache");

        assert_eq!(retriever.recent(3).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_retrieval_error() {
        let mut store = MockVectorStore::new();
        store
            .expect_query()
            .returning(|_| Err(DomainError::storage("timeout")));

        let retriever = HistoryRetriever::new(Arc::new(store), "cache");
        let error = retriever.recent(3).await.unwrap_err();

        assert!(matches!(error, DomainError::Retrieval { .. }));
    }
}
