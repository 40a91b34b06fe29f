//! Top-k document retrieval for grounding

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::domain::knowledge_base::KnowledgeHit;
use crate::domain::vector_store::{SimilarityMetric, VectorQuery, VectorStore};
use crate::domain::DomainError;

pub const DEFAULT_KNOWLEDGE_TOP_K: usize = 5;

/// Finds the documents closest to a query vector
///
/// Results are ordered by ascending distance, scan every partition and have
/// no similarity floor.
pub struct KnowledgeRetriever {
    store: Arc<dyn VectorStore>,
    collection: String,
    metric: SimilarityMetric,
}

impl KnowledgeRetriever {
    pub fn new(store: Arc<dyn VectorStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            metric: SimilarityMetric::default(),
        }
    }

    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    pub async fn search(&self, vector: &[f32], k: usize) -> Result<Vec<KnowledgeHit>, DomainError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query = VectorQuery::new(&self.collection)
            .similar_to(vector.to_vec(), self.metric)
            .top_k(k);

        let records = self
            .store
            .query(query)
            .await
            .map_err(|e| DomainError::retrieval(format!("Knowledge search failed: {}", e)))?;

        let hits = records
            .into_iter()
            .map(KnowledgeHit::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            collection = %self.collection,
            hits = hits.len(),
            "Knowledge retrieval completed"
        );

        Ok(hits)
    }
}

impl fmt::Debug for KnowledgeRetriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeRetriever")
            .field("store", &self.store.store_type())
            .field("collection", &self.collection)
            .field("metric", &self.metric)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge_base::Document;
    use crate::domain::vector_store::{MockVectorStore, ScoredRecord};
    use crate::infrastructure::vector_store::InMemoryVectorStore;

    async fn seeded_store() -> Arc<InMemoryVectorStore> {
        let store = Arc::new(InMemoryVectorStore::new());
        let docs = [
            ("1", "Azure Blob Storage", vec![1.0, 0.0, 0.0]),
            ("2", "Azure Files", vec![0.9, 0.1, 0.0]),
            ("3", "Azure Functions", vec![0.0, 1.0, 0.0]),
            ("4", "Azure Cosmos DB", vec![0.0, 0.0, 1.0]),
            ("5", "Azure Disk Storage", vec![0.7, 0.3, 0.0]),
            ("6", "Azure Queue Storage", vec![0.5, 0.5, 0.0]),
        ];

        for (id, title, vector) in docs {
            let doc = Document::new(id, title, format!("{} content", title), "Storage")
                .with_vector(vector);
            store.insert("documents", doc.into_record()).await.unwrap();
        }

        store
    }

    #[tokio::test]
    async fn test_search_returns_top_k_by_ascending_distance() {
        let retriever = KnowledgeRetriever::new(seeded_store().await, "documents");

        let hits = retriever.search(&[1.0, 0.0, 0.0], 5).await.unwrap();

        assert_eq!(hits.len(), 5);
        assert_eq!(hits[0].title, "Azure Blob Storage");
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[tokio::test]
    async fn test_search_with_no_documents() {
        let store = Arc::new(InMemoryVectorStore::new());
        let retriever = KnowledgeRetriever::new(store, "documents");

        assert!(retriever.search(&[1.0], 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_with_zero_k() {
        let retriever = KnowledgeRetriever::new(seeded_store().await, "documents");

        assert!(retriever.search(&[1.0, 0.0, 0.0], 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_retrieval_error() {
        let mut store = MockVectorStore::new();
        store
            .expect_query()
            .returning(|_| Err(DomainError::storage("connection refused")));
        store.expect_store_type().return_const("mock");

        let retriever = KnowledgeRetriever::new(Arc::new(store), "documents");
        let error = retriever.search(&[1.0], 5).await.unwrap_err();

        assert!(matches!(error, DomainError::Retrieval { .. }));
    }

    #[tokio::test]
    async fn test_query_is_cross_partition_without_floor() {
        let mut store = MockVectorStore::new();
        store
            .expect_query()
            .withf(|q| {
                q.collection == "documents" && q.cross_partition && q.filter.is_none() && q.top_k == 5
            })
            .times(1)
            .returning(|_| Ok(Vec::<ScoredRecord>::new()));

        let retriever = KnowledgeRetriever::new(Arc::new(store), "documents");

        assert!(retriever.search(&[1.0], 5).await.unwrap().is_empty());
    }
}
