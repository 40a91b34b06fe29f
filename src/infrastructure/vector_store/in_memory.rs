//! In-memory vector store implementation

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::domain::vector_store::{
    OrderBy, ScoredRecord, VectorQuery, VectorRecord, VectorStore,
};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Collections {
    records: HashMap<String, Vec<VectorRecord>>,
    last_written_at: Option<DateTime<Utc>>,
}

/// Vector store using a brute-force scan
///
/// Suitable for development, tests and small document sets.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    inner: RwLock<Collections>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self, collection: &str) -> usize {
        self.inner
            .read()
            .await
            .records
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }

    fn score(query: &VectorQuery, record: &VectorRecord) -> Option<ScoredRecord> {
        let Some(ref expr) = query.similarity else {
            return Some(ScoredRecord::unscored(record.clone()));
        };

        if record.vector.len() != expr.vector.len() {
            return None;
        }

        let similarity = expr.metric.similarity(&expr.vector, &record.vector);
        let distance = expr.metric.distance(&expr.vector, &record.vector);

        Some(ScoredRecord::new(record.clone(), similarity, distance))
    }
}

/// Most recent first; unstamped records sort last
fn by_recency(a: &ScoredRecord, b: &ScoredRecord) -> Ordering {
    b.record.written_at.cmp(&a.record.written_at)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn query(&self, query: VectorQuery) -> Result<Vec<ScoredRecord>, DomainError> {
        query.validate()?;

        let inner = self.inner.read().await;
        let Some(records) = inner.records.get(&query.collection) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<ScoredRecord> = records
            .iter()
            .filter(|record| {
                query.cross_partition || record.partition_key == query.partition_key
            })
            .filter_map(|record| Self::score(&query, record))
            .filter(|scored| {
                query
                    .filter
                    .is_none_or(|filter| filter.accepts(scored.similarity))
            })
            .collect();

        match query.order_by {
            OrderBy::Similarity => results.sort_by(|a, b| {
                b.similarity
                    .partial_cmp(&a.similarity)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| by_recency(a, b))
            }),
            OrderBy::WrittenAtDesc => results.sort_by(by_recency),
        }

        results.truncate(query.top_k);

        Ok(results)
    }

    async fn insert(
        &self,
        collection: &str,
        mut record: VectorRecord,
    ) -> Result<VectorRecord, DomainError> {
        if record.vector.is_empty() {
            return Err(DomainError::validation("Record vector cannot be empty"));
        }

        let mut inner = self.inner.write().await;

        let exists = inner
            .records
            .get(collection)
            .is_some_and(|records| records.iter().any(|r| r.id == record.id));
        if exists {
            return Err(DomainError::storage(format!(
                "Record '{}' already exists in collection '{}'",
                record.id, collection
            )));
        }

        let now = Utc::now();
        let written_at = match inner.last_written_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        inner.last_written_at = Some(written_at);
        record.written_at = Some(written_at);

        inner
            .records
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());

        Ok(record)
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }

    fn store_type(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vector_store::{ScoreFilter, SimilarityMetric};

    fn record(id: &str, vector: Vec<f32>) -> VectorRecord {
        VectorRecord::new(id, vector).with_field("content", id)
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_written_at() {
        let store = InMemoryVectorStore::new();

        let first = store.insert("cache", record("a", vec![1.0])).await.unwrap();
        let second = store.insert("cache", record("b", vec![1.0])).await.unwrap();

        assert!(second.written_at.unwrap() > first.written_at.unwrap());
        assert_eq!(store.len("cache").await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let store = InMemoryVectorStore::new();
        store.insert("docs", record("a", vec![1.0])).await.unwrap();

        let result = store.insert("docs", record("a", vec![0.5])).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_similarity_query_orders_and_limits() {
        let store = InMemoryVectorStore::new();
        store.insert("docs", record("far", vec![0.0, 1.0])).await.unwrap();
        store.insert("docs", record("near", vec![1.0, 0.1])).await.unwrap();
        store.insert("docs", record("mid", vec![1.0, 1.0])).await.unwrap();

        let results = store
            .query(
                VectorQuery::new("docs")
                    .similar_to(vec![1.0, 0.0], SimilarityMetric::Cosine)
                    .top_k(2),
            )
            .await
            .unwrap();

        let ids: Vec<&str> = results.iter().map(|r| r.record.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
        assert!(results[0].distance < results[1].distance);
    }

    #[tokio::test]
    async fn test_score_filter_is_strict() {
        let store = InMemoryVectorStore::new();
        store.insert("cache", record("same", vec![1.0, 0.0])).await.unwrap();

        let query = |min: f32| {
            VectorQuery::new("cache")
                .similar_to(vec![1.0, 0.0], SimilarityMetric::Cosine)
                .with_filter(ScoreFilter::above(min))
                .top_k(1)
        };

        assert_eq!(store.query(query(0.99)).await.unwrap().len(), 1);
        assert!(store.query(query(1.0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_similarity_ties_prefer_recent() {
        let store = InMemoryVectorStore::new();
        store.insert("cache", record("older", vec![1.0, 0.0])).await.unwrap();
        store.insert("cache", record("newer", vec![2.0, 0.0])).await.unwrap();

        let results = store
            .query(
                VectorQuery::new("cache")
                    .similar_to(vec![1.0, 0.0], SimilarityMetric::Cosine)
                    .top_k(1),
            )
            .await
            .unwrap();

        assert_eq!(results[0].record.id, "newer");
    }

    #[tokio::test]
    async fn test_recency_query() {
        let store = InMemoryVectorStore::new();
        for id in ["1", "2", "3", "4"] {
            store.insert("cache", record(id, vec![1.0])).await.unwrap();
        }

        let results = store
            .query(
                VectorQuery::new("cache")
                    .order_by(OrderBy::WrittenAtDesc)
                    .top_k(3),
            )
            .await
            .unwrap();

        let ids: Vec<&str> = results.iter().map(|r| r.record.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "3", "2"]);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = InMemoryVectorStore::new();
        store.insert("docs", record("doc", vec![1.0])).await.unwrap();

        let results = store
            .query(VectorQuery::new("cache").order_by(OrderBy::WrittenAtDesc))
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_partition_scoped_query() {
        let store = InMemoryVectorStore::new();
        store
            .insert("docs", record("a", vec![1.0]).with_partition_key("compute"))
            .await
            .unwrap();
        store
            .insert("docs", record("b", vec![1.0]).with_partition_key("storage"))
            .await
            .unwrap();

        let results = store
            .query(
                VectorQuery::new("docs")
                    .order_by(OrderBy::WrittenAtDesc)
                    .in_partition("storage"),
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.id, "b");
    }

    #[tokio::test]
    async fn test_mismatched_dimensions_are_skipped() {
        let store = InMemoryVectorStore::new();
        store.insert("docs", record("short", vec![1.0])).await.unwrap();

        let results = store
            .query(VectorQuery::new("docs").similar_to(vec![1.0, 0.0], SimilarityMetric::Cosine))
            .await
            .unwrap();

        assert!(results.is_empty());
    }
}
