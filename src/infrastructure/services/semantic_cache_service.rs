//! Semantic response cache over a vector store collection

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::domain::semantic_cache::{CacheEntry, CacheMatch, CacheUsage, SemanticCacheConfig};
use crate::domain::vector_store::{ScoreFilter, VectorQuery, VectorStore};
use crate::domain::DomainError;

/// Hit-tests query vectors against previously answered questions and
/// records new answers
pub struct SemanticCacheService {
    store: Arc<dyn VectorStore>,
    config: SemanticCacheConfig,
}

impl SemanticCacheService {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self::with_config(store, SemanticCacheConfig::default())
    }

    pub fn with_config(store: Arc<dyn VectorStore>, config: SemanticCacheConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    /// Entries whose similarity is strictly above `threshold`, most similar
    /// first with ties going to the most recent, at most `limit`
    pub async fn lookup(
        &self,
        vector: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<CacheMatch>, DomainError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let query = VectorQuery::new(&self.config.collection)
            .similar_to(vector.to_vec(), self.config.metric)
            .with_filter(ScoreFilter::above(threshold))
            .top_k(limit);

        let records = self
            .store
            .query(query)
            .await
            .map_err(|e| DomainError::retrieval(format!("Cache lookup failed: {}", e)))?;

        let mut matches = records
            .into_iter()
            .filter(|scored| scored.similarity > threshold)
            .map(CacheMatch::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.entry.written_at.cmp(&a.entry.written_at))
        });
        matches.truncate(limit);

        debug!(
            threshold = threshold,
            matches = matches.len(),
            best = matches.first().map(|m| m.similarity),
            "Cache lookup completed"
        );

        Ok(matches)
    }

    /// Lookup with the configured threshold and limit
    pub async fn probe(&self, vector: &[f32]) -> Result<Option<CacheMatch>, DomainError> {
        let matches = self
            .lookup(vector, self.config.similarity_threshold, self.config.hit_limit)
            .await?;

        Ok(matches.into_iter().next())
    }

    /// Persist a new answer; failures are reported as `CacheWrite`
    pub async fn write(
        &self,
        prompt: &str,
        vector: Vec<f32>,
        completion: &str,
        usage: CacheUsage,
        model: &str,
    ) -> Result<CacheEntry, DomainError> {
        let record = CacheEntry::new_record(prompt, completion, vector, usage, model);

        let stored = self
            .store
            .insert(&self.config.collection, record)
            .await
            .map_err(|e| DomainError::cache_write(e.to_string()))?;

        CacheEntry::try_from(stored).map_err(|e| DomainError::cache_write(e.to_string()))
    }
}

impl fmt::Debug for SemanticCacheService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SemanticCacheService")
            .field("store", &self.store.store_type())
            .field("config", &self.config)
            .finish()
    }
}
