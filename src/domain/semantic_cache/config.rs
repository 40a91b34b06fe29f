//! Semantic cache configuration

use serde::{Deserialize, Serialize};

use crate::domain::vector_store::SimilarityMetric;

/// Configuration for semantic caching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// A cached entry is a hit only when its similarity is strictly above this
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Maximum number of matches returned by a lookup
    #[serde(default = "default_hit_limit")]
    pub hit_limit: usize,

    #[serde(default)]
    pub metric: SimilarityMetric,

    /// Collection holding cached answers
    #[serde(default = "default_collection")]
    pub collection: String,
}

fn default_similarity_threshold() -> f32 {
    0.99
}

fn default_hit_limit() -> usize {
    1
}

fn default_collection() -> String {
    "cache".to_string()
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            hit_limit: default_hit_limit(),
            metric: SimilarityMetric::default(),
            collection: default_collection(),
        }
    }
}

impl SemanticCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_hit_limit(mut self, limit: usize) -> Self {
        self.hit_limit = limit;
        self
    }

    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }
}
