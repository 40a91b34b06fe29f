//! Declarative query over a vector collection

use serde::{Deserialize, Serialize};

use super::SimilarityMetric;
use crate::domain::DomainError;

/// Score the collection against a vector with a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityExpr {
    pub vector: Vec<f32>,
    pub metric: SimilarityMetric,
}

/// Keep only records scoring strictly above `min_similarity`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreFilter {
    pub min_similarity: f32,
}

impl ScoreFilter {
    pub fn above(min_similarity: f32) -> Self {
        Self { min_similarity }
    }

    pub fn accepts(&self, similarity: f32) -> bool {
        similarity > self.min_similarity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    /// Most similar first, ties broken by most recent `written_at`
    #[default]
    Similarity,
    /// Most recent `written_at` first
    WrittenAtDesc,
}

/// Query over one collection
///
/// Stores return at most `top_k` records. A query without `cross_partition`
/// is restricted to `partition_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorQuery {
    pub collection: String,
    pub similarity: Option<SimilarityExpr>,
    pub filter: Option<ScoreFilter>,
    pub order_by: OrderBy,
    pub top_k: usize,
    pub cross_partition: bool,
    pub partition_key: Option<String>,
}

impl VectorQuery {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            similarity: None,
            filter: None,
            order_by: OrderBy::default(),
            top_k: 10,
            cross_partition: true,
            partition_key: None,
        }
    }

    pub fn similar_to(mut self, vector: Vec<f32>, metric: SimilarityMetric) -> Self {
        self.similarity = Some(SimilarityExpr { vector, metric });
        self.order_by = OrderBy::Similarity;
        self
    }

    pub fn with_filter(mut self, filter: ScoreFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn in_partition(mut self, partition_key: impl Into<String>) -> Self {
        self.partition_key = Some(partition_key.into());
        self.cross_partition = false;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.collection.trim().is_empty() {
            return Err(DomainError::validation("Query collection cannot be empty"));
        }

        if let Some(ref expr) = self.similarity {
            if expr.vector.is_empty() {
                return Err(DomainError::validation("Query vector cannot be empty"));
            }
        }

        if self.filter.is_some() && self.similarity.is_none() {
            return Err(DomainError::validation(
                "A score filter requires a similarity expression",
            ));
        }

        if self.order_by == OrderBy::Similarity && self.similarity.is_none() {
            return Err(DomainError::validation(
                "Ordering by similarity requires a similarity expression",
            ));
        }

        if !self.cross_partition && self.partition_key.is_none() {
            return Err(DomainError::validation(
                "A single-partition query requires a partition key",
            ));
        }

        Ok(())
    }
}
