//! Vector store capability

use async_trait::async_trait;

use super::{ScoredRecord, VectorQuery, VectorRecord};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Storage backend holding vector collections
///
/// Similarity-ordered results are sorted by similarity descending and then by
/// `written_at` descending. Inserts are append-only.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Run a query against one collection
    async fn query(&self, query: VectorQuery) -> Result<Vec<ScoredRecord>, DomainError>;

    /// Insert a record, returning it with `written_at` assigned
    async fn insert(
        &self,
        collection: &str,
        record: VectorRecord,
    ) -> Result<VectorRecord, DomainError>;

    /// Check if the store is reachable
    async fn health_check(&self) -> Result<bool, DomainError>;

    /// Get the store type name
    fn store_type(&self) -> &'static str;
}
