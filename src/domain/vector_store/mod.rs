//! Vector store domain: records, similarity queries and the store capability
//!
//! Both the knowledge base and the response cache live in a vector store, as
//! separate collections sharing one embedding space.

mod metric;
mod query;
mod record;
mod store;

pub use metric::{cosine_similarity, dot_product, euclidean_distance, SimilarityMetric};
pub use query::{OrderBy, ScoreFilter, SimilarityExpr, VectorQuery};
pub use record::{ScoredRecord, VectorRecord};
pub use store::VectorStore;

#[cfg(test)]
pub use store::MockVectorStore;
