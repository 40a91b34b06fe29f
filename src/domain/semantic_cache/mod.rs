//! Semantic cache domain models
//!
//! Answered questions are cached with the embedding of the question, so a
//! later query that is close enough in vector space reuses the answer.

mod config;
mod entry;

pub use config::SemanticCacheConfig;
pub use entry::{CacheEntry, CacheMatch, CacheUsage};
