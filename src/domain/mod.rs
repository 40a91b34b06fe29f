//! Domain layer - Core business logic and entities

pub mod answer;
pub mod embedding;
pub mod error;
pub mod knowledge_base;
pub mod llm;
pub mod prompt;
pub mod semantic_cache;
pub mod vector_store;

pub use answer::{Answer, PipelineStage};
pub use embedding::{
    Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse,
    EmbeddingUsage,
};
pub use error::DomainError;
pub use knowledge_base::{Document, KnowledgeHit};
pub use llm::{
    CompletionProvider, FinishReason, LlmRequest, LlmRequestBuilder, LlmResponse, Message,
    MessageRole, Usage,
};
pub use prompt::{GroundedPrompt, DEFAULT_SYSTEM_INSTRUCTION};
pub use semantic_cache::{CacheEntry, CacheMatch, CacheUsage, SemanticCacheConfig};
pub use vector_store::{
    cosine_similarity, OrderBy, ScoreFilter, ScoredRecord, SimilarityExpr, SimilarityMetric,
    VectorQuery, VectorRecord, VectorStore,
};
