//! Infrastructure services

mod completion_orchestrator;
mod document_seeder;
mod embedding_client;
mod history_retriever;
mod knowledge_retriever;
mod semantic_cache_service;

pub use completion_orchestrator::{CompletionOrchestrator, OrchestratorConfig};
pub use document_seeder::{DocumentSeeder, SeedReport};
pub use embedding_client::EmbeddingClient;
pub use history_retriever::{HistoryRetriever, DEFAULT_HISTORY_SIZE};
pub use knowledge_retriever::{KnowledgeRetriever, DEFAULT_KNOWLEDGE_TOP_K};
pub use semantic_cache_service::SemanticCacheService;
