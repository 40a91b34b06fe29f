//! Semantic-cached retrieval-augmented assistant
//!
//! Answers questions about a document collection. Each answer is cached with
//! the embedding of its question, so near-identical questions are served from
//! the cache without a completion call.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{CompletionProvider, EmbeddingProvider, VectorStore};
use infrastructure::{
    embedding::EmbeddingProviderFactory,
    llm::CompletionProviderFactory,
    services::{
        CompletionOrchestrator, DocumentSeeder, EmbeddingClient, HistoryRetriever,
        KnowledgeRetriever, OrchestratorConfig, SemanticCacheService,
    },
    vector_store::VectorStoreFactory,
};
use tracing::info;

/// Create the application state with the configured providers and store
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let embedding = EmbeddingProviderFactory::create(&config.embedding)?;
    let completion = CompletionProviderFactory::create(&config.completion)?;
    let store = VectorStoreFactory::create(&config.store).await?;

    info!(
        embedding_provider = embedding.provider_name(),
        completion_provider = completion.provider_name(),
        store = store.store_type(),
        "Providers initialized"
    );

    Ok(build_app_state(config, embedding, completion, store))
}

/// Wire the pipeline services around already constructed collaborators
pub fn build_app_state(
    config: &AppConfig,
    embedding: Arc<dyn EmbeddingProvider>,
    completion: Arc<dyn CompletionProvider>,
    store: Arc<dyn VectorStore>,
) -> AppState {
    let dimensions = config
        .embedding
        .dimensions
        .unwrap_or(config.store.dimensions as usize);
    let embedding_client = Arc::new(
        EmbeddingClient::from_config(embedding, &config.embedding).with_dimensions(dimensions),
    );

    let cache = Arc::new(SemanticCacheService::with_config(
        store.clone(),
        config.cache.clone(),
    ));
    let knowledge = Arc::new(
        KnowledgeRetriever::new(store.clone(), &config.retrieval.documents_collection)
            .with_metric(config.retrieval.metric),
    );
    let history = Arc::new(HistoryRetriever::new(
        store.clone(),
        &config.cache.collection,
    ));

    let orchestrator = CompletionOrchestrator::new(
        embedding_client.clone(),
        cache,
        knowledge,
        history,
        completion,
    )
    .with_config(OrchestratorConfig {
        system_instruction: config.assistant.system_instruction.clone(),
        temperature: config.completion.temperature,
        knowledge_top_k: config.retrieval.knowledge_top_k,
        history_size: config.retrieval.history_size,
        completion_retry: config.completion.retry.clone(),
    });

    let seeder = DocumentSeeder::new(
        store.clone(),
        embedding_client,
        &config.retrieval.documents_collection,
    );

    AppState {
        orchestrator: Arc::new(orchestrator),
        seeder: Arc::new(seeder),
        store,
    }
}
