use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::prompt::DEFAULT_SYSTEM_INSTRUCTION;
use crate::domain::{SemanticCacheConfig, SimilarityMetric};
use crate::infrastructure::embedding::EmbeddingProviderConfig;
use crate::infrastructure::llm::CompletionProviderConfig;
use crate::infrastructure::logging::LoggingConfig;
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::services::{DEFAULT_HISTORY_SIZE, DEFAULT_KNOWLEDGE_TOP_K};
use crate::infrastructure::vector_store::VectorStoreConfig;

/// Application configuration
///
/// Loaded from `config/default`, `config/local` and `APP__SECTION__KEY`
/// environment variables, in that order.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub embedding: EmbeddingProviderConfig,
    #[serde(default)]
    pub completion: CompletionProviderConfig,
    #[serde(default)]
    pub store: VectorStoreConfig,
    #[serde(default)]
    pub cache: SemanticCacheConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Knowledge and history recall
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_documents_collection")]
    pub documents_collection: String,
    #[serde(default = "default_knowledge_top_k")]
    pub knowledge_top_k: usize,
    #[serde(default = "default_history_size")]
    pub history_size: usize,
    #[serde(default)]
    pub metric: SimilarityMetric,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
}

/// Documents loaded into the knowledge collection when the server starts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_documents_collection() -> String {
    "documents".to_string()
}

fn default_knowledge_top_k() -> usize {
    DEFAULT_KNOWLEDGE_TOP_K
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

fn default_system_instruction() -> String {
    DEFAULT_SYSTEM_INSTRUCTION.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            documents_collection: default_documents_collection(),
            knowledge_top_k: default_knowledge_top_k(),
            history_size: default_history_size(),
            metric: SimilarityMetric::default(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            system_instruction: default_system_instruction(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_fallbacks(|key| std::env::var(key).ok());

        Ok(app_config)
    }

    /// Fill provider settings left empty or at their built-in default from the
    /// `AZURE_OPENAI_*` variables
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("AZURE_OPENAI_KEY") {
            fill(&mut self.completion.api_key, &key);
            fill(&mut self.embedding.api_key, &key);
        }

        if let Some(endpoint) = lookup("AZURE_OPENAI_ENDPOINT") {
            fill(&mut self.completion.endpoint, &endpoint);
            fill(&mut self.embedding.endpoint, &endpoint);
        }

        let completion_defaults = CompletionProviderConfig::default();
        let embedding_defaults = EmbeddingProviderConfig::default();

        if let Some(version) = lookup("AZURE_OPENAI_VERSION") {
            replace_default(
                &mut self.completion.api_version,
                &completion_defaults.api_version,
                &version,
            );
            replace_default(
                &mut self.embedding.api_version,
                &embedding_defaults.api_version,
                &version,
            );
        }

        if let Some(deployment) = lookup("AZURE_OPENAI_COMPLETIONS_DEPLOYMENT") {
            replace_default(
                &mut self.completion.deployment,
                &completion_defaults.deployment,
                &deployment,
            );
        }

        if let Some(deployment) = lookup("AZURE_OPENAI_EMBEDDINGS_DEPLOYMENT") {
            replace_default(
                &mut self.embedding.deployment,
                &embedding_defaults.deployment,
                &deployment,
            );
        }
    }
}

fn fill(target: &mut String, value: &str) {
    if target.is_empty() {
        *target = value.to_string();
    }
}

/// Settings with a built-in default only yield when still at that default
fn replace_default(target: &mut String, default: &str, value: &str) {
    if target.is_empty() || target == default {
        *target = value.to_string();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.similarity_threshold, 0.99);
        assert_eq!(config.cache.hit_limit, 1);
        assert_eq!(config.cache.collection, "cache");
        assert_eq!(config.retrieval.documents_collection, "documents");
        assert_eq!(config.retrieval.knowledge_top_k, 5);
        assert_eq!(config.retrieval.history_size, 3);
        assert_eq!(config.embedding.min_interval_ms, 500);
        assert_eq!(config.completion.temperature, 0.0);
        assert!(config.seed.path.is_none());
    }

    #[test]
    fn test_env_fallbacks_fill_both_providers() {
        let mut config = AppConfig::default();

        config.apply_env_fallbacks(env(&[
            ("AZURE_OPENAI_KEY", "secret"),
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
            ("AZURE_OPENAI_VERSION", "2023-05-15"),
            ("AZURE_OPENAI_COMPLETIONS_DEPLOYMENT", "chat"),
            ("AZURE_OPENAI_EMBEDDINGS_DEPLOYMENT", "embed"),
        ]));

        assert_eq!(config.completion.api_key, "secret");
        assert_eq!(config.embedding.api_key, "secret");
        assert_eq!(config.embedding.endpoint, "https://example.openai.azure.com");
        assert_eq!(config.completion.api_version, "2023-05-15");
        assert_eq!(config.completion.deployment, "chat");
        assert_eq!(config.embedding.deployment, "embed");
    }

    #[test]
    fn test_env_fallbacks_keep_explicit_values() {
        let mut config = AppConfig::default();
        config.completion.api_key = "configured".to_string();
        config.completion.api_version = "2024-06-01".to_string();
        config.completion.deployment = "explicit-chat".to_string();
        config.embedding.deployment = "explicit-embed".to_string();

        config.apply_env_fallbacks(env(&[
            ("AZURE_OPENAI_KEY", "secret"),
            ("AZURE_OPENAI_ENDPOINT", " "),
            ("AZURE_OPENAI_VERSION", "2023-05-15"),
            ("AZURE_OPENAI_COMPLETIONS_DEPLOYMENT", "env-chat"),
            ("AZURE_OPENAI_EMBEDDINGS_DEPLOYMENT", "env-embed"),
        ]));

        assert_eq!(config.completion.api_key, "configured");
        assert_eq!(config.embedding.api_key, "secret");
        assert!(config.completion.endpoint.is_empty());
        assert_eq!(config.completion.api_version, "2024-06-01");
        assert_eq!(config.embedding.api_version, "2023-05-15");
        assert_eq!(config.completion.deployment, "explicit-chat");
        assert_eq!(config.embedding.deployment, "explicit-embed");
    }

    #[test]
    fn test_deserialize_sections() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "cache": { "similarity_threshold": 0.95 },
            "store": { "type": "pgvector", "database_url": "postgres://localhost/rag" },
            "retrieval": { "metric": "euclidean" },
            "seed": { "path": "data/documents.json" }
        }))
        .unwrap();

        assert_eq!(config.cache.similarity_threshold, 0.95);
        assert_eq!(config.cache.hit_limit, 1);
        assert_eq!(config.retrieval.metric, SimilarityMetric::Euclidean);
        assert_eq!(config.seed.path, Some(PathBuf::from("data/documents.json")));
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
