//! Embedding provider construction

use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::{AzureOpenAiEmbeddingProvider, OpenAiEmbeddingProvider};
use crate::domain::{DomainError, EmbeddingProvider};
use crate::infrastructure::llm::{
    default_api_version, default_timeout_secs, validate_credentials, AzureOpenAiConfig,
    HttpClient, ProviderKind,
};
use crate::infrastructure::resilience::RetryPolicy;

/// Embedding provider configuration
///
/// `deployment` is the Azure deployment name or the OpenAI model id.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_embedding_deployment")]
    pub deployment: String,
    /// Expected vector length; responses of any other length are rejected.
    /// Falls back to `store.dimensions` when unset.
    #[serde(default)]
    pub dimensions: Option<usize>,
    /// Minimum spacing between embedding calls, 0 disables
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_embedding_deployment() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_min_interval_ms() -> u64 {
    500
}

impl Default for EmbeddingProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            endpoint: String::new(),
            api_key: String::new(),
            api_version: default_api_version(),
            deployment: default_embedding_deployment(),
            dimensions: None,
            min_interval_ms: default_min_interval_ms(),
            timeout_secs: default_timeout_secs(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Factory for creating embedding providers
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    pub fn create(
        config: &EmbeddingProviderConfig,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        validate_credentials(config.provider, &config.endpoint, &config.api_key)?;
        let http_client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;

        match config.provider {
            ProviderKind::AzureOpenAi => {
                let azure_config = AzureOpenAiConfig::new(&config.endpoint, &config.api_key)
                    .with_api_version(&config.api_version);

                Ok(Arc::new(AzureOpenAiEmbeddingProvider::new(
                    http_client,
                    azure_config,
                )))
            }
            ProviderKind::OpenAi if config.endpoint.is_empty() => Ok(Arc::new(
                OpenAiEmbeddingProvider::new(http_client, &config.api_key),
            )),
            ProviderKind::OpenAi => Ok(Arc::new(OpenAiEmbeddingProvider::with_base_url(
                http_client,
                &config.api_key,
                &config.endpoint,
            ))),
        }
    }
}
