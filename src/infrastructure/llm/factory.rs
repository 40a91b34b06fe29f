use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::azure_openai::{AzureOpenAiConfig, DEFAULT_AZURE_API_VERSION};
use super::http_client::HttpClient;
use super::openai::DEFAULT_OPENAI_BASE_URL;
use super::{AzureOpenAiProvider, OpenAiProvider};
use crate::domain::{CompletionProvider, DomainError};
use crate::infrastructure::resilience::RetryPolicy;

/// Hosted model API used for completions and embeddings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    #[serde(rename = "azure_openai")]
    AzureOpenAi,
    #[serde(rename = "openai")]
    OpenAi,
}

/// Completion provider configuration
///
/// `deployment` is the Azure deployment name or the OpenAI model id.
/// `endpoint` is the Azure resource endpoint or an OpenAI-compatible base URL.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionProviderConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_completion_deployment")]
    pub deployment: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub retry: RetryPolicy,
}

pub(crate) fn default_api_version() -> String {
    DEFAULT_AZURE_API_VERSION.to_string()
}

fn default_completion_deployment() -> String {
    "gpt-35-turbo".to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    60
}

impl Default for CompletionProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            endpoint: String::new(),
            api_key: String::new(),
            api_version: default_api_version(),
            deployment: default_completion_deployment(),
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Factory for creating completion providers
#[derive(Debug)]
pub struct CompletionProviderFactory;

impl CompletionProviderFactory {
    pub fn create(
        config: &CompletionProviderConfig,
    ) -> Result<Arc<dyn CompletionProvider>, DomainError> {
        validate_credentials(config.provider, &config.endpoint, &config.api_key)?;
        let http_client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;

        match config.provider {
            ProviderKind::AzureOpenAi => {
                let azure_config = AzureOpenAiConfig::new(&config.endpoint, &config.api_key)
                    .with_api_version(&config.api_version);

                Ok(Arc::new(AzureOpenAiProvider::new(
                    http_client,
                    azure_config,
                    &config.deployment,
                )))
            }
            ProviderKind::OpenAi => {
                let base_url = if config.endpoint.is_empty() {
                    DEFAULT_OPENAI_BASE_URL
                } else {
                    config.endpoint.as_str()
                };

                Ok(Arc::new(OpenAiProvider::with_base_url(
                    http_client,
                    &config.api_key,
                    &config.deployment,
                    base_url,
                )))
            }
        }
    }
}

pub(crate) fn validate_credentials(
    provider: ProviderKind,
    endpoint: &str,
    api_key: &str,
) -> Result<(), DomainError> {
    if api_key.trim().is_empty() {
        return Err(DomainError::configuration(format!(
            "Missing API key for provider {:?}",
            provider
        )));
    }

    if provider == ProviderKind::AzureOpenAi && endpoint.trim().is_empty() {
        return Err(DomainError::configuration(
            "Azure OpenAI requires an endpoint",
        ));
    }

    Ok(())
}
