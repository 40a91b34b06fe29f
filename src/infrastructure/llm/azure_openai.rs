use async_trait::async_trait;

use super::http_client::HttpClientTrait;
use super::wire::{build_chat_body, parse_chat_response};
use crate::domain::{CompletionProvider, DomainError, LlmRequest, LlmResponse};

pub(crate) const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";

/// Azure OpenAI API configuration
#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
}

impl AzureOpenAiConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            api_version: DEFAULT_AZURE_API_VERSION.to_string(),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// URL of an operation on a deployment, e.g. `chat/completions`
    pub fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.endpoint.trim_end_matches('/'),
            deployment,
            operation,
            self.api_version
        )
    }

    pub fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("api-key", self.api_key.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

/// Azure OpenAI chat completions bound to one deployment
#[derive(Debug)]
pub struct AzureOpenAiProvider<C: HttpClientTrait> {
    client: C,
    config: AzureOpenAiConfig,
    deployment: String,
}

impl<C: HttpClientTrait> AzureOpenAiProvider<C> {
    pub fn new(client: C, config: AzureOpenAiConfig, deployment: impl Into<String>) -> Self {
        Self {
            client,
            config,
            deployment: deployment.into(),
        }
    }

    fn build_url(&self) -> String {
        self.config
            .deployment_url(&self.deployment, "chat/completions")
    }
}

#[async_trait]
impl<C: HttpClientTrait> CompletionProvider for AzureOpenAiProvider<C> {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let url = self.build_url();
        let body = build_chat_body(None, &request);

        let response = self
            .client
            .post_json(&url, self.config.headers(), &body)
            .await?;

        parse_chat_response(self.provider_name(), response)
    }

    fn provider_name(&self) -> &'static str {
        "azure_openai"
    }
}
