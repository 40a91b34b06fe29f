//! Azure OpenAI embedding provider

use async_trait::async_trait;

use super::openai::{build_embedding_body, parse_embedding_response};
use super::HttpClientTrait;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;
use crate::infrastructure::llm::AzureOpenAiConfig;

/// Azure OpenAI embeddings
///
/// The request model names the deployment.
#[derive(Debug)]
pub struct AzureOpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    config: AzureOpenAiConfig,
}

impl<C: HttpClientTrait> AzureOpenAiEmbeddingProvider<C> {
    pub fn new(client: C, config: AzureOpenAiConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for AzureOpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let url = self.config.deployment_url(request.model(), "embeddings");
        let body = build_embedding_body(None, &request);

        let response = self
            .client
            .post_json(&url, self.config.headers(), &body)
            .await?;

        parse_embedding_response(self.provider_name(), response)
    }

    fn provider_name(&self) -> &'static str {
        "azure_openai"
    }
}
