//! OpenAI embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::domain::embedding::{
    Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse,
    EmbeddingUsage,
};
use crate::domain::DomainError;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI embedding provider
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    /// Create a new OpenAI embedding provider
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// Create a new provider with custom base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let url = self.embeddings_url();
        let body = build_embedding_body(Some(request.model()), &request);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await?;

        parse_embedding_response(self.provider_name(), response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Build an embeddings body; `model` is omitted for Azure deployments
pub(super) fn build_embedding_body(
    model: Option<&str>,
    request: &EmbeddingRequest,
) -> serde_json::Value {
    let mut body = serde_json::json!({ "input": request.input() });

    if let Some(model) = model {
        body["model"] = serde_json::json!(model);
    }

    body
}

pub(super) fn parse_embedding_response(
    provider: &'static str,
    json: serde_json::Value,
) -> Result<EmbeddingResponse, DomainError> {
    let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
        DomainError::provider(provider, format!("Failed to parse embedding response: {}", e))
    })?;

    let embeddings: Vec<Embedding> = response
        .data
        .into_iter()
        .map(|d| Embedding::new(d.index, d.embedding))
        .collect();

    let usage = response
        .usage
        .map(|u| EmbeddingUsage::new(u.prompt_tokens, u.total_tokens))
        .unwrap_or_default();

    Ok(EmbeddingResponse::new(response.model, embeddings, usage))
}

// OpenAI API types for embeddings

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    #[serde(default)]
    model: String,
    data: Vec<OpenAiEmbeddingData>,
    usage: Option<OpenAiEmbeddingUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingUsage {
    prompt_tokens: u32,
    total_tokens: u32,
}
