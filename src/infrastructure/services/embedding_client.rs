//! Paced, validated access to the embedding provider

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::DomainError;
use crate::infrastructure::embedding::EmbeddingProviderConfig;
use crate::infrastructure::resilience::{MinIntervalGate, RetryPolicy};

/// Turns text into a single embedding vector
///
/// Every provider call passes through a minimum-interval gate. Any failure
/// (provider error, missing, empty or wrongly sized vector) is reported as
/// `EmbeddingUnavailable`.
#[derive(Debug)]
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
    deployment: String,
    dimensions: Option<usize>,
    gate: MinIntervalGate,
    retry: RetryPolicy,
}

impl EmbeddingClient {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, deployment: impl Into<String>) -> Self {
        Self {
            provider,
            deployment: deployment.into(),
            dimensions: None,
            gate: MinIntervalGate::new(Duration::ZERO),
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_config(provider: Arc<dyn EmbeddingProvider>, config: &EmbeddingProviderConfig) -> Self {
        let client = Self::new(provider, &config.deployment)
            .with_min_interval(Duration::from_millis(config.min_interval_ms))
            .with_retry(config.retry.clone());

        match config.dimensions {
            Some(dimensions) => client.with_dimensions(dimensions),
            None => client,
        }
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.gate = MinIntervalGate::new(interval);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Embed one text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let response = self
            .retry
            .run("embed", || async move {
                self.gate.wait().await;
                self.provider
                    .embed(EmbeddingRequest::single(&self.deployment, text))
                    .await
            })
            .await
            .map_err(|e| DomainError::embedding_unavailable(e.to_string()))?;

        let vector = response
            .into_vectors()
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::embedding_unavailable("Provider returned no embedding"))?;

        if vector.is_empty() {
            return Err(DomainError::embedding_unavailable(
                "Provider returned an empty embedding",
            ));
        }

        if let Some(expected) = self.dimensions {
            if vector.len() != expected {
                return Err(DomainError::embedding_unavailable(format!(
                    "Embedding has {} dimensions, expected {}",
                    vector.len(),
                    expected
                )));
            }
        }

        debug!(
            provider = self.provider.provider_name(),
            dimensions = vector.len(),
            "Generated embedding"
        );

        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::embedding::{EmbeddingResponse, EmbeddingUsage, MockEmbeddingProvider};

    #[derive(Debug)]
    struct EmptyProvider;

    #[async_trait]
    impl EmbeddingProvider for EmptyProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            Ok(EmbeddingResponse::new(
                request.model().to_string(),
                Vec::new(),
                EmbeddingUsage::default(),
            ))
        }

        fn provider_name(&self) -> &'static str {
            "empty"
        }
    }

    #[tokio::test]
    async fn test_embed_returns_vector() {
        let provider = Arc::new(MockEmbeddingProvider::new(4).with_vector("q", vec![1.0, 0.0, 0.0, 0.0]));
        let client = EmbeddingClient::new(provider, "ada").with_dimensions(4);

        assert_eq!(client.embed("q").await.unwrap(), vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_provider_error_is_embedding_unavailable() {
        let provider = Arc::new(MockEmbeddingProvider::new(4).with_error("HTTP 500"));
        let client = EmbeddingClient::new(provider, "ada");

        let error = client.embed("q").await.unwrap_err();

        assert!(matches!(error, DomainError::EmbeddingUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_missing_vector_is_embedding_unavailable() {
        let client = EmbeddingClient::new(Arc::new(EmptyProvider), "ada");

        let error = client.embed("q").await.unwrap_err();

        assert!(matches!(error, DomainError::EmbeddingUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_empty_vector_is_rejected() {
        let provider = Arc::new(MockEmbeddingProvider::new(4).with_vector("q", vec![]));
        let client = EmbeddingClient::new(provider, "ada");

        assert!(client.embed("q").await.is_err());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_rejected() {
        let provider = Arc::new(MockEmbeddingProvider::new(3));
        let client = EmbeddingClient::new(provider, "ada").with_dimensions(1536);

        let error = client.embed("q").await.unwrap_err();

        assert!(error.to_string().contains("expected 1536"));
    }

    #[tokio::test]
    async fn test_calls_are_spaced() {
        let provider = Arc::new(MockEmbeddingProvider::new(2));
        let client = EmbeddingClient::new(provider.clone(), "ada")
            .with_min_interval(Duration::from_millis(60));
        let start = Instant::now();

        client.embed("a").await.unwrap();
        client.embed("b").await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(60));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_policy_applies() {
        let provider = Arc::new(MockEmbeddingProvider::new(2).with_error("HTTP 429"));
        let client = EmbeddingClient::new(provider.clone(), "ada")
            .with_retry(RetryPolicy::new(2).with_initial_delay(1));

        assert!(client.embed("q").await.is_err());
        assert_eq!(provider.calls(), 3);
    }
}
