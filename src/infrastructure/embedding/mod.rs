//! Embedding provider implementations

mod azure_openai;
mod factory;
mod openai;

pub use azure_openai::AzureOpenAiEmbeddingProvider;
pub use factory::{EmbeddingProviderConfig, EmbeddingProviderFactory};
pub use openai::OpenAiEmbeddingProvider;

// Re-export HTTP client for use by embedding providers
pub use super::llm::{HttpClient, HttpClientTrait};
