//! Completion provider implementations

mod azure_openai;
mod factory;
mod http_client;
mod openai;
mod wire;

pub use azure_openai::{AzureOpenAiConfig, AzureOpenAiProvider};
pub use factory::{CompletionProviderConfig, CompletionProviderFactory, ProviderKind};
pub(crate) use factory::{default_api_version, default_timeout_secs, validate_credentials};
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::OpenAiProvider;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
