use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Capability that produces a chat completion for a list of messages
///
/// Implementations are bound to one model or deployment at construction.
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
