use thiserror::Error;

/// Core domain errors
///
/// The first four variants form the answer pipeline's failure taxonomy.
/// Provider and storage failures are mapped onto them at the component
/// boundary so callers only ever see which stage failed.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Embedding unavailable: {message}")]
    EmbeddingUnavailable { message: String },

    #[error("Retrieval error: {message}")]
    Retrieval { message: String },

    #[error("Completion unavailable: {message}")]
    CompletionUnavailable { message: String },

    #[error("Cache write error: {message}")]
    CacheWrite { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn embedding_unavailable(message: impl Into<String>) -> Self {
        Self::EmbeddingUnavailable {
            message: message.into(),
        }
    }

    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
        }
    }

    pub fn completion_unavailable(message: impl Into<String>) -> Self {
        Self::CompletionUnavailable {
            message: message.into(),
        }
    }

    pub fn cache_write(message: impl Into<String>) -> Self {
        Self::CacheWrite {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether a provider call that failed with this error may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Storage { .. })
    }
}
