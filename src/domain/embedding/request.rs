//! Embedding request types

use serde::{Deserialize, Serialize};

/// Request sent to an embedding provider for one text
///
/// `model` is the deployment name for Azure and the model id for OpenAI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    model: String,
    input: String,
}

impl EmbeddingRequest {
    pub fn single(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: text.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}
