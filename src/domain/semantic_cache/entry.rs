//! Cached answers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::llm::Usage;
use crate::domain::vector_store::{ScoredRecord, VectorRecord};
use crate::domain::DomainError;

/// Token accounting stored alongside a cached answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl From<Usage> for CacheUsage {
    fn from(usage: Usage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}

/// A previously answered question
///
/// Entries are created once per cache miss and never updated. `written_at`
/// orders history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub id: Uuid,
    pub prompt: String,
    pub completion: String,
    pub usage: CacheUsage,
    pub model: String,
    pub vector: Vec<f32>,
    pub written_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Build the record persisted for a new entry; the store assigns `written_at`
    pub fn new_record(
        prompt: &str,
        completion: &str,
        vector: Vec<f32>,
        usage: CacheUsage,
        model: &str,
    ) -> VectorRecord {
        let id = Uuid::new_v4().to_string();

        VectorRecord::new(id.clone(), vector)
            .with_partition_key(id)
            .with_field("prompt", prompt)
            .with_field("completion", completion)
            .with_field("promptTokens", usage.prompt_tokens)
            .with_field("completionTokens", usage.completion_tokens)
            .with_field("totalTokens", usage.total_tokens)
            .with_field("model", model)
    }

    /// History segment text injected into a grounded prompt
    pub fn as_history_turn(&self) -> String {
        format!("{} {}", self.prompt, self.completion)
    }
}

impl TryFrom<VectorRecord> for CacheEntry {
    type Error = DomainError;

    fn try_from(record: VectorRecord) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&record.id).map_err(|e| {
            DomainError::retrieval(format!("Invalid cache entry id '{}': {}", record.id, e))
        })?;

        let prompt = record
            .str_field("prompt")
            .ok_or_else(|| DomainError::retrieval(format!("Cache entry {} has no prompt", id)))?
            .to_string();
        let completion = record
            .str_field("completion")
            .ok_or_else(|| {
                DomainError::retrieval(format!("Cache entry {} has no completion", id))
            })?
            .to_string();
        let written_at = record.written_at.ok_or_else(|| {
            DomainError::retrieval(format!("Cache entry {} has no write timestamp", id))
        })?;

        let usage = CacheUsage {
            prompt_tokens: record.u32_field("promptTokens").unwrap_or_default(),
            completion_tokens: record.u32_field("completionTokens").unwrap_or_default(),
            total_tokens: record.u32_field("totalTokens").unwrap_or_default(),
        };
        let model = record.str_field("model").unwrap_or_default().to_string();

        Ok(Self {
            id,
            prompt,
            completion,
            usage,
            model,
            vector: record.vector,
            written_at,
        })
    }
}

/// A cache entry that passed the similarity threshold
#[derive(Debug, Clone, PartialEq)]
pub struct CacheMatch {
    pub entry: CacheEntry,
    pub similarity: f32,
}

impl TryFrom<ScoredRecord> for CacheMatch {
    type Error = DomainError;

    fn try_from(scored: ScoredRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            similarity: scored.similarity,
            entry: CacheEntry::try_from(scored.record)?,
        })
    }
}
