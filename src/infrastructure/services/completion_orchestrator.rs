//! Answer pipeline: embed, probe the cache, ground, complete, record

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use super::{EmbeddingClient, HistoryRetriever, KnowledgeRetriever, SemanticCacheService};
use super::{DEFAULT_HISTORY_SIZE, DEFAULT_KNOWLEDGE_TOP_K};
use crate::domain::llm::{CompletionProvider, LlmRequest, LlmResponse};
use crate::domain::prompt::{GroundedPrompt, DEFAULT_SYSTEM_INSTRUCTION};
use crate::domain::semantic_cache::CacheUsage;
use crate::domain::{Answer, DomainError, PipelineStage};
use crate::infrastructure::observability::{
    record_answer, record_cache_lookup, record_cache_write_failure, record_completion,
    CompletionMetricParams,
};
use crate::infrastructure::resilience::RetryPolicy;

/// Tunables of the answer pipeline
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub system_instruction: String,
    pub temperature: f32,
    pub knowledge_top_k: usize,
    pub history_size: usize,
    pub completion_retry: RetryPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            temperature: 0.0,
            knowledge_top_k: DEFAULT_KNOWLEDGE_TOP_K,
            history_size: DEFAULT_HISTORY_SIZE,
            completion_retry: RetryPolicy::default(),
        }
    }
}

/// Answers questions, reusing cached answers for near-identical questions
///
/// A miss makes exactly one completion call and one cache write. A failed
/// cache write is logged and counted, and the answer is still returned.
pub struct CompletionOrchestrator {
    embedding: Arc<EmbeddingClient>,
    cache: Arc<SemanticCacheService>,
    knowledge: Arc<KnowledgeRetriever>,
    history: Arc<HistoryRetriever>,
    completion: Arc<dyn CompletionProvider>,
    config: OrchestratorConfig,
}

impl CompletionOrchestrator {
    pub fn new(
        embedding: Arc<EmbeddingClient>,
        cache: Arc<SemanticCacheService>,
        knowledge: Arc<KnowledgeRetriever>,
        history: Arc<HistoryRetriever>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            embedding,
            cache,
            knowledge,
            history,
            completion,
            config: OrchestratorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    #[instrument(skip_all, fields(question_len = question.len()))]
    pub async fn answer(&self, question: &str) -> Result<Answer, DomainError> {
        let start = Instant::now();

        if question.trim().is_empty() {
            return Err(DomainError::validation("Question cannot be empty"));
        }

        debug!(stage = %PipelineStage::EmbedQuery, "Embedding question");
        let vector = self.embedding.embed(question).await?;

        debug!(stage = %PipelineStage::CacheProbe, "Probing semantic cache");
        if let Some(hit) = self.cache.probe(&vector).await? {
            record_cache_lookup(true);
            let elapsed = start.elapsed();
            record_answer(true, elapsed);

            info!(
                stage = %PipelineStage::CacheHit,
                entry_id = %hit.entry.id,
                similarity = hit.similarity,
                latency_ms = elapsed.as_millis() as u64,
                "Answered from semantic cache"
            );

            return Ok(Answer::new(hit.entry.completion, true, elapsed.as_millis() as u64));
        }
        record_cache_lookup(false);

        debug!(stage = %PipelineStage::Retrieve, "Cache miss, retrieving context");
        let (documents, mut history) = tokio::try_join!(
            self.knowledge.search(&vector, self.config.knowledge_top_k),
            self.history.recent(self.config.history_size),
        )?;
        history.reverse();

        debug!(
            stage = %PipelineStage::AssemblePrompt,
            documents = documents.len(),
            history = history.len(),
            "Assembling grounded prompt"
        );
        let request = GroundedPrompt::assemble(
            &self.config.system_instruction,
            &history,
            &documents,
            question,
        )
        .into_request(self.config.temperature);

        debug!(stage = %PipelineStage::Complete, "Requesting completion");
        let response = self.complete(request).await?;
        let text = response.content().to_string();

        debug!(stage = %PipelineStage::CacheWrite, "Recording answer");
        match self
            .cache
            .write(
                question,
                vector,
                &text,
                CacheUsage::from(response.usage_or_default()),
                &response.model,
            )
            .await
        {
            Ok(entry) => debug!(entry_id = %entry.id, "Answer cached"),
            Err(e) => {
                record_cache_write_failure();
                warn!(error = %e, "Failed to cache answer");
            }
        }

        let elapsed = start.elapsed();
        record_answer(false, elapsed);

        info!(
            stage = %PipelineStage::CacheMiss,
            latency_ms = elapsed.as_millis() as u64,
            documents = documents.len(),
            history = history.len(),
            "Answered with completion"
        );

        Ok(Answer::new(text, false, elapsed.as_millis() as u64))
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let start = Instant::now();
        let provider = self.completion.provider_name();

        let result = self
            .config
            .completion_retry
            .run("complete", || {
                let request = request.clone();
                async move { self.completion.complete(request).await }
            })
            .await;

        let usage = result.as_ref().ok().and_then(|r| r.usage.clone());
        record_completion(CompletionMetricParams {
            provider,
            duration: start.elapsed(),
            success: result.is_ok(),
            prompt_tokens: usage.as_ref().map(|u| u.prompt_tokens as u64),
            completion_tokens: usage.as_ref().map(|u| u.completion_tokens as u64),
        });

        result.map_err(|e| DomainError::completion_unavailable(e.to_string()))
    }
}

impl fmt::Debug for CompletionOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionOrchestrator")
            .field("embedding", &self.embedding)
            .field("cache", &self.cache)
            .field("knowledge", &self.knowledge)
            .field("history", &self.history)
            .field("completion", &self.completion.provider_name())
            .field("config", &self.config)
            .finish()
    }
}
