//! Answers produced by the pipeline

use std::fmt;

use serde::{Deserialize, Serialize};

/// Final answer returned to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    /// True when served from the semantic cache
    pub cached: bool,
    pub latency_ms: u64,
}

impl Answer {
    pub fn new(text: impl Into<String>, cached: bool, latency_ms: u64) -> Self {
        Self {
            text: text.into(),
            cached,
            latency_ms,
        }
    }

    /// Details line shown under an answer, e.g. `(Time: 812ms) (Cached)`
    pub fn details(&self) -> String {
        if self.cached {
            format!("(Time: {}ms) (Cached)", self.latency_ms)
        } else {
            format!("(Time: {}ms)", self.latency_ms)
        }
    }
}

/// Stages of the answer pipeline, used in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    EmbedQuery,
    CacheProbe,
    CacheHit,
    CacheMiss,
    Retrieve,
    AssemblePrompt,
    Complete,
    CacheWrite,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::EmbedQuery => "embed_query",
            Self::CacheProbe => "cache_probe",
            Self::CacheHit => "cache_hit",
            Self::CacheMiss => "cache_miss",
            Self::Retrieve => "retrieve",
            Self::AssemblePrompt => "assemble_prompt",
            Self::Complete => "complete",
            Self::CacheWrite => "cache_write",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
