use serde::{Deserialize, Serialize};

use crate::domain::Answer;

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub text: String,
    pub cached: bool,
    pub latency_ms: u64,
    /// Human readable summary, e.g. `(Time: 812ms) (Cached)`
    pub details: String,
}

impl From<Answer> for AnswerResponse {
    fn from(answer: Answer) -> Self {
        Self {
            details: answer.details(),
            text: answer.text,
            cached: answer.cached,
            latency_ms: answer.latency_ms,
        }
    }
}
