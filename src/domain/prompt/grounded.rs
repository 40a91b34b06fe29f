//! Grounded prompt: instruction, history, documents, then the question

use crate::domain::knowledge_base::KnowledgeHit;
use crate::domain::llm::{LlmRequest, Message};
use crate::domain::semantic_cache::CacheEntry;

/// Default assistant persona
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are an intelligent assistant for Microsoft Azure services.
You are designed to provide helpful answers to user questions about Azure services given the information about to be provided.
    - Only answer questions related to the information provided below, provide at least 3 suggestions in a list format.
    - Write two lines of whitespace between each answer in the list.
    - If you're unsure of an answer, you can say \"I don't know\" or \"I'm not sure\" and recommend users search themselves.
    - Only provide answers that have products that are part of Microsoft Azure and part of these following services.";

/// Ordered role-tagged segments sent to the completion provider
///
/// Segment order is fixed: one system instruction, history turns oldest
/// first, one system segment per document, and the user query last.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedPrompt {
    messages: Vec<Message>,
}

impl GroundedPrompt {
    /// Assemble a prompt; `history` must already be oldest first
    pub fn assemble(
        instruction: &str,
        history: &[CacheEntry],
        documents: &[KnowledgeHit],
        query: &str,
    ) -> Self {
        let mut messages = Vec::with_capacity(2 + history.len() + documents.len());

        messages.push(Message::system(instruction));
        messages.extend(history.iter().map(|entry| Message::user(entry.as_history_turn())));
        messages.extend(documents.iter().map(|hit| Message::system(hit.content.clone())));
        messages.push(Message::user(query));

        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_request(self, temperature: f32) -> LlmRequest {
        LlmRequest::builder()
            .messages(self.messages)
            .temperature(temperature)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::llm::MessageRole;
    use crate::domain::semantic_cache::CacheUsage;

    fn entry(prompt: &str, completion: &str) -> CacheEntry {
        CacheEntry {
            id: Uuid::new_v4(),
            prompt: prompt.to_string(),
            completion: completion.to_string(),
            usage: CacheUsage::default(),
            model: "gpt-35-turbo".to_string(),
            vector: vec![1.0],
            written_at: Utc::now(),
        }
    }

    fn hit(content: &str) -> KnowledgeHit {
        KnowledgeHit {
            content: content.to_string(),
            title: String::new(),
            category: String::new(),
            distance: 0.1,
        }
    }

    #[test]
    fn test_segment_order() {
        let prompt = GroundedPrompt::assemble(
            "instruction",
            &[entry("old q", "old a"), entry("new q", "new a")],
            &[hit("doc one"), hit("doc two")],
            "What is Blob Storage?",
        );

        let roles: Vec<MessageRole> = prompt.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::User,
                MessageRole::System,
                MessageRole::System,
                MessageRole::User,
            ]
        );

        let contents: Vec<&str> = prompt.messages().iter().map(|m| m.content_text()).collect();
        assert_eq!(contents[0], "instruction");
        assert_eq!(contents[1], "old q old a");
        assert_eq!(contents[2], "new q new a");
        assert_eq!(contents[3], "doc one");
        assert_eq!(contents[5], "What is Blob Storage?");
    }

    #[test]
    fn test_empty_context() {
        let prompt = GroundedPrompt::assemble("instruction", &[], &[], "hello");

        assert_eq!(prompt.len(), 2);
        assert_eq!(prompt.messages()[1], Message::user("hello"));
    }

    #[test]
    fn test_into_request_sets_temperature() {
        let request = GroundedPrompt::assemble("i", &[], &[], "q").into_request(0.0);

        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.messages.len(), 2);
    }

    #[test]
    fn test_default_instruction_keeps_fallback() {
        assert!(DEFAULT_SYSTEM_INSTRUCTION.contains("I don't know"));
        assert!(DEFAULT_SYSTEM_INSTRUCTION.contains("at least 3 suggestions"));
    }
}
