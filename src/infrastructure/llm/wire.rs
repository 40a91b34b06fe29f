//! Chat completion wire format shared by OpenAI and Azure OpenAI

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, FinishReason, LlmRequest, LlmResponse, Message, Usage};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a Message> for ChatMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content_text(),
        }
    }
}

/// Build a chat completions body; `model` is omitted for Azure deployments
pub(crate) fn build_chat_body(model: Option<&str>, request: &LlmRequest) -> serde_json::Value {
    let messages: Vec<ChatMessage<'_>> = request.messages.iter().map(ChatMessage::from).collect();

    let mut body = serde_json::json!({
        "messages": messages,
        "stream": false,
    });

    if let Some(model) = model {
        body["model"] = serde_json::json!(model);
    }

    if let Some(temp) = request.temperature {
        body["temperature"] = serde_json::json!(temp);
    }

    body
}

pub(crate) fn parse_chat_response(
    provider: &'static str,
    json: serde_json::Value,
) -> Result<LlmResponse, DomainError> {
    let response: ChatResponse = serde_json::from_value(json).map_err(|e| {
        DomainError::provider(provider, format!("Failed to parse response: {}", e))
    })?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| DomainError::provider(provider, "No choices in response"))?;

    let message = Message::assistant(choice.message.content.unwrap_or_default());

    let mut llm_response = LlmResponse::new(response.id, response.model, message);

    if let Some(reason) = choice.finish_reason {
        llm_response = llm_response.with_finish_reason(FinishReason::parse(&reason));
    }

    if let Some(usage) = response.usage {
        let mut reported = Usage::new(usage.prompt_tokens, usage.completion_tokens);
        if let Some(total) = usage.total_tokens {
            reported = reported.with_total(total);
        }
        llm_response = llm_response.with_usage(reported);
    }

    Ok(llm_response)
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: Option<u32>,
}
