//! Reasoning-service boundary.
//!
//! Stage runners talk to a language model only through [`ReasoningService`].
//! Whatever shape a backend returns is flattened to plain text by
//! [`response_text`] before it reaches the extractor.

pub mod command;
pub mod http;

pub use command::CommandReasoner;
pub use http::HttpReasoner;

use async_trait::async_trait;
use serde_json::Value;

use crate::audit::Step;
use crate::errors::ReasoningError;

/// One prompt sent to the reasoning service.
#[derive(Debug, Clone)]
pub struct ReasoningRequest {
    pub stage: Step,
    pub system_prompt: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait ReasoningService: Send + Sync {
    /// Send one prompt and return the textual payload of the reply.
    async fn complete(&self, request: ReasoningRequest) -> Result<String, ReasoningError>;

    /// Short label for logs.
    fn name(&self) -> &str;
}

/// Flatten any accepted response shape into text.
///
/// Accepted shapes, checked in order:
/// - a bare JSON string
/// - `{"choices": [{"message": {"content": ...}}]}` (chat completions)
/// - `{"output": {"message": {"content": [...]}}}` (Converse-style)
/// - `{"message": {"content": ...}}`
/// - `{"content": ...}`
/// - `{"text": "..."}`
///
/// `content` may be a string or a list of parts, where a part is a string or
/// an object with a `text` field; parts are joined with a single space. Any
/// other value is rendered as its JSON text.
pub fn response_text(value: &Value) -> String {
    if let Value::String(s) = value {
        return s.clone();
    }

    let message = value
        .pointer("/choices/0/message")
        .or_else(|| value.pointer("/output/message"))
        .or_else(|| value.get("message"));

    if let Some(message) = message {
        return match message {
            Value::String(s) => s.clone(),
            Value::Object(_) => match message.get("content") {
                Some(content) => content_text(content),
                None => message.to_string(),
            },
            other => other.to_string(),
        };
    }

    if let Some(content) = value.get("content") {
        return content_text(content);
    }
    if let Some(Value::String(text)) = value.get("text") {
        return text.clone();
    }
    value.to_string()
}

fn content_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(s) => Some(s.as_str()),
                Value::Object(_) => part.get("text").and_then(Value::as_str),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
