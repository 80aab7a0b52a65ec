//! Chat-completion wire types and reply interpretation.
//!
//! Transport is left to the caller; these helpers only shape the request
//! body and turn a raw `(status, body)` reply into text or a [`ProviderError`].

use serde::{Deserialize, Serialize};

use super::prompt::SYSTEM_PROMPT;
use crate::error::ProviderError;

pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// System persona followed by the user prompt.
    pub fn new(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: prompt.into(),
                },
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Extracts the first choice's content from a raw completion reply.
pub fn completion_from_response(status: u16, body: &str) -> Result<String, ProviderError> {
    if !(200..300).contains(&status) {
        return Err(ProviderError::Status {
            status,
            body: body.to_string(),
        });
    }

    let malformed = || ProviderError::Malformed {
        body: body.to_string(),
    };
    let response: ChatResponse = serde_json::from_str(body).map_err(|_| malformed())?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(malformed)
}
