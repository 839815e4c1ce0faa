//! OpenAI chat-completion request/response payloads.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Request body for OpenAI chat completions.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Chat message object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }
}

/// Top-level chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

/// Single choice item returned by chat completions.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

impl ChatChoice {
    /// The model ran out of `max_tokens` before finishing.
    pub fn is_truncated(&self) -> bool {
        self.finish_reason.as_deref() == Some("length")
    }
}

impl ChatCompletionResponse {
    /// Trimmed content of the first choice.
    pub fn first_text(&self) -> Result<String> {
        let choice = self
            .choices
            .first()
            .ok_or_else(|| Error::ResponseShape("response contained no choices".to_string()))?;

        if choice.is_truncated() {
            tracing::warn!("Completion stopped at the max_tokens limit, text may be cut short");
        }

        choice
            .message
            .content
            .as_deref()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| Error::ResponseShape("first choice has no message content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_wire_fields() {
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("cat")],
            max_tokens: 500,
            temperature: Some(0.7),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "cat");
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_request_omits_missing_temperature() {
        let request = ChatCompletionRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::user("test")],
            max_tokens: 5,
            temperature: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("temperature"));
    }

    #[test]
    fn test_first_text_trims_content() {
        let response: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": "  a glowing fox \n" },
                "finish_reason": "stop"
            }]
        }))
        .unwrap();

        assert_eq!(response.first_text().unwrap(), "a glowing fox");
    }

    #[test]
    fn test_truncated_completion_still_returns_text() {
        let response: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": "a fox in a moonlit" },
                "finish_reason": "length"
            }]
        }))
        .unwrap();

        assert!(response.choices[0].is_truncated());
        assert_eq!(response.first_text().unwrap(), "a fox in a moonlit");
    }

    #[test]
    fn test_finish_reason_stop_or_missing_is_not_truncated() {
        let response: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "a" }, "finish_reason": "stop" },
                { "message": { "role": "assistant", "content": "b" } }
            ]
        }))
        .unwrap();

        assert!(!response.choices[0].is_truncated());
        assert!(!response.choices[1].is_truncated());
    }

    #[test]
    fn test_first_text_rejects_empty_choices() {
        let response = ChatCompletionResponse { choices: vec![] };
        assert!(matches!(
            response.first_text().unwrap_err(),
            Error::ResponseShape(_)
        ));
    }

    #[test]
    fn test_first_text_rejects_null_content() {
        let response: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": null },
                "finish_reason": null
            }]
        }))
        .unwrap();

        assert!(matches!(
            response.first_text().unwrap_err(),
            Error::ResponseShape(_)
        ));
    }
}
