//! Wire types for the DeepSeek chat completion endpoint.
//!
//! DeepSeek speaks the OpenAI-compatible chat schema: a model name, an
//! ordered list of role-tagged messages, and a response carrying one or
//! more choices plus token usage.

use serde::{Deserialize, Serialize};

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Context-setting instructions.
    System,
    /// The human side of the conversation.
    User,
    /// The model side of the conversation.
    Assistant,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: ChatRole,
    /// The message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model name, e.g. `deepseek-chat`.
    pub model: String,
    /// The conversation so far, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature, when overriding the model default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Cap on generated tokens, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Whether to stream the response. Always false here; streamed
    /// responses pass through [`request_text`](crate::DeepSeek::request_text)
    /// untouched.
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Creates a non-streaming request.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            stream: false,
        }
    }
}

/// A single completion choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    /// Position of this choice in the response.
    #[serde(default)]
    pub index: u32,
    /// The generated assistant message.
    pub message: ChatMessage,
    /// Why generation stopped, when the API reports it.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Tokens generated in the completion.
    #[serde(default)]
    pub completion_tokens: u64,
    /// Sum of prompt and completion tokens.
    #[serde(default)]
    pub total_tokens: u64,
}

impl std::ops::Add for Usage {
    type Output = Usage;

    fn add(self, other: Usage) -> Usage {
        Usage {
            prompt_tokens: self.prompt_tokens + other.prompt_tokens,
            completion_tokens: self.completion_tokens + other.completion_tokens,
            total_tokens: self.total_tokens + other.total_tokens,
        }
    }
}

/// Response body from `POST /chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Server-assigned completion ID.
    #[serde(default)]
    pub id: Option<String>,
    /// The model that produced the response.
    #[serde(default)]
    pub model: Option<String>,
    /// The generated choices; at least one on success.
    pub choices: Vec<ChatChoice>,
    /// Token usage, when reported.
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Returns the text of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_to_wire_shape() {
        let request = ChatCompletionRequest::new(
            "deepseek-chat",
            vec![
                ChatMessage::system("Be brief."),
                ChatMessage::user("hi"),
            ],
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "deepseek-chat",
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "hi"},
                ],
                "stream": false,
            })
        );
    }

    #[test]
    fn optional_sampling_fields_serialize_when_set() {
        let mut request = ChatCompletionRequest::new("deepseek-chat", vec![]);
        request.temperature = Some(0.7);
        request.max_tokens = Some(256);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["temperature"], json!(0.7));
        assert_eq!(value["max_tokens"], json!(256));
    }

    #[test]
    fn response_deserializes_from_wire_shape() {
        let value = json!({
            "id": "cmpl-1",
            "model": "deepseek-chat",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": "hello"},
                    "finish_reason": "stop",
                }
            ],
            "usage": {"prompt_tokens": 4, "completion_tokens": 2, "total_tokens": 6},
        });
        let response: ChatCompletionResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.first_content(), Some("hello"));
        assert_eq!(response.usage.unwrap().total_tokens, 6);
    }

    #[test]
    fn response_tolerates_missing_optional_fields() {
        let value = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "hello"}}
            ],
        });
        let response: ChatCompletionResponse = serde_json::from_value(value).unwrap();
        assert!(response.id.is_none());
        assert!(response.usage.is_none());
        assert_eq!(response.choices[0].index, 0);
    }

    #[test]
    fn usage_addition() {
        let a = Usage {
            prompt_tokens: 3,
            completion_tokens: 2,
            total_tokens: 5,
        };
        let b = Usage {
            prompt_tokens: 1,
            completion_tokens: 1,
            total_tokens: 2,
        };
        assert_eq!((a + b).total_tokens, 7);
    }
}
