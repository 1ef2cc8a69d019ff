//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which manages conversation
//! state and drives completion turns through the API client.

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use crate::DeepSeek;
use crate::chat::config::ChatConfig;
use crate::chat::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Usage};
use crate::error::{Error, Result};
use crate::observability;

/// Endpoint path for chat completions, relative to the base URL.
const COMPLETIONS_PATH: &str = "chat/completions";

/// A chat session that manages conversation state and API interactions.
///
/// The session keeps message history across turns. On failure the history
/// is rolled back to its state before the turn, so a failed turn can be
/// retried by the caller without duplicating the user message.
pub struct ChatSession {
    client: DeepSeek,
    config: ChatConfig,
    messages: Vec<ChatMessage>,
    usage_totals: Usage,
    last_turn_usage: Option<Usage>,
    request_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: String,
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// The system prompt, if any.
    pub system_prompt: Option<String>,
    /// The sampling temperature, if set.
    pub temperature: Option<f32>,
    /// The maximum tokens per response, if capped.
    pub max_tokens: Option<u32>,
    /// Total prompt tokens across all requests.
    pub total_prompt_tokens: u64,
    /// Total completion tokens across all requests.
    pub total_completion_tokens: u64,
    /// Total number of API requests made.
    pub total_requests: u64,
    /// Token usage for the last turn, if available.
    pub last_turn_usage: Option<Usage>,
}

impl ChatSession {
    /// Creates a new chat session with the given client and configuration.
    pub fn new(client: DeepSeek, config: ChatConfig) -> Self {
        Self {
            client,
            config,
            messages: Vec::new(),
            usage_totals: Usage::default(),
            last_turn_usage: None,
            request_count: 0,
        }
    }

    /// Sends a user message and returns the assistant's reply.
    ///
    /// This method:
    /// 1. Adds the user message to history
    /// 2. Posts one completion request to the API
    /// 3. Adds the assistant response to history
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; the user message is
    /// rolled back from history in that case.
    pub async fn send(&mut self, user_input: &str) -> Result<String> {
        self.turn(user_input, None).await
    }

    /// Like [`send`](Self::send), but the turn can be cancelled through the
    /// token; cancellation fails the turn with [`Error::Abort`] and rolls
    /// back the history.
    pub async fn send_cancellable(
        &mut self,
        user_input: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.turn(user_input, Some(cancel)).await
    }

    async fn turn(
        &mut self,
        user_input: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<String> {
        observability::CHAT_TURNS.click();
        let previous_len = self.messages.len();
        self.messages.push(ChatMessage::user(user_input));

        let body = serde_json::to_value(self.build_request())?;
        let result = match cancel {
            Some(cancel) => {
                self.client
                    .request_cancellable(Method::POST, COMPLETIONS_PATH, Some(&body), cancel)
                    .await
            }
            None => {
                self.client
                    .request(Method::POST, COMPLETIONS_PATH, Some(&body))
                    .await
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                observability::CHAT_TURN_ERRORS.click();
                self.messages.truncate(previous_len);
                return Err(err);
            }
        };

        let completion: ChatCompletionResponse = match serde_json::from_value(response.body) {
            Ok(completion) => completion,
            Err(err) => {
                observability::CHAT_TURN_ERRORS.click();
                self.messages.truncate(previous_len);
                return Err(Error::serialization(
                    format!("Failed to parse completion: {}", err),
                    Some(Box::new(err)),
                ));
            }
        };

        let Some(content) = completion.first_content().map(String::from) else {
            observability::CHAT_TURN_ERRORS.click();
            self.messages.truncate(previous_len);
            return Err(Error::serialization(
                "completion contained no choices".to_string(),
                None,
            ));
        };

        self.messages.push(ChatMessage::assistant(content.clone()));
        self.record_usage(completion.usage);
        Ok(content)
    }

    /// Assemble the request for the current history, prepending the system
    /// prompt when one is configured.
    fn build_request(&self) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        if let Some(prompt) = &self.config.system_prompt {
            messages.push(ChatMessage::system(prompt.clone()));
        }
        messages.extend(self.messages.iter().cloned());

        let mut request = ChatCompletionRequest::new(self.config.model.clone(), messages);
        request.temperature = self.config.temperature;
        request.max_tokens = self.config.max_tokens;
        request
    }

    fn record_usage(&mut self, usage: Option<Usage>) {
        self.request_count = self.request_count.saturating_add(1);
        self.last_turn_usage = usage;
        if let Some(usage) = usage {
            self.usage_totals = self.usage_totals + usage;
        }
    }

    /// Clears the conversation history.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Changes the model used for responses.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.config.model = model.into();
    }

    /// Returns the current model.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sets or clears the system prompt.
    pub fn set_system_prompt(&mut self, prompt: Option<String>) {
        self.config.system_prompt = prompt;
    }

    /// Returns the current system prompt, if any.
    pub fn system_prompt(&self) -> Option<&str> {
        self.config.system_prompt.as_deref()
    }

    /// Sets the sampling temperature.
    pub fn set_temperature(&mut self, temperature: Option<f32>) {
        self.config.temperature = temperature;
    }

    /// Sets the maximum tokens per response.
    pub fn set_max_tokens(&mut self, max_tokens: Option<u32>) {
        self.config.max_tokens = max_tokens;
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.config.model.clone(),
            message_count: self.message_count(),
            system_prompt: self.config.system_prompt.clone(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            total_prompt_tokens: self.usage_totals.prompt_tokens,
            total_completion_tokens: self.usage_totals.completion_tokens,
            total_requests: self.request_count,
            last_turn_usage: self.last_turn_usage,
        }
    }
}
