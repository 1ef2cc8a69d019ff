//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use arrrg_derive::CommandLine;

/// Default model for chat sessions.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Command-line arguments for the deepchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: deepseek-chat)", "MODEL")]
    pub model: Option<String>,

    /// System prompt to set context for the conversation.
    #[arrrg(optional, "System prompt for the conversation", "PROMPT")]
    pub system: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: model default)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Base URL for the API.
    #[arrrg(optional, "Base URL for the API", "URL")]
    pub base_url: Option<String>,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: String,

    /// Optional system prompt to set conversation context.
    pub system_prompt: Option<String>,

    /// Optional sampling temperature.
    pub temperature: Option<f32>,

    /// Optional cap on generated tokens per response.
    pub max_tokens: Option<u32>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: deepseek-chat
    /// - No system prompt, temperature, or token cap
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum tokens per response.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            model: args.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            system_prompt: args.system,
            temperature: None,
            max_tokens: args.max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.system_prompt.is_none());
        assert!(config.temperature.is_none());
        assert!(config.max_tokens.is_none());
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::from(args);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.max_tokens.is_none());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("deepseek-reasoner".to_string()),
            system: Some("You are helpful.".to_string()),
            max_tokens: Some(8192),
            base_url: None,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model, "deepseek-reasoner");
        assert_eq!(config.system_prompt, Some("You are helpful.".to_string()));
        assert_eq!(config.max_tokens, Some(8192));
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model("deepseek-reasoner")
            .with_system_prompt("Test prompt")
            .with_temperature(Some(0.6))
            .with_max_tokens(Some(2048));
        assert_eq!(config.model, "deepseek-reasoner");
        assert_eq!(config.system_prompt, Some("Test prompt".to_string()));
        assert_eq!(config.temperature, Some(0.6));
        assert_eq!(config.max_tokens, Some(2048));
    }
}
