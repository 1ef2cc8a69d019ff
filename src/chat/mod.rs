//! Chat application module for interactive conversations with DeepSeek.
//!
//! This module provides the chat page that the navigation shell mounts: a
//! REPL-style conversation loop built on top of the deepchat client. It
//! supports:
//!
//! - Single-turn request/response completions with history
//! - Slash commands for session control
//! - Configurable model, system prompt, and sampling parameters
//! - Cancellation of in-flight turns
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Core chat session management and API interaction
//! - [`commands`]: Slash command parsing and handling
//! - [`types`]: Wire types for the completion endpoint

mod commands;
mod config;
mod session;
mod types;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_MODEL};
pub use session::{ChatSession, SessionStats};
pub use types::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole, Usage,
};
