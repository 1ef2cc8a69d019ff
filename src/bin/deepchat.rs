//! Interactive chat application for conversing with DeepSeek.
//!
//! This binary provides a REPL interface for chatting with DeepSeek models.
//! Requests are authenticated with the key from the `DEEPSEEK_API_KEY`
//! environment variable.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! deepchat
//!
//! # Specify a model
//! deepchat --model deepseek-reasoner
//!
//! # Set a system prompt
//! deepchat --system "You are a helpful coding assistant"
//!
//! # Point at a local proxy instead of the public API
//! deepchat --base-url http://localhost:5173/
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear conversation history
//! - `/model <name>` - Change the model
//! - `/system [prompt]` - Set or clear system prompt
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application
//!
//! Ctrl+C cancels an in-flight request without killing the session.

use std::sync::{Arc, Mutex};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio_util::sync::CancellationToken;

use deepchat::chat::{ChatArgs, ChatCommand, ChatConfig, ChatSession, help_text, parse_command};
use deepchat::{ClientConfig, DeepSeek};

/// Main entry point for the deepchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("deepchat [OPTIONS]");
    let base_url = args.base_url.clone();
    let config = ChatConfig::from(args);

    let mut client_config = ClientConfig::new();
    if let Some(base_url) = base_url {
        client_config = client_config.with_base_url(base_url);
    }
    let client = DeepSeek::with_config(client_config)?;
    let mut session = ChatSession::new(client, config);
    let mut rl = DefaultEditor::new()?;

    // Cancellation for the in-flight request, swapped fresh each turn.
    let cancel = Arc::new(Mutex::new(CancellationToken::new()));
    let cancel_handle = cancel.clone();
    ctrlc::set_handler(move || {
        cancel_handle.lock().unwrap().cancel();
    })?;

    println!("DeepSeek Chat (model: {})", session.model());
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            println!("    Conversation cleared.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Model(model_name) => {
                            session.set_model(model_name.clone());
                            println!("    Model changed to: {}", model_name);
                        }
                        ChatCommand::System(prompt) => {
                            session.set_system_prompt(prompt.clone());
                            match prompt {
                                Some(p) => println!("    System prompt set to: {}", p),
                                None => println!("    System prompt cleared."),
                            }
                        }
                        ChatCommand::MaxTokens(value) => {
                            session.set_max_tokens(Some(value));
                            println!("    max_tokens set to {value}");
                        }
                        ChatCommand::ClearMaxTokens => {
                            session.set_max_tokens(None);
                            println!("    max_tokens reset to model default");
                        }
                        ChatCommand::Temperature(value) => {
                            session.set_temperature(Some(value));
                            println!("    temperature set to {:.2}", value);
                        }
                        ChatCommand::ClearTemperature => {
                            session.set_temperature(None);
                            println!("    temperature reset to model default");
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::Invalid(message) => {
                            eprintln!("    {}", message);
                        }
                    }
                    continue;
                }

                // Regular message - send to API
                let token = CancellationToken::new();
                *cancel.lock().unwrap() = token.clone();

                match session.send_cancellable(line, &token).await {
                    Ok(reply) => {
                        println!("DeepSeek: {}\n", reply);
                    }
                    Err(e) if e.is_abort() => {
                        println!("\n    (request cancelled)");
                    }
                    Err(e) if e.is_auth() => {
                        eprintln!("    {}", e);
                        eprintln!("    Check DEEPSEEK_API_KEY and try again.");
                    }
                    Err(e) => {
                        eprintln!("    {}", e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Input error: {}", err);
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!("      Messages: {}", stats.message_count);
    match stats.system_prompt.as_deref() {
        Some(prompt) => println!("      System prompt: {}", prompt),
        None => println!("      System prompt: (none)"),
    }
    println!("      Temperature: {}", describe_float(stats.temperature));
    match stats.max_tokens {
        Some(value) => println!("      Max tokens: {}", value),
        None => println!("      Max tokens: default"),
    }
    println!(
        "      Total tokens: {} in / {} out ({} requests)",
        stats.total_prompt_tokens, stats.total_completion_tokens, stats.total_requests
    );
    if let Some(usage) = stats.last_turn_usage {
        println!(
            "      Last turn tokens: {} in / {} out",
            usage.prompt_tokens, usage.completion_tokens
        );
    }
}

fn describe_float(value: Option<f32>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "default".to_string())
}
