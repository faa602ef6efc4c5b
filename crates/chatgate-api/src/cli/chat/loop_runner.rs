//! Main chat loop orchestration.
//!
//! Reads prompts, forwards them to the gateway with a spinner running, and
//! renders replies. Whitespace-only input is ignored. A failed request shows
//! the fixed client error reply and the loop keeps going.

use std::time::{Duration, Instant};

use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use chatgate_types::chat::{CLIENT_ERROR_REPLY, SessionHistory, SessionId};

use super::banner::print_welcome_banner;
use super::client::GatewayClient;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;
use super::transcript::{ChatTranscript, Speaker, preview};

/// Pick the session for this client run: the one given, or a fresh UUID v7.
pub fn resolve_session(session: Option<String>) -> anyhow::Result<SessionId> {
    match session {
        Some(raw) => raw
            .parse::<SessionId>()
            .with_context(|| format!("invalid --session value '{raw}'")),
        None => Ok(uuid::Uuid::now_v7()
            .to_string()
            .parse::<SessionId>()
            .context("generated session id rejected")?),
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message("Bot is typing...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// One-line summary of the gateway's side of a session.
fn gateway_history_note(history: Option<&SessionHistory>) -> String {
    match history {
        None => "Gateway holds no history for this session.".to_string(),
        Some(h) => {
            let context = h.messages.len().saturating_sub(1);
            format!(
                "Gateway: {} turn{}, {} message{} in context.",
                h.turns,
                if h.turns == 1 { "" } else { "s" },
                context,
                if context == 1 { "" } else { "s" },
            )
        }
    }
}

fn print_bot(renderer: &ChatRenderer, text: &str) {
    println!();
    println!("  {}", style("Bot").cyan().bold());
    println!("{}", renderer.render(text).trim_end());
    println!();
}

/// Run the interactive chat loop against a gateway.
pub async fn run_chat_loop(gateway_url: &str, session: Option<String>) -> anyhow::Result<()> {
    let client = GatewayClient::new(gateway_url);
    let mut session_id = resolve_session(session)?;
    let renderer = ChatRenderer::new();
    let mut transcript = ChatTranscript::new();

    print_welcome_banner(client.base_url(), session_id.as_str());

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::History => {
                    println!();
                    if transcript.is_empty() {
                        println!("  {}", style("No messages yet.").dim());
                    }
                    for entry in transcript.entries() {
                        let label = match entry.speaker {
                            Speaker::User => style(entry.speaker.to_string()).green(),
                            Speaker::Bot => style(entry.speaker.to_string()).cyan(),
                        };
                        println!("  {} {}", label.bold(), preview(&entry.text, 100));
                    }
                    match client.history(session_id.as_str()).await {
                        Ok(history) => println!(
                            "  {}",
                            style(gateway_history_note(history.as_ref())).dim()
                        ),
                        Err(e) => warn!(error = %e, "failed to fetch gateway history"),
                    }
                    println!();
                }
                ChatCommand::Reset => {
                    if let Err(e) = client.reset(session_id.as_str()).await {
                        warn!(error = %e, "failed to reset session on gateway");
                    }
                    session_id = resolve_session(None)?;
                    transcript.clear();
                    println!(
                        "\n  {} New session {}\n",
                        style("*").cyan().bold(),
                        style(session_id.as_str()).dim()
                    );
                }
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        transcript.push(Speaker::User, text.clone());

        let spinner = thinking_spinner();
        let started = Instant::now();
        let result = client.send(&text, session_id.as_str()).await;
        spinner.finish_and_clear();

        let reply = match result {
            Ok(response) => {
                debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    session_id = %response.session_id,
                    "reply received"
                );
                response.script
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                CLIENT_ERROR_REPLY.to_string()
            }
        };

        print_bot(&renderer, &reply);
        transcript.push(Speaker::Bot, reply);
    }

    chat_input.flush();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_session_uses_given_id() {
        let id = resolve_session(Some("my-session".to_string())).unwrap();
        assert_eq!(id.as_str(), "my-session");
    }

    #[test]
    fn test_resolve_session_rejects_invalid_id() {
        assert!(resolve_session(Some("bad id".to_string())).is_err());
    }

    #[test]
    fn test_gateway_history_note() {
        use chatgate_types::llm::Message;

        assert_eq!(
            gateway_history_note(None),
            "Gateway holds no history for this session."
        );

        let history = SessionHistory {
            session_id: "s".to_string(),
            turns: 1,
            messages: vec![
                Message::system("seed"),
                Message::user("hi"),
                Message::assistant("hello"),
            ],
        };
        assert_eq!(
            gateway_history_note(Some(&history)),
            "Gateway: 1 turn, 2 messages in context."
        );
    }

    #[test]
    fn test_resolve_session_generates_fresh_ids() {
        let a = resolve_session(None).unwrap();
        let b = resolve_session(None).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }
}
