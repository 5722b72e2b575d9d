//! Terminal chat surface.
//!
//! Talks to a running relay over `POST /api/chat`. The session id is a
//! fresh UUID v4 per process, and the transcript lives only in memory for
//! the lifetime of the session.

use std::time::Duration;

use console::style;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use crate::http::handlers::chat::ChatReply;

/// First line shown in every new session.
pub const GREETING: &str = "Hello! How can I help you today?";

/// Shown in place of a reply whenever the relay cannot answer.
pub const FALLBACK: &str = "Sorry, I am having trouble connecting.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub speaker: Speaker,
    pub text: String,
}

/// One chat session against a relay server.
pub struct ChatSurface {
    client: reqwest::Client,
    endpoint: String,
    session_id: String,
    transcript: Vec<TranscriptLine>,
}

impl ChatSurface {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
            session_id: Uuid::new_v4().to_string(),
            transcript: vec![TranscriptLine {
                speaker: Speaker::Bot,
                text: GREETING.to_string(),
            }],
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    /// Send one line and record both sides of the exchange.
    ///
    /// Blank input is ignored and returns `None`. The line is sent as typed;
    /// trimming only decides whether it is blank. Any failure, from a dead
    /// connection to a 500, records [`FALLBACK`] as the bot's line.
    pub async fn submit(&mut self, input: &str) -> Option<&TranscriptLine> {
        if input.trim().is_empty() {
            return None;
        }

        self.transcript.push(TranscriptLine {
            speaker: Speaker::User,
            text: input.to_string(),
        });

        let text = match self.send(input).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!(error = %e, "Relay request failed");
                FALLBACK.to_string()
            }
        };

        self.transcript.push(TranscriptLine {
            speaker: Speaker::Bot,
            text,
        });
        self.transcript.last()
    }

    async fn send(&self, message: &str) -> Result<String, reqwest::Error> {
        let reply: ChatReply = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "message": message, "sessionId": self.session_id }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(reply.reply)
    }
}

/// Run the interactive loop until EOF or `/quit`.
pub async fn run(base_url: &str) -> anyhow::Result<()> {
    let mut surface = ChatSurface::new(base_url)?;

    println!();
    println!(
        "  {} {}",
        style("relaybot").cyan().bold(),
        style(base_url).dim()
    );
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(&surface.session_id()[..8]).dim()
    );
    println!("  {}", style("Type /quit or press Ctrl+D to exit").dim());
    println!();
    println!("  {} {}", style("bot>").green().bold(), GREETING);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("  {} ", style("you>").cyan().bold());
        std::io::Write::flush(&mut std::io::stdout())?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        if line.trim() == "/quit" {
            break;
        }

        if let Some(reply) = surface.submit(&line).await {
            let label = if reply.text == FALLBACK {
                style("bot>").yellow().bold()
            } else {
                style("bot>").green().bold()
            };
            println!("  {} {}", label, reply.text);
        }
    }

    println!("  {}", style("Session ended.").dim());
    Ok(())
}
