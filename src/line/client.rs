//! LINE Messaging API reply client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// LINE rejects text messages longer than this many characters
pub const MAX_TEXT_CHARS: usize = 5000;

/// Sends reply messages back through the messaging platform
#[async_trait]
pub trait LineMessenger: Send + Sync {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyMessageRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Reply client authenticated with the channel access token
pub struct LineMessagingClient {
    client: reqwest::Client,
    reply_url: String,
    access_token: String,
}

impl LineMessagingClient {
    pub fn new(api_base: &str, access_token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build LINE HTTP client")?;
        Ok(Self {
            client,
            reply_url: format!("{}/v2/bot/message/reply", api_base.trim_end_matches('/')),
            access_token: access_token.into(),
        })
    }
}

#[async_trait]
impl LineMessenger for LineMessagingClient {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        let text = truncate_chars(text, MAX_TEXT_CHARS);
        let request = ReplyMessageRequest {
            reply_token,
            messages: vec![TextMessage { kind: "text", text }],
        };

        let response = self
            .client
            .post(&self.reply_url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .context("Failed to send LINE reply")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LINE reply API returned {status}: {body}");
        }

        debug!(reply_token = %reply_token, "Reply sent");
        Ok(())
    }
}

/// Cut `text` to at most `max` characters on a char boundary
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
