//! # Story Generation Module
//!
//! Prompt-based story generation over HTTP. Every failure mode comes back as a
//! [`StoryError`]; nothing in here panics or escapes the `Result`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::errors::StoryError;

#[derive(Debug, Serialize)]
struct StoryRequest<'a> {
    prompt: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct StoryResponse {
    #[serde(default)]
    story: Option<String>,
}

/// Generates a short story from a prompt
#[async_trait]
pub trait StoryClient: Send + Sync {
    async fn generate(&self, prompt: &str, user_id: &str) -> Result<String, StoryError>;
}

/// Story client for the bearer-authenticated generation endpoint
pub struct HttpStoryClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpStoryClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoryError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl StoryClient for HttpStoryClient {
    async fn generate(&self, prompt: &str, user_id: &str) -> Result<String, StoryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&StoryRequest { prompt, user_id })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Exception when calling story API");
                StoryError::Transport(e.to_string())
            })?;

        let status = response.status();
        info!(status = status.as_u16(), "Story API response status");

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read story API response body");
            StoryError::Transport(e.to_string())
        })?;

        if status != reqwest::StatusCode::OK {
            error!(status = status.as_u16(), body = %body, "Error from story API");
            return Err(StoryError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: StoryResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %body, "Story API returned an undecodable body");
            StoryError::Decode(e.to_string())
        })?;

        // A blank story cannot be sent as a reply
        parsed
            .story
            .filter(|story| !story.trim().is_empty())
            .ok_or(StoryError::MissingStory)
    }
}
