//! # News Lookup Module
//!
//! Keyword search against a NewsAPI-compatible endpoint. The response is
//! returned as parsed; deciding what counts as "no news" is left to the
//! dispatcher.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::NewsError;

/// A single article, taken verbatim from the news API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of a news search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
    /// Error code, present when `status` is `"error"`
    #[serde(default)]
    pub code: Option<String>,
    /// Error message, present when `status` is `"error"`
    #[serde(default)]
    pub message: Option<String>,
}

impl NewsResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Keyword search over a news provider
#[async_trait]
pub trait NewsClient: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<NewsResponse, NewsError>;
}

/// News client backed by a NewsAPI `everything` endpoint
pub struct HttpNewsClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpNewsClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NewsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl NewsClient for HttpNewsClient {
    async fn search(&self, keyword: &str) -> Result<NewsResponse, NewsError> {
        debug!(keyword = %keyword, "Searching news");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", keyword), ("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<NewsResponse>(&body) {
            Ok(parsed) => {
                if !parsed.is_ok() {
                    warn!(
                        status = status.as_u16(),
                        code = parsed.code.as_deref().unwrap_or(""),
                        message = parsed.message.as_deref().unwrap_or(""),
                        "News API reported an error"
                    );
                }
                Ok(parsed)
            }
            Err(_) if !status.is_success() => Err(NewsError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(NewsError::Decode(e.to_string())),
        }
    }
}
