//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use storyline::bot::IntentDispatcher;
use storyline::dialogue::InMemoryConversationStore;
use storyline::errors::{NewsError, StoryError};
use storyline::line::LineMessenger;
use storyline::news::{NewsArticle, NewsClient, NewsResponse};
use storyline::story::StoryClient;

/// Canned outcome for the fake news client
#[derive(Clone)]
pub enum NewsOutcome {
    Response(NewsResponse),
    Status(u16),
}

pub struct FakeNews {
    pub outcome: NewsOutcome,
    pub calls: Mutex<Vec<String>>,
}

impl FakeNews {
    pub fn new(outcome: NewsOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(articles: Vec<NewsArticle>) -> Arc<Self> {
        Self::new(NewsOutcome::Response(NewsResponse {
            status: "ok".to_string(),
            total_results: Some(articles.len() as u64),
            articles,
            ..Default::default()
        }))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsClient for FakeNews {
    async fn search(&self, keyword: &str) -> Result<NewsResponse, NewsError> {
        self.calls.lock().unwrap().push(keyword.to_string());
        match &self.outcome {
            NewsOutcome::Response(response) => Ok(response.clone()),
            NewsOutcome::Status(status) => Err(NewsError::Status {
                status: *status,
                body: "upstream down".to_string(),
            }),
        }
    }
}

pub struct FakeStory {
    pub outcome: Result<String, StoryError>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeStory {
    pub fn new(outcome: Result<String, StoryError>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryClient for FakeStory {
    async fn generate(&self, prompt: &str, user_id: &str) -> Result<String, StoryError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), user_id.to_string()));
        self.outcome.clone()
    }
}

/// Records replies instead of sending them
#[derive(Default)]
pub struct RecordingMessenger {
    pub replies: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingMessenger {
    pub fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl LineMessenger for RecordingMessenger {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        self.replies
            .lock()
            .unwrap()
            .push((reply_token.to_string(), text.to_string()));
        if self.fail {
            anyhow::bail!("reply API unavailable");
        }
        Ok(())
    }
}

pub fn article(title: &str, description: &str, url: &str) -> NewsArticle {
    NewsArticle {
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        url: Some(url.to_string()),
    }
}

pub fn dispatcher(
    news: Arc<FakeNews>,
    story: Arc<FakeStory>,
    store: Arc<InMemoryConversationStore>,
) -> IntentDispatcher {
    IntentDispatcher::new(news, story, store, "zh-TW").with_rng_seed(7)
}
