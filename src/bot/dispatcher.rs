//! Intent Dispatcher module for turning a text message into a reply

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

// Import localization
use crate::localization::t_lang;

// Import intent classification
use crate::intent::{classify, Intent};

// Import dialogue types
use crate::dialogue::{ConversationState, ConversationStore};

// Import API clients
use crate::errors::StoryError;
use crate::news::{NewsArticle, NewsClient};
use crate::story::StoryClient;

// Import reply formatting
use super::reply_builder::format_news_article;

/// Drives the conversation: classifies each message, calls the news or story
/// API when needed, and produces the reply text.
pub struct IntentDispatcher {
    news: Arc<dyn NewsClient>,
    story: Arc<dyn StoryClient>,
    store: Arc<dyn ConversationStore>,
    language: String,
    rng: Mutex<StdRng>,
}

impl IntentDispatcher {
    pub fn new(
        news: Arc<dyn NewsClient>,
        story: Arc<dyn StoryClient>,
        store: Arc<dyn ConversationStore>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            news,
            story,
            store,
            language: language.into(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Use a deterministic article picker
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Produce the reply for one message from `user_id`
    ///
    /// Never fails: every upstream problem becomes a fixed reply and a log line.
    pub async fn handle(&self, text: &str, user_id: &str) -> String {
        let state = self.store.get(user_id).await;
        let intent = classify(text, state);
        debug!(user_id = %user_id, ?state, ?intent, "Classified message");

        match intent {
            Intent::ContinueStory { theme } => self.continue_story(&theme, user_id).await,
            Intent::NewsRequest { keyword } if keyword.is_empty() => {
                t_lang("news-keyword-missing", &self.language)
            }
            Intent::NewsRequest { keyword } => self.lookup_news(&keyword, user_id).await,
            Intent::StoryRequest => {
                self.store
                    .set(user_id, ConversationState::AwaitingStoryTheme)
                    .await;
                info!(user_id = %user_id, "Waiting for story theme");
                t_lang("story-theme-prompt", &self.language)
            }
            Intent::Fallback => t_lang("fallback-help", &self.language),
        }
    }

    async fn continue_story(&self, theme: &str, user_id: &str) -> String {
        info!(user_id = %user_id, theme = %theme, "Fetching story for theme");
        // Reset before the call so a dropped request cannot leave the user pending
        self.store.clear(user_id).await;
        let result = self.story.generate(theme, user_id).await;

        match result {
            Ok(story) => {
                info!(user_id = %user_id, chars = story.chars().count(), "Story generated");
                story
            }
            Err(StoryError::MissingStory) => {
                warn!(user_id = %user_id, "Story API returned no story");
                t_lang("story-unavailable", &self.language)
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "Failed to generate story");
                t_lang("story-failed", &self.language)
            }
        }
    }

    async fn lookup_news(&self, keyword: &str, user_id: &str) -> String {
        info!(user_id = %user_id, keyword = %keyword, "Fetching news");

        let articles = match self.news.search(keyword).await {
            Ok(response) if response.is_ok() => response.articles,
            Ok(response) => {
                warn!(user_id = %user_id, status = %response.status, "News search was not successful");
                Vec::new()
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "News search failed");
                Vec::new()
            }
        };

        match self.pick_article(&articles) {
            Some(article) => format_news_article(article, &self.language),
            None => t_lang("news-not-found", &self.language),
        }
    }

    fn pick_article<'a>(&self, articles: &'a [NewsArticle]) -> Option<&'a NewsArticle> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        articles.choose(&mut *rng)
    }
}
