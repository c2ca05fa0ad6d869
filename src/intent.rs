//! # Intent Classification Module
//!
//! Maps an inbound message (plus the sender's conversation state) to what the
//! bot should do with it. Rules are checked in a fixed order and the first
//! match wins; a pending story theme outranks both trigger words.

use crate::dialogue::ConversationState;

/// Substring that selects a news search
pub const NEWS_TRIGGER: &str = "新聞";
/// Substring that starts the story flow
pub const STORY_TRIGGER: &str = "故事";

/// What the bot should do with a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Second turn of the story flow; the whole message is the theme
    ContinueStory { theme: String },
    /// News search; `keyword` is empty when the user only sent the trigger
    NewsRequest { keyword: String },
    /// First turn of the story flow
    StoryRequest,
    Fallback,
}

pub fn classify(text: &str, state: ConversationState) -> Intent {
    if state == ConversationState::AwaitingStoryTheme {
        return Intent::ContinueStory {
            theme: text.to_string(),
        };
    }

    if text.contains(NEWS_TRIGGER) {
        return Intent::NewsRequest {
            keyword: text.replace(NEWS_TRIGGER, "").trim().to_string(),
        };
    }

    if text.contains(STORY_TRIGGER) {
        return Intent::StoryRequest;
    }

    Intent::Fallback
}
