//! Conversation state tracking for the two-turn story flow.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Represents the conversation state for a single user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    /// The user's next message is the story theme
    AwaitingStoryTheme,
}

/// Keyed store of per-user conversation state
///
/// A user without an entry is `Idle`. Implementations only need to be as
/// durable as the deployment requires; the in-memory store loses everything on
/// restart and is not shared between processes.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, user_id: &str) -> ConversationState;

    async fn set(&self, user_id: &str, state: ConversationState);

    async fn clear(&self, user_id: &str) {
        self.set(user_id, ConversationState::Idle).await;
    }

    /// Number of users with a non-idle state
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Process-local conversation store
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    states: RwLock<HashMap<String, ConversationState>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, user_id: &str) -> ConversationState {
        self.states
            .read()
            .await
            .get(user_id)
            .copied()
            .unwrap_or_default()
    }

    async fn set(&self, user_id: &str, state: ConversationState) {
        let mut states = self.states.write().await;
        match state {
            ConversationState::Idle => {
                states.remove(user_id);
            }
            other => {
                states.insert(user_id.to_string(), other);
            }
        }
    }

    async fn len(&self) -> usize {
        self.states.read().await.len()
    }
}
