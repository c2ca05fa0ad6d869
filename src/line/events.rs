//! LINE webhook payload decoding.
//!
//! Only text messages matter to the bot. Each event is decoded on its own:
//! unknown event, message, or source types decode into an `Other` variant, and
//! an event that does not decode at all is logged and skipped, so one bad event
//! never costs the rest of the delivery its replies.

use serde::Deserialize;
use tracing::warn;

use crate::errors::WebhookError;

use super::signature::verify_signature;

/// Top-level webhook request body; events are decoded one by one
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    Message(MessageEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    pub message: MessageContent,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Where an event came from; `user_id` can be absent in groups and rooms
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

impl EventSource {
    /// Key for per-sender conversation state: the user, else the group or room
    pub fn conversation_key(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or(self.group_id.as_deref())
            .or(self.room_id.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text {
        #[serde(default)]
        id: Option<String>,
        text: String,
    },
    #[serde(other)]
    Other,
}

/// A text message the bot should answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessageEvent {
    pub text: String,
    /// Sender's user id, or the group or room id when LINE withholds it
    pub user_id: String,
    pub reply_token: String,
}

/// Verifies and decodes webhook deliveries for one channel
#[derive(Clone)]
pub struct WebhookParser {
    channel_secret: String,
}

impl WebhookParser {
    pub fn new(channel_secret: impl Into<String>) -> Self {
        Self {
            channel_secret: channel_secret.into(),
        }
    }

    /// Check the signature, then decode the events in delivery order
    ///
    /// Only the signature can fail a delivery. A body that is not a webhook
    /// payload yields no events, and undecodable events are dropped.
    pub fn parse(&self, body: &[u8], signature: &str) -> Result<Vec<WebhookEvent>, WebhookError> {
        if !verify_signature(&self.channel_secret, body, signature) {
            return Err(WebhookError::InvalidSignature);
        }

        let payload: WebhookBody = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Ignoring undecodable webhook body");
                return Ok(Vec::new());
            }
        };

        Ok(payload
            .events
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_json::from_value(raw) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed webhook event");
                    None
                }
            })
            .collect())
    }
}

/// Keep the events the bot answers: text messages with a reply token and a sender
pub fn text_messages(events: &[WebhookEvent]) -> Vec<TextMessageEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            WebhookEvent::Message(MessageEvent {
                reply_token: Some(reply_token),
                source: Some(source),
                message: MessageContent::Text { text, .. },
                ..
            }) => Some(TextMessageEvent {
                text: text.clone(),
                user_id: source.conversation_key()?.to_string(),
                reply_token: reply_token.clone(),
            }),
            _ => None,
        })
        .collect()
}
