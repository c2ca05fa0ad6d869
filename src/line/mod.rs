//! LINE platform module
//!
//! This module is split into several submodules:
//! - `signature`: Verifies the `X-Line-Signature` header
//! - `events`: Decodes webhook deliveries and extracts text messages
//! - `client`: Sends replies through the Messaging API

pub mod client;
pub mod events;
pub mod signature;

pub use client::{LineMessagingClient, LineMessenger};
pub use events::{text_messages, TextMessageEvent, WebhookEvent, WebhookParser};
pub use signature::verify_signature;
