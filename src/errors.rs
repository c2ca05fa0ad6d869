//! # Error Types Module
//!
//! This module defines the error types used by the bot's configuration layer,
//! the webhook ingress, and the two upstream API clients. Upstream errors never
//! reach the end user: the dispatcher collapses them into fixed reply messages
//! and keeps the detail for the logs.

use thiserror::Error;

/// Errors raised while loading configuration from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    /// A variable is set but cannot be parsed
    #[error("invalid value {value:?} for environment variable {name}")]
    InvalidVar { name: &'static str, value: String },
}

/// Errors from the news search API
#[derive(Debug, Error)]
pub enum NewsError {
    /// Connection failure, timeout, or other transport problem
    #[error("news API transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success status with a body that is not a news API payload
    #[error("news API returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// Success status but the body could not be decoded
    #[error("news API response could not be decoded: {0}")]
    Decode(String),
}

/// Errors from the story generation API
///
/// Transport failures and non-success responses are kept apart so the logs
/// can tell them apart. The dispatcher gives `MissingStory` its own reply and
/// collapses every other variant into one failure message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoryError {
    /// Connection failure, timeout, or other transport problem
    #[error("story API transport error: {0}")]
    Transport(String),
    /// Any status other than 200
    #[error("story API returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
    /// 200 response whose body is not valid JSON
    #[error("story API response could not be decoded: {0}")]
    Decode(String),
    /// 200 response without a `story` field, or with a blank one
    #[error("story API response did not contain a story")]
    MissingStory,
}

/// Errors raised while accepting a LINE webhook delivery
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Missing signature")]
    MissingSignature,
    #[error("Invalid signature")]
    InvalidSignature,
}
