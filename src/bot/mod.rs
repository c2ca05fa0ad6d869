//! Bot module for turning inbound chat messages into replies
//!
//! This module is split into two submodules:
//! - `dispatcher`: Classifies messages, drives the story dialogue and calls the APIs
//! - `reply_builder`: Formats reply texts

pub mod dispatcher;
pub mod reply_builder;

pub use dispatcher::IntentDispatcher;
pub use reply_builder::format_news_article;
