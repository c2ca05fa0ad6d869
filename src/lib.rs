//! # Storyline LINE Bot
//!
//! A LINE chat bot that answers "新聞" (news) requests with a random article
//! from a news search API, and "故事" (story) requests with a two-turn dialogue
//! that ends in a generated short story.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod intent;
pub mod line;
pub mod localization;
pub mod news;
pub mod server;
pub mod story;
