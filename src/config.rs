//! # Bot Configuration Module
//!
//! This module defines the runtime configuration for the bot, loaded from
//! environment variables, together with the defaults for every optional
//! setting.

use std::fmt;
use std::time::Duration;

use crate::errors::ConfigError;

// Defaults for optional settings
pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_STORY_API_URL: &str = "https://api.gemini.example.com/v1/generate_story";
pub const DEFAULT_LINE_API_URL: &str = "https://api.line.me";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOCALE: &str = "zh-TW";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Deployment environment, taken from `API_ENV`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Production,
    Develop,
    Other(String),
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "production" => Environment::Production,
            "develop" | "" => Environment::Develop,
            other => Environment::Other(other.to_string()),
        }
    }
}

/// Everything the bot needs to start serving
#[derive(Clone)]
pub struct BotConfig {
    /// LINE channel secret, the HMAC key for webhook signatures
    pub channel_secret: String,
    /// LINE channel access token for the reply API
    pub channel_access_token: String,
    pub news_api_key: String,
    pub story_api_key: String,
    pub news_api_url: String,
    pub story_api_url: String,
    /// Base URL of the LINE Messaging API
    pub line_api_url: String,
    /// Tracing filter used when `RUST_LOG` is not set
    pub log_level: String,
    pub port: u16,
    pub environment: Environment,
    /// Language of the bot's replies
    pub locale: String,
    /// Timeout applied to every outbound HTTP request
    pub http_timeout: Duration,
}

impl BotConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Blank values are treated as unset. The LINE channel secret and access
    /// token are required; everything else has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::MissingVar(name));

        let channel_secret = required("LINE_CHANNEL_SECRET")?;
        let channel_access_token = required("LINE_CHANNEL_ACCESS_TOKEN")?;

        let port = match get("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidVar {
                        name: "HTTP_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            channel_secret,
            channel_access_token,
            news_api_key: get("NEWS_API_KEY").unwrap_or_default(),
            story_api_key: get("GMINI_API_KEY").unwrap_or_default(),
            news_api_url: get("NEWS_API_URL").unwrap_or_else(|| DEFAULT_NEWS_API_URL.to_string()),
            story_api_url: get("STORY_API_URL")
                .unwrap_or_else(|| DEFAULT_STORY_API_URL.to_string()),
            line_api_url: get("LINE_API_URL").unwrap_or_else(|| DEFAULT_LINE_API_URL.to_string()),
            log_level: get("LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            port,
            environment: Environment::parse(&get("API_ENV").unwrap_or_default()),
            locale: get("BOT_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("channel_secret", &"<redacted>")
            .field("channel_access_token", &"<redacted>")
            .field("news_api_key", &"<redacted>")
            .field("story_api_key", &"<redacted>")
            .field("news_api_url", &self.news_api_url)
            .field("story_api_url", &self.story_api_url)
            .field("line_api_url", &self.line_api_url)
            .field("log_level", &self.log_level)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("locale", &self.locale)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}
