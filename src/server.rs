//! # Webhook Server Module
//!
//! HTTP surface of the bot: a health check and the LINE webhook endpoint.
//! Each delivery is verified, its text messages are answered one after the
//! other in delivery order, and the platform gets a fixed acknowledgment.
//! Only a missing or invalid signature produces a non-200 response.

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, error, info, warn, Level};

use crate::bot::IntentDispatcher;
use crate::config::BotConfig;
use crate::dialogue::InMemoryConversationStore;
use crate::errors::WebhookError;
use crate::line::{text_messages, LineMessagingClient, LineMessenger, WebhookParser};
use crate::news::HttpNewsClient;
use crate::story::HttpStoryClient;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub parser: WebhookParser,
    pub dispatcher: Arc<IntentDispatcher>,
    pub messenger: Arc<dyn LineMessenger>,
}

impl AppState {
    /// Wire the production HTTP clients and in-memory conversation store
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let news = HttpNewsClient::new(
            config.news_api_url.as_str(),
            config.news_api_key.as_str(),
            config.http_timeout,
        )
        .context("Failed to build news client")?;
        let story = HttpStoryClient::new(
            config.story_api_url.as_str(),
            config.story_api_key.as_str(),
            config.http_timeout,
        )
        .context("Failed to build story client")?;
        let messenger = LineMessagingClient::new(
            &config.line_api_url,
            config.channel_access_token.as_str(),
            config.http_timeout,
        )?;

        let dispatcher = IntentDispatcher::new(
            Arc::new(news),
            Arc::new(story),
            Arc::new(InMemoryConversationStore::new()),
            config.locale.as_str(),
        );

        Ok(Self {
            parser: WebhookParser::new(config.channel_secret.as_str()),
            dispatcher: Arc::new(dispatcher),
            messenger: Arc::new(messenger),
        })
    }
}

/// Build the router with request tracing
pub fn router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health))
        .route("/webhooks/line", post(line_webhook))
        .layer(trace_layer)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn line_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, (StatusCode, String)> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingSignature)
        .map_err(reject)?;

    let events = state.parser.parse(&body, signature).map_err(reject)?;
    debug!(event_count = events.len(), "Webhook delivery accepted");

    let messages = text_messages(&events);
    if messages.len() < events.len() {
        debug!(
            skipped = events.len() - messages.len(),
            "Skipped non-text events"
        );
    }

    for message in messages {
        info!(user_id = %message.user_id, "Received text message");
        let reply = state
            .dispatcher
            .handle(&message.text, &message.user_id)
            .await;

        if let Err(e) = state.messenger.reply(&message.reply_token, &reply).await {
            error!(user_id = %message.user_id, error = %e, "Failed to reply to LINE");
        }
    }

    Ok("OK")
}

fn reject(err: WebhookError) -> (StatusCode, String) {
    warn!(error = %err, "Rejected webhook delivery");
    (StatusCode::BAD_REQUEST, err.to_string())
}

/// Bind `0.0.0.0:<port>` and serve until Ctrl+C or SIGTERM
pub async fn serve(config: &BotConfig) -> Result<()> {
    let app = router(AppState::from_config(config)?);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {addr}"))?;
    info!(%addr, environment = ?config.environment, "Webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, initiating graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown");
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
