use anyhow::Result;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use storyline::config::{BotConfig, Environment};

fn init_tracing(log_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file outside production
    let api_env = std::env::var("API_ENV").unwrap_or_default();
    if Environment::parse(&api_env) != Environment::Production {
        dotenv::dotenv().ok();
    }

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not configured yet; use the LOG level if one is set
            init_tracing(&std::env::var("LOG").unwrap_or_else(|_| "info".to_string()), false);
            error!(
                error = %e,
                "Specify LINE_CHANNEL_SECRET and LINE_CHANNEL_ACCESS_TOKEN as environment variables."
            );
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log_level, config.is_production());

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "Bot terminated with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: BotConfig) -> Result<()> {
    info!(?config, "Application will start");
    storyline::server::serve(&config).await
}
