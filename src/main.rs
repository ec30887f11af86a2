use anyhow::Result;
use filechat::{config, llm::EngineManager, server};
use std::sync::Arc;
use tracing::{info, warn};

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Determine log level: environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!("Starting filechat server with log level: {}", log_level);

    // Load the model once, before the listener accepts anything
    let inference_config = config.inference.clone();
    let engine = tokio::task::spawn_blocking(move || {
        let mut engine = EngineManager::new();
        engine.initialize(&inference_config);
        engine
    })
    .await?;

    if !engine.is_available() {
        warn!("Serving in degraded mode: every chat request will be refused");
    }

    server::run(config, Arc::new(engine)).await?;

    Ok(())
}
