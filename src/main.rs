use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quizsmith::{
    api::{self, AppState},
    config::AppConfig,
    inference::GeminiService,
    quiz::QuizGenerator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // -----------------------------
    // Config / Dependencies
    // -----------------------------
    let config = AppConfig::from_env().context("failed to load configuration")?;
    info!(?config, "configuration loaded");

    let provider = Arc::new(GeminiService::new(&config.provider));
    let generator = QuizGenerator::new(provider, &config).context("failed to build quiz generator")?;

    let state = AppState {
        generator: Arc::new(generator),
    };

    // -----------------------------
    // Router
    // -----------------------------
    let app = api::app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "HTTP listening");
    info!("quiz endpoint at http://{}/quiz", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
