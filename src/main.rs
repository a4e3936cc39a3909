use anyhow::Context;
use passage_analyzer::config::Config;
use passage_analyzer::routes::{AppState, app};
use passage_analyzer::services::llm::GeminiClient;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;
    tracing::info!(model = %config.model.model_name, endpoint = %config.model.endpoint, "configuration loaded");

    let llm_client = Arc::new(GeminiClient::new(config.model).context("building model client")?);

    let app_state = AppState { llm_client };

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
