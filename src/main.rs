use std::sync::Arc;

use safety_risk::api::{self, AppState};
use safety_risk::{AppConfig, RiskEngine};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "safety_risk=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 1. Weights, history cap and bind address from the environment
    let config = AppConfig::from_env()?;
    let engine = RiskEngine::new(config.weights.clone());
    tracing::info!(
        weights = ?engine.weights(),
        history_limit = config.history_limit,
        "risk engine ready"
    );

    // 2. Engine + history, shared across handlers
    let shared_state = Arc::new(AppState::new(engine, config.history_limit));
    let app = api::router(shared_state);

    // 3. Serve
    let addr = config.bind_address();
    tracing::info!("🚀 Safety API running on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
