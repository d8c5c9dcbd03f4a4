use anyhow::{Context, Result};
use gitgrade::api::{self, AppState};
use gitgrade::{Config, Pipeline};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Also picks up `log` records from the library
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::load()?;
    let pipeline = Pipeline::from_config(&config).context("Failed to configure the analyzer")?;

    info!("GitGrade server starting");
    info!("Model: {} ({})", config.model_name(), config.model.provider);
    info!("GitHub API: {}", config.github.api_base);

    let app = api::router(AppState::new(pipeline))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!("Server listening on http://{}", config.server.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
