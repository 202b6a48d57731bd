use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cv_pipeline::config::Config;
use cv_pipeline::pipeline::Pipeline;
use cv_pipeline::routes::build_router;
use cv_pipeline::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Malformed env values fail startup
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV pipeline v{}", env!("CARGO_PKG_VERSION"));

    let pipeline = Pipeline::from_config(&config)?;
    info!(
        llm = config.anthropic_api_key.is_some(),
        rich_converter = config.use_rich_converter,
        enhanced_extraction = config.enhanced_extraction,
        timeout_s = config.generation_timeout.as_secs(),
        converter_timeout_s = config.rich_converter_timeout.as_secs(),
        "pipeline initialized"
    );

    let app = build_router(AppState { pipeline })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once a frontend origin exists

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
