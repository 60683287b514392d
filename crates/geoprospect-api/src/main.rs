use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use geoprospect_analysis::SessionSettings;
use geoprospect_llm::GenerativeGateway;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geoprospect_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geoprospect_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();
    let config = api_config.analysis_config().context("Failed to load configuration")?;

    let gateway = match GenerativeGateway::from_config(&config) {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::error!("Cannot create model gateway: {}", e);
            tracing::error!(
                "Remediation:\n\
                1. Set GEOPROSPECT_API_KEY to a valid model service key\n\
                2. Optionally point GEOPROSPECT_API_BASE_URL at a compatible endpoint"
            );
            std::process::exit(1);
        }
    };

    tracing::info!(
        port = api_config.port,
        base_url = %config.api_base_url.value,
        chart_points = config.chart_points.value,
        "Starting GeoProspect API server"
    );

    let state = Arc::new(AppState::new(Arc::new(gateway), SessionSettings::from_config(&config)));

    let origin = api_config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid GEOPROSPECT_CORS_ORIGIN '{}'", api_config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let addr = api_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
