//! HTTP API gateway for Quick MD Helper.
//!
//! Serves the embedded web form, a health check, and the v1 JSON API that
//! runs clinical tasks against per-browser sessions.
//!
//! Built on Axum for high performance async HTTP.

pub mod api_v1;
pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::{Router, http::HeaderValue, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use quickmd_config::{AppConfig, TemplateStore};
use quickmd_pipeline::Pipeline;

/// Build the full router: health, v1 API, and the embedded frontend.
///
/// Layers applied:
/// - CORS restricted to the configured origin
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_full_router(api_state: api_v1::SharedApiState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    let cors = match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(AllowOrigin::exact(origin)),
        Err(e) => {
            warn!(origin = %cors_origin, error = %e, "Invalid CORS origin, cross-origin requests disabled");
            cors
        }
    };

    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(api_state))
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = quickmd_providers::router::build_from_config(&config).map_err(|e| {
        error!(error = %e, "Cannot start gateway");
        e
    })?;
    let pipeline = Pipeline::from_config(provider, &config);
    let templates = TemplateStore::load(&config.templates_path);

    let api_state = Arc::new(api_v1::ApiV1State::new(
        pipeline,
        templates,
        config.gateway.max_sessions,
    ));
    let app = build_full_router(api_state, &config.gateway.cors_origin);

    info!(
        address = %addr,
        provider = %config.provider,
        model = %config.model,
        "Quick MD Helper gateway starting"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
