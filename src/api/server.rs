//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use crate::pipeline::Orchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Configure and start the HTTP server
pub async fn start_http_server(orchestrator: Arc<Orchestrator>, port: u16) -> Result<()> {
    info!("🚀 Starting HTTP server on port {}", port);

    let app_state = AppState { orchestrator };

    // Configure CORS to allow browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/api/find-videos", post(handlers::find_videos_handler))
        .route(
            "/api/find-videos-image",
            post(handlers::find_videos_image_handler),
        )
        // Health check endpoints (both paths for compatibility)
        .route("/health", get(handlers::health_handler))
        .route("/api/health", get(handlers::health_handler))
        .with_state(app_state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("🌐 API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
