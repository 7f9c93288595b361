//! Endpoint handlers: request bodies in, pipeline calls, JSON bodies out

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{info, warn};

use super::models::{FindVideosImageRequest, FindVideosRequest, HealthResponse};
use super::server::AppState;
use crate::error::SessionError;
use crate::pipeline::SessionInput;

/// Health check handler
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            model_configured: state.orchestrator.model_configured(),
            youtube_configured: state.orchestrator.video_configured(),
        }),
    )
}

/// Text session handler
pub async fn find_videos_handler(
    State(state): State<AppState>,
    Json(request): Json<FindVideosRequest>,
) -> Response {
    info!("📚 New text session ({} chars)", request.text.len());

    match state
        .orchestrator
        .run_session(SessionInput::Text(request.text))
        .await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Image session handler
pub async fn find_videos_image_handler(
    State(state): State<AppState>,
    Json(request): Json<FindVideosImageRequest>,
) -> Response {
    info!("🖼️ New image session");

    let input = match SessionInput::from_image_payload(&request.image) {
        Ok(input) => input,
        Err(e) => return error_response(e),
    };

    match state.orchestrator.run_session(input).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(error: SessionError) -> Response {
    let status = error.status_code();
    if status.is_server_error() {
        warn!("Session failed: {}", error);
    }
    (
        status,
        Json(serde_json::json!({ "error": error.to_string() })),
    )
        .into_response()
}
