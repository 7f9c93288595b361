//! API data models

use serde::{Deserialize, Serialize};

/// Request body for POST /api/find-videos
#[derive(Debug, Deserialize)]
pub struct FindVideosRequest {
    #[serde(default)]
    pub text: String,
}

/// Request body for POST /api/find-videos-image
#[derive(Debug, Deserialize)]
pub struct FindVideosImageRequest {
    /// Data URL (`data:image/png;base64,...`) or bare base64 string
    #[serde(default)]
    pub image: String,
}

/// Response body for GET /api/health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_configured: bool,
    pub youtube_configured: bool,
}
