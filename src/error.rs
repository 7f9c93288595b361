use axum::http::StatusCode;
use thiserror::Error;

/// Session-level error taxonomy for the API boundary.
///
/// Video-provider failures never appear here: those degrade to empty or
/// unfiltered results inside the pipeline instead of surfacing.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Empty or missing text/image in the request
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Generative model credential is not configured
    #[error("generative model API key is not configured")]
    MissingCredential,

    /// Model responded, but not with well-formed structured data
    #[error("could not understand the model response, please try again")]
    UpstreamParse(String),

    /// Model call itself failed (network, quota, provider outage)
    #[error("upstream request failed: {0}")]
    Upstream(String),
}

impl SessionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SessionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SessionError::MissingCredential => StatusCode::UNAUTHORIZED,
            SessionError::UpstreamParse(_) | SessionError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
