/// Study Scout
///
/// Takes a confusing text passage or an image of study material and returns
/// a plain-language overview, key concepts, a study tip, and a small set of
/// verified, difficulty-ordered video recommendations.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod youtube;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::SessionError;
pub use crate::llm::{create_model, GenerativeModel, ModelConfig};
pub use crate::pipeline::{
    DifficultyTier, Orchestrator, SearchQuery, SessionInput, SessionResult, VideoCard,
};
pub use crate::youtube::{SearchHit, VideoDetails, VideoProvider, YouTubeClient, YouTubeConfig};
