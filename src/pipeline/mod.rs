pub mod orchestrator;
pub mod search;
pub mod verify;

use serde::{Deserialize, Serialize};

pub use orchestrator::{Orchestrator, SessionInput};
pub use search::{search_all, search_candidates};
pub use verify::verify;

/// Ordinal difficulty classification attached to a query and propagated
/// to its resulting videos; drives final ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    pub fn rank(self) -> u8 {
        match self {
            DifficultyTier::Beginner => 0,
            DifficultyTier::Intermediate => 1,
            DifficultyTier::Advanced => 2,
        }
    }

    /// Parse a model-supplied label. Unrecognized labels rank as
    /// intermediate rather than failing the session.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "beginner" => DifficultyTier::Beginner,
            "advanced" => DifficultyTier::Advanced,
            _ => DifficultyTier::Intermediate,
        }
    }
}

/// One difficulty-tagged search query produced by the model
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub difficulty: DifficultyTier,
}

/// A video admitted past eligibility filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCard {
    /// Provider id; the deduplication key across the whole pipeline
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub duration: String,
    pub view_count: u64,
    pub difficulty: DifficultyTier,
}

/// Final payload for one session; lives for one HTTP response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub topic: String,
    pub overview: String,
    pub key_concepts: Vec<String>,
    pub videos: Vec<VideoCard>,
    pub study_tip: String,
}

/// Stable difficulty-ascending sort; original order preserved within a tier.
pub fn sort_by_tier(cards: &mut Vec<VideoCard>) {
    cards.sort_by_key(|c| c.difficulty.rank());
}
