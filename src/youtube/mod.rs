pub mod client;
pub mod duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::YouTubeClient;
pub use duration::format_duration;

/// Video provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// API key for the YouTube Data API (optional; sessions degrade to
    /// zero videos when absent)
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_seconds: 15,
        }
    }
}

/// One raw search hit, before eligibility filtering
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail_url: Option<String>,
}

/// Per-video metadata from one batched details lookup
#[derive(Debug, Clone, Default)]
pub struct VideoDetails {
    pub video_id: String,
    /// ISO-8601 duration string, e.g. `PT12M30S`
    pub duration: Option<String>,
    pub view_count: u64,
    pub embeddable: bool,
    pub privacy_status: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Trait for video search providers
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Search for videos matching a query, returning up to `max_results`
    /// hits in provider relevance order.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>>;

    /// Fetch metadata for a batch of video ids in one round trip.
    async fn get_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>>;
}
