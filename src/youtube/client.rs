use super::{SearchHit, VideoDetails, VideoProvider, YouTubeConfig};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API v3 client
pub struct YouTubeClient {
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId", default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchSnippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize, Default)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Option<VideoSnippet>,
    #[serde(rename = "contentDetails", default)]
    content_details: Option<ContentDetails>,
    #[serde(default)]
    statistics: Option<Statistics>,
    #[serde(default)]
    status: Option<VideoStatus>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount", default)]
    view_count: String,
}

#[derive(Debug, Deserialize)]
struct VideoStatus {
    #[serde(default)]
    embeddable: bool,
    #[serde(rename = "privacyStatus", default)]
    privacy_status: String,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("YouTube API key not configured"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { api_key, client })
    }
}

#[async_trait]
impl VideoProvider for YouTubeClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>> {
        // Fixed search profile: medium-length, English, strict safe-search,
        // embeddable-only. These are policy constants, not tunables.
        let url = format!(
            "{}/search?part=snippet&type=video&videoDuration=medium&relevanceLanguage=en\
             &safeSearch=strict&videoEmbeddable=true&maxResults={}&q={}&key={}",
            API_BASE,
            max_results,
            urlencoding::encode(query),
            self.api_key
        );

        debug!("Searching YouTube for: {}", query);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("YouTube search API error {}: {}", status, text));
        }

        let data: SearchResponse = response.json().await?;

        let hits = data
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let thumbnail_url = item
                    .snippet
                    .thumbnails
                    .medium
                    .or(item.snippet.thumbnails.default)
                    .map(|t| t.url);
                Some(SearchHit {
                    video_id,
                    title: item.snippet.title,
                    channel_title: item.snippet.channel_title,
                    thumbnail_url,
                })
            })
            .collect();

        Ok(hits)
    }

    async fn get_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/videos?part=snippet,contentDetails,statistics,status&id={}&key={}",
            API_BASE,
            ids.join(","),
            self.api_key
        );

        debug!("Fetching details for {} videos", ids.len());

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("YouTube videos API error {}: {}", status, text));
        }

        let data: VideosResponse = response.json().await?;

        let details = data
            .items
            .into_iter()
            .map(|item| {
                let snippet = item.snippet.unwrap_or(VideoSnippet {
                    description: String::new(),
                    tags: Vec::new(),
                });
                let status = item.status.unwrap_or(VideoStatus {
                    embeddable: false,
                    privacy_status: String::new(),
                });
                VideoDetails {
                    video_id: item.id,
                    duration: item.content_details.and_then(|d| d.duration),
                    view_count: item
                        .statistics
                        .map(|s| s.view_count.parse().unwrap_or(0))
                        .unwrap_or(0),
                    embeddable: status.embeddable,
                    privacy_status: status.privacy_status,
                    description: snippet.description,
                    tags: snippet.tags,
                }
            })
            .collect();

        Ok(details)
    }
}
