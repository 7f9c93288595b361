//! Candidate search and fan-out stages.
//!
//! Both stages are best-effort: a failed or unconfigured video provider
//! yields an empty result, never an error.

use super::{DifficultyTier, SearchQuery, VideoCard};
use crate::youtube::{format_duration, VideoProvider};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Extra hits requested beyond the limit to absorb eligibility filtering
const SEARCH_OVERFETCH: usize = 3;

/// Search for up to `limit` eligible videos for one query.
///
/// Over-fetches raw hits, batch-fetches their metadata in one round trip,
/// then admits hits in provider order while they are embeddable and public.
pub async fn search_candidates(
    provider: &dyn VideoProvider,
    query: &str,
    limit: usize,
    tier: DifficultyTier,
) -> Vec<VideoCard> {
    let hits = match provider.search(query, (limit + SEARCH_OVERFETCH) as u32).await {
        Ok(hits) => hits,
        Err(e) => {
            warn!("Video search failed for '{}': {}", query, e);
            return Vec::new();
        }
    };

    if hits.is_empty() {
        debug!("No search hits for '{}'", query);
        return Vec::new();
    }

    let ids: Vec<String> = hits.iter().map(|h| h.video_id.clone()).collect();
    let details = match provider.get_details(&ids).await {
        Ok(details) => details,
        Err(e) => {
            warn!("Video details lookup failed for '{}': {}", query, e);
            return Vec::new();
        }
    };

    let by_id: HashMap<&str, _> = details.iter().map(|d| (d.video_id.as_str(), d)).collect();

    let mut admitted = Vec::new();
    for hit in &hits {
        if admitted.len() >= limit {
            break;
        }
        let Some(detail) = by_id.get(hit.video_id.as_str()) else {
            continue;
        };
        if !detail.embeddable || detail.privacy_status != "public" {
            continue;
        }
        admitted.push(VideoCard {
            video_id: hit.video_id.clone(),
            title: hit.title.clone(),
            channel_title: hit.channel_title.clone(),
            url: format!("https://www.youtube.com/watch?v={}", hit.video_id),
            thumbnail_url: hit.thumbnail_url.clone(),
            duration: format_duration(detail.duration.as_deref()),
            view_count: detail.view_count,
            difficulty: tier,
        });
    }

    debug!("Admitted {}/{} hits for '{}'", admitted.len(), hits.len(), query);
    admitted
}

/// Run the candidate search concurrently for every query and merge the
/// results into one id-unique list.
///
/// Merge order is query order, then per-query provider order; the first
/// occurrence of a video id wins. Completion order of the in-flight
/// searches never affects the output.
pub async fn search_all(
    provider: Option<&dyn VideoProvider>,
    queries: &[SearchQuery],
    per_query_limit: usize,
) -> Vec<VideoCard> {
    let Some(provider) = provider else {
        debug!("Video provider not configured; skipping search");
        return Vec::new();
    };

    let searches = queries
        .iter()
        .map(|q| search_candidates(provider, &q.text, per_query_limit, q.difficulty));
    let per_query_results = join_all(searches).await;

    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for cards in per_query_results {
        for card in cards {
            if seen.insert(card.video_id.clone()) {
                merged.push(card);
            }
        }
    }
    merged
}
