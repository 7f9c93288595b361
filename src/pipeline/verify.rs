//! Relevance verification stage.
//!
//! Asks the model to score how directly each candidate teaches the primary
//! key concept. Verification is an enhancement, never a hard dependency:
//! any model or parse failure falls back to the unfiltered candidate list,
//! re-sorted by difficulty.

use super::{sort_by_tier, VideoCard};
use crate::llm::GenerativeModel;
use crate::youtube::VideoProvider;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Minimum score for a candidate to count as verified
const RELEVANCE_THRESHOLD: i64 = 7;

/// Below this many survivors, relax the bar to top-2 by raw score
const MIN_VERIFIED: usize = 2;

/// Description excerpt length in the scoring prompt
const DESCRIPTION_CHARS: usize = 150;

/// Score candidates against the primary key concept and keep the relevant
/// ones, difficulty-ascending.
pub async fn verify(
    model: &dyn GenerativeModel,
    provider: Option<&dyn VideoProvider>,
    topic: &str,
    key_concepts: &[String],
    mut candidates: Vec<VideoCard>,
) -> Vec<VideoCard> {
    if candidates.is_empty() {
        return candidates;
    }

    // Enrich with descriptions for scoring; empty strings when the
    // provider is absent or the lookup fails.
    let mut descriptions: HashMap<String, String> = HashMap::new();
    if let Some(provider) = provider {
        let ids: Vec<String> = candidates.iter().map(|c| c.video_id.clone()).collect();
        match provider.get_details(&ids).await {
            Ok(details) => {
                for detail in details {
                    let mut text = detail.description;
                    if !detail.tags.is_empty() {
                        text.push_str("\nTags: ");
                        text.push_str(&detail.tags.join(", "));
                    }
                    descriptions.insert(detail.video_id, text);
                }
            }
            Err(e) => {
                warn!("Metadata enrichment failed, scoring on titles only: {}", e);
            }
        }
    }

    let primary_concept = key_concepts
        .first()
        .map(String::as_str)
        .unwrap_or("the topic");

    let prompt = build_scoring_prompt(topic, primary_concept, &candidates, &descriptions);

    let raw = match model.generate(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Relevance scoring call failed, returning unfiltered list: {}", e);
            sort_by_tier(&mut candidates);
            return candidates;
        }
    };

    let Some(scores) = parse_scores(&raw, candidates.len()) else {
        warn!("Could not parse relevance scores, returning unfiltered list");
        sort_by_tier(&mut candidates);
        return candidates;
    };

    debug!("Relevance scores: {:?}", scores);

    let mut kept: Vec<VideoCard> = candidates
        .iter()
        .zip(&scores)
        .filter(|(_, &score)| score >= RELEVANCE_THRESHOLD)
        .map(|(card, _)| card.clone())
        .collect();

    if kept.len() < MIN_VERIFIED {
        // A session with fewer than two videos is a worse outcome than a
        // borderline-relevant second video: relax to top-2 by raw score,
        // ties broken by original order.
        info!(
            "Only {} candidates scored >= {}, falling back to top {} by score",
            kept.len(),
            RELEVANCE_THRESHOLD,
            MIN_VERIFIED
        );
        let mut indexed: Vec<(usize, i64)> =
            scores.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let mut chosen: Vec<usize> = indexed
            .into_iter()
            .take(MIN_VERIFIED)
            .map(|(i, _)| i)
            .collect();
        chosen.sort_unstable();
        kept = chosen.into_iter().map(|i| candidates[i].clone()).collect();
    }

    sort_by_tier(&mut kept);
    kept
}

fn build_scoring_prompt(
    topic: &str,
    primary_concept: &str,
    candidates: &[VideoCard],
    descriptions: &HashMap<String, String>,
) -> String {
    let mut listing = String::new();
    for (i, card) in candidates.iter().enumerate() {
        let description = descriptions
            .get(&card.video_id)
            .map(String::as_str)
            .unwrap_or("");
        listing.push_str(&format!(
            "{}. Title: {}\n   Description: {}\n",
            i,
            card.title,
            truncate_chars(description, DESCRIPTION_CHARS)
        ));
    }

    format!(
        "A learner is studying \"{}\". Rate each video below on an integer scale \
         of 0-10 for how directly it teaches \"{}\".\n\
         Be strict: only give 7 or above when the video specifically covers that \
         concept; give low scores to videos that are off-topic or only loosely related.\n\n\
         {}\n\
         Respond ONLY with JSON of the form {{\"scores\": [s0, s1, ...]}} where the \
         array holds one integer per video, in the order listed above.",
        topic, primary_concept, listing
    )
}

/// Parse the model's score response into exactly `expected` integers.
///
/// Accepts `{"scores": [...]}` or a bare array. Missing positions default
/// to 0 and out-of-range values clamp into 0..=10; anything that is not
/// well-formed JSON is a parse failure.
fn parse_scores(raw: &str, expected: usize) -> Option<Vec<i64>> {
    let cleaned = super::orchestrator::extract_json(raw);
    let value: Value = serde_json::from_str(cleaned).ok()?;

    let array = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => map.get("scores")?.as_array()?.as_slice(),
        _ => return None,
    };

    let mut scores = Vec::with_capacity(expected);
    for i in 0..expected {
        let score = array
            .get(i)
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)))
            .unwrap_or(0);
        scores.push(score.clamp(0, 10));
    }
    Some(scores)
}

/// Truncate to at most `max` characters without splitting a code point.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
