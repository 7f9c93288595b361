//! Session orchestrator: raw learner input in, session result out.

use super::{search_all, sort_by_tier, verify, DifficultyTier, SearchQuery, SessionResult, VideoCard};
use crate::error::SessionError;
use crate::llm::GenerativeModel;
use crate::youtube::VideoProvider;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Per-query candidate cap for the fan-out stage
const PER_QUERY_LIMIT: usize = 2;

/// Maximum videos in the final payload
const MAX_VIDEOS: usize = 4;

/// Raw learner input for one session
#[derive(Debug, Clone)]
pub enum SessionInput {
    Text(String),
    Image { data: String, mime_type: String },
}

impl SessionInput {
    /// Build an image input from a data URL or a bare base64 string.
    pub fn from_image_payload(raw: &str) -> Result<Self, SessionError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SessionError::InvalidInput(
                "image must not be empty".to_string(),
            ));
        }

        let (mime_type, data) = if let Some(rest) = raw.strip_prefix("data:") {
            let Some((header, payload)) = rest.split_once(',') else {
                return Err(SessionError::InvalidInput(
                    "malformed data URL".to_string(),
                ));
            };
            let mime = header.split(';').next().unwrap_or("");
            let mime = if mime.is_empty() { "image/jpeg" } else { mime };
            (mime.to_string(), payload.to_string())
        } else {
            ("image/jpeg".to_string(), raw.to_string())
        };

        let looks_like_base64 = !data.is_empty()
            && data
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=' | '\n' | '\r'));
        if !looks_like_base64 {
            return Err(SessionError::InvalidInput(
                "image payload is not valid base64".to_string(),
            ));
        }

        Ok(SessionInput::Image { data, mime_type })
    }
}

/// Structured lesson plan returned by the model
#[derive(Debug, Deserialize)]
struct LessonPlan {
    #[serde(default)]
    topic: String,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    key_concepts: Vec<String>,
    #[serde(default)]
    study_tip: String,
    #[serde(default)]
    search_queries: Vec<RawQuery>,
}

#[derive(Debug, Deserialize)]
struct RawQuery {
    #[serde(default)]
    query: String,
    #[serde(default)]
    difficulty: String,
}

/// Drives one session: topic identification, fan-out search, optional
/// verification, final assembly.
pub struct Orchestrator {
    model: Option<Arc<dyn GenerativeModel>>,
    video: Option<Arc<dyn VideoProvider>>,
    skip_verification: bool,
}

impl Orchestrator {
    pub fn new(
        model: Option<Arc<dyn GenerativeModel>>,
        video: Option<Arc<dyn VideoProvider>>,
        skip_verification: bool,
    ) -> Self {
        Self {
            model,
            video,
            skip_verification,
        }
    }

    pub fn model_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn video_configured(&self) -> bool {
        self.video.is_some()
    }

    /// Run one end-to-end session.
    pub async fn run_session(&self, input: SessionInput) -> Result<SessionResult, SessionError> {
        let model = self
            .model
            .as_deref()
            .ok_or(SessionError::MissingCredential)?;

        let raw = match &input {
            SessionInput::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(SessionError::InvalidInput(
                        "text must not be empty".to_string(),
                    ));
                }
                model.generate(&text_prompt(text)).await
            }
            SessionInput::Image { data, mime_type } => {
                model
                    .generate_with_image(&image_prompt(), data, mime_type)
                    .await
            }
        }
        .map_err(|e| SessionError::Upstream(e.to_string()))?;

        let cleaned = extract_json(&raw);
        let plan: LessonPlan = serde_json::from_str(cleaned).map_err(|e| {
            warn!("Model response was not valid JSON: {}", e);
            SessionError::UpstreamParse(e.to_string())
        })?;

        info!(
            "Identified topic '{}' with {} search queries",
            plan.topic,
            plan.search_queries.len()
        );

        let queries: Vec<SearchQuery> = plan
            .search_queries
            .iter()
            .filter(|q| !q.query.trim().is_empty())
            .map(|q| SearchQuery {
                text: q.query.clone(),
                difficulty: DifficultyTier::from_label(&q.difficulty),
            })
            .collect();

        let mut videos = if queries.is_empty() {
            Vec::new()
        } else {
            search_all(self.video.as_deref(), &queries, PER_QUERY_LIMIT).await
        };

        info!("Fan-out produced {} candidates", videos.len());

        if !videos.is_empty() {
            if self.skip_verification {
                sort_by_tier(&mut videos);
            } else {
                videos = verify(
                    model,
                    self.video.as_deref(),
                    &plan.topic,
                    &plan.key_concepts,
                    videos,
                )
                .await;
            }
            videos.truncate(MAX_VIDEOS);
        }

        // The earlier stages keep ids unique, but re-check here so the
        // invariant holds no matter which path produced the list.
        let mut seen = HashSet::new();
        videos.retain(|v: &VideoCard| seen.insert(v.video_id.clone()));

        Ok(SessionResult {
            topic: plan.topic,
            overview: plan.overview,
            key_concepts: plan.key_concepts,
            videos,
            study_tip: plan.study_tip,
        })
    }
}

const RESPONSE_SCHEMA: &str = r#"Respond ONLY with JSON of this exact shape:
{
  "topic": "precise name of the topic",
  "overview": "2-3 sentence plain-language explanation",
  "key_concepts": ["concept 1", "concept 2", "concept 3"],
  "study_tip": "one practical study tip",
  "search_queries": [
    {"query": "...", "difficulty": "beginner"},
    {"query": "...", "difficulty": "intermediate"},
    {"query": "...", "difficulty": "advanced"}
  ]
}
Provide exactly 3 search_queries, all covering the SAME topic at different
depths. Where it helps, mention trusted educational channels (e.g. Khan
Academy, 3Blue1Brown, CrashCourse, MIT OpenCourseWare) in the query text."#;

fn text_prompt(text: &str) -> String {
    format!(
        "A learner is confused by the following study material. Identify the \
         precise topic it covers and help them learn it.\n\n\
         Material:\n{}\n\n{}",
        text, RESPONSE_SCHEMA
    )
}

fn image_prompt() -> String {
    format!(
        "A learner is confused by the attached image of study material (a \
         textbook page, slide, diagram, or problem). Identify the precise \
         topic it covers and help them learn it.\n\n{}",
        RESPONSE_SCHEMA
    )
}

/// Strip markdown code fences from a model response.
///
/// Models routinely wrap JSON in ``` fences despite instructions not to;
/// this is the single place that contract gets handled.
pub fn extract_json(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_fenced() {
        assert_eq!(extract_json("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(extract_json("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_unfenced() {
        assert_eq!(extract_json("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(extract_json("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_malformed_passes_through() {
        // Not this function's job to validate; the parse site reports it
        assert_eq!(extract_json("not json at all"), "not json at all");
        assert_eq!(extract_json("```json\nnot json\n```"), "not json");
    }

    #[test]
    fn test_image_payload_data_url() {
        let input = SessionInput::from_image_payload("data:image/png;base64,aGVsbG8=").unwrap();
        match input {
            SessionInput::Image { data, mime_type } => {
                assert_eq!(mime_type, "image/png");
                assert_eq!(data, "aGVsbG8=");
            }
            _ => panic!("expected image input"),
        }
    }

    #[test]
    fn test_image_payload_bare_base64_defaults_mime() {
        let input = SessionInput::from_image_payload("aGVsbG8=").unwrap();
        match input {
            SessionInput::Image { data, mime_type } => {
                assert_eq!(mime_type, "image/jpeg");
                assert_eq!(data, "aGVsbG8=");
            }
            _ => panic!("expected image input"),
        }
    }

    #[test]
    fn test_image_payload_rejects_empty_and_garbage() {
        assert!(SessionInput::from_image_payload("").is_err());
        assert!(SessionInput::from_image_payload("   ").is_err());
        assert!(SessionInput::from_image_payload("data:image/png;base64,").is_err());
        assert!(SessionInput::from_image_payload("not base64 at all!").is_err());
    }
}
