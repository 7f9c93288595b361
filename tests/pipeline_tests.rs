//! End-to-end session tests driving the orchestrator with capability doubles.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use study_scout::{
    DifficultyTier, GenerativeModel, Orchestrator, SearchHit, SessionError, SessionInput,
    VideoDetails, VideoProvider,
};

const PLAN_JSON: &str = r#"{
    "topic": "Binary Search Trees",
    "overview": "A binary search tree keeps values ordered so lookups can discard half the remaining tree at each step.",
    "key_concepts": ["BST ordering invariant", "Tree traversal", "Balancing"],
    "study_tip": "Draw the tree after every insertion.",
    "search_queries": [
        {"query": "binary search tree basics", "difficulty": "beginner"},
        {"query": "bst operations explained", "difficulty": "intermediate"},
        {"query": "self balancing trees", "difficulty": "advanced"}
    ]
}"#;

/// Model double: answers the scoring prompt with a fixed score payload and
/// every other prompt with the lesson plan.
struct MockModel {
    plan: String,
    scores: String,
}

impl MockModel {
    fn new(plan: &str, scores: &str) -> Self {
        Self {
            plan: plan.to_string(),
            scores: scores.to_string(),
        }
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if prompt.contains("Rate each video") {
            Ok(self.scores.clone())
        } else {
            Ok(self.plan.clone())
        }
    }

    async fn generate_with_image(
        &self,
        _prompt: &str,
        _image_base64: &str,
        _mime_type: &str,
    ) -> Result<String> {
        Ok(self.plan.clone())
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// Provider double backed by static per-query hit lists.
struct MockProvider {
    hits: HashMap<String, Vec<SearchHit>>,
    details: HashMap<String, VideoDetails>,
}

impl MockProvider {
    fn new() -> Self {
        Self {
            hits: HashMap::new(),
            details: HashMap::new(),
        }
    }

    fn with_video(mut self, query: &str, id: &str) -> Self {
        self.hits.entry(query.to_string()).or_default().push(SearchHit {
            video_id: id.to_string(),
            title: format!("Video {}", id),
            channel_title: "Edu Channel".to_string(),
            thumbnail_url: Some(format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", id)),
        });
        self.details.insert(
            id.to_string(),
            VideoDetails {
                video_id: id.to_string(),
                duration: Some("PT8M20S".to_string()),
                view_count: 12345,
                embeddable: true,
                privacy_status: "public".to_string(),
                description: format!("All about {}", id),
                tags: vec!["education".to_string()],
            },
        );
        self
    }
}

#[async_trait]
impl VideoProvider for MockProvider {
    async fn search(&self, query: &str, _max_results: u32) -> Result<Vec<SearchHit>> {
        Ok(self.hits.get(query).cloned().unwrap_or_default())
    }

    async fn get_details(&self, ids: &[String]) -> Result<Vec<VideoDetails>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.details.get(id).cloned())
            .collect())
    }
}

fn standard_provider() -> MockProvider {
    MockProvider::new()
        .with_video("binary search tree basics", "b1")
        .with_video("binary search tree basics", "b2")
        .with_video("bst operations explained", "i1")
        .with_video("bst operations explained", "i2")
        .with_video("self balancing trees", "a1")
        .with_video("self balancing trees", "a2")
}

fn orchestrator(
    model: MockModel,
    provider: Option<MockProvider>,
    skip_verification: bool,
) -> Orchestrator {
    Orchestrator::new(
        Some(Arc::new(model)),
        provider.map(|p| Arc::new(p) as Arc<dyn VideoProvider>),
        skip_verification,
    )
}

#[tokio::test]
async fn test_full_session_all_relevant() {
    let model = MockModel::new(PLAN_JSON, r#"{"scores": [9, 8, 9, 7, 8, 10]}"#);
    let orch = orchestrator(model, Some(standard_provider()), false);

    let result = orch
        .run_session(SessionInput::Text(
            "I don't understand binary search trees".to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(result.topic, "Binary Search Trees");
    assert!(!result.overview.is_empty());
    assert_eq!(result.key_concepts.len(), 3);
    assert!(!result.study_tip.is_empty());

    // At most 4 videos, unique ids, difficulty-ascending
    assert!(result.videos.len() <= 4);
    assert!(!result.videos.is_empty());
    let mut seen = std::collections::HashSet::new();
    for video in &result.videos {
        assert!(seen.insert(video.video_id.clone()));
    }
    let ranks: Vec<u8> = result.videos.iter().map(|v| v.difficulty.rank()).collect();
    let mut sorted = ranks.clone();
    sorted.sort_unstable();
    assert_eq!(ranks, sorted);

    // Metadata came through the normalizer
    assert_eq!(result.videos[0].duration, "8:20");
    assert_eq!(result.videos[0].view_count, 12345);
}

#[tokio::test]
async fn test_fast_path_skips_scoring() {
    // Scores that would reject everything; the fast path must ignore them
    let model = MockModel::new(PLAN_JSON, r#"{"scores": [0, 0, 0, 0, 0, 0]}"#);
    let orch = orchestrator(model, Some(standard_provider()), true);

    let result = orch
        .run_session(SessionInput::Text("bst".to_string()))
        .await
        .unwrap();

    assert_eq!(result.videos.len(), 4);
    assert_eq!(result.videos[0].difficulty, DifficultyTier::Beginner);
}

#[tokio::test]
async fn test_empty_text_is_invalid_input() {
    let model = MockModel::new(PLAN_JSON, "{}");
    let orch = orchestrator(model, Some(standard_provider()), false);

    let err = orch
        .run_session(SessionInput::Text("   ".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidInput(_)));
}

#[tokio::test]
async fn test_unconfigured_model_is_missing_credential() {
    let orch = Orchestrator::new(None, None, false);
    let err = orch
        .run_session(SessionInput::Text("anything".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::MissingCredential));
}

#[tokio::test]
async fn test_missing_video_provider_still_returns_session() {
    let model = MockModel::new(PLAN_JSON, "{}");
    let orch = orchestrator(model, None, false);

    let result = orch
        .run_session(SessionInput::Text("bst".to_string()))
        .await
        .unwrap();

    assert!(result.videos.is_empty());
    assert_eq!(result.topic, "Binary Search Trees");
    assert!(!result.overview.is_empty());
    assert!(!result.study_tip.is_empty());
}

#[tokio::test]
async fn test_unparseable_plan_is_parse_error() {
    let model = MockModel::new("Sure! Here is a lesson plan for you.", "{}");
    let orch = orchestrator(model, Some(standard_provider()), false);

    let err = orch
        .run_session(SessionInput::Text("bst".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::UpstreamParse(_)));
}

#[tokio::test]
async fn test_fenced_plan_still_parses() {
    let fenced = format!("```json\n{}\n```", PLAN_JSON);
    let model = MockModel::new(&fenced, r#"{"scores": [9, 9, 9, 9, 9, 9]}"#);
    let orch = orchestrator(model, Some(standard_provider()), false);

    let result = orch
        .run_session(SessionInput::Text("bst".to_string()))
        .await
        .unwrap();
    assert_eq!(result.topic, "Binary Search Trees");
    assert!(!result.videos.is_empty());
}

#[tokio::test]
async fn test_duplicate_hit_across_queries_appears_once() {
    let provider = MockProvider::new()
        .with_video("binary search tree basics", "dup")
        .with_video("bst operations explained", "dup")
        .with_video("bst operations explained", "i1")
        .with_video("self balancing trees", "a1");
    let model = MockModel::new(PLAN_JSON, r#"{"scores": [9, 9, 9]}"#);
    let orch = orchestrator(model, Some(provider), false);

    let result = orch
        .run_session(SessionInput::Text("bst".to_string()))
        .await
        .unwrap();

    let dup_count = result
        .videos
        .iter()
        .filter(|v| v.video_id == "dup")
        .count();
    assert_eq!(dup_count, 1);
    // "dup" was first seen through the beginner query
    let dup = result.videos.iter().find(|v| v.video_id == "dup").unwrap();
    assert_eq!(dup.difficulty, DifficultyTier::Beginner);
}

#[tokio::test]
async fn test_image_session() {
    let model = MockModel::new(PLAN_JSON, r#"{"scores": [9, 9, 9, 9, 9, 9]}"#);
    let orch = orchestrator(model, Some(standard_provider()), false);

    let input = SessionInput::from_image_payload("data:image/png;base64,aGVsbG8=").unwrap();
    let result = orch.run_session(input).await.unwrap();

    assert_eq!(result.topic, "Binary Search Trees");
    assert!(!result.videos.is_empty());
}
