pub mod gemini;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generative model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key (required to construct a provider)
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            max_tokens: 4096,
            temperature: 0.3,
            timeout_seconds: 15,
        }
    }
}

/// Trait for generative model capabilities
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate text from a plain prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text from a prompt plus one inline base64 image.
    async fn generate_with_image(
        &self,
        prompt: &str,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<String>;

    /// Cheap reachability probe for health reporting.
    async fn is_available(&self) -> bool;
}

/// Create a model instance based on configuration
pub fn create_model(config: &ModelConfig) -> Result<Box<dyn GenerativeModel>> {
    Ok(Box::new(gemini::GeminiModel::new(config.clone())?))
}
