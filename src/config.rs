use crate::llm::ModelConfig;
use crate::youtube::YouTubeConfig;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the Study Scout service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generative model settings
    pub model: ModelConfig,

    /// Video provider settings
    pub youtube: YouTubeConfig,

    /// Pipeline behavior settings
    pub pipeline: PipelineConfig,

    /// HTTP server settings
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Skip the relevance verification pass and return tier-sorted
    /// candidates directly ("fast path")
    pub skip_verification: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            skip_verification: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind the HTTP server on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl Config {
    /// Load configuration from file, falling back to environment variables
    pub fn load() -> Result<Self> {
        let config_paths = ["study-scout.toml", "config/study-scout.toml"];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(mut config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config.apply_env();
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::from_env())
    }

    /// Load configuration from an explicit file path, then overlay env vars
    pub fn load_from(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&config_str)?;
        tracing::info!("📄 Loaded configuration from: {}", path);
        config.apply_env();
        Ok(config)
    }

    /// Build configuration from environment variables alone
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables onto the current configuration
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                self.model.api_key = Some(key);
            }
        }

        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.is_empty() {
                self.model.model = model;
            }
        }

        if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
            if !key.is_empty() {
                self.youtube.api_key = Some(key);
            }
        }

        if let Ok(skip) = std::env::var("SKIP_VERIFICATION") {
            self.pipeline.skip_verification =
                matches!(skip.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.api_key.is_none() {
            return Err(anyhow!(
                "GEMINI_API_KEY is required (set it in the environment or config file)"
            ));
        }

        if self.youtube.api_key.is_none() {
            tracing::warn!("⚠️ YOUTUBE_API_KEY not set; sessions will return no videos");
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Study Scout Configuration:\n\
            - Model: {}\n\
            - YouTube API: {}\n\
            - Verification: {}\n\
            - Port: {}",
            self.model.model,
            if self.youtube.api_key.is_some() {
                "configured"
            } else {
                "not configured"
            },
            if self.pipeline.skip_verification {
                "skipped (fast path)"
            } else {
                "enabled"
            },
            self.server.port
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_model_key(mut self, key: String) -> Self {
        self.config.model.api_key = Some(key);
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.config.model.model = model;
        self
    }

    pub fn with_youtube_key(mut self, key: String) -> Self {
        self.config.youtube.api_key = Some(key);
        self
    }

    pub fn skip_verification(mut self, skip: bool) -> Self {
        self.config.pipeline.skip_verification = skip;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
