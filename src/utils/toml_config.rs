//! TOML-based configuration
//!
//! Models, retry behaviour, research and drafting knobs, image model
//! capabilities and logging are declared in a TOML file (`yit.toml`).
//! Every field has a default, so an empty file (or no file at all) is a
//! working configuration. Secrets are never stored in the file; it names
//! the environment variable to read them from.

use crate::agents::author::{
    DEFAULT_AUTHOR_MODEL, DEFAULT_CASE_STUDY_COUNT, DEFAULT_THINKING_BUDGET,
};
use crate::agents::investigator::{DEFAULT_MIN_REPORT_CHARS, DEFAULT_RESEARCH_MODEL};
use crate::llm::capabilities::{ImageModel, ImageModelCatalog, GEMINI_25_FLASH_IMAGE};
use crate::llm::gemini::GEMINI_API_BASE_URL;
use crate::llm::retry::RetryPolicy;
use crate::media::image::DEFAULT_IMAGE_STYLE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure loaded from yit.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YitConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub research: ResearchConfig,

    #[serde(default)]
    pub drafting: DraftingConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============= API Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Environment variable name containing the Gemini API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_base_url() -> String {
    GEMINI_API_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
        }
    }
}

// ============= Model Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Model used by the four research agents
    #[serde(default = "default_research_model")]
    pub research: String,

    /// Model that condenses the dossier into structured research
    #[serde(default = "default_research_model")]
    pub synthesis: String,

    #[serde(default = "default_author_model")]
    pub author: String,
}

fn default_research_model() -> String {
    DEFAULT_RESEARCH_MODEL.to_string()
}

fn default_author_model() -> String {
    DEFAULT_AUTHOR_MODEL.to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            research: default_research_model(),
            synthesis: default_research_model(),
            author: default_author_model(),
        }
    }
}

// ============= Retry Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: u32,

    /// Per-attempt timeout for ordinary calls; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Per-attempt timeout for drafting and synthesis; 0 disables it
    #[serde(default = "default_heavy_timeout_secs")]
    pub heavy_timeout_secs: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    2000
}

fn default_backoff_factor() -> u32 {
    2
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_heavy_timeout_secs() -> u64 {
    120
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_factor: default_backoff_factor(),
            timeout_secs: default_timeout_secs(),
            heavy_timeout_secs: default_heavy_timeout_secs(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        let secs = |s: u64| (s > 0).then(|| Duration::from_secs(s));
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            backoff_factor: self.backoff_factor,
            timeout: secs(self.timeout_secs),
            heavy_timeout: secs(self.heavy_timeout_secs),
        }
    }
}

// ============= Research & Drafting Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Reports shorter than this count as failures
    #[serde(default = "default_min_report_chars")]
    pub min_report_chars: usize,

    #[serde(default = "default_case_study_count")]
    pub default_case_study_count: u32,
}

fn default_min_report_chars() -> usize {
    DEFAULT_MIN_REPORT_CHARS
}

fn default_case_study_count() -> u32 {
    DEFAULT_CASE_STUDY_COUNT
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            min_report_chars: default_min_report_chars(),
            default_case_study_count: default_case_study_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftingConfig {
    /// Thinking budget for the author model; 0 disables thinking config
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,
}

fn default_thinking_budget() -> u32 {
    DEFAULT_THINKING_BUDGET
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            thinking_budget: default_thinking_budget(),
        }
    }
}

impl DraftingConfig {
    pub fn thinking_budget(&self) -> Option<u32> {
        (self.thinking_budget > 0).then_some(self.thinking_budget)
    }
}

// ============= Image Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Generation order; empty means the built-in order
    #[serde(default)]
    pub hierarchy: Vec<String>,

    #[serde(default = "default_edit_fallback")]
    pub edit_fallback: String,

    #[serde(default = "default_image_style")]
    pub default_style: String,

    /// Extra or overriding capability descriptors
    #[serde(default)]
    pub models: Vec<ImageModel>,
}

fn default_edit_fallback() -> String {
    GEMINI_25_FLASH_IMAGE.to_string()
}

fn default_image_style() -> String {
    DEFAULT_IMAGE_STYLE.to_string()
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            hierarchy: Vec::new(),
            edit_fallback: default_edit_fallback(),
            default_style: default_image_style(),
            models: Vec::new(),
        }
    }
}

impl ImagesConfig {
    /// Built-in descriptors overlaid with the configured ones.
    pub fn catalog(&self) -> ImageModelCatalog {
        let builtin = ImageModelCatalog::default();
        let hierarchy = if self.hierarchy.is_empty() {
            builtin.default_hierarchy().into_iter().map(|m| m.id).collect()
        } else {
            self.hierarchy.clone()
        };
        let mut catalog =
            ImageModelCatalog::new(builtin.models().to_vec(), hierarchy, &self.edit_fallback);
        for model in &self.models {
            catalog.register(model.clone());
        }
        catalog
    }
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl YitConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    /// Like [`YitConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: YitConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.api_key_env.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.api_key_env must name an environment variable".to_string(),
            ));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }

        for (field, model) in [
            ("models.research", &self.models.research),
            ("models.synthesis", &self.models.synthesis),
            ("models.author", &self.models.author),
        ] {
            if model.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        if self.retry.backoff_factor == 0 {
            return Err(ConfigError::ValidationError(
                "retry.backoff_factor must be at least 1".to_string(),
            ));
        }

        if self.research.default_case_study_count == 0 {
            return Err(ConfigError::ValidationError(
                "research.default_case_study_count must be at least 1".to_string(),
            ));
        }

        if let Some(id) = self.images.hierarchy.iter().find(|id| id.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "images.hierarchy contains an empty model id ('{}')",
                id
            )));
        }
        if self.images.models.iter().any(|m| m.id.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "images.models entries need an id".to_string(),
            ));
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get the API key from the environment
    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.api.api_key_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.api.api_key_env.clone()))
    }
}
