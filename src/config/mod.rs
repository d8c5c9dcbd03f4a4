mod env_manager;

use crate::analysis::{gemini::GeminiService, openai::OpenAiService, ModelService};
use crate::error::{AnalyzerError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

pub use env_manager::ApiKeys;

/// Default GitHub REST endpoint
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
/// Default Gemini REST endpoint
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
/// Default OpenAI REST endpoint
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Main configuration struct for the application
///
/// Loaded from `<config_dir>/gitgrade/config.toml` when present, then
/// overridden from the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for the GitHub API
    pub github: GitHubSettings,
    /// Settings for the model service
    pub model: ModelSettings,
    /// Settings for the HTTP server binary
    pub server: ServerSettings,
}

/// GitHub API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    /// Base URL of the REST API
    pub api_base: String,
    /// Optional read token, improves rate limits
    pub token: Option<String>,
    /// User agent sent with every request
    pub user_agent: String,
    /// Request timeout; unset keeps the transport default
    pub timeout_secs: Option<u64>,
}

/// Which model backend to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Google Gemini `generateContent`
    #[default]
    Gemini,
    /// OpenAI chat completions
    OpenAI,
}

/// Model service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Backend to use
    pub provider: ModelProvider,
    /// Model name; unset picks the provider default
    pub model: Option<String>,
    /// Base URL override for the backend
    pub api_base: Option<String>,
    /// API key for the backend
    pub api_key: Option<String>,
    /// Request timeout; unset keeps the transport default
    pub timeout_secs: Option<u64>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to bind
    pub bind: String,
}

impl Config {
    /// Loads configuration from the default config file location
    ///
    /// If the config file doesn't exist, returns the default configuration.
    /// Environment overrides are applied in both cases.
    pub fn load() -> Result<Self> {
        let config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        Ok(config.apply_env())
    }

    /// Reads a TOML configuration file without applying environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnalyzerError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| AnalyzerError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Location of the per-user config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gitgrade").join("config.toml"))
    }

    /// Overrides settings from environment variables
    pub fn apply_env(self) -> Self {
        self.apply_keys(ApiKeys::from_env(), |name| std::env::var(name).ok())
    }

    fn apply_keys(mut self, keys: ApiKeys, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = keys.github_token {
            self.github.token = Some(token);
        }
        if let Some(base) = var("GITHUB_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.github.api_base = base;
        }
        if let Some(value) = var("GITGRADE_PROVIDER").filter(|v| !v.trim().is_empty()) {
            match value.parse() {
                Ok(provider) => self.set_provider(provider),
                Err(e) => warn!("Ignoring GITGRADE_PROVIDER: {}", e),
            }
        }
        if let Some(model) = var("GITGRADE_MODEL").filter(|v| !v.trim().is_empty()) {
            self.model.model = Some(model);
        }
        if self.model.api_key.is_none() {
            self.model.api_key = match self.model.provider {
                ModelProvider::Gemini => keys.gemini_api_key,
                ModelProvider::OpenAI => keys.openai_api_key,
            };
        }
        self
    }

    /// Switches the model backend
    ///
    /// Key, endpoint and model name belong to the previous provider, so they
    /// are dropped when the provider actually changes.
    pub fn set_provider(&mut self, provider: ModelProvider) {
        if self.model.provider == provider {
            return;
        }
        self.model.provider = provider;
        self.model.api_key = None;
        self.model.api_base = None;
        self.model.model = None;
    }

    /// Validates that configured tokens are usable
    pub fn validate(&self) -> Result<()> {
        if let Some(token) = &self.github.token {
            if token.trim().is_empty() {
                return Err(AnalyzerError::Config("GitHub token is empty".into()));
            }
        }
        match self.model.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(AnalyzerError::Config(format!(
                "No API key configured for the {} model service",
                self.model.provider
            ))),
        }
    }

    /// Model name after applying the provider default
    pub fn model_name(&self) -> String {
        self.model
            .model
            .clone()
            .unwrap_or_else(|| self.model.provider.default_model().to_string())
    }

    /// Builds the configured model backend
    pub fn model_service(&self) -> Result<Arc<dyn ModelService>> {
        self.validate()?;
        let service: Arc<dyn ModelService> = match self.model.provider {
            ModelProvider::Gemini => Arc::new(GeminiService::new(&self.model, self.model_name())?),
            ModelProvider::OpenAI => Arc::new(OpenAiService::new(&self.model, self.model_name())),
        };
        Ok(service)
    }
}

impl ModelProvider {
    /// Model used when none is configured
    pub fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.5-flash",
            Self::OpenAI => "gpt-4o-mini",
        }
    }

    /// Base URL used when none is configured
    pub fn default_api_base(self) -> &'static str {
        match self {
            Self::Gemini => DEFAULT_GEMINI_API_BASE,
            Self::OpenAI => DEFAULT_OPENAI_API_BASE,
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAI => write!(f, "openai"),
        }
    }
}

impl FromStr for ModelProvider {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAI),
            other => Err(AnalyzerError::Config(format!("Unknown model provider: {}", other))),
        }
    }
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            token: None,
            user_agent: format!("gitgrade/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: ModelProvider::default(),
            model: None,
            api_base: None,
            api_key: None,
            timeout_secs: None,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}
