use serde::{Deserialize, Serialize};
use std::env;

/// Stores API keys for the services gitgrade talks to
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    /// GitHub API token for authenticated requests
    pub github_token: Option<String>,
    /// Google Gemini API key
    pub gemini_api_key: Option<String>,
    /// OpenAI API key
    pub openai_api_key: Option<String>,
}

impl ApiKeys {
    /// Loads API keys from the environment
    ///
    /// `GEMINI_API_KEY` wins over the shorter `API_KEY` when both are set.
    pub fn from_env() -> Self {
        Self {
            github_token: non_empty_var("GITHUB_TOKEN"),
            gemini_api_key: non_empty_var("GEMINI_API_KEY").or_else(|| non_empty_var("API_KEY")),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
