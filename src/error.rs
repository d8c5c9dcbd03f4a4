use async_openai::error::OpenAIError;
use std::io;
use thiserror::Error;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Message shown when an error carries no text of its own
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred.";

/// Errors that can occur while grading a repository
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The user input could not be resolved to an owner/name pair
    #[error("{0}")]
    InvalidRepositoryUrl(String),

    /// The repository metadata read came back with a non-success status
    #[error("Repository not found or private. Status: {status}")]
    RepositoryNotFound {
        /// HTTP status returned by GitHub
        status: u16,
    },

    /// GitHub refused the metadata read (private repository or rate limit)
    #[error("Repository access denied (private or rate limited). Status: {status}")]
    RepositoryAccessDenied {
        /// HTTP status returned by GitHub
        status: u16,
    },

    /// The model service produced no usable payload
    #[error("{0}")]
    ModelInvocation(String),

    /// The model payload did not match the declared analysis schema
    #[error("Failed to parse analysis response: {0}")]
    ResponseDecode(#[source] serde_json::Error),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// OpenAI API errors
    #[error("OpenAI error: {0}")]
    OpenAI(#[from] OpenAIError),

    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// General message errors
    #[error("{0}")]
    Message(String),
}

impl AnalyzerError {
    /// Creates a new error with the specified message
    pub fn new(message: &str) -> Self {
        Self::Message(message.to_string())
    }

    /// The single human-readable string shown for a failed run
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }

    /// Whether the failure was caused by the user's input rather than a remote service
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidRepositoryUrl(_))
    }

    /// HTTP status used when this error is reported over the web API
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRepositoryUrl(_) => 400,
            Self::RepositoryNotFound { .. } => 404,
            Self::RepositoryAccessDenied { .. } => 403,
            Self::ModelInvocation(_) | Self::ResponseDecode(_) | Self::OpenAI(_) => 502,
            _ => 500,
        }
    }
}
