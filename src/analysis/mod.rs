//! Schema-constrained model invocation.
//!
//! The model is treated as a black box that takes a prompt plus the fixed
//! [`AnalysisSchema`] and returns at most one JSON payload. The invoker turns
//! that payload into an [`AnalysisResult`] or fails; there is no partial
//! recovery and no retry.

use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;

/// Google Gemini backend
pub mod gemini;
/// OpenAI backend
pub mod openai;
/// Response schema shared by both backends
pub mod schema;
/// Decoded analysis types
pub mod types;

pub use schema::AnalysisSchema;
pub use types::{AnalysisResult, Level};

/// Message used when the model returns nothing usable
pub const EMPTY_PAYLOAD_MESSAGE: &str = "Failed to generate analysis from AI.";

/// A single completion request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Rendered evaluation prompt
    pub prompt: String,
    /// Output schema the payload must satisfy
    pub schema: AnalysisSchema,
}

impl GenerationRequest {
    /// Pairs a prompt with the analysis schema
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            schema: AnalysisSchema::analysis(),
        }
    }
}

/// A generative model that honors a structured output schema
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Runs one completion and returns the payload text, if any
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>>;
}

/// Submits prompts to a [`ModelService`] and decodes the answer
#[derive(Clone)]
pub struct AnalysisInvoker {
    service: Arc<dyn ModelService>,
}

impl AnalysisInvoker {
    /// Wraps a model backend
    pub fn new(service: Arc<dyn ModelService>) -> Self {
        Self { service }
    }

    /// Sends the prompt once and decodes the structured response
    pub async fn invoke(&self, prompt: &str) -> Result<AnalysisResult> {
        info!("Requesting analysis from {}", self.service.name());
        let request = GenerationRequest::new(prompt);

        let payload = self
            .service
            .generate(&request)
            .await?
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AnalyzerError::ModelInvocation(EMPTY_PAYLOAD_MESSAGE.to_string()))?;
        debug!("Model returned {} bytes", payload.len());

        let result = decode_analysis(&payload)?;
        for (field, value) in result.out_of_range_scores() {
            warn!("Model returned {} = {} outside 0-100; keeping it as is", field, value);
        }
        Ok(result)
    }
}

/// Decodes a model payload; anything that does not match the schema is rejected
pub fn decode_analysis(payload: &str) -> Result<AnalysisResult> {
    serde_json::from_str(payload).map_err(AnalyzerError::ResponseDecode)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"score": 81, "level": "Advanced", "summary": "Solid.",
        "strengths": ["a", "b", "c"], "weaknesses": ["d"], "roadmap": ["e", "f", "g"],
        "consistencyScore": 75, "documentationScore": 90, "bestPracticesScore": 80}"#;

    fn invoker_returning(payload: Option<&'static str>) -> AnalysisInvoker {
        let mut service = MockModelService::new();
        service.expect_name().return_const("mock");
        service
            .expect_generate()
            .times(1)
            .returning(move |_| Ok(payload.map(str::to_string)));
        AnalysisInvoker::new(Arc::new(service))
    }

    #[tokio::test]
    async fn test_valid_payload_decodes() {
        let result = invoker_returning(Some(VALID)).invoke("prompt").await.unwrap();
        assert_eq!(result.score, 81);
        assert_eq!(result.level, Level::Advanced);
    }

    #[tokio::test]
    async fn test_missing_payload_is_invocation_error() {
        let error = invoker_returning(None).invoke("prompt").await.unwrap_err();
        assert!(matches!(error, AnalyzerError::ModelInvocation(ref m) if m == EMPTY_PAYLOAD_MESSAGE));
    }

    #[tokio::test]
    async fn test_blank_payload_is_invocation_error() {
        let error = invoker_returning(Some("  \n")).invoke("prompt").await.unwrap_err();
        assert!(matches!(error, AnalyzerError::ModelInvocation(_)));
    }

    #[tokio::test]
    async fn test_schema_violation_is_decode_error() {
        let error = invoker_returning(Some(r#"{"score": 10, "level": "Beginner"}"#))
            .invoke("prompt")
            .await
            .unwrap_err();
        assert!(matches!(error, AnalyzerError::ResponseDecode(_)));
    }

    #[tokio::test]
    async fn test_fenced_payload_is_not_repaired() {
        let fenced: &'static str = "```json\n{\"score\": 1}\n```";
        let error = invoker_returning(Some(fenced)).invoke("prompt").await.unwrap_err();
        assert!(matches!(error, AnalyzerError::ResponseDecode(_)));
    }

    #[tokio::test]
    async fn test_request_carries_schema_and_prompt() {
        let mut service = MockModelService::new();
        service.expect_name().return_const("mock");
        service
            .expect_generate()
            .withf(|request: &GenerationRequest| {
                request.prompt == "rendered prompt" && request.schema.required().len() == 9
            })
            .times(1)
            .returning(|_| Ok(Some(VALID.to_string())));

        let invoker = AnalysisInvoker::new(Arc::new(service));
        assert!(invoker.invoke("rendered prompt").await.is_ok());
    }
}
