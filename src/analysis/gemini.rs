use super::{GenerationRequest, ModelService};
use crate::config::{ModelProvider, ModelSettings};
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Google Gemini `generateContent` backend
pub struct GeminiService {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiService {
    /// Creates the backend from model settings
    pub fn new(settings: &ModelSettings, model: String) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| AnalyzerError::Config("Gemini API key not configured".into()))?;

        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            api_base: settings
                .api_base
                .clone()
                .unwrap_or_else(|| ModelProvider::Gemini.default_api_base().to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }

    fn request_body(request: &GenerationRequest) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.schema.to_gemini(),
            }
        })
    }
}

#[async_trait]
impl ModelService for GeminiService {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>> {
        debug!("POST {}", self.endpoint());
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| AnalyzerError::ModelInvocation(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::ModelInvocation(format!(
                "Gemini API request failed: HTTP {}: {}",
                status,
                body.trim()
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            AnalyzerError::ModelInvocation(format!("Unreadable Gemini response: {}", e))
        })?;

        if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
            warn!("Gemini blocked the prompt: {}", reason);
        }

        let Some(candidate) = body.candidates.into_iter().next() else {
            return Ok(None);
        };
        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" {
                warn!("Gemini finished with reason {}", reason);
            }
        }

        let text: String = candidate
            .content
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        Ok((!text.is_empty()).then_some(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn service(base: String) -> GeminiService {
        let settings = ModelSettings {
            api_base: Some(base),
            api_key: Some("test-key".into()),
            ..ModelSettings::default()
        };
        GeminiService::new(&settings, "gemini-2.5-flash".into()).unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "OBJECT" }
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "{\"score\""}, {"text": ": 1}"}]}, "finishReason": "STOP"}]}"#)
            .create_async()
            .await;

        let text = service(server.url())
            .generate(&GenerationRequest::new("hello"))
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some(r#"{"score": 1}"#));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_candidates_is_no_payload() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let text = service(server.url())
            .generate(&GenerationRequest::new("hello"))
            .await
            .unwrap();
        assert!(text.is_none());
    }

    #[tokio::test]
    async fn test_http_failure_is_invocation_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(429)
            .with_body(r#"{"error": {"message": "quota"}}"#)
            .create_async()
            .await;

        let error = service(server.url())
            .generate(&GenerationRequest::new("hello"))
            .await
            .unwrap_err();
        assert!(matches!(error, AnalyzerError::ModelInvocation(ref m) if m.contains("429")));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let result = GeminiService::new(&ModelSettings::default(), "m".into());
        assert!(matches!(result, Err(AnalyzerError::Config(_))));
    }
}
