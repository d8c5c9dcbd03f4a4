use super::{GenerationRequest, ModelService};
use crate::config::{ModelProvider, ModelSettings};
use crate::error::Result;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
};
use async_openai::Client;
use async_trait::async_trait;
use log::{debug, warn};

/// OpenAI chat completions backend with a strict `json_schema` response format
pub struct OpenAiService {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiService {
    /// Creates the backend from model settings
    ///
    /// `timeout_secs` is not applied here; async-openai owns its HTTP client.
    pub fn new(settings: &ModelSettings, model: String) -> Self {
        let mut config = OpenAIConfig::new().with_api_base(
            settings
                .api_base
                .clone()
                .unwrap_or_else(|| ModelProvider::OpenAI.default_api_base().to_string()),
        );
        if let Some(key) = &settings.api_key {
            config = config.with_api_key(key.clone());
        }

        Self {
            client: Client::with_config(config),
            model,
        }
    }

    /// Builds the chat completion request for one analysis
    pub fn build_request(&self, request: &GenerationRequest) -> Result<CreateChatCompletionRequest> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt.as_str())
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestMessage::from(message)])
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: Some("Repository quality evaluation".to_string()),
                    name: request.schema.name.to_string(),
                    schema: Some(request.schema.to_json_schema()),
                    strict: Some(true),
                },
            })
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl ModelService for OpenAiService {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>> {
        debug!("Sending chat completion to model {}", self.model);
        let response = self.client.chat().create(self.build_request(request)?).await?;

        let Some(choice) = response.choices.into_iter().next() else {
            warn!("OpenAI returned no choices");
            return Ok(None);
        };
        Ok(choice.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_strict_json_schema() {
        let settings = ModelSettings {
            api_key: Some("sk-test".into()),
            ..ModelSettings::default()
        };
        let service = OpenAiService::new(&settings, "gpt-4o-mini".into());
        let request = service
            .build_request(&GenerationRequest::new("evaluate this"))
            .unwrap();

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["content"], "evaluate this");
        assert_eq!(value["response_format"]["type"], "json_schema");
        assert_eq!(value["response_format"]["json_schema"]["strict"], true);
        assert_eq!(
            value["response_format"]["json_schema"]["schema"]["required"]
                .as_array()
                .map(Vec::len),
            Some(9)
        );
    }
}
