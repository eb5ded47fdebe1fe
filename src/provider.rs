use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use crate::config::AppConfig;
use crate::error::{ConfigError, ProviderError};
use crate::estimate::EstimateKind;

pub const MODEL: &str = "llama-3.2-90b-vision-preview";
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_COMPLETION_TOKENS: u32 = 1024;
pub const TOP_P: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_completion_tokens: u32,
    pub top_p: f64,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, passed through unmodified.
    pub fn into_first_content(self) -> Result<String, ProviderError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyCompletion)?;
        choice.message.content.ok_or(ProviderError::MissingContent)
    }
}

/// Single-turn user message: the kind's instruction followed by the image.
pub fn build_chat_request(kind: EstimateKind, image_url: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: MODEL.to_string(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: vec![
                ContentPart::Text {
                    text: kind.prompt().to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.to_string(),
                    },
                },
            ],
        }],
        temperature: TEMPERATURE,
        max_completion_tokens: MAX_COMPLETION_TOKENS,
        top_p: TOP_P,
        stream: false,
    }
}

/// Something that can turn a chat-completion request into completion text.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    async fn complete(&self, request: ChatCompletionRequest) -> Result<String, ProviderError>;
}

/// OpenAI-compatible chat-completion client pointed at Groq.
pub struct GroqClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl GroqClient {
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| ConfigError::InvalidApiKey)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url),
            timeout: config.timeout,
        })
    }

    async fn send(&self, request: &ChatCompletionRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(ProviderError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response body>".to_string());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(ProviderError::Decode)?;
        completion.into_first_content()
    }
}

#[async_trait]
impl VisionProvider for GroqClient {
    async fn complete(&self, request: ChatCompletionRequest) -> Result<String, ProviderError> {
        tracing::debug!(endpoint = %self.endpoint, model = %request.model, "sending chat completion");
        timeout(self.timeout, self.send(&request))
            .await
            .map_err(|_| {
                ProviderError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn build_request_matches_wire_format() {
        let request = build_chat_request(EstimateKind::Build, "https://x/y.jpg");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "llama-3.2-90b-vision-preview",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "Analyze this furniture image and estimate the build cost"},
                        {"type": "image_url", "image_url": {"url": "https://x/y.jpg"}}
                    ]
                }],
                "temperature": 0.7,
                "max_completion_tokens": 1024,
                "top_p": 1.0,
                "stream": false
            })
        );
    }

    #[test]
    fn kinds_differ_only_in_instruction() {
        let build = build_chat_request(EstimateKind::Build, "https://x/y.jpg");
        let mut repair = build_chat_request(EstimateKind::Repair, "https://x/y.jpg");
        assert_ne!(build, repair);

        repair.messages[0].content[0] = ContentPart::Text {
            text: EstimateKind::Build.prompt().to_string(),
        };
        assert_eq!(build, repair);
    }

    #[test]
    fn first_choice_content_is_returned_verbatim() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  Estimated cost: $450\n"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.into_first_content().unwrap(), "  Estimated cost: $450\n");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            response.into_first_content(),
            Err(ProviderError::EmptyCompletion)
        ));
    }

    #[test]
    fn null_content_is_an_error() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert!(matches!(
            response.into_first_content(),
            Err(ProviderError::MissingContent)
        ));
    }
}
